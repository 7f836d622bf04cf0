//! 共享库
//!
//! 包含各服务共用的配置加载、日志初始化和重试策略等基础设施代码。

pub mod config;
pub mod observability;
pub mod retry;
