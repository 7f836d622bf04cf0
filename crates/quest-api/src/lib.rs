//! 任务引擎 REST API 服务
//!
//! 面向学习端与运维端的 HTTP 接口：
//!
//! - 路线图与可解锁单元查询
//! - 测验生成与提交
//! - 学习者档案与学习分析
//! - 链上凭证查询、批量发放与铸造白名单管理
//!
//! ## 模块结构
//!
//! - `dto`: 请求/响应数据传输对象
//! - `error`: API 错误类型与 HTTP 映射
//! - `handlers`: 各端点处理器
//! - `routes`: 路由映射
//! - `state`: Axum 共享状态
//! - `worker`: 后台任务（会话清理）

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod worker;

pub use error::ApiError;
pub use state::AppState;
