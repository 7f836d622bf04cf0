//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use quest_engine::{QueryService, QuestEngine};

/// Axum 应用共享状态
///
/// 引擎与查询服务通过 Arc 在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// 任务引擎（测验、进度、发放的编排入口）
    pub engine: Arc<QuestEngine>,
    /// 只读查询服务（档案分析）
    pub query: Arc<QueryService>,
}

impl AppState {
    pub fn new(engine: Arc<QuestEngine>, query: Arc<QueryService>) -> Self {
        Self { engine, query }
    }
}
