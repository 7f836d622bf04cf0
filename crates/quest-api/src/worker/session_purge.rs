//! 测验会话清理 Worker
//!
//! 定期清理超时未提交的测验会话。提交路径上的惰性清理只覆盖
//! 被再次访问的会话，被放弃的会话靠这里回收。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use quest_engine::QuestEngine;

/// 会话清理 Worker
///
/// 以固定间隔扫描会话仓库，丢弃超时会话。
pub struct SessionPurgeWorker {
    engine: Arc<QuestEngine>,
    /// 轮询间隔（建议 60 秒）
    poll_interval: Duration,
}

impl SessionPurgeWorker {
    pub fn new(engine: Arc<QuestEngine>, poll_interval_secs: u64) -> Self {
        Self {
            engine,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }

    /// 使用默认配置创建 Worker
    pub fn with_defaults(engine: Arc<QuestEngine>) -> Self {
        Self::new(engine, 60)
    }

    /// 启动清理循环，直到进程退出
    pub async fn run(self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "会话清理 Worker 已启动"
        );
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            let purged = self.engine.sessions().purge_expired(Utc::now());
            if purged > 0 {
                info!(purged, "已清理超时测验会话");
            } else {
                debug!("无超时会话需要清理");
            }
        }
    }
}
