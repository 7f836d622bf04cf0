//! 学习进度模块
//!
//! 学习者档案的存取与每学习者串行化锁。
//! 仓储以 trait 为界，存储引擎可替换，便于 mock 测试。

pub mod locks;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::LearnerProfile;

/// 进度仓储接口
///
/// 档案只增不删：completedUnits 与 xp 单调不减。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// 获取档案，首次访问时创建零状态档案
    async fn get(&self, address: &str) -> Result<LearnerProfile>;

    /// 记录一次通过
    ///
    /// 单元已完成时为幂等空操作，返回未变更的档案——
    /// 重复通过同一单元不会重复加 XP。
    async fn record_pass(
        &self,
        address: &str,
        unit_id: &str,
        xp_reward: u32,
        now: DateTime<Utc>,
    ) -> Result<LearnerProfile>;

    /// 记录一次提交（无论通过与否）
    ///
    /// 累加 attempts_by_unit 并追加提交历史，供"最具挑战单元"统计。
    async fn record_attempt(
        &self,
        address: &str,
        unit_id: &str,
        score_percent: u32,
        passed: bool,
        now: DateTime<Utc>,
    ) -> Result<()>;
}

pub use locks::LearnerLocks;
pub use memory::MemoryProgressStore;
