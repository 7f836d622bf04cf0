//! 内存进度仓储
//!
//! 以 DashMap 按归一化地址分片存放档案。规格不约定存储引擎，
//! 持久化实现只需替换本文件并保持 `ProgressStore` 契约不变。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{LearnerProfile, QuizAttemptRecord, normalize_address};

use super::ProgressStore;

/// 内存进度仓储
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    profiles: DashMap<String, LearnerProfile>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据上一次完成时间推进连续天数
    ///
    /// - 首次完成：1
    /// - 上次完成在昨天：+1
    /// - 上次完成在今天：不变（当天已计入）
    /// - 间隔超过一天：重置为 1
    fn next_streak(
        current: u32,
        last_completion: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> u32 {
        match last_completion {
            None => 1,
            Some(last) => {
                let gap_days = (now.date_naive() - last.date_naive()).num_days();
                match gap_days {
                    0 => current.max(1),
                    1 => current + 1,
                    _ => 1,
                }
            }
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get(&self, address: &str) -> Result<LearnerProfile> {
        let key = normalize_address(address);
        let profile = self
            .profiles
            .entry(key.clone())
            .or_insert_with(|| LearnerProfile::new(&key));
        Ok(profile.clone())
    }

    async fn record_pass(
        &self,
        address: &str,
        unit_id: &str,
        xp_reward: u32,
        now: DateTime<Utc>,
    ) -> Result<LearnerProfile> {
        let key = normalize_address(address);
        let mut entry = self
            .profiles
            .entry(key.clone())
            .or_insert_with(|| LearnerProfile::new(&key));

        // 幂等：已完成的单元不再变更档案
        if entry.has_completed(unit_id) {
            debug!(address = %key, unit_id = %unit_id, "单元已完成，跳过重复记录");
            return Ok(entry.clone());
        }

        let last_completion = entry.latest_completion();
        entry.streak = Self::next_streak(entry.streak, last_completion, now);
        entry.completed_units.insert(unit_id.to_string(), now);
        entry.xp += u64::from(xp_reward);

        info!(
            address = %key,
            unit_id = %unit_id,
            xp = entry.xp,
            streak = entry.streak,
            "已记录单元通过"
        );
        Ok(entry.clone())
    }

    async fn record_attempt(
        &self,
        address: &str,
        unit_id: &str,
        score_percent: u32,
        passed: bool,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let key = normalize_address(address);
        let mut entry = self
            .profiles
            .entry(key.clone())
            .or_insert_with(|| LearnerProfile::new(&key));

        *entry
            .attempts_by_unit
            .entry(unit_id.to_string())
            .or_insert(0) += 1;
        entry.quiz_attempts.push(QuizAttemptRecord {
            unit_id: unit_id.to_string(),
            score_percent,
            passed,
            timestamp: now,
        });

        Ok(())
    }
}
