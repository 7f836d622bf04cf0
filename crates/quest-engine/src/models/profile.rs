//! 学习者档案模型
//!
//! 档案首次交互时创建，只由通过校验的测验结果变更，永不删除

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 链上账户地址大小写归一化
///
/// 同一地址的不同大小写写法必须落到同一份档案上。
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// 一次测验提交的历史记录（用于分类表现分析）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptRecord {
    pub unit_id: String,
    pub score_percent: u32,
    pub passed: bool,
    pub timestamp: DateTime<Utc>,
}

/// 学习者档案
///
/// completedUnits 与 xp 单调不减；attempts 记录所有提交（含失败），
/// 支撑"最具挑战单元"统计。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    /// 归一化后的链上账户地址
    pub address: String,
    /// 单元 id -> 完成时间
    pub completed_units: HashMap<String, DateTime<Utc>>,
    /// 已完成单元的 XP 总和
    pub xp: u64,
    /// 连续完成天数
    pub streak: u32,
    /// 单元 id -> 提交次数（含未通过）
    pub attempts_by_unit: HashMap<String, u32>,
    /// 全部提交历史
    pub quiz_attempts: Vec<QuizAttemptRecord>,
}

impl LearnerProfile {
    /// 创建零状态档案
    pub fn new(address: &str) -> Self {
        Self {
            address: normalize_address(address),
            ..Default::default()
        }
    }

    /// 某单元是否已完成
    pub fn has_completed(&self, unit_id: &str) -> bool {
        self.completed_units.contains_key(unit_id)
    }

    /// 最近一次完成的时间（档案为空时为 None）
    pub fn latest_completion(&self) -> Option<DateTime<Utc>> {
        self.completed_units.values().max().copied()
    }
}
