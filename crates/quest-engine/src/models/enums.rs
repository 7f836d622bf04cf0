//! 引擎枚举类型定义
//!
//! 所有枚举都支持 JSON（serde）序列化

use serde::{Deserialize, Serialize};

use crate::error::QuestError;

/// 徽章稀有度
///
/// 有序的封闭枚举，链上以 u8 序数表示。越界值必须拒绝而非截断。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    /// 普通
    #[default]
    Common,
    /// 稀有
    Rare,
    /// 史诗
    Epic,
    /// 传说
    Legendary,
}

impl Rarity {
    /// 链上序数表示（Common=0 .. Legendary=3）
    pub fn as_index(self) -> u8 {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Epic => 2,
            Self::Legendary => 3,
        }
    }

    /// 从链上序数解析，越界返回 `InvalidRarity`
    pub fn from_index(index: u8) -> Result<Self, QuestError> {
        match index {
            0 => Ok(Self::Common),
            1 => Ok(Self::Rare),
            2 => Ok(Self::Epic),
            3 => Ok(Self::Legendary),
            other => Err(QuestError::InvalidRarity(other)),
        }
    }
}

/// 发放状态
///
/// 追踪一条 (学习者, 单元, 链) 发放记录的生命周期。
/// Deferred 表示链暂不可用、重试耗尽后的延迟发放状态，
/// 进度不回滚，后续可再次触发补发；
/// Failed 表示不可重试的失败（如铸造身份未授权），需人工介入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuanceStatus {
    /// 已记录发放意图，链上调用尚未完成
    Pending,
    /// 链上铸造成功
    Minted,
    /// 链暂不可用，等待补发
    Deferred,
    /// 不可重试的失败，等待人工处理
    Failed,
}
