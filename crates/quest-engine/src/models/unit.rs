//! 学习单元模型
//!
//! 单元在目录加载时创建，加载后不可变

use serde::{Deserialize, Serialize};

use super::enums::Rarity;

/// 配套学习资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResource {
    pub title: String,
    pub url: String,
}

/// 学习单元（一个"任务"）
///
/// 目录中的最小可完成粒度。prerequisites 引用其他单元的 id，
/// 不允许自引用，整个目录必须无环。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// 目录内唯一 id
    pub id: String,
    pub title: String,
    pub description: String,
    /// 详细介绍文本，测验出题也以此为主题上下文
    #[serde(default)]
    pub introduction: String,
    pub category: String,
    /// 完成奖励 XP，非负
    pub xp_reward: u32,
    /// 前置单元 id 集合
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub resources: Vec<UnitResource>,
}

impl Unit {
    /// 根据单元元数据确定徽章稀有度
    ///
    /// 稀有度只由目录元数据决定，与学习者输入无关，
    /// 防止伪造高稀有度凭证。
    pub fn rarity(&self) -> Rarity {
        match self.xp_reward {
            xp if xp >= 250 => Rarity::Legendary,
            xp if xp >= 150 => Rarity::Epic,
            xp if xp >= 100 => Rarity::Rare,
            _ => Rarity::Common,
        }
    }

    /// 徽章元数据 URI
    pub fn metadata_uri(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.id)
    }
}
