//! 链适配器接口
//!
//! 引擎通过该接口与具体网络交互，网络差异（RPC、签名、gas）
//! 被封装在实现内部。所有调用方身份与持有人地址在实现内部统一归一化。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Rarity;

/// 链上凭证的只读视图
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInfo {
    pub token_id: u64,
    pub holder: String,
    pub unit_id: String,
    pub metadata_uri: String,
    pub rarity: Rarity,
}

/// 单次铸造请求
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub to: String,
    pub unit_id: String,
    pub metadata_uri: String,
    pub rarity: Rarity,
}

/// 凭证链适配器
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// 网络名称，作为注册表键
    fn name(&self) -> &str;

    /// 铸造一枚凭证，返回新 token id
    ///
    /// caller 必须是 owner 或已授权的 minter。
    async fn mint(&self, caller: &str, request: MintRequest) -> Result<u64>;

    /// 批量铸造：整批成功或整批失败，不存在部分铸造
    async fn mint_batch(&self, caller: &str, requests: Vec<MintRequest>) -> Result<Vec<u64>>;

    /// 将身份加入铸造白名单，仅 owner 可调用
    async fn authorize_minter(&self, caller: &str, minter: &str) -> Result<()>;

    /// 将身份移出铸造白名单，仅 owner 可调用
    async fn revoke_minter(&self, caller: &str, minter: &str) -> Result<()>;

    /// 查询身份是否具备铸造权
    async fn is_authorized(&self, identity: &str) -> Result<bool>;

    /// 某地址持有的凭证数量
    async fn balance_of(&self, holder: &str) -> Result<u64>;

    /// 某地址持有的全部凭证，按铸造顺序返回
    async fn badges_of(&self, holder: &str) -> Result<Vec<BadgeInfo>>;

    /// 按 token id 查询单枚凭证
    async fn badge_info(&self, token_id: u64) -> Result<BadgeInfo>;
}
