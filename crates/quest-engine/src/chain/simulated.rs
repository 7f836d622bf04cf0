//! 模拟链实现
//!
//! 在没有真实 RPC 节点时提供与合约一致的语义：token id 从 1 单调递增、
//! owner + 白名单权限、按铸造顺序的持仓查询、整批成功或失败的批量铸造。
//! 支持注入不可用故障，用于验证重试与延迟发放路径。

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::chain::access::MinterAccess;
use crate::chain::adapter::{BadgeInfo, ChainAdapter, MintRequest};
use crate::error::{QuestError, Result};
use crate::models::normalize_address;

#[derive(Debug, Default)]
struct ChainState {
    next_token_id: u64,
    badges: HashMap<u64, BadgeInfo>,
    // 持有人 -> 按铸造顺序的 token id
    holdings: HashMap<String, Vec<u64>>,
    unavailable: Option<String>,
}

/// 进程内模拟链
pub struct SimulatedChain {
    name: String,
    access: RwLock<MinterAccess>,
    state: RwLock<ChainState>,
}

impl SimulatedChain {
    pub fn new(name: &str, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            access: RwLock::new(MinterAccess::new(owner)),
            state: RwLock::new(ChainState {
                next_token_id: 1,
                ..Default::default()
            }),
        }
    }

    /// 注入不可用故障：后续写操作返回 ChainUnavailable，直到恢复
    pub fn set_unavailable(&self, reason: &str) {
        self.state.write().unavailable = Some(reason.to_string());
    }

    /// 清除故障，恢复服务
    pub fn set_available(&self) {
        self.state.write().unavailable = None;
    }

    fn check_available(&self, state: &ChainState) -> Result<()> {
        if let Some(reason) = &state.unavailable {
            return Err(QuestError::ChainUnavailable {
                chain: self.name.clone(),
                reason: reason.clone(),
            });
        }
        Ok(())
    }

    fn check_minter(&self, caller: &str) -> Result<()> {
        if !self.access.read().can_mint(caller) {
            return Err(QuestError::NotAuthorized {
                identity: normalize_address(caller),
                chain: self.name.clone(),
            });
        }
        Ok(())
    }

    /// 在已持有锁的状态下执行单次铸造
    fn mint_locked(&self, state: &mut ChainState, request: MintRequest) -> u64 {
        let token_id = state.next_token_id;
        state.next_token_id += 1;

        let holder = normalize_address(&request.to);
        state.badges.insert(
            token_id,
            BadgeInfo {
                token_id,
                holder: holder.clone(),
                unit_id: request.unit_id,
                metadata_uri: request.metadata_uri,
                rarity: request.rarity,
            },
        );
        state.holdings.entry(holder).or_default().push(token_id);
        token_id
    }
}

#[async_trait]
impl ChainAdapter for SimulatedChain {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, request), fields(chain = %self.name, to = %request.to, unit_id = %request.unit_id))]
    async fn mint(&self, caller: &str, request: MintRequest) -> Result<u64> {
        self.check_minter(caller)?;
        let mut state = self.state.write();
        self.check_available(&state)?;

        let token_id = self.mint_locked(&mut state, request);
        debug!(token_id, "badge minted");
        Ok(token_id)
    }

    #[instrument(skip(self, requests), fields(chain = %self.name, count = requests.len()))]
    async fn mint_batch(&self, caller: &str, requests: Vec<MintRequest>) -> Result<Vec<u64>> {
        self.check_minter(caller)?;
        let mut state = self.state.write();
        self.check_available(&state)?;

        // 整批在同一把写锁内完成，要么全部铸造要么全部不铸造
        let token_ids = requests
            .into_iter()
            .map(|r| self.mint_locked(&mut state, r))
            .collect();
        Ok(token_ids)
    }

    async fn authorize_minter(&self, caller: &str, minter: &str) -> Result<()> {
        self.access.write().authorize(caller, &self.name, minter)
    }

    async fn revoke_minter(&self, caller: &str, minter: &str) -> Result<()> {
        self.access.write().revoke(caller, &self.name, minter)
    }

    async fn is_authorized(&self, identity: &str) -> Result<bool> {
        Ok(self.access.read().can_mint(identity))
    }

    async fn balance_of(&self, holder: &str) -> Result<u64> {
        let state = self.state.read();
        Ok(state
            .holdings
            .get(&normalize_address(holder))
            .map_or(0, |ids| ids.len() as u64))
    }

    async fn badges_of(&self, holder: &str) -> Result<Vec<BadgeInfo>> {
        let state = self.state.read();
        let ids = state
            .holdings
            .get(&normalize_address(holder))
            .cloned()
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| state.badges.get(id).cloned())
            .collect())
    }

    async fn badge_info(&self, token_id: u64) -> Result<BadgeInfo> {
        self.state
            .read()
            .badges
            .get(&token_id)
            .cloned()
            .ok_or(QuestError::BadgeNotFound(token_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rarity;

    fn request(to: &str, unit_id: &str) -> MintRequest {
        MintRequest {
            to: to.to_string(),
            unit_id: unit_id.to_string(),
            metadata_uri: format!("https://badges.test/{unit_id}.json"),
            rarity: Rarity::Common,
        }
    }

    #[tokio::test]
    async fn test_token_ids_are_monotonic_from_one() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        let id1 = chain.mint("0xOwner", request("0xAlice", "intro-defi")).await.unwrap();
        let id2 = chain.mint("0xOwner", request("0xBob", "intro-defi")).await.unwrap();
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
    }

    #[tokio::test]
    async fn test_unauthenticated_mint_rejected() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        let err = chain
            .mint("0xStranger", request("0xAlice", "intro-defi"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_AUTHORIZED");
        assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_authorized_minter_can_mint() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        chain.authorize_minter("0xOwner", "0xMinter").await.unwrap();
        assert!(chain.is_authorized("0xMinter").await.unwrap());
        chain.mint("0xMinter", request("0xAlice", "intro-defi")).await.unwrap();
        assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_badges_of_preserves_mint_order() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        chain.mint("0xOwner", request("0xAlice", "intro-blockchain")).await.unwrap();
        chain.mint("0xOwner", request("0xAlice", "intro-defi")).await.unwrap();
        chain.mint("0xOwner", request("0xAlice", "intro-wallets")).await.unwrap();

        let badges = chain.badges_of("0xALICE").await.unwrap();
        let unit_ids: Vec<&str> = badges.iter().map(|b| b.unit_id.as_str()).collect();
        assert_eq!(unit_ids, vec!["intro-blockchain", "intro-defi", "intro-wallets"]);
    }

    #[tokio::test]
    async fn test_batch_mint_all_or_nothing_on_unavailability() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        chain.set_unavailable("rpc timeout");

        let err = chain
            .mint_batch(
                "0xOwner",
                vec![request("0xAlice", "intro-defi"), request("0xBob", "intro-defi")],
            )
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 0);
        assert_eq!(chain.balance_of("0xBob").await.unwrap(), 0);

        chain.set_available();
        let ids = chain
            .mint_batch(
                "0xOwner",
                vec![request("0xAlice", "intro-defi"), request("0xBob", "intro-defi")],
            )
            .await
            .unwrap();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_badge_info_unknown_token() {
        let chain = SimulatedChain::new("ethereum", "0xOwner");
        let err = chain.badge_info(42).await.unwrap_err();
        assert_eq!(err.error_code(), "BADGE_NOT_FOUND");
    }
}
