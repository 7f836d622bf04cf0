//! 凭证发放集成测试
//!
//! 覆盖幂等发放、批量发放的整批原子性，以及链故障下的延迟发放。

use std::sync::Arc;
use std::time::Duration;

use quest_engine::{
    ChainAdapter, ChainRegistry, CredentialIssuer, IssuanceStatus, Rarity, SimulatedChain, Unit,
};
use quest_shared::config::{ChainConfig, IssuerConfig};
use quest_shared::retry::RetryPolicy;

// ==================== 辅助函数 ====================

fn issuer_config(minter: &str) -> IssuerConfig {
    IssuerConfig {
        chains: vec![ChainConfig {
            name: "ethereum".to_string(),
            owner: "operator".to_string(),
            minter: minter.to_string(),
        }],
        metadata_base_url: "https://badges.test".to_string(),
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        multiplier: 2.0,
    }
}

fn unit(id: &str, xp: u32) -> Unit {
    Unit {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        introduction: String::new(),
        category: "Test".to_string(),
        xp_reward: xp,
        prerequisites: vec![],
        resources: vec![],
    }
}

async fn setup(minter: &str) -> (Arc<SimulatedChain>, CredentialIssuer) {
    let chain = Arc::new(SimulatedChain::new("ethereum", "operator"));
    chain
        .authorize_minter("operator", "backend-minter")
        .await
        .expect("authorize");
    let mut registry = ChainRegistry::new();
    registry.register(chain.clone());
    let issuer = CredentialIssuer::new(Arc::new(registry), &issuer_config(minter))
        .with_retry_policy(fast_policy());
    (chain, issuer)
}

// ==================== 幂等性 ====================

#[tokio::test]
async fn double_issue_yields_exactly_one_badge() {
    let (chain, issuer) = setup("backend-minter").await;
    let legendary = unit("advanced-daos", 250);

    let first = issuer.issue("0xAlice", &legendary, "ethereum").await.unwrap();
    let second = issuer.issue("0xAlice", &legendary, "ethereum").await.unwrap();

    assert_eq!(first.status, IssuanceStatus::Minted);
    assert_eq!(first.token_id, second.token_id);
    assert_eq!(first.rarity, Rarity::Legendary);
    assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 1);
}

#[tokio::test]
async fn distinct_units_each_get_a_badge() {
    let (chain, issuer) = setup("backend-minter").await;

    issuer.issue("0xAlice", &unit("intro-defi", 100), "ethereum").await.unwrap();
    issuer.issue("0xAlice", &unit("intro-wallets", 100), "ethereum").await.unwrap();

    let badges = chain.badges_of("0xAlice").await.unwrap();
    assert_eq!(badges.len(), 2);
    // 铸造顺序保持
    assert_eq!(badges[0].unit_id, "intro-defi");
    assert_eq!(badges[1].unit_id, "intro-wallets");
}

// ==================== 故障路径 ====================

#[tokio::test]
async fn outage_defers_then_reissue_completes() {
    let (chain, issuer) = setup("backend-minter").await;
    let target = unit("intro-defi", 100);

    chain.set_unavailable("rpc outage");
    let record = issuer.issue("0xAlice", &target, "ethereum").await.unwrap();
    assert_eq!(record.status, IssuanceStatus::Deferred);
    assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 0);

    // 链恢复后补发同一条记录
    chain.set_available();
    let record = issuer.issue("0xAlice", &target, "ethereum").await.unwrap();
    assert_eq!(record.status, IssuanceStatus::Minted);
    assert_eq!(record.token_id, Some(1));
    assert!(issuer.deferred_records().is_empty());
}

#[tokio::test]
async fn unauthorized_identity_surfaces_without_retry() {
    let (chain, issuer) = setup("rogue").await;

    let err = issuer
        .issue("0xAlice", &unit("intro-defi", 100), "ethereum")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_AUTHORIZED");
    assert_eq!(chain.balance_of("0xAlice").await.unwrap(), 0);
}

// ==================== 批量发放 ====================

#[tokio::test]
async fn batch_with_mismatched_arrays_mints_nothing() {
    let (chain, issuer) = setup("backend-minter").await;

    let err = issuer
        .issue_many(
            "ethereum",
            &["0xAlice".to_string(), "0xBob".to_string(), "0xCarol".to_string()],
            &["intro-defi".to_string(), "intro-wallets".to_string()],
            &[
                "https://badges.test/intro-defi".to_string(),
                "https://badges.test/intro-wallets".to_string(),
            ],
            &[1, 1],
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ARITY_MISMATCH");

    for address in ["0xAlice", "0xBob", "0xCarol"] {
        assert_eq!(chain.balance_of(address).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn batch_mints_in_order_and_updates_ledger() {
    let (chain, issuer) = setup("backend-minter").await;

    let token_ids = issuer
        .issue_many(
            "ethereum",
            &["0xAlice".to_string(), "0xBob".to_string()],
            &["intro-defi".to_string(), "intro-defi".to_string()],
            &[
                "https://badges.test/intro-defi".to_string(),
                "https://badges.test/intro-defi".to_string(),
            ],
            &[2, 2],
        )
        .await
        .unwrap();
    assert_eq!(token_ids, vec![1, 2]);

    let info = chain.badge_info(2).await.unwrap();
    assert_eq!(info.holder, "0xbob");
    assert_eq!(info.rarity, Rarity::Epic);

    let records = issuer.records_for("0xBob");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token_id, Some(2));
}
