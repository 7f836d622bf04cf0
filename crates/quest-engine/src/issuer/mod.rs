//! 凭证发放层
//!
//! 发放是幂等边界：同一 (学习者, 单元, 链) 最多产生一枚链上凭证，
//! 即使 issue 被重复调用（例如请求重试）。链上调用本身不幂等，
//! 幂等性由台账与链上持仓双重检查保证。

mod ledger;

pub use ledger::BadgeRecord;

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use quest_shared::config::IssuerConfig;
use quest_shared::retry::{RetryPolicy, retry_with_policy};

use crate::chain::{ChainRegistry, MintRequest};
use crate::error::{QuestError, Result};
use crate::issuer::ledger::IssuanceLedger;
use crate::models::{IssuanceStatus, Rarity, Unit, normalize_address};

/// 凭证发放器
pub struct CredentialIssuer {
    registry: Arc<ChainRegistry>,
    ledger: IssuanceLedger,
    /// 按 (学习者, 单元, 链) 分键的互斥锁，同键的并发 issue 串行执行
    issue_locks: DashMap<(String, String, String), Arc<Mutex<()>>>,
    /// 发起链上调用的后端身份，须在各链的铸造白名单内
    minter_identity: String,
    metadata_base_url: String,
    retry_policy: RetryPolicy,
}

impl CredentialIssuer {
    pub fn new(registry: Arc<ChainRegistry>, config: &IssuerConfig) -> Self {
        let minter_identity = config
            .chains
            .first()
            .map(|c| c.minter.clone())
            .unwrap_or_default();
        Self {
            registry,
            ledger: IssuanceLedger::new(),
            issue_locks: DashMap::new(),
            minter_identity,
            metadata_base_url: config.metadata_base_url.clone(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// 记录发放意图（Pending），应在学习者锁内调用
    ///
    /// 幂等：已有 Minted/Deferred 记录时原样返回，不覆盖。
    pub fn record_intent(&self, address: &str, unit: &Unit, chain: &str) -> BadgeRecord {
        let address = normalize_address(address);
        self.ledger.get_or_insert_pending(
            &address,
            &unit.id,
            chain,
            unit.rarity(),
            unit.metadata_uri(&self.metadata_base_url),
        )
    }

    /// 在目标链上发放一枚凭证
    ///
    /// 流程：台账查重 -> 链上持仓查重 -> 铸造（带退避重试）。
    /// 链持续不可用时记录为 Deferred 返回，进度不回滚；
    /// 权限类错误不重试，记录为 Failed 并向上传播给运维方。
    #[instrument(skip(self, unit), fields(unit_id = %unit.id))]
    pub async fn issue(&self, address: &str, unit: &Unit, chain_name: &str) -> Result<BadgeRecord> {
        let address = normalize_address(address);
        let chain = self.registry.get(chain_name)?;

        // 同一 (学习者, 单元, 链) 的并发 issue 串行化：
        // 铸造耗时窗口内的后到者在下面的台账检查处命中 Minted 短路
        let lock = self
            .issue_locks
            .entry((address.clone(), unit.id.clone(), chain_name.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // 台账里已有链上凭证，直接返回既有记录
        if let Some(record) = self.ledger.get(&address, &unit.id, chain_name)
            && record.status == IssuanceStatus::Minted
        {
            info!(address = %address, chain = chain_name, "发放记录已存在，跳过铸造");
            return Ok(record);
        }

        let mut record = self.record_intent(&address, unit, chain_name);

        // 链上已持有该单元的凭证（例如台账丢失后重建），补登记而非重复铸造
        if let Ok(badges) = chain.badges_of(&address).await
            && let Some(existing) = badges.iter().find(|b| b.unit_id == unit.id)
        {
            info!(
                address = %address,
                chain = chain_name,
                token_id = existing.token_id,
                "链上已持有该单元凭证，登记现有 token"
            );
            record = self.ledger.mark_minted(
                &address,
                &unit.id,
                chain_name,
                existing.token_id,
                Utc::now(),
            );
            return Ok(record);
        }

        let request = MintRequest {
            to: address.clone(),
            unit_id: unit.id.clone(),
            metadata_uri: record.metadata_uri.clone(),
            rarity: record.rarity,
        };

        let mint_result = retry_with_policy(
            &self.retry_policy,
            "mint_badge",
            QuestError::is_retryable,
            || chain.mint(&self.minter_identity, request.clone()),
        )
        .await;

        match mint_result {
            Ok(token_id) => {
                record = self
                    .ledger
                    .mark_minted(&address, &unit.id, chain_name, token_id, Utc::now());
                info!(address = %address, chain = chain_name, token_id, "凭证铸造成功");
                Ok(record)
            }
            Err(err @ QuestError::ChainUnavailable { .. }) => {
                // 重试耗尽后转入延迟发放，进度不回滚
                warn!(
                    address = %address,
                    chain = chain_name,
                    error = %err,
                    "链持续不可用，发放转入延迟状态"
                );
                record = self
                    .ledger
                    .mark_deferred(&address, &unit.id, chain_name, Utc::now());
                Ok(record)
            }
            Err(err) => {
                // 不可重试的失败（如权限问题）需人工介入，记录保留供排查
                warn!(
                    address = %address,
                    chain = chain_name,
                    error = %err,
                    "凭证铸造失败，记录转入失败状态"
                );
                self.ledger
                    .mark_failed(&address, &unit.id, chain_name, Utc::now());
                Err(err)
            }
        }
    }

    /// 批量发放：四个平行数组长度必须一致，否则整批拒绝，零铸造
    ///
    /// rarities 以链上序数给出，越界值在任何链调用前拒绝。
    #[instrument(skip(self, recipients, unit_ids, uris, rarities), fields(chain = %chain_name))]
    pub async fn issue_many(
        &self,
        chain_name: &str,
        recipients: &[String],
        unit_ids: &[String],
        uris: &[String],
        rarities: &[u8],
    ) -> Result<Vec<u64>> {
        let n = recipients.len();
        if unit_ids.len() != n || uris.len() != n || rarities.len() != n {
            return Err(QuestError::ArityMismatch(format!(
                "recipients={}, unit_ids={}, uris={}, rarities={}",
                n,
                unit_ids.len(),
                uris.len(),
                rarities.len()
            )));
        }

        let mut requests = Vec::with_capacity(n);
        for i in 0..n {
            requests.push(MintRequest {
                to: recipients[i].clone(),
                unit_id: unit_ids[i].clone(),
                metadata_uri: uris[i].clone(),
                rarity: Rarity::from_index(rarities[i])?,
            });
        }

        let chain = self.registry.get(chain_name)?;
        let token_ids = retry_with_policy(
            &self.retry_policy,
            "mint_badge_batch",
            QuestError::is_retryable,
            || chain.mint_batch(&self.minter_identity, requests.clone()),
        )
        .await?;

        let now = Utc::now();
        for (i, token_id) in token_ids.iter().enumerate() {
            let address = normalize_address(&recipients[i]);
            self.ledger.get_or_insert_pending(
                &address,
                &unit_ids[i],
                chain_name,
                requests[i].rarity,
                uris[i].clone(),
            );
            self.ledger
                .mark_minted(&address, &unit_ids[i], chain_name, *token_id, now);
        }
        info!(chain = chain_name, minted = token_ids.len(), "批量发放完成");
        Ok(token_ids)
    }

    /// 某学习者在某链上、某单元的发放记录
    pub fn record(&self, address: &str, unit_id: &str, chain: &str) -> Option<BadgeRecord> {
        self.ledger
            .get(&normalize_address(address), unit_id, chain)
    }

    /// 某学习者的全部发放记录，按 (链, 单元) 排序
    pub fn records_for(&self, address: &str) -> Vec<BadgeRecord> {
        self.ledger.records_for(&normalize_address(address))
    }

    /// 全部延迟发放记录，供补发巡检使用
    pub fn deferred_records(&self) -> Vec<BadgeRecord> {
        self.ledger.with_status(IssuanceStatus::Deferred)
    }
}
