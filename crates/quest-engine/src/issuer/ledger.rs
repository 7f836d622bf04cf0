//! 发放台账
//!
//! 以 (学习者地址, 单元, 链) 为主键的进程内台账，
//! 记录每次发放意图的生命周期，是幂等检查的第一道防线。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::models::{IssuanceStatus, Rarity};

/// 一条发放记录
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    pub address: String,
    pub unit_id: String,
    pub chain: String,
    pub status: IssuanceStatus,
    pub token_id: Option<u64>,
    pub rarity: Rarity,
    pub metadata_uri: String,
    pub updated_at: DateTime<Utc>,
}

type LedgerKey = (String, String, String);

fn key(address: &str, unit_id: &str, chain: &str) -> LedgerKey {
    (
        address.to_string(),
        unit_id.to_string(),
        chain.to_string(),
    )
}

/// 进程内发放台账
///
/// 地址在写入前已由调用方归一化。
#[derive(Default)]
pub struct IssuanceLedger {
    records: DashMap<LedgerKey, BadgeRecord>,
}

impl IssuanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &str, unit_id: &str, chain: &str) -> Option<BadgeRecord> {
        self.records
            .get(&key(address, unit_id, chain))
            .map(|r| r.clone())
    }

    /// 取出既有记录，不存在则登记一条 Pending
    pub fn get_or_insert_pending(
        &self,
        address: &str,
        unit_id: &str,
        chain: &str,
        rarity: Rarity,
        metadata_uri: String,
    ) -> BadgeRecord {
        self.records
            .entry(key(address, unit_id, chain))
            .or_insert_with(|| BadgeRecord {
                address: address.to_string(),
                unit_id: unit_id.to_string(),
                chain: chain.to_string(),
                status: IssuanceStatus::Pending,
                token_id: None,
                rarity,
                metadata_uri,
                updated_at: Utc::now(),
            })
            .clone()
    }

    pub fn mark_minted(
        &self,
        address: &str,
        unit_id: &str,
        chain: &str,
        token_id: u64,
        now: DateTime<Utc>,
    ) -> BadgeRecord {
        let mut entry = self
            .records
            .entry(key(address, unit_id, chain))
            .or_insert_with(|| BadgeRecord {
                address: address.to_string(),
                unit_id: unit_id.to_string(),
                chain: chain.to_string(),
                status: IssuanceStatus::Pending,
                token_id: None,
                rarity: Rarity::Common,
                metadata_uri: String::new(),
                updated_at: now,
            });
        entry.status = IssuanceStatus::Minted;
        entry.token_id = Some(token_id);
        entry.updated_at = now;
        entry.clone()
    }

    pub fn mark_deferred(
        &self,
        address: &str,
        unit_id: &str,
        chain: &str,
        now: DateTime<Utc>,
    ) -> BadgeRecord {
        self.downgrade(address, unit_id, chain, IssuanceStatus::Deferred, now)
    }

    pub fn mark_failed(
        &self,
        address: &str,
        unit_id: &str,
        chain: &str,
        now: DateTime<Utc>,
    ) -> BadgeRecord {
        self.downgrade(address, unit_id, chain, IssuanceStatus::Failed, now)
    }

    fn downgrade(
        &self,
        address: &str,
        unit_id: &str,
        chain: &str,
        status: IssuanceStatus,
        now: DateTime<Utc>,
    ) -> BadgeRecord {
        let mut entry = self
            .records
            .entry(key(address, unit_id, chain))
            .or_insert_with(|| BadgeRecord {
                address: address.to_string(),
                unit_id: unit_id.to_string(),
                chain: chain.to_string(),
                status: IssuanceStatus::Pending,
                token_id: None,
                rarity: Rarity::Common,
                metadata_uri: String::new(),
                updated_at: now,
            });
        // 已铸造成功的记录不降级
        if entry.status != IssuanceStatus::Minted {
            entry.status = status;
            entry.updated_at = now;
        }
        entry.clone()
    }

    /// 某学习者的全部记录，按 (链, 单元) 排序保证输出稳定
    pub fn records_for(&self, address: &str) -> Vec<BadgeRecord> {
        let mut records: Vec<BadgeRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == address)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| (&a.chain, &a.unit_id).cmp(&(&b.chain, &b.unit_id)));
        records
    }

    pub fn with_status(&self, status: IssuanceStatus) -> Vec<BadgeRecord> {
        let mut records: Vec<BadgeRecord> = self
            .records
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| {
            (&a.address, &a.chain, &a.unit_id).cmp(&(&b.address, &b.chain, &b.unit_id))
        });
        records
    }
}
