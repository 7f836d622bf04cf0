//! 每学习者互斥锁
//!
//! 同一学习者的 recordPass/recordAttempt/发放意图登记必须串行，
//! 防止同一单元的两次并发提交同时通过并重复加 XP。
//! 锁按归一化地址为键，不同学习者之间互不阻塞。
//!
//! 慢速的链上调用不应持有此锁：在锁内登记"发放意图"，
//! 释放后再执行可重试的链上铸造。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::normalize_address;

/// 按地址分键的互斥锁集合
#[derive(Debug, Default)]
pub struct LearnerLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LearnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取某学习者的锁，持有期间该学习者的状态变更串行执行
    ///
    /// 返回 owned guard，便于跨 await 点持有。
    pub async fn acquire(&self, address: &str) -> OwnedMutexGuard<()> {
        let key = normalize_address(address);
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
