//! 测验会话仓库
//!
//! 持有所有未提交的 Generated 会话，带 TTL：
//! 学习者放弃的会话超时后被丢弃，除被丢弃的内存状态外无资源泄漏。

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::{QuestError, Result};
use crate::models::normalize_address;

use super::session::{QuizSession, Verdict};

/// 会话仓库
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, QuizSession>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn is_expired(&self, session: &QuizSession, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(session.created_at);
        age.to_std().map(|d| d > self.ttl).unwrap_or(false)
    }

    /// 登记一个新生成的会话
    pub fn insert(&self, session: QuizSession) -> String {
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);
        id
    }

    /// 当前存量会话数
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// 提交某会话的答案
    ///
    /// - 会话不存在，或提交者不是生成该会话的学习者 -> SessionNotFound
    /// - 已超时 -> 移除并返回 SessionExpired
    /// - 提交不完整 -> 原样保留，学习者可补全后重交
    /// - 评分完成 -> 会话终态，从仓库移除，返回单元 id 与评分
    pub fn submit(
        &self,
        session_id: &str,
        address: &str,
        answers: &HashMap<String, usize>,
        pass_threshold: u32,
        now: DateTime<Utc>,
    ) -> Result<(String, Verdict)> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| QuestError::SessionNotFound(session_id.to_string()))?;

        // 会话绑定生成时的学习者，他人提交视同会话不存在，且不消耗会话
        if entry.address != normalize_address(address) {
            debug!(session_id = %session_id, "提交者与会话学习者不符，拒绝");
            return Err(QuestError::SessionNotFound(session_id.to_string()));
        }

        if self.is_expired(&entry, now) {
            drop(entry);
            self.sessions.remove(session_id);
            debug!(session_id = %session_id, "会话已超时，丢弃");
            return Err(QuestError::SessionExpired(session_id.to_string()));
        }

        let verdict = entry.submit(answers, pass_threshold)?;
        let unit_id = entry.unit_id.clone();
        drop(entry);

        // 评分转移已是终态，移除会话防止重复提交
        self.sessions.remove(session_id);
        Ok((unit_id, verdict))
    }

    /// 清理全部超时会话，返回清理数量
    ///
    /// 由定时任务周期性调用，submit 路径上的惰性清理只覆盖被动访问的会话。
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !self.is_expired(s, now));
        let purged = before - self.sessions.len();
        if purged > 0 {
            info!(purged, remaining = self.sessions.len(), "已清理超时测验会话");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use chrono::Duration as ChronoDuration;

    fn session_with_questions(n: usize, now: DateTime<Utc>) -> QuizSession {
        let questions = (1..=n)
            .map(|i| Question {
                id: i.to_string(),
                text: format!("q{i}"),
                choices: vec!["a".to_string(), "b".to_string()],
                correct_index: 0,
            })
            .collect();
        QuizSession::generate("0xAlice", "intro-defi", "DeFi", questions, now).unwrap()
    }

    fn all_correct(n: usize) -> HashMap<String, usize> {
        (1..=n).map(|i| (i.to_string(), 0)).collect()
    }

    #[test]
    fn test_submit_unknown_session() {
        let store = SessionStore::new(Duration::from_secs(900));
        let err = store
            .submit("ghost", "0xAlice", &HashMap::new(), 30, Utc::now())
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_NOT_FOUND");
    }

    #[test]
    fn test_submit_removes_session() {
        let store = SessionStore::new(Duration::from_secs(900));
        let now = Utc::now();
        let id = store.insert(session_with_questions(3, now));

        let (unit_id, verdict) = store
            .submit(&id, "0xAlice", &all_correct(3), 30, now)
            .unwrap();
        assert_eq!(unit_id, "intro-defi");
        assert_eq!(verdict.score_percent, 100);

        // 二次提交：会话已移除
        let err = store
            .submit(&id, "0xAlice", &all_correct(3), 30, now)
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_NOT_FOUND");
    }

    #[test]
    fn test_submit_by_other_learner_rejected_without_consuming() {
        let store = SessionStore::new(Duration::from_secs(900));
        let now = Utc::now();
        let id = store.insert(session_with_questions(3, now));

        // 他人提交：视同会话不存在，且不评分、不消耗
        let err = store
            .submit(&id, "0xBob", &all_correct(3), 30, now)
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_NOT_FOUND");
        assert_eq!(store.len(), 1);

        // 大小写变体属于同一学习者，仍可正常提交
        assert!(store.submit(&id, "0xALICE", &all_correct(3), 30, now).is_ok());
    }

    #[test]
    fn test_incomplete_submission_keeps_session() {
        let store = SessionStore::new(Duration::from_secs(900));
        let now = Utc::now();
        let id = store.insert(session_with_questions(3, now));

        let err = store
            .submit(&id, "0xAlice", &HashMap::new(), 30, now)
            .unwrap_err();
        assert_eq!(err.error_code(), "INCOMPLETE_SUBMISSION");

        // 补全后仍可提交
        assert!(store.submit(&id, "0xAlice", &all_correct(3), 30, now).is_ok());
    }

    #[test]
    fn test_expired_session_rejected_and_dropped() {
        let store = SessionStore::new(Duration::from_secs(60));
        let created = Utc::now();
        let id = store.insert(session_with_questions(3, created));

        let later = created + ChronoDuration::seconds(120);
        let err = store
            .submit(&id, "0xAlice", &all_correct(3), 30, later)
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_EXPIRED");
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired_only_removes_stale() {
        let store = SessionStore::new(Duration::from_secs(60));
        let old = Utc::now() - ChronoDuration::seconds(120);
        let now = Utc::now();
        store.insert(session_with_questions(3, old));
        let fresh_id = store.insert(session_with_questions(3, now));

        assert_eq!(store.purge_expired(now), 1);
        assert_eq!(store.len(), 1);
        assert!(
            store
                .submit(&fresh_id, "0xAlice", &all_correct(3), 30, now)
                .is_ok()
        );
    }
}
