//! 测验会话状态机
//!
//! `Generated -> Submitted -> {Passed, Failed}`。
//! 评分转移是终态且一次性的：同一会话不允许二次提交，
//! 重考必须重新生成会话，杜绝对固定答案集的穷举猜测。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuestError, Result};
use crate::models::{Question, QuestionView, normalize_address};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// 已生成，等待提交
    Generated,
    /// 已提交且通过
    Passed,
    /// 已提交且未通过
    Failed,
}

/// 评分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub passed: bool,
    pub score_percent: u32,
    pub correct_count: usize,
    pub total: usize,
}

/// 测验会话
///
/// 持有不可变的题目集。题目由外部出题服务生成，
/// 创建后到提交前不发生任何变更。
/// 会话绑定生成时的学习者：前置条件检查发生在生成阶段，
/// 换一个学习者提交会绕过解锁校验，必须拒绝。
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: String,
    /// 归一化后的学习者地址，仅该学习者可提交
    pub address: String,
    pub unit_id: String,
    pub topic: String,
    questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    state: SessionState,
}

impl QuizSession {
    /// 创建 Generated 状态的会话
    ///
    /// 题目集为空时拒绝——出题服务返回空集属于上游故障。
    pub fn generate(
        address: &str,
        unit_id: &str,
        topic: &str,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuestError::Provider("出题服务返回了空题目集".to_string()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            address: normalize_address(address),
            unit_id: unit_id.to_string(),
            topic: topic.to_string(),
            questions,
            created_at: now,
            state: SessionState::Generated,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// 对学习者展示的题目视图（不含 correct_index）
    pub fn question_views(&self) -> Vec<QuestionView> {
        self.questions.iter().map(QuestionView::from).collect()
    }

    /// 提交答案并评分
    ///
    /// 1. 任一题目缺答案即拒绝（IncompleteSubmission），状态不变；
    /// 2. scorePercent = 100 * 答对数 / 总题数（整数）；
    /// 3. scorePercent >= pass_threshold 判定为 Passed，否则 Failed；
    /// 4. 转移后会话即终态，重复提交返回 SessionConsumed。
    pub fn submit(
        &mut self,
        answers: &HashMap<String, usize>,
        pass_threshold: u32,
    ) -> Result<Verdict> {
        if self.state != SessionState::Generated {
            return Err(QuestError::SessionConsumed(self.id.clone()));
        }

        let missing: Vec<String> = self
            .questions
            .iter()
            .filter(|q| !answers.contains_key(&q.id))
            .map(|q| q.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(QuestError::IncompleteSubmission { missing });
        }

        let total = self.questions.len();
        let correct_count = self
            .questions
            .iter()
            .filter(|q| answers.get(&q.id) == Some(&q.correct_index))
            .count();
        let score_percent = (100 * correct_count / total) as u32;
        let passed = score_percent >= pass_threshold;

        self.state = if passed {
            SessionState::Passed
        } else {
            SessionState::Failed
        };

        Ok(Verdict {
            passed,
            score_percent,
            correct_count,
            total,
        })
    }
}
