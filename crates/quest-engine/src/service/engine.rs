//! 任务引擎编排层
//!
//! 串起路线图、进度仓储、测验会话与凭证发放。
//! 同一学习者的通过/XP/发放意图在学习者锁内串行完成；
//! 链上调用可能阻塞在网络往返上，一律在锁外执行。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use quest_shared::config::QuizConfig;

use crate::chain::ChainRegistry;
use crate::error::{QuestError, Result};
use crate::issuer::{BadgeRecord, CredentialIssuer};
use crate::models::{QuestionView, Unit};
use crate::progress::{LearnerLocks, ProgressStore};
use crate::quiz::{QuizProvider, QuizSession, SessionStore, Verdict};
use crate::roadmap::RoadmapGraph;

/// 新生成的测验，面向学习者的视图（不含答案）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub session_id: String,
    pub unit_id: String,
    pub topic: String,
    pub questions: Vec<QuestionView>,
}

/// 一次提交的完整结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub passed: bool,
    pub score_percent: u32,
    pub correct_count: usize,
    pub total: usize,
    /// 本次提交新获得的 XP（重复通过同一单元为 0）
    pub xp_earned: u32,
    pub total_xp: u64,
    pub streak: u32,
    pub completed_units: Vec<String>,
    /// 本次触发的发放记录，每条目标链一条
    pub badges: Vec<BadgeRecord>,
}

/// 任务引擎
pub struct QuestEngine {
    graph: Arc<RoadmapGraph>,
    progress: Arc<dyn ProgressStore>,
    locks: LearnerLocks,
    provider: Arc<dyn QuizProvider>,
    sessions: Arc<SessionStore>,
    issuer: Arc<CredentialIssuer>,
    registry: Arc<ChainRegistry>,
    quiz_config: QuizConfig,
}

impl QuestEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph: Arc<RoadmapGraph>,
        progress: Arc<dyn ProgressStore>,
        provider: Arc<dyn QuizProvider>,
        issuer: Arc<CredentialIssuer>,
        registry: Arc<ChainRegistry>,
        quiz_config: QuizConfig,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            quiz_config.session_ttl_seconds,
        )));
        Self {
            graph,
            progress,
            locks: LearnerLocks::new(),
            provider,
            sessions,
            issuer,
            registry,
            quiz_config,
        }
    }

    pub fn graph(&self) -> &RoadmapGraph {
        &self.graph
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn issuer(&self) -> &CredentialIssuer {
        &self.issuer
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn profile(&self, address: &str) -> Result<crate::models::LearnerProfile> {
        self.progress.get(address).await
    }

    /// 学习者当前可解锁的单元
    pub async fn available_units(&self, address: &str) -> Result<Vec<Unit>> {
        let profile = self.progress.get(address).await?;
        Ok(self
            .graph
            .units_available_for(&profile)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 为某单元生成一份测验
    ///
    /// 题目数量限定在配置区间内；前置条件未满足时拒绝（UnitLocked）。
    /// 已完成的单元允许重考，重复通过不会重复计分。
    #[instrument(skip(self), fields(unit_id = %unit_id))]
    pub async fn generate_quiz(
        &self,
        address: &str,
        unit_id: &str,
        num_questions: usize,
    ) -> Result<GeneratedQuiz> {
        if num_questions < self.quiz_config.min_questions
            || num_questions > self.quiz_config.max_questions
        {
            return Err(QuestError::InvalidRequest(format!(
                "题目数量须在 {} 到 {} 之间: {}",
                self.quiz_config.min_questions, self.quiz_config.max_questions, num_questions
            )));
        }

        let unit = self
            .graph
            .get(unit_id)
            .ok_or_else(|| QuestError::UnitNotFound(unit_id.to_string()))?;

        let profile = self.progress.get(address).await?;
        let missing = self.graph.missing_prerequisites(unit, &profile);
        if !missing.is_empty() {
            return Err(QuestError::UnitLocked {
                unit_id: unit_id.to_string(),
                missing,
            });
        }

        let questions = self.provider.generate(&unit.title, num_questions).await?;
        let session = QuizSession::generate(address, unit_id, &unit.title, questions, Utc::now())?;
        let quiz = GeneratedQuiz {
            session_id: session.id.clone(),
            unit_id: session.unit_id.clone(),
            topic: session.topic.clone(),
            questions: session.question_views(),
        };
        self.sessions.insert(session);

        info!(
            session_id = %quiz.session_id,
            questions = quiz.questions.len(),
            "测验已生成"
        );
        Ok(quiz)
    }

    /// 提交测验答案
    ///
    /// 学习者锁内完成：评分、记录提交、记录通过、登记发放意图。
    /// 锁释放后再执行链上铸造，慢调用不阻塞该学习者的其他请求之外的系统部分。
    #[instrument(skip(self, answers), fields(session_id = %session_id))]
    pub async fn submit_quiz(
        &self,
        address: &str,
        session_id: &str,
        answers: &HashMap<String, usize>,
    ) -> Result<SubmissionOutcome> {
        let guard = self.locks.acquire(address).await;

        let (unit_id, verdict) = self.sessions.submit(
            session_id,
            address,
            answers,
            self.quiz_config.pass_threshold,
            Utc::now(),
        )?;

        let unit = self
            .graph
            .get(&unit_id)
            .ok_or_else(|| QuestError::UnitNotFound(unit_id.clone()))?
            .clone();

        self.progress
            .record_attempt(address, &unit_id, verdict.score_percent, verdict.passed, Utc::now())
            .await?;

        if !verdict.passed {
            let profile = self.progress.get(address).await?;
            drop(guard);
            return Ok(Self::outcome(verdict, 0, &profile, vec![]));
        }

        let before = self.progress.get(address).await?;
        let already_completed = before.has_completed(&unit_id);
        let profile = self
            .progress
            .record_pass(address, &unit_id, unit.xp_reward, Utc::now())
            .await?;
        let xp_earned = if already_completed { 0 } else { unit.xp_reward };

        // 锁内只登记发放意图，链上调用放到锁外
        let chains = self.registry.names();
        for chain in &chains {
            self.issuer.record_intent(address, &unit, chain);
        }
        drop(guard);

        // 各链发放互不依赖，并发执行
        let results = futures::future::join_all(
            chains
                .iter()
                .map(|chain| self.issuer.issue(address, &unit, chain)),
        )
        .await;

        let mut badges = Vec::with_capacity(chains.len());
        for (chain, result) in chains.iter().zip(results) {
            match result {
                Ok(record) => badges.push(record),
                Err(err) => {
                    // 发放失败不回滚进度；台账记录保留并随结果返回，
                    // 学习者与运维方都能看到该链的发放停在了哪一步
                    warn!(
                        chain = %chain,
                        unit_id = %unit_id,
                        error = %err,
                        "凭证发放失败，进度保持不变"
                    );
                    if let Some(record) = self.issuer.record(address, &unit_id, chain) {
                        badges.push(record);
                    }
                }
            }
        }

        info!(
            unit_id = %unit_id,
            score_percent = verdict.score_percent,
            xp_earned,
            "测验通过"
        );
        Ok(Self::outcome(verdict, xp_earned, &profile, badges))
    }

    fn outcome(
        verdict: Verdict,
        xp_earned: u32,
        profile: &crate::models::LearnerProfile,
        badges: Vec<BadgeRecord>,
    ) -> SubmissionOutcome {
        let mut completed_units: Vec<String> = profile.completed_units.keys().cloned().collect();
        completed_units.sort();
        SubmissionOutcome {
            passed: verdict.passed,
            score_percent: verdict.score_percent,
            correct_count: verdict.correct_count,
            total: verdict.total,
            xp_earned,
            total_xp: profile.xp,
            streak: profile.streak,
            completed_units,
            badges,
        }
    }
}
