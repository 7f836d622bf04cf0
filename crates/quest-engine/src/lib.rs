//! 任务引擎核心库
//!
//! 学习任务进度与链上凭证发放引擎。
//!
//! ## 核心功能
//!
//! - **路线图**：前置条件图驱动的单元解锁，加载时一次性拓扑校验
//! - **进度追踪**：学习者档案（XP、连续天数、提交历史），只增不删
//! - **测验会话**：外部出题、一次性评分转移、超时丢弃
//! - **凭证发放**：幂等的链上徽章铸造，链不可用时延迟补发
//! - **链适配**：多网络能力接口，owner + 白名单铸造权限
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `roadmap`: 单元目录与前置条件图
//! - `progress`: 进度仓储与学习者锁
//! - `quiz`: 测验会话状态机与出题服务
//! - `issuer`: 凭证发放与台账
//! - `chain`: 链适配器与注册表
//! - `service`: 编排层与查询服务

pub mod chain;
pub mod error;
pub mod issuer;
pub mod models;
pub mod progress;
pub mod quiz;
pub mod roadmap;
pub mod service;

pub use chain::{BadgeInfo, ChainAdapter, ChainRegistry, MintRequest, SimulatedChain};
pub use error::{GraphError, QuestError, Result};
pub use issuer::{BadgeRecord, CredentialIssuer};
pub use models::{
    IssuanceStatus, LearnerProfile, Question, QuestionView, QuizAttemptRecord, Rarity, Unit,
};
pub use progress::{LearnerLocks, MemoryProgressStore, ProgressStore};
pub use quiz::{HttpQuizProvider, QuizProvider, QuizSession, SessionState, SessionStore, Verdict};
pub use roadmap::{RoadmapGraph, builtin_roadmap, load_roadmap};
pub use service::{
    CategoryPerformance, GeneratedQuiz, LearningAnalytics, QueryService, QuestEngine,
    SubmissionOutcome,
};
