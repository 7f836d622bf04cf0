//! 服务层：任务引擎编排与只读查询

pub mod engine;
pub mod query;

pub use engine::{GeneratedQuiz, QuestEngine, SubmissionOutcome};
pub use query::{CategoryPerformance, LearningAnalytics, QueryService};
