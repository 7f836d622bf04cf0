//! 领域模型定义

pub mod enums;
pub mod profile;
pub mod quiz;
pub mod unit;

pub use enums::{IssuanceStatus, Rarity};
pub use profile::{LearnerProfile, QuizAttemptRecord, normalize_address};
pub use quiz::{Question, QuestionView};
pub use unit::{Unit, UnitResource};
