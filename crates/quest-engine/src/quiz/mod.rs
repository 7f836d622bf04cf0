//! 测验子系统：会话状态机、会话存储与外部出题服务

pub mod provider;
pub mod session;
pub mod store;

pub use provider::{HttpQuizProvider, QuizProvider};
pub use session::{QuizSession, SessionState, Verdict};
pub use store::SessionStore;

#[cfg(test)]
pub use provider::MockQuizProvider;
