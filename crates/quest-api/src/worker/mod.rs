//! 后台 Worker 模块

pub mod session_purge;

pub use session_purge::SessionPurgeWorker;
