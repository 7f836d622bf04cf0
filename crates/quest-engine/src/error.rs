//! 任务引擎错误类型
//!
//! 定义路线图校验错误与引擎运行期的业务/系统错误

use thiserror::Error;

/// 路线图目录校验错误
///
/// 目录在加载时整体校验，任意一条错误都使整个目录不可用，
/// 不存在"部分单元可用"的降级状态。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("单元 ID 重复: {0}")]
    DuplicateUnit(String),

    #[error("单元不能以自身为前置条件: {0}")]
    SelfReference(String),

    #[error("前置条件指向不存在的单元: {unit_id} -> {prerequisite}")]
    UnknownPrerequisite {
        unit_id: String,
        prerequisite: String,
    },

    #[error("前置条件图存在环路，涉及单元: {0:?}")]
    CycleDetected(Vec<String>),
}

/// 任务引擎错误类型
#[derive(Debug, Error)]
pub enum QuestError {
    // === 路线图相关错误 ===
    #[error("路线图加载失败: {0}")]
    Graph(#[from] GraphError),

    #[error("学习单元不存在: {0}")]
    UnitNotFound(String),

    #[error("学习单元尚未解锁: {unit_id}, 缺少前置条件: {missing:?}")]
    UnitLocked {
        unit_id: String,
        missing: Vec<String>,
    },

    // === 测验相关错误 ===
    #[error("无效请求: {0}")]
    InvalidRequest(String),

    #[error("提交不完整，以下题目未作答: {missing:?}")]
    IncompleteSubmission { missing: Vec<String> },

    #[error("测验会话不存在: {0}")]
    SessionNotFound(String),

    #[error("测验会话已过期: {0}")]
    SessionExpired(String),

    #[error("测验会话已提交过，请重新生成测验: {0}")]
    SessionConsumed(String),

    #[error("出题服务调用失败: {0}")]
    Provider(String),

    // === 链上发放相关错误 ===
    #[error("链不存在: {0}")]
    ChainNotFound(String),

    #[error("身份无铸造权限: identity={identity}, chain={chain}")]
    NotAuthorized { identity: String, chain: String },

    #[error("无效的稀有度等级: {0}")]
    InvalidRarity(u8),

    #[error("批量发放参数长度不一致: {0}")]
    ArityMismatch(String),

    #[error("链暂不可用: chain={chain}, {reason}")]
    ChainUnavailable { chain: String, reason: String },

    #[error("凭证不存在: token_id={0}")]
    BadgeNotFound(u64),

    // === 系统错误 ===
    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 任务引擎 Result 类型别名
pub type Result<T> = std::result::Result<T, QuestError>;

impl QuestError {
    /// 检查是否为可重试的错误
    ///
    /// 仅瞬时故障（链路不可用、出题服务抖动）值得重试，
    /// 权限与参数类错误重试只会得到相同结果。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChainUnavailable { .. } | Self::Provider(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Serialization(_) | Self::Internal(_) | Self::Provider(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(_) => "GRAPH_ERROR",
            Self::UnitNotFound(_) => "UNIT_NOT_FOUND",
            Self::UnitLocked { .. } => "UNIT_LOCKED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::IncompleteSubmission { .. } => "INCOMPLETE_SUBMISSION",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::SessionExpired(_) => "SESSION_EXPIRED",
            Self::SessionConsumed(_) => "SESSION_CONSUMED",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::ChainNotFound(_) => "CHAIN_NOT_FOUND",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::InvalidRarity(_) => "INVALID_RARITY",
            Self::ArityMismatch(_) => "ARITY_MISMATCH",
            Self::ChainUnavailable { .. } => "CHAIN_UNAVAILABLE",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
