//! REST API 错误类型定义
//!
//! 将引擎错误映射为 HTTP 状态码与统一响应体

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use quest_engine::QuestError;

/// REST API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 引擎业务/系统错误
    #[error(transparent)]
    Engine(#[from] QuestError),

    /// 请求参数验证失败
    #[error("参数验证失败: {0}")]
    Validation(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Engine(err) => match err {
                QuestError::UnitNotFound(_)
                | QuestError::SessionNotFound(_)
                | QuestError::ChainNotFound(_)
                | QuestError::BadgeNotFound(_) => StatusCode::NOT_FOUND,

                QuestError::InvalidRequest(_)
                | QuestError::IncompleteSubmission { .. }
                | QuestError::InvalidRarity(_)
                | QuestError::ArityMismatch(_) => StatusCode::BAD_REQUEST,

                QuestError::UnitLocked { .. } | QuestError::SessionConsumed(_) => {
                    StatusCode::CONFLICT
                }
                QuestError::SessionExpired(_) => StatusCode::GONE,
                QuestError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
                QuestError::ChainUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                QuestError::Provider(_) => StatusCode::BAD_GATEWAY,

                QuestError::Graph(_)
                | QuestError::Serialization(_)
                | QuestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Engine(err) => err.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Engine(err) if !err.is_business_error() => {
                tracing::error!(error = %err, "引擎内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
