//! 学习者档案 API 处理器

use axum::{Json, extract::Path, extract::State};

use quest_engine::{LearnerProfile, LearningAnalytics};

use crate::{dto::ApiResponse, error::ApiError, state::AppState};

/// 获取学习者档案（XP、连续天数、完成记录、提交历史）
pub async fn get_profile(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<LearnerProfile>>, ApiError> {
    let profile = state.engine.profile(&address).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// 获取学习分析（分类表现、最具挑战单元、进度反馈）
pub async fn get_analytics(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<LearningAnalytics>>, ApiError> {
    let analytics = state.query.analytics(&address).await?;
    Ok(Json(ApiResponse::success(analytics)))
}
