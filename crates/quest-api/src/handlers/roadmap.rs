//! 路线图查询 API 处理器

use axum::{Json, extract::Path, extract::State};

use quest_engine::{QuestError, models::Unit};

use crate::{
    dto::{ApiResponse, RoadmapResponse},
    error::ApiError,
    state::AppState,
};

/// 获取完整路线图，按目录顺序
pub async fn get_roadmap(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RoadmapResponse>>, ApiError> {
    let units = state.engine.graph().units().to_vec();
    Ok(Json(ApiResponse::success(RoadmapResponse { units })))
}

/// 按 id 获取单个单元
pub async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<String>,
) -> Result<Json<ApiResponse<Unit>>, ApiError> {
    let unit = state
        .engine
        .graph()
        .get(&unit_id)
        .cloned()
        .ok_or_else(|| QuestError::UnitNotFound(unit_id))?;
    Ok(Json(ApiResponse::success(unit)))
}

/// 获取某学习者当前可解锁的单元
pub async fn get_available_units(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<RoadmapResponse>>, ApiError> {
    let units = state.engine.available_units(&address).await?;
    Ok(Json(ApiResponse::success(RoadmapResponse { units })))
}
