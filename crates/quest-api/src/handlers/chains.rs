//! 链管理 API 处理器
//!
//! 网络列表与铸造白名单管理（owner 专用）

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{ApiResponse, ChainsResponse, MinterRequest},
    error::ApiError,
    state::AppState,
};

/// 列出已注册的网络
pub async fn list_chains(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChainsResponse>>, ApiError> {
    Ok(Json(ApiResponse::success(ChainsResponse {
        chains: state.engine.registry().names(),
    })))
}

/// 将身份加入某链的铸造白名单，调用方必须是该链 owner
pub async fn authorize_minter(
    State(state): State<AppState>,
    Path(chain): Path<String>,
    Json(req): Json<MinterRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    req.validate()?;

    let adapter = state.engine.registry().get(&chain)?;
    adapter.authorize_minter(&req.caller, &req.minter).await?;
    info!(chain = %chain, minter = %req.minter, "铸造身份已授权");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 将身份移出某链的铸造白名单，调用方必须是该链 owner
pub async fn revoke_minter(
    State(state): State<AppState>,
    Path(chain): Path<String>,
    Json(req): Json<MinterRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    req.validate()?;

    let adapter = state.engine.registry().get(&chain)?;
    adapter.revoke_minter(&req.caller, &req.minter).await?;
    info!(chain = %chain, minter = %req.minter, "铸造身份已吊销");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
