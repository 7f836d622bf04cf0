//! 链上凭证 API 处理器
//!
//! 持仓查询与运维侧的批量发放

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use validator::Validate;

use quest_engine::{BadgeInfo, BadgeRecord};

use crate::{
    dto::{ApiResponse, BalanceResponse, BatchIssueRequest, BatchIssueResponse, HoldingsResponse},
    error::ApiError,
    state::AppState,
};

/// 查询某地址在某链上的凭证数量
pub async fn get_balance(
    State(state): State<AppState>,
    Path((address, chain)): Path<(String, String)>,
) -> Result<Json<ApiResponse<BalanceResponse>>, ApiError> {
    let adapter = state.engine.registry().get(&chain)?;
    let balance = adapter.balance_of(&address).await?;
    Ok(Json(ApiResponse::success(BalanceResponse {
        address,
        chain,
        balance,
    })))
}

/// 查询某地址在某链上的全部凭证，按铸造顺序
pub async fn get_holdings(
    State(state): State<AppState>,
    Path((address, chain)): Path<(String, String)>,
) -> Result<Json<ApiResponse<HoldingsResponse>>, ApiError> {
    let adapter = state.engine.registry().get(&chain)?;
    let badges = adapter.badges_of(&address).await?;
    Ok(Json(ApiResponse::success(HoldingsResponse {
        address,
        chain,
        badges,
    })))
}

/// 按 token id 查询单枚凭证
pub async fn get_badge_info(
    State(state): State<AppState>,
    Path((chain, token_id)): Path<(String, u64)>,
) -> Result<Json<ApiResponse<BadgeInfo>>, ApiError> {
    let adapter = state.engine.registry().get(&chain)?;
    let info = adapter.badge_info(token_id).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// 某学习者的全部发放记录（含延迟发放）
pub async fn get_issuance_records(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<Vec<BadgeRecord>>>, ApiError> {
    let records = state.engine.issuer().records_for(&address);
    Ok(Json(ApiResponse::success(records)))
}

/// 批量发放凭证（运维接口）
///
/// 平行数组长度不一致或稀有度越界时整批拒绝，零铸造。
pub async fn batch_issue(
    State(state): State<AppState>,
    Path(chain): Path<String>,
    Json(req): Json<BatchIssueRequest>,
) -> Result<Json<ApiResponse<BatchIssueResponse>>, ApiError> {
    req.validate()?;

    let token_ids = state
        .engine
        .issuer()
        .issue_many(&chain, &req.recipients, &req.unit_ids, &req.uris, &req.rarities)
        .await?;
    info!(chain = %chain, minted = token_ids.len(), "批量发放完成");
    Ok(Json(ApiResponse::success(BatchIssueResponse {
        chain,
        token_ids,
    })))
}
