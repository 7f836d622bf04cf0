//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{handlers, state::AppState};

/// 构建路线图相关的路由
pub fn roadmap_routes() -> Router<AppState> {
    Router::new()
        .route("/roadmap", get(handlers::roadmap::get_roadmap))
        .route(
            "/roadmap/available/{address}",
            get(handlers::roadmap::get_available_units),
        )
        .route("/roadmap/{unit_id}", get(handlers::roadmap::get_unit))
}

/// 构建测验相关的路由
pub fn quest_routes() -> Router<AppState> {
    Router::new()
        .route("/quests/generate", post(handlers::quiz::generate_quiz))
        .route("/quests/submit", post(handlers::quiz::submit_quiz))
}

/// 构建档案相关的路由
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/{address}", get(handlers::profile::get_profile))
        .route(
            "/profile/{address}/analytics",
            get(handlers::profile::get_analytics),
        )
}

/// 构建凭证相关的路由
pub fn badge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/badges/balance/{address}/{chain}",
            get(handlers::badges::get_balance),
        )
        .route(
            "/badges/holdings/{address}/{chain}",
            get(handlers::badges::get_holdings),
        )
        .route(
            "/badges/info/{chain}/{token_id}",
            get(handlers::badges::get_badge_info),
        )
        .route(
            "/badges/records/{address}",
            get(handlers::badges::get_issuance_records),
        )
        .route("/badges/batch/{chain}", post(handlers::badges::batch_issue))
}

/// 构建链管理相关的路由
pub fn chain_routes() -> Router<AppState> {
    Router::new()
        .route("/chains", get(handlers::chains::list_chains))
        .route(
            "/chains/{chain}/minters",
            post(handlers::chains::authorize_minter),
        )
        .route(
            "/chains/{chain}/minters",
            delete(handlers::chains::revoke_minter),
        )
}

/// 组装全部 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(roadmap_routes())
        .merge(quest_routes())
        .merge(profile_routes())
        .merge(badge_routes())
        .merge(chain_routes())
}
