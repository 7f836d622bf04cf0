//! 健康检查处理器

use axum::{Json, extract::State};

use crate::state::AppState;

/// 存活探针：服务进程正常即返回 ok
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quest-api"
    }))
}

/// 就绪探针：路线图已加载且至少注册了一条链
pub async fn readiness_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let roadmap_ok = !state.engine.graph().is_empty();
    let chains_ok = !state.engine.registry().is_empty();
    let all_ok = roadmap_ok && chains_ok;

    Json(serde_json::json!({
        "status": if all_ok { "ok" } else { "degraded" },
        "service": "quest-api",
        "checks": {
            "roadmap": if roadmap_ok { "ok" } else { "fail" },
            "chains": if chains_ok { "ok" } else { "fail" }
        }
    }))
}
