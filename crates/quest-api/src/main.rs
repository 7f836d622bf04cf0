//! 任务引擎 REST API 服务入口
//!
//! 加载配置、装配引擎、启动 HTTP 服务与后台 Worker。

use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use quest_api::{handlers, routes, state::AppState, worker::SessionPurgeWorker};
use quest_engine::{
    ChainRegistry, CredentialIssuer, HttpQuizProvider, MemoryProgressStore, QueryService,
    QuestEngine, load_roadmap,
};
use quest_shared::{config::AppConfig, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/default.toml + config/{env}.toml + QUEST_ 环境变量
    let config = AppConfig::load("quest-api").unwrap_or_default();

    observability::init(&config.observability)?;

    info!("Starting quest-api on {}", config.server_addr());

    // 路线图目录：默认内置目录，可通过 QUEST_ROADMAP_PATH 指向 JSON 文件
    let roadmap_path = std::env::var("QUEST_ROADMAP_PATH").ok().map(PathBuf::from);
    let graph = Arc::new(load_roadmap(roadmap_path.as_deref())?);
    info!(units = graph.len(), "路线图目录已加载");

    // 链注册表：每条配置的链一个适配器，minter 身份启动时授权
    let registry = Arc::new(ChainRegistry::from_config(&config.issuer).await?);
    info!(chains = ?registry.names(), "链注册表已装配");

    let issuer = Arc::new(CredentialIssuer::new(registry.clone(), &config.issuer));

    if config.content_provider.api_key.is_none() {
        warn!("出题服务 API key 未配置，测验生成将不可用（设置 QUEST_CONTENT_PROVIDER__API_KEY）");
    }
    let provider = Arc::new(HttpQuizProvider::new(config.content_provider.clone())?);

    // 查询服务与引擎共享同一份进度仓储
    let progress = Arc::new(MemoryProgressStore::new());

    let engine = Arc::new(QuestEngine::new(
        graph.clone(),
        progress.clone(),
        provider,
        issuer,
        registry,
        config.quiz.clone(),
    ));
    let query = Arc::new(QueryService::new(graph, progress));

    let state = AppState::new(engine.clone(), query);

    // 定期清理超时的测验会话
    tokio::spawn(SessionPurgeWorker::with_defaults(engine).run());

    // CORS 配置：通过 QUEST_CORS_ORIGINS 环境变量控制允许的来源
    let allowed_origins =
        std::env::var("QUEST_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("QUEST_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("quest-api listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("quest-api shut down");
    Ok(())
}

/// 等待 Ctrl+C 或 SIGTERM，触发优雅停机
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
