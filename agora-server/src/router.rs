use crate::config::ServerConfig;
use crate::session::{SessionCoordinator, SessionHandle};
use crate::signaling::ws_handler;
use crate::transcript::FileBackend;
use anyhow::Context;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub connected: usize,
    pub max: usize,
}

async fn health() -> &'static str {
    "ok"
}

async fn status(State(session): State<SessionHandle>) -> Json<StatusBody> {
    Json(StatusBody {
        connected: session.connected(),
        max: session.max_capacity(),
    })
}

/// `/ws` for channels, `/health` and `/status` for operators, and the client
/// bundle from `static_dir` for everything else.
pub fn router(session: SessionHandle, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/status", get(status))
        .with_state(session);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Runs the coordinator and the HTTP listener until the listener stops.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let backend = FileBackend::open(&config.transcript_path)
        .await
        .with_context(|| format!("cannot open {}", config.transcript_path.display()))?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;

    let static_dir = config.static_dir.clone();
    let session = SessionCoordinator::spawn(config, Box::new(backend)).await;
    let app = router(session, static_dir.as_deref());

    info!("Server is running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
