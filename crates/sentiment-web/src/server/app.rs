use crate::server::{routes, static_files, websocket};
use crate::state::SurfaceAppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Build the Axum application. The page and the API share one origin.
pub fn build_app(state: SurfaceAppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/state", get(routes::get_state))
        .route("/input", put(routes::update_input))
        .route("/analyze", post(routes::analyze))
        .route("/clear", post(routes::clear));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_files::serve_static)
        .layer(CompressionLayer::new())
        .route("/ws", get(websocket::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server. Model acquisition starts as the surface comes up.
pub async fn run_server(state: SurfaceAppState, addr: SocketAddr) -> anyhow::Result<()> {
    state.loader.spawn_initialize();

    let app = build_app(state);

    tracing::info!("Starting sentiment analyser on {}", addr);
    tracing::info!("Open http://{} in your browser", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
