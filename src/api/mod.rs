//! The Control API (§4.5): `axum` router over `AppState`, with the live
//! `/status`, `/version`, `/ctrl`, `/ws` routes plus a static-asset
//! fallback for the (out-of-core) web UI.

pub mod ctrl;
pub mod handlers;
pub mod state;
pub mod ws;

use std::path::PathBuf;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

pub use state::AppState;

/// Build the router. `assets_dir` is the `-A` override; when absent, static
/// routes 404 rather than embedding a bundled UI (§1's embedded-asset
/// Non-goal is out of scope for this core).
pub fn build_router(state: AppState, assets_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/status", get(handlers::get_status))
        .route("/version", get(handlers::get_version))
        .route("/ctrl", post(handlers::post_ctrl))
        .route("/ws", get(ws::ws_handler));

    if let Some(dir) = assets_dir {
        router = router
            .nest_service("/", ServeDir::new(&dir))
            .route_service("/streammux.html", ServeFile::new(dir.join("streammux.html")));
    }

    router.with_state(state)
}
