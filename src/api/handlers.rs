//! `GET /status`, `GET /version`, `POST /ctrl` handlers (§4.5).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use streammux_proto::{CtrlRequest, CtrlResponse, ErrorResponse, StatusSnapshot, VersionInfo};

use super::ctrl::apply_ctrl;
use super::state::AppState;

pub async fn get_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.status_rx.borrow().clone())
}

pub async fn get_version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.version.clone())
}

pub async fn post_ctrl(
    State(state): State<AppState>,
    Json(req): Json<CtrlRequest>,
) -> Result<Json<CtrlResponse>, (StatusCode, Json<ErrorResponse>)> {
    apply_ctrl(&state, &req)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))
}
