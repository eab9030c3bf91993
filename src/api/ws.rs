//! `WS /ws` (§4.5): push every new status snapshot to the client, and
//! accept `{"api":"ctrl","data":[...]}` ctrl messages on the same socket.

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use streammux_proto::{ErrorResponse, WsCtrlEnvelope};

use super::ctrl::apply_ctrl;
use super::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut status_rx = state.status_rx.clone();
    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = status_rx.borrow_and_update().clone();
                let Ok(text) = serde_json::to_string(&snapshot) else { continue };
                if socket.send(WsMessage::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                let Some(Ok(WsMessage::Text(text))) = incoming else { break };
                let reply = match serde_json::from_str::<WsCtrlEnvelope>(&text) {
                    Ok(envelope) => match apply_ctrl(&state, &envelope.data) {
                        Ok(resp) => serde_json::to_string(&resp),
                        Err(e) => serde_json::to_string(&ErrorResponse::new(e.to_string())),
                    },
                    Err(e) => serde_json::to_string(&ErrorResponse::new(format!("malformed ctrl message: {e}"))),
                };
                let Ok(reply) = reply else { continue };
                if socket.send(WsMessage::Text(reply.into())).await.is_err() {
                    break;
                }
            }
        }
    }
}
