//! Shared `/ctrl` mutation logic used by both the `POST /ctrl` handler and
//! the `/ws` control channel (§4.5). A request is `[name_or_idx, a, b]`;
//! `a`/`b` are `Some(bool)` to set that flag or `null` to leave it
//! unchanged. For a Stream, `a`/`b` are `ena_read`/`ena_write`; for a Mux,
//! `ena_fwd`/`ena_rev`.

use std::fmt;

use streammux_proto::{CtrlRequest, CtrlResponse};

use super::state::{AppState, FindTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtrlError {
    UnknownTarget(String),
}

impl fmt::Display for CtrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtrlError::UnknownTarget(key) => write!(f, "no stream or mux named or indexed '{key}'"),
        }
    }
}

impl std::error::Error for CtrlError {}

pub fn apply_ctrl(state: &AppState, req: &CtrlRequest) -> Result<CtrlResponse, CtrlError> {
    let CtrlRequest(key, a, b) = req;
    match state.find_target(key) {
        Some(FindTarget::Stream(s)) => {
            if let Some(v) = a {
                s.set_ena_read(*v);
            }
            if let Some(v) = b {
                s.set_ena_write(*v);
            }
            Ok(CtrlResponse::new(s.name.clone(), s.ena_read(), s.ena_write()))
        }
        Some(FindTarget::Mux(m)) => {
            if let Some(v) = a {
                m.set_ena_fwd(*v);
            }
            if let Some(v) = b {
                m.set_ena_rev(*v);
            }
            Ok(CtrlResponse::new(m.name.clone(), m.ena_fwd(), m.ena_rev()))
        }
        None => Err(CtrlError::UnknownTarget(key.clone())),
    }
}
