//! Shared state handed to every axum handler (§4.5).

use std::sync::Arc;

use tokio::sync::watch;

use crate::mux::Mux;
use crate::stream::Stream;
use crate::supervisor::Supervisor;
use streammux_proto::VersionInfo;

#[derive(Clone)]
pub struct AppState {
    pub supervisor: Arc<Supervisor>,
    pub status_rx: watch::Receiver<streammux_proto::StatusSnapshot>,
    pub version: VersionInfo,
}

/// Resolve a `/ctrl` or `/ws` target by name first, then by 1-based index
/// into declaration order — matching `spec.md` §4.5's lookup rule.
pub enum FindTarget {
    Stream(Arc<Stream>),
    Mux(Arc<Mux>),
}

impl AppState {
    pub fn find_target(&self, key: &str) -> Option<FindTarget> {
        if let Some(s) = self.supervisor.find_stream(key) {
            return Some(FindTarget::Stream(s.clone()));
        }
        if let Some(m) = self.supervisor.find_mux(key) {
            return Some(FindTarget::Mux(m.clone()));
        }
        None
    }
}
