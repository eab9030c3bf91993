//! The Mux data model (§3): a directed pair of connections between two
//! distinct Streams, each direction independently enabled and filtered.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::filter::Filter;
use crate::stats::Stats;
use crate::stream::Stream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxError(pub String);

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MuxError {}

pub struct Mux {
    pub name: String,
    /// Always true in the source program; kept for symmetry with
    /// `Stream.can_read`/`can_write` and because the report JSON carries
    /// `"can":[can_fwd, can_rev]` (§9).
    pub can_fwd: bool,
    pub can_rev: bool,
    pub ena_fwd: AtomicBool,
    pub ena_rev: AtomicBool,
    pub filter_fwd: Filter,
    pub filter_rev: Filter,
    pub stats_fwd: Stats,
    pub stats_rev: Stats,
    pub src: Arc<Stream>,
    pub dst: Arc<Stream>,
}

impl fmt::Debug for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mux")
            .field("name", &self.name)
            .field("src", &self.src.name)
            .field("dst", &self.dst.name)
            .finish()
    }
}

impl Mux {
    pub fn new(
        name: String,
        src: Arc<Stream>,
        dst: Arc<Stream>,
        filter_fwd: Filter,
        filter_rev: Filter,
    ) -> Result<Arc<Mux>, MuxError> {
        if src.name == dst.name {
            return Err(MuxError(format!(
                "mux '{name}' has identical src and dst '{}'",
                src.name
            )));
        }
        Ok(Arc::new(Mux {
            name,
            can_fwd: true,
            can_rev: true,
            ena_fwd: AtomicBool::new(true),
            ena_rev: AtomicBool::new(true),
            filter_fwd,
            filter_rev,
            stats_fwd: Stats::new(),
            stats_rev: Stats::new(),
            src,
            dst,
        }))
    }

    pub fn ena_fwd(&self) -> bool {
        self.ena_fwd.load(Ordering::Relaxed)
    }

    pub fn ena_rev(&self) -> bool {
        self.ena_rev.load(Ordering::Relaxed)
    }

    pub fn set_ena_fwd(&self, v: bool) {
        self.ena_fwd.store(v, Ordering::Relaxed);
    }

    pub fn set_ena_rev(&self, v: bool) {
        self.ena_rev.store(v, Ordering::Relaxed);
    }
}
