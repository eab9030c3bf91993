//! The Stream data model (§3) and its lifecycle (§4.1). A Stream owns a
//! transport and the core-level bookkeeping (flags, filters, stats,
//! history) the Router and Status publisher read and mutate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::filter::Filter;
use crate::history::History;
use crate::stats::Stats;
use crate::transport::{Mode, StreamState, Transport};

pub struct Stream {
    pub name: String,
    pub mode: Mode,
    pub opts: String,
    /// The static `scheme://target` the stream was configured with — the
    /// report file's `disp` field, distinct from the transport's dynamic
    /// `info()` (e.g. the currently-connected peer address).
    pub disp: String,
    pub transport: Arc<dyn Transport>,
    pub ena_read: AtomicBool,
    pub ena_write: AtomicBool,
    pub filter_read: Filter,
    pub filter_write: Filter,
    pub connected: AtomicBool,
    pub history: History,
    pub stats_read: Stats,
    pub stats_write: Stats,
}

impl Stream {
    pub fn new(
        name: String,
        mode: Mode,
        opts: String,
        disp: String,
        transport: Arc<dyn Transport>,
        filter_read: Filter,
        filter_write: Filter,
    ) -> Arc<Stream> {
        Arc::new(Stream {
            name,
            mode,
            opts,
            disp,
            transport,
            ena_read: AtomicBool::new(true),
            ena_write: AtomicBool::new(true),
            filter_read,
            filter_write,
            connected: AtomicBool::new(false),
            history: History::new(),
            stats_read: Stats::new(),
            stats_write: Stats::new(),
        })
    }

    pub fn can_read(&self) -> bool {
        self.mode.can_read()
    }

    pub fn can_write(&self) -> bool {
        self.mode.can_write()
    }

    pub fn ena_read(&self) -> bool {
        self.ena_read.load(Ordering::Relaxed)
    }

    pub fn ena_write(&self) -> bool {
        self.ena_write.load(Ordering::Relaxed)
    }

    pub fn set_ena_read(&self, v: bool) {
        self.ena_read.store(v, Ordering::Relaxed);
    }

    pub fn set_ena_write(&self, v: bool) {
        self.ena_write.store(v, Ordering::Relaxed);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> StreamState {
        self.transport.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::tcp_server::TcpServerTransport;

    fn dummy_stream(name: &str) -> Arc<Stream> {
        let transport = TcpServerTransport::new("127.0.0.1:0".to_owned());
        Stream::new(
            name.to_owned(),
            Mode::Rw,
            String::new(),
            String::new(),
            transport,
            Filter::parse("").unwrap(),
            Filter::parse("").unwrap(),
        )
    }

    #[test]
    fn enable_flags_default_true_and_are_independently_mutable() {
        let s = dummy_stream("a");
        assert!(s.ena_read());
        assert!(s.ena_write());
        s.set_ena_read(false);
        assert!(!s.ena_read());
        assert!(s.ena_write());
    }

    #[test]
    fn mode_derives_can_read_can_write() {
        let s = dummy_stream("a");
        assert!(s.can_read());
        assert!(s.can_write());
    }

    #[test]
    fn connected_defaults_false_until_observer_sets_it() {
        let s = dummy_stream("a");
        assert!(!s.is_connected());
    }
}
