//! The cooperative event loop that drives message flow from Streams
//! through Muxes and back to Streams (§4.3).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Notify;

use crate::message::Message;
use crate::mux::Mux;
use crate::stats::Stats;
use crate::stream::Stream;
use crate::supervisor::Supervisor;
use crate::transport::{StreamState, StreamType};

/// Fairness bound: a single chatty stream may deliver at most this many
/// messages before the loop moves on to the next stream within one
/// iteration.
const MAX_MSGS_PER_STR: usize = 10;
const IDLE_WAIT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A non-`FILEIN` stream transitioned to `CLOSED` unexpectedly.
    FatalStreamClose(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::FatalStreamClose(name) => {
                write!(f, "stream '{name}' closed unexpectedly")
            }
        }
    }
}

impl std::error::Error for RouterError {}

pub struct Router {
    supervisor: Arc<Supervisor>,
    notify: Arc<Notify>,
    abort: Arc<AtomicBool>,
    fatal: Arc<std::sync::Mutex<Option<String>>>,
}

impl Router {
    pub fn new(supervisor: Arc<Supervisor>) -> Arc<Router> {
        Arc::new(Router {
            supervisor,
            notify: Arc::new(Notify::new()),
            abort: Arc::new(AtomicBool::new(false)),
            fatal: Arc::new(std::sync::Mutex::new(None)),
        })
    }

    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        self.abort.clone()
    }

    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Subscribe read/state observers for every Stream. Must run before any
    /// stream is started (§4.3's "register observers before starting
    /// streams"). Observer closures hold only a `Weak<Stream>` so the
    /// Stream → Transport → observer chain never keeps the Stream alive on
    /// its own (§9).
    pub fn wire_observers(&self) {
        for stream in &self.supervisor.streams {
            let notify = self.notify.clone();
            stream.transport.add_read_observer(Box::new(move || {
                notify.notify_one();
            }));

            let weak: Weak<Stream> = Arc::downgrade(stream);
            let notify = self.notify.clone();
            let abort = self.abort.clone();
            let fatal = self.fatal.clone();
            stream.transport.add_state_observer(Box::new(move |old, new, error, info| {
                let Some(stream) = weak.upgrade() else { return };
                stream.connected.store(new == StreamState::Connected, Ordering::Relaxed);

                let mut line = format!("{} {}", timestamp(), new.as_str());
                if !error.is_empty() {
                    line.push_str(&format!(" [{error}]"));
                }
                if !info.is_empty() {
                    line.push_str(&format!(" ({info})"));
                }
                stream.history.push(line);

                if old != new
                    && new == StreamState::Closed
                    && !abort.load(Ordering::SeqCst)
                    && stream.transport.kind() != StreamType::FileIn
                {
                    *fatal.lock().expect("fatal lock poisoned") = Some(stream.name.clone());
                    notify.notify_one();
                }
            }));
        }
    }

    pub async fn run(self: &Arc<Self>) -> Result<(), RouterError> {
        loop {
            if self.abort.load(Ordering::SeqCst) {
                return Ok(());
            }
            if let Some(name) = self.fatal.lock().expect("fatal lock poisoned").clone() {
                return Err(RouterError::FatalStreamClose(name));
            }

            let mut progress = false;
            for stream in &self.supervisor.streams {
                let mut n = 0;
                while n < MAX_MSGS_PER_STR && stream.can_read() && stream.is_connected() {
                    let Some(msg) = stream.transport.read() else {
                        break;
                    };
                    n += 1;
                    progress = true;

                    if !stream.ena_read() {
                        continue;
                    }
                    if !stream.filter_read.pass(&msg.name) {
                        stream.stats_read.inc_filt(msg.len());
                        continue;
                    }
                    stream.stats_read.update(&msg);

                    for mux in &self.supervisor.muxes {
                        if Arc::ptr_eq(&mux.src, stream) && mux.can_fwd && mux.ena_fwd() {
                            deliver(&msg, mux, &mux.filter_fwd, &mux.stats_fwd, &mux.dst);
                        } else if Arc::ptr_eq(&mux.dst, stream) && mux.can_rev && mux.ena_rev() {
                            deliver(&msg, mux, &mux.filter_rev, &mux.stats_rev, &mux.src);
                        }
                    }
                }
            }

            if !progress {
                let _ = tokio::time::timeout(IDLE_WAIT, self.notify.notified()).await;
            }
        }
    }
}

/// Gate a message from `mux`'s source through to `peer`. The capability,
/// enable flag, and connection state checked here always belong to `peer`
/// — the stream actually being written to — in both the forward and
/// reverse direction, fixing the source program's reverse-path bug (§9).
fn deliver(msg: &Message, mux: &Arc<Mux>, mux_filter: &crate::filter::Filter, mux_stats: &Stats, peer: &Arc<Stream>) {
    if !mux_filter.pass(&msg.name) {
        mux_stats.inc_filt(msg.len());
        return;
    }

    if peer.can_write() && peer.ena_write() && peer.is_connected() {
        if !peer.filter_write.pass(&msg.name) {
            peer.stats_write.inc_filt(msg.len());
        } else if peer.transport.write(&msg.data) {
            peer.stats_write.update(msg);
        } else {
            peer.stats_write.inc_err();
        }
    }

    // The mux counts what passed its own filter, regardless of whether the
    // peer was reachable (§9: "would-have-forwarded", not "delivered").
    mux_stats.update(msg);
    let _ = mux.name.as_str();
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.1f").to_string()
}
