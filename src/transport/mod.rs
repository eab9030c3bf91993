//! The external collaborator contract a Stream wraps (§4.1). The Router
//! never constructs transports and never touches their internals — it only
//! calls through this trait.

pub mod file_io;
pub mod framing;
pub mod ntrip_client;
pub mod tcp_client;
pub mod tcp_server;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Mutex;

use crate::message::Message;

/// Read-only capability derived from the transport kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ro,
    Wo,
    Rw,
}

impl Mode {
    pub fn can_read(self) -> bool {
        !matches!(self, Mode::Wo)
    }

    pub fn can_write(self) -> bool {
        !matches!(self, Mode::Ro)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ro => "RO",
            Mode::Wo => "WO",
            Mode::Rw => "RW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Closed,
    Connecting,
    Connected,
}

impl StreamState {
    fn from_u8(v: u8) -> StreamState {
        match v {
            0 => StreamState::Closed,
            1 => StreamState::Connecting,
            _ => StreamState::Connected,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            StreamState::Closed => 0,
            StreamState::Connecting => 1,
            StreamState::Connected => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamState::Closed => "CLOSED",
            StreamState::Connecting => "CONNECTING",
            StreamState::Connected => "CONNECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    TcpServer,
    TcpClient,
    NtripClient,
    FileIn,
    FileOut,
}

impl StreamType {
    pub fn default_mode(self) -> Mode {
        match self {
            StreamType::TcpServer | StreamType::TcpClient => Mode::Rw,
            StreamType::NtripClient => Mode::Ro,
            StreamType::FileIn => Mode::Ro,
            StreamType::FileOut => Mode::Wo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StreamType::TcpServer => "TCPSVR",
            StreamType::TcpClient => "TCPCLI",
            StreamType::NtripClient => "NTRIPCLI",
            StreamType::FileIn => "FILEIN",
            StreamType::FileOut => "FILEOUT",
        }
    }

    /// File-input streams are expected to close on EOF; the Router must not
    /// treat that as the fatal "unexpected close" condition (§4.3).
    pub fn suppresses_close_alarm(self) -> bool {
        matches!(self, StreamType::FileIn)
    }
}

type ReadObserver = Box<dyn Fn() + Send + Sync>;
type StateObserver = Box<dyn Fn(StreamState, StreamState, &str, &str) + Send + Sync>;

/// Shared bookkeeping every concrete transport embeds. Not part of the
/// public `Transport` trait surface — it's composition, not inheritance.
pub struct Shared {
    state: AtomicU8,
    stopped: AtomicBool,
    error: Mutex<String>,
    info: Mutex<String>,
    read_queue: Mutex<VecDeque<Message>>,
    read_observers: Mutex<Vec<ReadObserver>>,
    state_observers: Mutex<Vec<StateObserver>>,
}

impl Shared {
    pub fn new() -> Self {
        Shared {
            state: AtomicU8::new(StreamState::Closed.as_u8()),
            stopped: AtomicBool::new(false),
            error: Mutex::new(String::new()),
            info: Mutex::new(String::new()),
            read_queue: Mutex::new(VecDeque::new()),
            read_observers: Mutex::new(Vec::new()),
            state_observers: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> StreamState {
        StreamState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    pub fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn last_error(&self) -> String {
        self.error.lock().expect("error lock poisoned").clone()
    }

    pub fn info(&self) -> String {
        self.info.lock().expect("info lock poisoned").clone()
    }

    pub fn set_info(&self, info: impl Into<String>) {
        *self.info.lock().expect("info lock poisoned") = info.into();
    }

    /// Transition state and notify state observers with the old/new pair.
    pub fn set_state(&self, new: StreamState, error: &str, info: &str) {
        let old = StreamState::from_u8(self.state.swap(new.as_u8(), Ordering::AcqRel));
        if !error.is_empty() {
            *self.error.lock().expect("error lock poisoned") = error.to_owned();
        }
        if old == new {
            return;
        }
        for obs in self.state_observers.lock().expect("observers lock poisoned").iter() {
            obs(old, new, error, info);
        }
    }

    pub fn push_message(&self, msg: Message) {
        self.read_queue.lock().expect("queue lock poisoned").push_back(msg);
        for obs in self.read_observers.lock().expect("observers lock poisoned").iter() {
            obs();
        }
    }

    pub fn try_read(&self) -> Option<Message> {
        self.read_queue.lock().expect("queue lock poisoned").pop_front()
    }

    pub fn add_read_observer(&self, f: ReadObserver) {
        self.read_observers.lock().expect("observers lock poisoned").push(f);
    }

    pub fn add_state_observer(&self, f: StateObserver) {
        self.state_observers.lock().expect("observers lock poisoned").push(f);
    }
}

impl Default for Shared {
    fn default() -> Self {
        Shared::new()
    }
}

/// The capability the Router consumes. `read`/`write` are both explicitly
/// non-blocking; `start`/`stop` are idempotent.
pub trait Transport: Send + Sync {
    fn start(&self);
    fn stop(&self);
    fn read(&self) -> Option<Message>;
    fn write(&self, data: &[u8]) -> bool;
    fn state(&self) -> StreamState;
    fn last_error(&self) -> String;
    fn info(&self) -> String;
    fn kind(&self) -> StreamType;
    fn add_read_observer(&self, f: ReadObserver);
    fn add_state_observer(&self, f: StateObserver);
}
