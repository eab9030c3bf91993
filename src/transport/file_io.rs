use std::sync::{Arc, Mutex};

use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::framing::Framer;
use super::{Shared, StreamState, StreamType, Transport};
use crate::message::Message;

/// `filein://path` — reads a file once; an EOF close is expected and
/// suppressed from the fatal-close alarm by `StreamType::FileIn` (§4.3).
pub struct FileInTransport {
    shared: Arc<Shared>,
    path: String,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl FileInTransport {
    pub fn new(path: String) -> Arc<Self> {
        Arc::new(FileInTransport {
            shared: Arc::new(Shared::new()),
            path,
            handle: Mutex::new(None),
        })
    }
}

impl Transport for FileInTransport {
    fn start(&self) {
        let shared = self.shared.clone();
        let path = self.path.clone();
        let task = tokio::spawn(async move {
            shared.set_state(StreamState::Connecting, "", "");
            let mut file = match tokio::fs::File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    shared.set_state(StreamState::Closed, &e.to_string(), "");
                    return;
                }
            };
            shared.set_state(StreamState::Connected, "", &path);
            let mut framer = Framer::new();
            let mut buf = [0u8; 4096];
            loop {
                if shared.is_stopped() {
                    break;
                }
                match file.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        framer.push(&buf[..n]);
                        while let Some(msg) = framer.next_frame() {
                            shared.push_message(msg);
                        }
                    }
                    Err(_) => break,
                }
            }
            if !shared.is_stopped() {
                shared.set_state(StreamState::Closed, "", "end of file");
            }
        });
        *self.handle.lock().expect("handle lock poisoned") = Some(task);
    }

    fn stop(&self) {
        self.shared.mark_stopped();
        if let Some(handle) = self.handle.lock().expect("handle lock poisoned").take() {
            handle.abort();
        }
        self.shared.set_state(StreamState::Closed, "", "stopped");
    }

    fn read(&self) -> Option<Message> {
        self.shared.try_read()
    }

    fn write(&self, _data: &[u8]) -> bool {
        false
    }

    fn state(&self) -> StreamState {
        self.shared.state()
    }

    fn last_error(&self) -> String {
        self.shared.last_error()
    }

    fn info(&self) -> String {
        self.shared.info()
    }

    fn kind(&self) -> StreamType {
        StreamType::FileIn
    }

    fn add_read_observer(&self, f: Box<dyn Fn() + Send + Sync>) {
        self.shared.add_read_observer(f);
    }

    fn add_state_observer(&self, f: Box<dyn Fn(StreamState, StreamState, &str, &str) + Send + Sync>) {
        self.shared.add_state_observer(f);
    }
}

/// `fileout://path` — appends raw bytes written to it.
pub struct FileOutTransport {
    shared: Arc<Shared>,
    path: String,
    writer: Arc<Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl FileOutTransport {
    pub fn new(path: String) -> Arc<Self> {
        Arc::new(FileOutTransport {
            shared: Arc::new(Shared::new()),
            path,
            writer: Arc::new(Mutex::new(None)),
            handle: Mutex::new(None),
        })
    }
}

impl Transport for FileOutTransport {
    fn start(&self) {
        let shared = self.shared.clone();
        let path = self.path.clone();
        let writer = self.writer.clone();
        let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
        *writer.lock().expect("writer lock poisoned") = Some(tx);
        let task = tokio::spawn(async move {
            shared.set_state(StreamState::Connecting, "", "");
            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    shared.set_state(StreamState::Closed, &e.to_string(), "");
                    return;
                }
            };
            shared.set_state(StreamState::Connected, "", &path);
            while let Some(data) = rx.recv().await {
                if file.write_all(&data).await.is_err() {
                    break;
                }
            }
            if !shared.is_stopped() {
                shared.set_state(StreamState::Closed, "", "closed");
            }
        });
        *self.handle.lock().expect("handle lock poisoned") = Some(task);
    }

    fn stop(&self) {
        self.shared.mark_stopped();
        *self.writer.lock().expect("writer lock poisoned") = None;
        if let Some(handle) = self.handle.lock().expect("handle lock poisoned").take() {
            handle.abort();
        }
        self.shared.set_state(StreamState::Closed, "", "stopped");
    }

    fn read(&self) -> Option<Message> {
        None
    }

    fn write(&self, data: &[u8]) -> bool {
        self.writer
            .lock()
            .expect("writer lock poisoned")
            .as_ref()
            .is_some_and(|tx| tx.send(data.to_vec()).is_ok())
    }

    fn state(&self) -> StreamState {
        self.shared.state()
    }

    fn last_error(&self) -> String {
        self.shared.last_error()
    }

    fn info(&self) -> String {
        self.shared.info()
    }

    fn kind(&self) -> StreamType {
        StreamType::FileOut
    }

    fn add_read_observer(&self, f: Box<dyn Fn() + Send + Sync>) {
        self.shared.add_read_observer(f);
    }

    fn add_state_observer(&self, f: Box<dyn Fn(StreamState, StreamState, &str, &str) + Send + Sync>) {
        self.shared.add_state_observer(f);
    }
}
