use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::framing::Framer;
use super::{Shared, StreamState, StreamType, Transport};
use crate::message::Message;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// `tcpcli://host:port` — connects out, reconnecting with a fixed backoff
/// until `stop()` is called.
pub struct TcpClientTransport {
    shared: Arc<Shared>,
    addr: String,
    writer: Arc<Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TcpClientTransport {
    pub fn new(addr: String) -> Arc<Self> {
        Arc::new(TcpClientTransport {
            shared: Arc::new(Shared::new()),
            addr,
            writer: Arc::new(Mutex::new(None)),
            handle: Mutex::new(None),
        })
    }
}

impl Transport for TcpClientTransport {
    fn start(&self) {
        let shared = self.shared.clone();
        let writer = self.writer.clone();
        let addr = self.addr.clone();
        let task = tokio::spawn(async move {
            while !shared.is_stopped() {
                shared.set_state(StreamState::Connecting, "", "");
                let stream = match TcpStream::connect(&addr).await {
                    Ok(s) => s,
                    Err(e) => {
                        shared.set_state(StreamState::Closed, &e.to_string(), "");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        continue;
                    }
                };
                shared.set_state(StreamState::Connected, "", &addr);
                let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
                *writer.lock().expect("writer lock poisoned") = Some(tx);

                let (mut rd, mut wr) = stream.into_split();
                let read_shared = shared.clone();
                let read_task = tokio::spawn(async move {
                    let mut framer = Framer::new();
                    let mut buf = [0u8; 4096];
                    loop {
                        match rd.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                framer.push(&buf[..n]);
                                while let Some(msg) = framer.next_frame() {
                                    read_shared.push_message(msg);
                                }
                            }
                        }
                    }
                });
                let write_task = tokio::spawn(async move {
                    while let Some(data) = rx.recv().await {
                        if wr.write_all(&data).await.is_err() {
                            break;
                        }
                    }
                });
                let _ = tokio::join!(read_task, write_task);
                *writer.lock().expect("writer lock poisoned") = None;
                if shared.is_stopped() {
                    break;
                }
                shared.set_state(StreamState::Closed, "", "disconnected");
                tokio::time::sleep(RECONNECT_DELAY).await;
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
        StreamType::TcpClient
    }

    fn add_read_observer(&self, f: Box<dyn Fn() + Send + Sync>) {
        self.shared.add_read_observer(f);
    }

    fn add_state_observer(&self, f: Box<dyn Fn(StreamState, StreamState, &str, &str) + Send + Sync>) {
        self.shared.add_state_observer(f);
    }
}
