use std::sync::{Arc, Mutex};

use base64::Engine;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use super::framing::Framer;
use super::{Shared, StreamState, StreamType, Transport};
use crate::message::Message;

/// `ntripcli://[user[:pass]@]host:port/mountpoint` — a long-lived HTTP GET
/// against an NTRIP caster. Casters are plain HTTP/1.1 servers streaming a
/// chunkless response body; this is a raw GET over TCP, not a `reqwest`
/// request/response call, because the connection never closes.
pub struct NtripClientTransport {
    shared: Arc<Shared>,
    host: String,
    port: u16,
    mountpoint: String,
    auth: Option<(String, String)>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl NtripClientTransport {
    pub fn new(host: String, port: u16, mountpoint: String, auth: Option<(String, String)>) -> Arc<Self> {
        Arc::new(NtripClientTransport {
            shared: Arc::new(Shared::new()),
            host,
            port,
            mountpoint,
            auth,
            handle: Mutex::new(None),
        })
    }

    fn build_request(&self) -> String {
        let mut req = format!(
            "GET /{} HTTP/1.1\r\nHost: {}\r\nUser-Agent: NTRIP streammux\r\nConnection: close\r\n",
            self.mountpoint.trim_start_matches('/'),
            self.host
        );
        if let Some((user, pass)) = &self.auth {
            let creds = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            req.push_str(&format!("Authorization: Basic {creds}\r\n"));
        }
        req.push_str("\r\n");
        req
    }
}

impl Transport for NtripClientTransport {
    fn start(&self) {
        let shared = self.shared.clone();
        let addr = format!("{}:{}", self.host, self.port);
        let request = self.build_request();
        let task = tokio::spawn(async move {
            shared.set_state(StreamState::Connecting, "", "");
            let mut stream = match TcpStream::connect(&addr).await {
                Ok(s) => s,
                Err(e) => {
                    shared.set_state(StreamState::Closed, &e.to_string(), "");
                    return;
                }
            };
            if let Err(e) = stream.write_all(request.as_bytes()).await {
                shared.set_state(StreamState::Closed, &e.to_string(), "");
                return;
            }

            let mut framer = Framer::new();
            let mut buf = [0u8; 4096];
            let mut headers_done = false;
            let mut pending = Vec::new();
            shared.set_state(StreamState::Connected, "", &addr);
            loop {
                if shared.is_stopped() {
                    break;
                }
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if !headers_done {
                            pending.extend_from_slice(&buf[..n]);
                            if let Some(pos) = find_header_end(&pending) {
                                headers_done = true;
                                framer.push(&pending[pos..]);
                                pending.clear();
                            }
                            continue;
                        }
                        framer.push(&buf[..n]);
                        while let Some(msg) = framer.next_frame() {
                            shared.push_message(msg);
                        }
                    }
                }
            }
            if !shared.is_stopped() {
                shared.set_state(StreamState::Closed, "", "caster connection closed");
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
        StreamType::NtripClient
    }

    fn add_read_observer(&self, f: Box<dyn Fn() + Send + Sync>) {
        self.shared.add_read_observer(f);
    }

    fn add_state_observer(&self, f: Box<dyn Fn(StreamState, StreamState, &str, &str) + Send + Sync>) {
        self.shared.add_state_observer(f);
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}
