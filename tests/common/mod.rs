use std::time::Duration;

use streammux::supervisor::Supervisor;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

pub async fn poll_until<F: Fn() -> bool>(f: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if f() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub async fn wait_connected(sup: &Supervisor, name: &str) {
    let stream = sup.find_stream(name).unwrap().clone();
    let ok = poll_until(|| stream.is_connected(), Duration::from_secs(2)).await;
    assert!(ok, "stream '{name}' never reached CONNECTED");
}

/// Connect a bare TCP client to a `tcpsvr` stream's bound address, acting as
/// the external GNSS device or consumer for that end of a scenario.
pub async fn connect(addr: &str) -> TcpStream {
    poll_until(|| std::net::TcpStream::connect(addr).is_ok(), Duration::from_secs(2)).await;
    TcpStream::connect(addr).await.expect("failed to connect to test tcpsvr listener")
}

pub async fn read_line(socket: &mut TcpStream, timeout: Duration) -> String {
    let mut buf = vec![0u8; 4096];
    let n = tokio::time::timeout(timeout, socket.read(&mut buf))
        .await
        .expect("timed out waiting for forwarded bytes")
        .expect("read failed");
    String::from_utf8_lossy(&buf[..n]).into_owned()
}
