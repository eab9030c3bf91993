//! A message written into one tcpsvr stream is forwarded, unmodified, to
//! the other side of a mux whose default filters pass everything (§8).

mod common;

use std::time::Duration;

use streammux::router::Router;
use streammux::supervisor::Supervisor;

#[tokio::test]
async fn basic_forward_delivers_bytes_unmodified() {
    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:19101,N=src".to_owned(), "tcpsvr://127.0.0.1:19102,N=dst".to_owned()],
        &["src=dst".to_owned()],
    )
    .unwrap();

    let router = Router::new(supervisor.clone());
    router.wire_observers();
    for stream in &supervisor.streams {
        stream.transport.start();
    }

    let mut device = common::connect("127.0.0.1:19101").await;
    let mut sink = common::connect("127.0.0.1:19102").await;
    common::wait_connected(&supervisor, "src").await;
    common::wait_connected(&supervisor, "dst").await;

    let router_task = {
        let router = router.clone();
        tokio::spawn(async move { router.run().await })
    };

    use tokio::io::AsyncWriteExt;
    device.write_all(b"$GNGGA,1,2,3*00\r\n").await.unwrap();

    let received = common::read_line(&mut sink, Duration::from_secs(2)).await;
    assert_eq!(received, "$GNGGA,1,2,3*00\r\n");

    let mux = supervisor.find_mux("mux1").unwrap();
    assert_eq!(mux.stats_fwd.n_msgs(), 1);

    router.request_abort();
    drop(device);
    drop(sink);
    let _ = router_task.await;
    for stream in &supervisor.streams {
        stream.transport.stop();
    }
}
