//! Disabling a mux direction (`EF=off`) suppresses delivery entirely — no
//! peer write, and no mux stats credited either, unlike a filter drop (§4.3).

mod common;

use std::time::Duration;

use streammux::router::Router;
use streammux::supervisor::Supervisor;

#[tokio::test]
async fn disabled_forward_direction_delivers_nothing_and_counts_nothing() {
    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:19121,N=src".to_owned(), "tcpsvr://127.0.0.1:19122,N=dst".to_owned()],
        &["src=dst,EF=off".to_owned()],
    )
    .unwrap();

    let router = Router::new(supervisor.clone());
    router.wire_observers();
    for stream in &supervisor.streams {
        stream.transport.start();
    }

    let mut device = common::connect("127.0.0.1:19121").await;
    let mut sink = common::connect("127.0.0.1:19122").await;
    common::wait_connected(&supervisor, "src").await;
    common::wait_connected(&supervisor, "dst").await;

    let router_task = {
        let router = router.clone();
        tokio::spawn(async move { router.run().await })
    };

    use tokio::io::AsyncWriteExt;
    device.write_all(b"$GNGGA,never,delivered*00\r\n").await.unwrap();

    // give the router several iterations to (not) act on the message
    tokio::time::sleep(Duration::from_millis(200)).await;

    let mux = supervisor.find_mux("mux1").unwrap();
    assert_eq!(mux.stats_fwd.n_msgs(), 0);
    assert_eq!(mux.stats_fwd.n_filt(), 0);

    use tokio::io::AsyncReadExt;
    let mut probe = [0u8; 1];
    let nothing_arrived = tokio::time::timeout(Duration::from_millis(100), sink.read(&mut probe)).await.is_err();
    assert!(nothing_arrived);

    router.request_abort();
    drop(device);
    drop(sink);
    let _ = router_task.await;
    for stream in &supervisor.streams {
        stream.transport.stop();
    }
}
