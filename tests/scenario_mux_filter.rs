//! A mux's forward filter drops a denied message (credited as `n_filt`)
//! while an allowed message still reaches the peer (§4.2, §8).

mod common;

use std::time::Duration;

use streammux::router::Router;
use streammux::supervisor::Supervisor;

#[tokio::test]
async fn mux_filter_drops_denied_message_but_forwards_the_rest() {
    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:19111,N=src".to_owned(), "tcpsvr://127.0.0.1:19112,N=dst".to_owned()],
        &["src=dst,FF=!NMEA-GN-RMC/*".to_owned()],
    )
    .unwrap();

    let router = Router::new(supervisor.clone());
    router.wire_observers();
    for stream in &supervisor.streams {
        stream.transport.start();
    }

    let mut device = common::connect("127.0.0.1:19111").await;
    let mut sink = common::connect("127.0.0.1:19112").await;
    common::wait_connected(&supervisor, "src").await;
    common::wait_connected(&supervisor, "dst").await;

    let router_task = {
        let router = router.clone();
        tokio::spawn(async move { router.run().await })
    };

    use tokio::io::AsyncWriteExt;
    device.write_all(b"$GNRMC,denied*00\r\n").await.unwrap();
    device.write_all(b"$GNGGA,allowed*00\r\n").await.unwrap();

    let received = common::read_line(&mut sink, Duration::from_secs(2)).await;
    assert_eq!(received, "$GNGGA,allowed*00\r\n");

    let mux = supervisor.find_mux("mux1").unwrap();
    assert_eq!(mux.stats_fwd.n_filt(), 1);
    assert_eq!(mux.stats_fwd.n_msgs(), 1);

    router.request_abort();
    drop(device);
    drop(sink);
    let _ = router_task.await;
    for stream in &supervisor.streams {
        stream.transport.stop();
    }
}
