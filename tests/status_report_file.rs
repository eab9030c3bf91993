//! The status publisher writes a valid JSON report to the configured path
//! via atomic tmp+rename, on its normal 1 Hz tick (§4.4, §6).

use std::time::Duration;

use streammux::status::StatusPublisher;
use streammux::supervisor::Supervisor;

#[tokio::test]
async fn report_file_appears_with_the_documented_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.json");

    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:0,N=a".to_owned(), "tcpsvr://127.0.0.1:0,N=b".to_owned()],
        &["a=b".to_owned()],
    )
    .unwrap();

    let (publisher, _rx) = StatusPublisher::new(supervisor, Some(path.clone()));
    let task = tokio::spawn(publisher.run());

    tokio::time::sleep(Duration::from_millis(1300)).await;
    task.abort();

    let contents = tokio::fs::read_to_string(&path).await.expect("report file was not written");
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["api"], "status");
    assert_eq!(json["strs"].as_array().unwrap().len(), 2);
    assert_eq!(json["muxs"].as_array().unwrap().len(), 1);
    assert!(json["proc"]["pid"].is_u64());
    assert!(!dir.path().join("status.tmp").exists());
}
