//! End-to-end exercise of the `axum` control API surface: `/status`,
//! `/version`, and `/ctrl` (§4.5).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use streammux::api::{build_router, AppState};
use streammux::supervisor::Supervisor;
use tokio::sync::watch;
use tower::ServiceExt;

fn dummy_state() -> AppState {
    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:0,N=a".to_owned(), "tcpsvr://127.0.0.1:0,N=b".to_owned()],
        &["a=b".to_owned()],
    )
    .unwrap();
    let (_tx, rx) = watch::channel(streammux_proto::StatusSnapshot::empty(streammux_proto::ProcSnapshot {
        time: String::new(),
        mem_curr: 0,
        mem_peak: 0,
        cpu_curr: 0.0,
        cpu_avg: 0.0,
        cpu_peak: 0.0,
        uptime: 0,
        pid: std::process::id(),
    }));
    AppState {
        supervisor,
        status_rx: rx,
        version: streammux::version::info(),
    }
}

#[tokio::test]
async fn version_endpoint_reports_the_crate_version() {
    let app = build_router(dummy_state(), None);
    let response = app
        .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: streammux_proto::VersionInfo = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.version, streammux::version::VERSION);
}

#[tokio::test]
async fn ctrl_endpoint_mutates_a_stream_enable_flag_by_name() {
    let app = build_router(dummy_state(), None);
    let body = serde_json::to_vec(&streammux_proto::CtrlRequest("a".to_owned(), Some(false), None)).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ctrl")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let resp: streammux_proto::CtrlResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp.data, ("a".to_owned(), false, true));
}

#[tokio::test]
async fn ctrl_endpoint_rejects_an_unresolved_target() {
    let app = build_router(dummy_state(), None);
    let body = serde_json::to_vec(&streammux_proto::CtrlRequest("ghost".to_owned(), Some(true), None)).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ctrl")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
