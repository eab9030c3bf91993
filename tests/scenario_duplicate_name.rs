//! Configuration errors are collected in full and reported before any
//! transport is opened — not fail-fast on the first bad spec (§7).

use streammux::config::ConfigError;
use streammux::supervisor::Supervisor;

#[test]
fn duplicate_names_unresolved_endpoints_and_unused_streams_all_surface_together() {
    let errors = Supervisor::build(
        &[
            "tcpsvr://127.0.0.1:0,N=a".to_owned(),
            "tcpsvr://127.0.0.1:0,N=a".to_owned(),
            "tcpsvr://127.0.0.1:0,N=c".to_owned(),
        ],
        &["a=ghost".to_owned()],
    )
    .unwrap_err();

    assert!(errors.iter().any(|e| matches!(e, ConfigError::DuplicateName(n) if n == "a")));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::UnresolvedMuxEndpoint { key, .. } if key == "ghost")));
    assert!(errors.iter().any(|e| matches!(e, ConfigError::UnusedStream(n) if n == "c")));
}

#[test]
fn identical_src_and_dst_is_rejected() {
    let errors = Supervisor::build(
        &["tcpsvr://127.0.0.1:0,N=a".to_owned()],
        &["a=a".to_owned()],
    )
    .unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, ConfigError::IdenticalSrcDst(_))));
}

#[test]
fn a_fully_valid_configuration_builds_without_error() {
    let supervisor = Supervisor::build(
        &["tcpsvr://127.0.0.1:0,N=a".to_owned(), "tcpsvr://127.0.0.1:0,N=b".to_owned()],
        &["a=b".to_owned()],
    )
    .unwrap();
    assert_eq!(supervisor.streams.len(), 2);
    assert_eq!(supervisor.muxes.len(), 1);
}
