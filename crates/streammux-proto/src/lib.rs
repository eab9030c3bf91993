//! Wire types shared between the `streammux` binary and its integration
//! tests: the `/status` snapshot, the `/version` payload, and the `/ctrl`
//! request/response envelope. No I/O lives here — just `Serialize`/
//! `Deserialize` shapes.

use serde::{Deserialize, Serialize};

/// One protocol-bucketed counter set, as carried per stream-direction and
/// per mux-direction. Field order matches the fixed key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub n_msgs: u64,
    pub s_msgs: u64,
    pub n_err: u64,
    pub n_filt: u64,
    pub s_filt: u64,
    pub n_fpa: u64,
    pub s_fpa: u64,
    pub n_fpb: u64,
    pub s_fpb: u64,
    pub n_nmea: u64,
    pub s_nmea: u64,
    pub n_ubx: u64,
    pub s_ubx: u64,
    pub n_rtcm3: u64,
    pub s_rtcm3: u64,
    pub n_unib: u64,
    pub s_unib: u64,
    pub n_novb: u64,
    pub s_novb: u64,
    pub n_spartn: u64,
    pub s_spartn: u64,
    pub n_other: u64,
    pub s_other: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub state: String,
    pub statestrs: Vec<String>,
    pub error: String,
    pub info: String,
    pub disp: String,
    pub opts: String,
    pub filter: (String, String),
    pub stats: (StatsSnapshot, StatsSnapshot),
    pub can: (bool, bool),
    pub ena: (bool, bool),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxSnapshot {
    pub name: String,
    pub can: (bool, bool),
    pub ena: (bool, bool),
    pub src: String,
    pub dst: String,
    pub filter: (String, String),
    pub stats: (StatsSnapshot, StatsSnapshot),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcSnapshot {
    pub time: String,
    pub mem_curr: u64,
    pub mem_peak: u64,
    pub cpu_curr: f32,
    pub cpu_avg: f32,
    pub cpu_peak: f32,
    pub uptime: u64,
    pub pid: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub api: String,
    pub proc: ProcSnapshot,
    pub strs: Vec<StreamSnapshot>,
    pub muxs: Vec<MuxSnapshot>,
}

impl StatusSnapshot {
    pub fn empty(proc: ProcSnapshot) -> Self {
        StatusSnapshot {
            api: "status".to_owned(),
            proc,
            strs: Vec::new(),
            muxs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub api: String,
    pub version: String,
    pub copyright: String,
    pub license: String,
}

/// `POST /ctrl` and WebSocket ctrl request body: `["name_or_idx", A, B]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtrlRequest(pub String, pub Option<bool>, pub Option<bool>);

/// Successful `/ctrl` response: `{"api":"ctrl","data":[name, a, b]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtrlResponse {
    pub api: String,
    pub data: (String, bool, bool),
}

impl CtrlResponse {
    pub fn new(name: impl Into<String>, a: bool, b: bool) -> Self {
        CtrlResponse {
            api: "ctrl".to_owned(),
            data: (name.into(), a, b),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub api: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            api: "error".to_owned(),
            error: message.into(),
        }
    }
}

/// The WebSocket envelope wrapping a ctrl request, per §4.5:
/// `{"api":"ctrl","data":[...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsCtrlEnvelope {
    pub api: String,
    pub data: CtrlRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_request_round_trips_through_json() {
        let req = CtrlRequest("a".to_owned(), Some(false), None);
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"["a",false,null]"#);
        let back: CtrlRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.0, "a");
        assert_eq!(back.1, Some(false));
        assert_eq!(back.2, None);
    }

    #[test]
    fn ctrl_response_shape_matches_wire_contract() {
        let resp = CtrlResponse::new("a", true, false);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["api"], "ctrl");
        assert_eq!(json["data"][0], "a");
        assert_eq!(json["data"][1], true);
        assert_eq!(json["data"][2], false);
    }

    #[test]
    fn stats_snapshot_defaults_to_all_zero() {
        let s = StatsSnapshot::default();
        assert_eq!(s.n_msgs, 0);
        assert_eq!(s.s_filt, 0);
    }

    #[test]
    fn status_snapshot_serializes_array_fields_in_declaration_order() {
        let snap = StatusSnapshot::empty(ProcSnapshot {
            time: "12:00:00.0".to_owned(),
            mem_curr: 0,
            mem_peak: 0,
            cpu_curr: 0.0,
            cpu_avg: 0.0,
            cpu_peak: 0.0,
            uptime: 0,
            pid: 1,
        });
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["api"], "status");
        assert!(json["strs"].as_array().unwrap().is_empty());
        assert!(json["muxs"].as_array().unwrap().is_empty());
    }
}
