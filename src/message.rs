//! The opaque framed message the core consumes. The Router and filter
//! engine never look past `name`/`proto`; `data` passes through unchanged.

/// Protocol class used to bucket stats. Classification looks only at a
/// message's `name` prefix, never at `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Fpa,
    Fpb,
    Nmea,
    Ubx,
    Rtcm3,
    Unib,
    Novb,
    Spartn,
    Other,
}

impl Protocol {
    /// Classify a message name by prefix, matching the fixed bucket set.
    pub fn from_name(name: &str) -> Protocol {
        if name.starts_with("FPA") {
            Protocol::Fpa
        } else if name.starts_with("FPB") {
            Protocol::Fpb
        } else if name.starts_with("NMEA-") {
            Protocol::Nmea
        } else if name.starts_with("UBX-") {
            Protocol::Ubx
        } else if name.starts_with("RTCM3-") {
            Protocol::Rtcm3
        } else if name.starts_with("UNIB-") {
            Protocol::Unib
        } else if name.starts_with("NOVB-") {
            Protocol::Novb
        } else if name.starts_with("SPARTN-") {
            Protocol::Spartn
        } else {
            Protocol::Other
        }
    }
}

/// A self-delimited unit produced by framing raw transport bytes.
#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    pub data: Vec<u8>,
    pub proto: Protocol,
}

impl Message {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let proto = Protocol::from_name(&name);
        Message { name, data, proto }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
