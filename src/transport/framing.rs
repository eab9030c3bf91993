//! Splits a raw byte stream into framed `Message`s. The core's Non-goal is
//! decoding message *content* (§1); framing only needs to find boundaries
//! and a name, never interpret payload semantics.

use crate::message::Message;

const UBX_SYNC: [u8; 2] = [0xB5, 0x62];
const RTCM3_SYNC: u8 = 0xD3;

/// Incremental framer fed raw bytes as they arrive; yields complete frames
/// as soon as enough bytes are buffered.
pub struct Framer {
    buf: Vec<u8>,
}

impl Framer {
    pub fn new() -> Self {
        Framer { buf: Vec::new() }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn next_frame(&mut self) -> Option<Message> {
        if self.buf.is_empty() {
            return None;
        }
        if self.buf.starts_with(&UBX_SYNC) {
            return self.take_ubx_frame();
        }
        if self.buf[0] == RTCM3_SYNC {
            return self.take_rtcm3_frame();
        }
        self.take_line_frame()
    }

    fn take_line_frame(&mut self) -> Option<Message> {
        let newline = self.buf.iter().position(|&b| b == b'\n')?;
        let frame: Vec<u8> = self.buf.drain(..=newline).collect();
        Some(Message::new(classify_line(&frame), frame))
    }

    fn take_ubx_frame(&mut self) -> Option<Message> {
        // sync(2) class(1) id(1) length(2,LE) payload(length) checksum(2)
        if self.buf.len() < 6 {
            return None;
        }
        let payload_len = u16::from_le_bytes([self.buf[4], self.buf[5]]) as usize;
        let total = 6 + payload_len + 2;
        if self.buf.len() < total {
            return None;
        }
        let class = self.buf[2];
        let id = self.buf[3];
        let frame: Vec<u8> = self.buf.drain(..total).collect();
        Some(Message::new(format!("UBX-{class:02X}-{id:02X}"), frame))
    }

    fn take_rtcm3_frame(&mut self) -> Option<Message> {
        // sync(1) length(10 bits across 2 bytes) payload(length) crc(3)
        if self.buf.len() < 3 {
            return None;
        }
        let length = (((self.buf[1] as usize) & 0x03) << 8) | self.buf[2] as usize;
        let total = 3 + length + 3;
        if self.buf.len() < total {
            return None;
        }
        let msg_type = if length >= 2 {
            ((self.buf[3] as u16) << 4) | ((self.buf[4] as u16) >> 4)
        } else {
            0
        };
        let frame: Vec<u8> = self.buf.drain(..total).collect();
        Some(Message::new(format!("RTCM3-{msg_type}"), frame))
    }
}

impl Default for Framer {
    fn default() -> Self {
        Framer::new()
    }
}

/// Classify one newline-terminated text line into a message name.
/// NMEA sentences: `$<talker 2ch><type 3ch>,...` → `NMEA-<talker>-<type>`.
/// u-blox proprietary FP_A/FP_B sentences: `$FP,A,...` / `$FP,B,...`.
fn classify_line(frame: &[u8]) -> String {
    let text = String::from_utf8_lossy(frame);
    let trimmed = text.trim_start_matches(['$', '!']).trim_end();
    if let Some(rest) = trimmed.strip_prefix("FP,A") {
        let _ = rest;
        return "FPA".to_owned();
    }
    if let Some(rest) = trimmed.strip_prefix("FP,B") {
        let _ = rest;
        return "FPB".to_owned();
    }
    let body = trimmed.split(',').next().unwrap_or("");
    if body.len() >= 5 && body.chars().all(|c| c.is_ascii_alphanumeric()) {
        let (talker, sentence) = body.split_at(2);
        return format!("NMEA-{talker}-{sentence}");
    }
    "OTHER".to_owned()
}
