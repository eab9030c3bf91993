//! Protocol-bucketed counters (§3). Written only by the Router, read only
//! by the Status publisher; counters are monotone and advisory, so every
//! field uses `Ordering::Relaxed` and the design accepts cross-field
//! tearing in a snapshot (§5, §9).

use std::sync::atomic::{AtomicU64, Ordering};

use streammux_proto::StatsSnapshot;

use crate::message::{Message, Protocol};

#[derive(Default)]
pub struct Stats {
    n_msgs: AtomicU64,
    s_msgs: AtomicU64,
    n_err: AtomicU64,
    n_filt: AtomicU64,
    s_filt: AtomicU64,
    n_fpa: AtomicU64,
    s_fpa: AtomicU64,
    n_fpb: AtomicU64,
    s_fpb: AtomicU64,
    n_nmea: AtomicU64,
    s_nmea: AtomicU64,
    n_ubx: AtomicU64,
    s_ubx: AtomicU64,
    n_rtcm3: AtomicU64,
    s_rtcm3: AtomicU64,
    n_unib: AtomicU64,
    s_unib: AtomicU64,
    n_novb: AtomicU64,
    s_novb: AtomicU64,
    n_spartn: AtomicU64,
    s_spartn: AtomicU64,
    n_other: AtomicU64,
    s_other: AtomicU64,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    /// Credit a successfully-admitted message: generic totals plus the
    /// matching protocol bucket.
    pub fn update(&self, msg: &Message) {
        let len = msg.len();
        self.n_msgs.fetch_add(1, Ordering::Relaxed);
        self.s_msgs.fetch_add(len, Ordering::Relaxed);
        let (n, s) = match msg.proto {
            Protocol::Fpa => (&self.n_fpa, &self.s_fpa),
            Protocol::Fpb => (&self.n_fpb, &self.s_fpb),
            Protocol::Nmea => (&self.n_nmea, &self.s_nmea),
            Protocol::Ubx => (&self.n_ubx, &self.s_ubx),
            Protocol::Rtcm3 => (&self.n_rtcm3, &self.s_rtcm3),
            Protocol::Unib => (&self.n_unib, &self.s_unib),
            Protocol::Novb => (&self.n_novb, &self.s_novb),
            Protocol::Spartn => (&self.n_spartn, &self.s_spartn),
            Protocol::Other => (&self.n_other, &self.s_other),
        };
        n.fetch_add(1, Ordering::Relaxed);
        s.fetch_add(len, Ordering::Relaxed);
    }

    pub fn inc_err(&self) {
        self.n_err.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_filt(&self, len: u64) {
        self.n_filt.fetch_add(1, Ordering::Relaxed);
        self.s_filt.fetch_add(len, Ordering::Relaxed);
    }

    pub fn n_msgs(&self) -> u64 {
        self.n_msgs.load(Ordering::Relaxed)
    }

    pub fn n_err(&self) -> u64 {
        self.n_err.load(Ordering::Relaxed)
    }

    pub fn n_filt(&self) -> u64 {
        self.n_filt.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            n_msgs: self.n_msgs.load(Ordering::Relaxed),
            s_msgs: self.s_msgs.load(Ordering::Relaxed),
            n_err: self.n_err.load(Ordering::Relaxed),
            n_filt: self.n_filt.load(Ordering::Relaxed),
            s_filt: self.s_filt.load(Ordering::Relaxed),
            n_fpa: self.n_fpa.load(Ordering::Relaxed),
            s_fpa: self.s_fpa.load(Ordering::Relaxed),
            n_fpb: self.n_fpb.load(Ordering::Relaxed),
            s_fpb: self.s_fpb.load(Ordering::Relaxed),
            n_nmea: self.n_nmea.load(Ordering::Relaxed),
            s_nmea: self.s_nmea.load(Ordering::Relaxed),
            n_ubx: self.n_ubx.load(Ordering::Relaxed),
            s_ubx: self.s_ubx.load(Ordering::Relaxed),
            n_rtcm3: self.n_rtcm3.load(Ordering::Relaxed),
            s_rtcm3: self.s_rtcm3.load(Ordering::Relaxed),
            n_unib: self.n_unib.load(Ordering::Relaxed),
            s_unib: self.s_unib.load(Ordering::Relaxed),
            n_novb: self.n_novb.load(Ordering::Relaxed),
            s_novb: self.s_novb.load(Ordering::Relaxed),
            n_spartn: self.n_spartn.load(Ordering::Relaxed),
            s_spartn: self.s_spartn.load(Ordering::Relaxed),
            n_other: self.n_other.load(Ordering::Relaxed),
            s_other: self.s_other.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_credits_generic_and_protocol_bucket() {
        let stats = Stats::new();
        let msg = Message::new("NMEA-GN-GGA", vec![0u8; 10]);
        stats.update(&msg);
        let snap = stats.snapshot();
        assert_eq!(snap.n_msgs, 1);
        assert_eq!(snap.s_msgs, 10);
        assert_eq!(snap.n_nmea, 1);
        assert_eq!(snap.s_nmea, 10);
        assert_eq!(snap.n_ubx, 0);
    }

    #[test]
    fn filter_drop_and_error_only_touch_their_own_counters() {
        let stats = Stats::new();
        stats.inc_filt(5);
        stats.inc_err();
        let snap = stats.snapshot();
        assert_eq!(snap.n_filt, 1);
        assert_eq!(snap.s_filt, 5);
        assert_eq!(snap.n_err, 1);
        assert_eq!(snap.n_msgs, 0);
    }

    #[test]
    fn counters_are_monotonic_across_observations() {
        let stats = Stats::new();
        let msg = Message::new("UBX-NAV-PVT", vec![0u8; 3]);
        let mut last = 0;
        for _ in 0..5 {
            stats.update(&msg);
            let current = stats.n_msgs();
            assert!(current >= last);
            last = current;
        }
    }
}
