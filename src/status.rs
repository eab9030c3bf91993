//! The status publisher (§4.4): a 1-Hz task that samples process stats,
//! snapshots every Stream/Mux, pushes the result to anyone watching (the
//! Control API's `/status` and `/ws`), and — when configured — writes it to
//! a report file by atomic tmp+rename.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use streammux_proto::{MuxSnapshot, ProcSnapshot, StatusSnapshot, StreamSnapshot};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::watch;

use crate::supervisor::Supervisor;

const TICK: Duration = Duration::from_secs(1);

pub struct StatusPublisher {
    supervisor: Arc<Supervisor>,
    report_path: Mutex<Option<PathBuf>>,
    report_disabled: AtomicBool,
    started_at: Instant,
    tx: watch::Sender<StatusSnapshot>,
}

impl StatusPublisher {
    pub fn new(supervisor: Arc<Supervisor>, report_path: Option<PathBuf>) -> (Arc<Self>, watch::Receiver<StatusSnapshot>) {
        let (tx, rx) = watch::channel(StatusSnapshot::empty(empty_proc_snapshot()));
        let publisher = Arc::new(StatusPublisher {
            supervisor,
            report_path: Mutex::new(report_path),
            report_disabled: AtomicBool::new(false),
            started_at: Instant::now(),
            tx,
        });
        (publisher, rx)
    }

    pub async fn run(self: Arc<Self>) {
        let pid = Pid::from_u32(std::process::id());
        let mut sys = System::new_all();
        let mut cpu_peak: f32 = 0.0;
        let mut cpu_sum: f64 = 0.0;
        let mut cpu_samples: u64 = 0;
        let mut mem_peak: u64 = 0;

        let mut interval = tokio::time::interval(TICK);
        loop {
            interval.tick().await;
            sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

            let (mem_curr, cpu_curr) = match sys.process(pid) {
                Some(p) => (p.memory(), p.cpu_usage()),
                None => (0, 0.0),
            };
            mem_peak = mem_peak.max(mem_curr);
            cpu_peak = cpu_peak.max(cpu_curr);
            cpu_sum += cpu_curr as f64;
            cpu_samples += 1;
            let cpu_avg = if cpu_samples > 0 { (cpu_sum / cpu_samples as f64) as f32 } else { 0.0 };

            let proc = ProcSnapshot {
                time: chrono::Local::now().format("%H:%M:%S%.1f").to_string(),
                mem_curr,
                mem_peak,
                cpu_curr,
                cpu_avg,
                cpu_peak,
                uptime: self.started_at.elapsed().as_secs(),
                pid: std::process::id(),
            };

            let snapshot = self.build_snapshot(proc);
            let _ = self.tx.send(snapshot.clone());
            self.write_report(&snapshot).await;
        }
    }

    fn build_snapshot(&self, proc: ProcSnapshot) -> StatusSnapshot {
        let strs = self
            .supervisor
            .streams
            .iter()
            .map(|s| StreamSnapshot {
                name: s.name.clone(),
                kind: s.transport.kind().as_str().to_owned(),
                mode: s.mode.as_str().to_owned(),
                state: s.state().as_str().to_owned(),
                statestrs: s.history.snapshot(),
                error: s.transport.last_error(),
                info: s.transport.info(),
                disp: s.disp.clone(),
                opts: s.opts.clone(),
                filter: (s.filter_read.to_spec_string(), s.filter_write.to_spec_string()),
                stats: (s.stats_read.snapshot(), s.stats_write.snapshot()),
                can: (s.can_read(), s.can_write()),
                ena: (s.ena_read(), s.ena_write()),
            })
            .collect();

        let muxs = self
            .supervisor
            .muxes
            .iter()
            .map(|m| MuxSnapshot {
                name: m.name.clone(),
                can: (m.can_fwd, m.can_rev),
                ena: (m.ena_fwd(), m.ena_rev()),
                src: m.src.name.clone(),
                dst: m.dst.name.clone(),
                filter: (m.filter_fwd.to_spec_string(), m.filter_rev.to_spec_string()),
                stats: (m.stats_fwd.snapshot(), m.stats_rev.snapshot()),
            })
            .collect();

        StatusSnapshot {
            api: "status".to_owned(),
            proc,
            strs,
            muxs,
        }
    }

    async fn write_report(&self, snapshot: &StatusSnapshot) {
        if self.report_disabled.load(Ordering::Relaxed) {
            return;
        }
        let path = { self.report_path.lock().expect("report path lock poisoned").clone() };
        let Some(path) = path else { return };

        let json = match serde_json::to_vec_pretty(snapshot) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize status report");
                return;
            }
        };

        let tmp_path = path.with_extension("tmp");
        if let Err(e) = tokio::fs::write(&tmp_path, json).await {
            self.disable_report(&path, &e).await;
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            self.disable_report(&path, &e).await;
        }
    }

    async fn disable_report(&self, path: &std::path::Path, err: &std::io::Error) {
        tracing::warn!(error = %err, path = %path.display(), "status report write failed, disabling report file for the rest of this process");
        let _ = tokio::fs::remove_file(path).await;
        self.report_disabled.store(true, Ordering::Relaxed);
        *self.report_path.lock().expect("report path lock poisoned") = None;
    }
}

fn empty_proc_snapshot() -> ProcSnapshot {
    ProcSnapshot {
        time: String::new(),
        mem_curr: 0,
        mem_peak: 0,
        cpu_curr: 0.0,
        cpu_avg: 0.0,
        cpu_peak: 0.0,
        uptime: 0,
        pid: std::process::id(),
    }
}
