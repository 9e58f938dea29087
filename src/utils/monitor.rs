#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

/// Per-phase resource logging for `--monitor`.
#[cfg(feature = "cli")]
pub struct BuildMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    last_mark: Mutex<Instant>,
    peak_memory: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl BuildMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Monitoring disabled, cannot resolve PID: {}", e))
                .ok()
        } else {
            None
        };

        let system = if pid.is_some() {
            System::new_all()
        } else {
            System::new()
        };

        let now = Instant::now();
        Self {
            system: Mutex::new(system),
            pid,
            start_time: now,
            last_mark: Mutex::new(now),
            peak_memory: Mutex::new(0),
            enabled: enabled && pid.is_some(),
        }
    }

    /// Samples the process and resets the phase clock.
    pub fn mark(&self, phase: &str) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        let process = system.process(self.pid?)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        let mut last = self.last_mark.lock().ok()?;
        let phase_time = last.elapsed();
        *last = Instant::now();

        Some(PhaseStats {
            phase: phase.to_string(),
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: *peak,
            phase_time,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(stats) = self.mark(phase) {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Phase: {:?}, Total: {:?}",
                stats.phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.phase_time,
                stats.elapsed_time
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境只保留計時
#[cfg(not(feature = "cli"))]
pub struct BuildMonitor {
    start_time: Instant,
}

#[cfg(not(feature = "cli"))]
impl BuildMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn mark(&self, _phase: &str) -> Option<PhaseStats> {
        None
    }

    pub fn log_phase(&self, phase: &str) {
        tracing::debug!("{} finished after {:?}", phase, self.start_time.elapsed());
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl Default for BuildMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
