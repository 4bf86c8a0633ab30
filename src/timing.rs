use std::time::Instant;

/// Phase timing switch, copied into every stage that reports durations
#[derive(Debug, Clone, Copy, Default)]
pub struct Timing {
    enabled: bool,
}

impl Timing {
    pub fn new(enabled: bool) -> Self {
        Timing { enabled }
    }

    pub fn disabled() -> Self {
        Timing { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start timing `phase`; the duration is logged when the guard drops
    pub fn phase(&self, phase: &'static str) -> PhaseTimer {
        if self.enabled {
            log::debug!("[TIMESTAMP] {}_START", phase);
        }
        PhaseTimer {
            phase,
            start: self.enabled.then(Instant::now),
        }
    }
}

pub struct PhaseTimer {
    phase: &'static str,
    start: Option<Instant>,
}

impl PhaseTimer {
    /// Seconds elapsed so far, `0.0` when timing is disabled
    pub fn elapsed_secs(&self) -> f64 {
        self.start.map_or(0.0, |s| s.elapsed().as_secs_f64())
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        if self.start.is_some() {
            log::info!("[DURATION] {}: {:.6} seconds", self.phase, self.elapsed_secs());
        }
    }
}
