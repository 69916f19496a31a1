use crate::counter::Saturating;
use crate::rrip::LineState;

/// Dead-block approximation from a small counter kept in every way
///
/// Evictions of lines that were never hit push a way's counter towards dead, hits reset it. So that
/// a classification made in one phase of the workload doesn't outlive it, every counter in the
/// cache is decayed by one step once per `decay_interval` fills
#[derive(Debug, Clone)]
pub struct DeadBlockApproximator {
    counter_max: u8,
    threshold: u8,
    decay_interval: u64,
    fills_since_decay: u64,
    decays: u64,
}

impl DeadBlockApproximator {
    pub fn new(counter_max: u8, threshold: u8, decay_interval: u64) -> Self {
        Self {
            counter_max,
            threshold,
            decay_interval,
            fills_since_decay: 0,
            decays: 0,
        }
    }

    pub fn reset(&mut self) {
        self.fills_since_decay = 0;
        self.decays = 0;
    }

    #[inline]
    pub fn is_likely_dead(&self, line: &LineState) -> bool {
        line.dead_counter >= self.threshold
    }

    #[inline]
    pub fn on_hit(&self, line: &mut LineState) {
        line.dead_counter = 0;
    }

    /// The occupant of this way is being evicted and was never hit
    #[inline]
    pub fn on_dead_eviction(&self, line: &mut LineState) {
        line.dead_counter.sat_inc(self.counter_max);
    }

    /// Counts a fill, running the decay sweep when the interval has elapsed
    ///
    /// # Arguments
    ///
    /// * `lines`: The metadata of the whole cache
    ///
    /// returns: bool, whether a sweep ran
    pub fn note_fill(&mut self, lines: &mut [LineState]) -> bool {
        self.fills_since_decay += 1;
        if self.fills_since_decay < self.decay_interval {
            return false;
        }
        self.fills_since_decay = 0;
        self.decays += 1;
        for line in lines.iter_mut() {
            line.dead_counter.sat_dec();
        }
        log::debug!("dead-block decay sweep {} over {} lines", self.decays, lines.len());
        true
    }

    /// How many decay sweeps have run since the last reset
    pub fn decays(&self) -> u64 {
        self.decays
    }
}
