use crate::counter::SatCounter;

/// Per-set detector for long constant-stride sweeps
///
/// Only the previous block address and the previous delta are kept, so a sweep is recognised by
/// repetition of the same delta rather than by tracking individual addresses. A single outlier only
/// costs one step of confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDetector {
    last_block: Option<u64>,
    last_delta: i64,
    confidence: SatCounter,
}

impl StreamDetector {
    pub fn new(confidence_max: u16) -> Self {
        Self {
            last_block: None,
            last_delta: 0,
            confidence: SatCounter::new(0, confidence_max),
        }
    }

    /// Observes an access to the set
    ///
    /// # Arguments
    ///
    /// * `block`: The block granular address of the access
    pub fn observe(&mut self, block: u64) {
        if let Some(last) = self.last_block {
            let delta = block.wrapping_sub(last) as i64;
            if delta != 0 && delta == self.last_delta {
                self.confidence.increment();
            } else {
                self.confidence.decrement();
            }
            self.last_delta = delta;
        }
        self.last_block = Some(block);
    }

    pub fn is_streaming(&self, threshold: u16) -> bool {
        self.confidence.value() >= threshold
    }

    pub fn confidence(&self) -> u16 {
        self.confidence.value()
    }

    pub fn last_delta(&self) -> i64 {
        self.last_delta
    }
}
