use crate::counter::Saturating;

/// The outcome predicted for a line from the instruction that fills it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reuse {
    Hot,
    Cold,
}

/// SHiP-lite: a global table of reuse counters indexed by a hash of the filling PC
///
/// Distinct PCs sharing a signature share a counter; that aliasing is accepted. The table is never
/// cleared except by re-initialising the engine
#[derive(Debug, Clone)]
pub struct ShipPredictor {
    table: Vec<u8>,
    mask: u64,
    counter_max: u8,
    threshold: u8,
    initial: u8,
}

impl ShipPredictor {
    /// # Arguments
    ///
    /// * `signature_bits`: log2 of the number of table entries
    /// * `counter_max`: Saturation value of each entry
    /// * `initial`: Value every entry starts at
    /// * `threshold`: Entries at or above this predict `Reuse::Hot`
    pub fn new(signature_bits: u8, counter_max: u8, initial: u8, threshold: u8) -> Self {
        let entries = 1usize << signature_bits;
        Self {
            table: vec![initial; entries],
            mask: (entries - 1) as u64,
            counter_max,
            threshold,
            initial,
        }
    }

    pub fn reset(&mut self) {
        self.table.fill(self.initial);
    }

    /// Folds the PC onto the table's index space
    #[inline]
    pub fn signature(&self, pc: u64) -> u16 {
        ((pc ^ (pc >> 7)) & self.mask) as u16
    }

    pub fn predict(&self, pc: u64) -> Reuse {
        self.predict_signature(self.signature(pc))
    }

    pub fn predict_signature(&self, signature: u16) -> Reuse {
        if self.counter(signature) >= self.threshold {
            Reuse::Hot
        } else {
            Reuse::Cold
        }
    }

    /// A line filled under `signature` was hit
    #[inline]
    pub fn train_hit(&mut self, signature: u16) {
        let max = self.counter_max;
        self.table[signature as usize & self.mask as usize].sat_inc(max);
    }

    /// A line filled under `signature` was evicted without being hit
    #[inline]
    pub fn train_dead(&mut self, signature: u16) {
        self.table[signature as usize & self.mask as usize].sat_dec();
    }

    pub fn counter(&self, signature: u16) -> u8 {
        self.table[signature as usize & self.mask as usize]
    }

    /// Number of signatures currently predicting reuse
    pub fn hot_signatures(&self) -> usize {
        self.table.iter().filter(|c| **c >= self.threshold).count()
    }

    pub fn entries(&self) -> usize {
        self.table.len()
    }
}
