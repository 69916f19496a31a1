use std::fmt;
use serde::{Deserialize, Serialize};
use crate::dueling::Policy;

/// Why a fill was given its insertion priority
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertionReason {
    /// The set is streaming and the filling PC has no record of reuse
    StreamingCold,
    /// The filling PC's signature predicts reuse
    HotSignature,
    /// The way's previous occupants died without reuse
    DeadWay,
    /// None of the predictors fired, the set's dueling policy decided
    Dueling(Policy),
    Writeback,
}

/// How many fills each branch of the insertion decision produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionCounts {
    pub streaming_cold: u64,
    pub hot_signature: u64,
    pub dead_way: u64,
    pub dueling: u64,
    pub writeback: u64,
}

impl InsertionCounts {
    pub fn record(&mut self, reason: InsertionReason) {
        let count = match reason {
            InsertionReason::StreamingCold => &mut self.streaming_cold,
            InsertionReason::HotSignature => &mut self.hot_signature,
            InsertionReason::DeadWay => &mut self.dead_way,
            InsertionReason::Dueling(_) => &mut self.dueling,
            InsertionReason::Writeback => &mut self.writeback,
        };
        *count += 1;
    }

    pub fn total(&self) -> u64 {
        self.streaming_cold + self.hot_signature + self.dead_way + self.dueling + self.writeback
    }
}

/// A snapshot of the engine's state, for diagnostics only. Can be serialised to JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub num_sets: usize,
    pub ways: usize,
    pub accesses: u64,
    pub hits: u64,
    pub fills: u64,
    pub psel: u16,
    pub psel_max: u16,
    pub winner: Policy,
    pub streaming_sets: usize,
    pub hot_signatures: usize,
    pub signature_entries: usize,
    pub dead_lines: usize,
    pub decay_sweeps: u64,
    /// Fills per insertion priority, indexed by priority
    pub insertions_by_priority: Vec<u64>,
    pub insertions: InsertionCounts,
}

impl EngineStats {
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }
}

impl fmt::Display for EngineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accesses: {} (hits {}, fills {}, hit rate {:.4})", self.accesses, self.hits, self.fills, self.hit_rate())?;
        writeln!(f, "PSEL: {} / {} (followers use {:?})", self.psel, self.psel_max, self.winner)?;
        writeln!(f, "Streaming sets: {} / {}", self.streaming_sets, self.num_sets)?;
        writeln!(f, "Hot signatures: {} / {}", self.hot_signatures, self.signature_entries)?;
        writeln!(f, "Dead lines: {} / {} ({} decay sweeps)", self.dead_lines, self.num_sets * self.ways, self.decay_sweeps)?;
        write!(
            f,
            "Insertions: streaming {}, hot {}, dead {}, dueling {}, writeback {}, by priority {:?}",
            self.insertions.streaming_cold,
            self.insertions.hot_signature,
            self.insertions.dead_way,
            self.insertions.dueling,
            self.insertions.writeback,
            self.insertions_by_priority
        )
    }
}
