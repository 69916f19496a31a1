use crate::cache::Cache;
use crate::replacement_policies::{AccessType, ReplacementPolicy};

/// One access of a synthetic trace
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub pc: u64,
    pub address: u64,
    pub access_type: AccessType,
}

impl TraceRecord {
    pub fn load(pc: u64, address: u64) -> Self {
        Self { pc, address, access_type: AccessType::Load }
    }
}

/// Hit and miss totals of one replay
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReplayResult {
    pub hits: u64,
    pub misses: u64,
}

impl ReplayResult {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Byte address of the `n`th block mapping to `set`, in a cache of `num_sets` sets
pub fn block_in_set(n: u64, set: u64, num_sets: u64, block_bits: u8) -> u64 {
    (n * num_sets + set) << block_bits
}

/// A sequential sweep over `blocks` distinct blocks of one set, never revisiting any of them
pub fn scan(pc: u64, set: u64, num_sets: u64, block_bits: u8, blocks: u64) -> Vec<TraceRecord> {
    (0..blocks)
        .map(|n| TraceRecord::load(pc, block_in_set(n, set, num_sets, block_bits)))
        .collect()
}

/// `iterations` passes over the same `working_set` blocks of one set, all from one PC
pub fn hot_loop(pc: u64, set: u64, num_sets: u64, block_bits: u8, working_set: u64, iterations: u64) -> Vec<TraceRecord> {
    (0..iterations)
        .flat_map(|_| 0..working_set)
        .map(|n| TraceRecord::load(pc, block_in_set(n, set, num_sets, block_bits)))
        .collect()
}

/// Distinct blocks of one set with an ever growing gap between them
///
/// No block is touched twice and no two consecutive deltas match, so every fill is dead on arrival
/// without the set looking like a stream
pub fn dead_on_arrival(pc: u64, set: u64, num_sets: u64, block_bits: u8, blocks: u64) -> Vec<TraceRecord> {
    (0..blocks)
        .map(|n| TraceRecord::load(pc, block_in_set(n * n, set, num_sets, block_bits)))
        .collect()
}

/// A hot loop from one PC interleaved with a long scan from another, across the whole cache
///
/// After every pass over the loop, `scan_per_pass` fresh blocks are streamed through
pub fn mixed(loop_pc: u64, scan_pc: u64, block_bits: u8, loop_blocks: u64, scan_per_pass: u64, passes: u64) -> Vec<TraceRecord> {
    let mut trace = Vec::with_capacity(((loop_blocks + scan_per_pass) * passes) as usize);
    let mut next_scan = loop_blocks;
    for _ in 0..passes {
        trace.extend((0..loop_blocks).map(|b| TraceRecord::load(loop_pc, b << block_bits)));
        trace.extend((next_scan..next_scan + scan_per_pass).map(|b| TraceRecord::load(scan_pc, b << block_bits)));
        next_scan += scan_per_pass;
    }
    trace
}

/// Replays a trace through a cache, returning the hits and misses of this replay only
pub fn replay<R: ReplacementPolicy>(cache: &mut Cache<R>, trace: &[TraceRecord]) -> ReplayResult {
    let mut result = ReplayResult::default();
    for record in trace {
        if cache.access(0, record.pc, record.address, record.access_type) {
            result.hits += 1;
        } else {
            result.misses += 1;
        }
    }
    result
}
