//! # RRIPLib
//!
//! RRIPLib is the decision engine of a hardware cache's replacement policy
//!
//! Given the stream of accesses a simulator observes (set, way, PC, address, hit or miss), it
//! chooses which way of a full set to evict and how strongly to protect each newly inserted line,
//! using only a few bits of metadata per line and per set. It combines a re-reference interval
//! (RRIP) core with set dueling between two global insertion policies, a SHiP-lite per-PC reuse
//! predictor, a per-set streaming detector and a per-line dead-block approximation
//!
//! The simulator itself is not part of this library. A minimal tag store, `cache::Cache`, is
//! provided to drive any `ReplacementPolicy` over synthetic traces

/// Contains a minimal set-associative tag store which drives a replacement policy
pub mod cache;

/// Contains the engine configuration, which can be read from JSON
pub mod config;

/// Contains the clamped counter primitives used for all replacement metadata
pub mod counter;

/// Contains the per-line dead-block approximation
pub mod dead_block;

/// Contains the set-dueling arbiter and the global insertion policies it chooses between
pub mod dueling;

/// Contains the hybrid replacement engine, the type a simulator talks to
pub mod engine;

/// Contains the configuration error type
pub mod error;

/// Contains the replacement policy trait the cache is parameterised by, and a plain SRRIP policy
pub mod replacement_policies;

/// Contains the RRIP victim selection core and the per-line metadata
pub mod rrip;

/// Contains the SHiP-lite signature predictor
pub mod ship;

/// Contains the diagnostic statistics reported by the engine
pub mod stats;

/// Contains the per-set streaming detector
pub mod streaming;

#[cfg(test)]
mod test;

/// Contains synthetic traces and replay helpers for tests and benchmarks
pub mod util;

pub use config::EngineConfig;
pub use engine::ReplacementEngine;
pub use error::ConfigError;
