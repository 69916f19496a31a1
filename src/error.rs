use thiserror::Error;

/// Everything that can go wrong while building an engine or a cache from a configuration
///
/// Once constructed, the engine itself has no failure paths: all of its counters saturate and all
/// of its tables are indexed by masked hashes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the engine needs at least one set")]
    ZeroSets,

    #[error("the engine needs at least one way per set")]
    ZeroWays,

    #[error("the cache model needs a power of two set count, got {0}")]
    SetsNotPowerOfTwo(usize),

    #[error("{field} must be between {min} and {max} bits, got {bits}")]
    BitWidth {
        field: &'static str,
        bits: u8,
        min: u8,
        max: u8,
    },

    #[error("{field} threshold {threshold} is outside the counter range 0..={max}")]
    Threshold {
        field: &'static str,
        threshold: u16,
        max: u16,
    },

    #[error("the policy was built for {policy_sets} sets x {policy_ways} ways but the cache has {num_sets} x {ways}")]
    GeometryMismatch {
        policy_sets: usize,
        policy_ways: usize,
        num_sets: usize,
        ways: usize,
    },

    #[error("leader sets must split evenly between the two dueling policies, got {0}")]
    OddLeaderSets(usize),

    #[error("{leaders} leader sets requested but the cache only has {sets} sets")]
    TooManyLeaderSets { leaders: usize, sets: usize },

    #[error("{0} must be non-zero")]
    ZeroInterval(&'static str),

    #[error("unknown access type code {0}")]
    AccessType(u32),

    #[error("couldn't parse the engine configuration: {0}")]
    Json(#[from] serde_json::Error),
}
