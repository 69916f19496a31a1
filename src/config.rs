use serde::{Deserialize, Serialize};
use crate::counter::max_for_bits;
use crate::error::ConfigError;

/// The configuration of a replacement engine
///
/// Every field has a default, so a JSON document only needs to name what it overrides:
///
/// ```
/// use rriplib::config::{DuelingPair, EngineConfig};
/// let config = EngineConfig::from_json(r#"{ "num_sets": 64, "ways": 8, "dueling": "dip" }"#).unwrap();
/// assert_eq!(config.ways, 8);
/// assert_eq!(config.dueling, DuelingPair::Dip);
/// assert_eq!(config.psel_bits, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub num_sets: usize,
    pub ways: usize,
    /// log2 of the line size, the streaming detector works on `address >> block_bits`
    pub block_bits: u8,
    /// Width of the per-line retention priority. `P_MAX` is `2^priority_bits - 1`
    pub priority_bits: u8,
    pub psel_bits: u8,
    /// Total leader sets, half for each policy of the dueling pair. Zero disables dueling
    pub leader_sets: usize,
    pub dueling: DuelingPair,
    /// A bimodal policy takes its alternate insertion once every `bimodal_period` of its fills
    pub bimodal_period: u32,
    pub ship_signature_bits: u8,
    pub ship_counter_bits: u8,
    pub ship_initial: u16,
    /// Defaults to the midpoint of the SHiP counter range
    pub ship_threshold: Option<u16>,
    pub stream_confidence_max: u16,
    pub stream_threshold: u16,
    pub dead_counter_bits: u8,
    /// Defaults to the saturation value of the dead counter
    pub dead_threshold: Option<u16>,
    /// Number of fills, across the whole cache, between two dead-counter decay sweeps
    pub decay_interval: u64,
}

/// The two global insertion policies competing through set dueling
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelingPair {
    /// SRRIP (policy A) against BRRIP (policy B)
    #[default]
    #[serde(alias = "drrip")]
    Drrip,
    /// BIP (policy A) against LIP (policy B)
    #[serde(alias = "dip")]
    Dip,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_sets: 2048,
            ways: 16,
            block_bits: 6,
            priority_bits: 2,
            psel_bits: 10,
            leader_sets: 64,
            dueling: DuelingPair::default(),
            bimodal_period: 32,
            ship_signature_bits: 6,
            ship_counter_bits: 2,
            ship_initial: 1,
            ship_threshold: None,
            stream_confidence_max: 3,
            stream_threshold: 2,
            dead_counter_bits: 2,
            dead_threshold: None,
            decay_interval: 4096,
        }
    }
}

impl EngineConfig {
    /// A default configuration with a different geometry
    ///
    /// The leader count is capped to what the geometry can hold, so small test caches stay valid
    ///
    /// # Arguments
    ///
    /// * `num_sets`: The number of sets
    /// * `ways`: The associativity
    ///
    /// returns: EngineConfig
    pub fn with_geometry(num_sets: usize, ways: usize) -> Self {
        let defaults = Self::default();
        Self {
            num_sets,
            ways,
            leader_sets: defaults.leader_sets.min(num_sets / 2 * 2),
            ..defaults
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn max_priority(&self) -> u8 {
        max_for_bits(self.priority_bits) as u8
    }

    pub fn psel_max(&self) -> u16 {
        max_for_bits(self.psel_bits)
    }

    pub fn ship_counter_max(&self) -> u16 {
        max_for_bits(self.ship_counter_bits)
    }

    pub fn ship_threshold(&self) -> u16 {
        self.ship_threshold.unwrap_or((self.ship_counter_max() + 1) / 2)
    }

    pub fn dead_counter_max(&self) -> u16 {
        max_for_bits(self.dead_counter_bits)
    }

    pub fn dead_threshold(&self) -> u16 {
        self.dead_threshold.unwrap_or(self.dead_counter_max())
    }

    /// Checks the configuration describes an engine whose counters all fit their storage
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if self.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        check_bits("block_bits", self.block_bits, 0, 16)?;
        check_bits("priority_bits", self.priority_bits, 1, 7)?;
        check_bits("psel_bits", self.psel_bits, 1, 16)?;
        check_bits("ship_signature_bits", self.ship_signature_bits, 1, 16)?;
        check_bits("ship_counter_bits", self.ship_counter_bits, 1, 7)?;
        check_bits("dead_counter_bits", self.dead_counter_bits, 1, 7)?;
        if self.leader_sets % 2 != 0 {
            return Err(ConfigError::OddLeaderSets(self.leader_sets));
        }
        if self.leader_sets > self.num_sets {
            return Err(ConfigError::TooManyLeaderSets { leaders: self.leader_sets, sets: self.num_sets });
        }
        if self.bimodal_period == 0 {
            return Err(ConfigError::ZeroInterval("bimodal_period"));
        }
        if self.decay_interval == 0 {
            return Err(ConfigError::ZeroInterval("decay_interval"));
        }
        check_threshold("ship_initial", self.ship_initial, self.ship_counter_max())?;
        check_threshold("ship", self.ship_threshold(), self.ship_counter_max())?;
        check_threshold("stream", self.stream_threshold, self.stream_confidence_max)?;
        check_threshold("dead", self.dead_threshold(), self.dead_counter_max())?;
        Ok(())
    }
}

fn check_bits(field: &'static str, bits: u8, min: u8, max: u8) -> Result<(), ConfigError> {
    if bits < min || bits > max {
        Err(ConfigError::BitWidth { field, bits, min, max })
    } else {
        Ok(())
    }
}

fn check_threshold(field: &'static str, threshold: u16, max: u16) -> Result<(), ConfigError> {
    if threshold > max {
        Err(ConfigError::Threshold { field, threshold, max })
    } else {
        Ok(())
    }
}
