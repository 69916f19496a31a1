use crate::error::ConfigError;
use crate::replacement_policies::{Access, AccessType, Block, ReplacementPolicy};

/// A generic set-associative tag store, parameterised by a replacement policy
///
/// This is the smallest harness which drives a policy the way a simulator does: on every access it
/// matches tags, asks the policy for a victim on a miss, fills it, and reports the outcome back
/// through `update`. There is no timing model and no next level
pub struct Cache<R: ReplacementPolicy> {
    blocks: Vec<Block>,
    policy: R,
    num_sets: usize,
    ways: usize,
    block_bits: u8,
    set_mask: u64,
    hits: u64,
    misses: u64,
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Creates a cache
    ///
    /// # Arguments
    ///
    /// * `num_sets`: The number of sets, a power of two
    /// * `ways`: The associativity
    /// * `block_bits`: log2 of the line size
    /// * `policy`: The replacement policy, sized for exactly `num_sets` and `ways`
    ///
    /// returns: Result<Cache<R>, ConfigError>
    pub fn new(num_sets: usize, ways: usize, block_bits: u8, policy: R) -> Result<Self, ConfigError> {
        if num_sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo(num_sets));
        }
        if ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        let (policy_sets, policy_ways) = policy.geometry();
        if (policy_sets, policy_ways) != (num_sets, ways) {
            return Err(ConfigError::GeometryMismatch { policy_sets, policy_ways, num_sets, ways });
        }
        Ok(Self {
            blocks: vec![Block::default(); num_sets * ways],
            policy,
            num_sets,
            ways,
            block_bits,
            set_mask: (num_sets - 1) as u64,
            hits: 0,
            misses: 0,
        })
    }

    /// Converts an address into its block address and set index
    pub fn address_to_block_and_set(&self, address: u64) -> (u64, usize) {
        let block = address >> self.block_bits;
        (block, (block & self.set_mask) as usize)
    }

    /// Performs one access, returning true on a cache hit, and false otherwise
    ///
    /// On a miss the victim is always filled, this cache never bypasses
    ///
    /// # Arguments
    ///
    /// * `cpu`: The issuing core
    /// * `pc`: The instruction pointer of the access
    /// * `address`: The physical byte address
    /// * `access_type`: The kind of request
    ///
    /// returns: bool
    pub fn access(&mut self, cpu: u32, pc: u64, address: u64, access_type: AccessType) -> bool {
        let (block, set) = self.address_to_block_and_set(address);
        let access = Access { cpu, set, pc, address, access_type };
        let base = set * self.ways;
        let lines = &self.blocks[base..base + self.ways];
        if let Some(way) = lines.iter().position(|b| b.valid && b.address == block) {
            self.hits += 1;
            self.policy.update(&access, way, None, true);
            return true;
        }

        self.misses += 1;
        let way = self.policy.find_victim(&access, lines);
        debug_assert!(way < self.ways, "policy returned way {way} of {}", self.ways);
        let victim = &mut self.blocks[base + way];
        let evicted = victim.valid.then_some(victim.address << self.block_bits);
        *victim = Block { valid: true, address: block };
        self.policy.update(&access, way, evicted, false);
        false
    }

    /// Whether the line holding `address` is currently resident
    pub fn contains(&self, address: u64) -> bool {
        let (block, set) = self.address_to_block_and_set(address);
        let base = set * self.ways;
        self.blocks[base..base + self.ways].iter().any(|b| b.valid && b.address == block)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn ways(&self) -> usize {
        self.ways
    }

    pub fn policy(&self) -> &R {
        &self.policy
    }

    /// Empties the cache and re-initialises the policy
    pub fn reset(&mut self) {
        self.blocks.fill(Block::default());
        self.hits = 0;
        self.misses = 0;
        self.policy.init();
    }
}
