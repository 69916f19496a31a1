use crate::error::ConfigError;
use crate::rrip::{LineState, RripCore};

/// The kind of request behind an access. Trace codes 0 to 3 follow declaration order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AccessType {
    Load,
    /// Read for ownership, i.e. a store miss
    Rfo,
    Prefetch,
    /// A dirty line written back from an upper level; carries no meaningful PC
    Writeback,
}

impl AccessType {
    pub fn is_demand(&self) -> bool {
        !matches!(self, AccessType::Writeback)
    }
}

impl TryFrom<u32> for AccessType {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccessType::Load),
            1 => Ok(AccessType::Rfo),
            2 => Ok(AccessType::Prefetch),
            3 => Ok(AccessType::Writeback),
            other => Err(ConfigError::AccessType(other)),
        }
    }
}

/// One access as seen by the replacement policy
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Access {
    pub cpu: u32,
    pub set: usize,
    pub pc: u64,
    /// Physical byte address
    pub address: u64,
    pub access_type: AccessType,
}

/// The harness' view of one way, as passed to victim selection
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub valid: bool,
    pub address: u64,
}

/// A generic trait for implementing replacement policies. Can be used to parameterise a Cache.
///
/// The harness calls `find_victim` when a miss needs a way, then `update` exactly once for every
/// access, hit or miss, after it has resolved which way was used
pub trait ReplacementPolicy {
    /// Clears all learned state, as before the first access
    fn init(&mut self);

    /// Chooses the way to evict for a fill into `access.set`
    ///
    /// Implementations must not assume a fill follows
    ///
    /// # Arguments
    ///
    /// * `access`: The access which missed
    /// * `current_set`: The harness' blocks of the set, one per way
    ///
    /// returns: usize, the victim way
    fn find_victim(&mut self, access: &Access, current_set: &[Block]) -> usize;

    /// Observes the outcome of an access
    ///
    /// # Arguments
    ///
    /// * `access`: The access
    /// * `way`: The way which hit, or which was filled on a miss
    /// * `evicted_address`: The address of the line the fill displaced, if there was one
    /// * `hit`: Whether the access hit
    fn update(&mut self, access: &Access, way: usize, evicted_address: Option<u64>, hit: bool);

    /// The number of sets and ways the policy's metadata was sized for
    fn geometry(&self) -> (usize, usize);
}

/// Plain static RRIP: hits promote to 0, every fill goes in at `P_MAX - 1`
///
/// Shares the RRIP core with the full engine, which makes it a useful baseline to compare against
pub struct Srrip {
    core: RripCore,
    lines: Vec<LineState>,
    num_sets: usize,
    ways: usize,
}

impl Srrip {
    pub fn new(num_sets: usize, ways: usize, priority_bits: u8) -> Self {
        let core = RripCore::new(crate::counter::max_for_bits(priority_bits) as u8);
        Self {
            lines: vec![LineState::empty(core.max_priority()); num_sets * ways],
            core,
            num_sets,
            ways,
        }
    }

    fn set_mut(&mut self, set: usize) -> &mut [LineState] {
        let base = set * self.ways;
        &mut self.lines[base..base + self.ways]
    }

    pub fn priority(&self, set: usize, way: usize) -> u8 {
        self.lines[set * self.ways + way].priority
    }
}

impl ReplacementPolicy for Srrip {
    fn init(&mut self) {
        self.lines.fill(LineState::empty(self.core.max_priority()));
    }

    fn find_victim(&mut self, access: &Access, current_set: &[Block]) -> usize {
        if let Some(way) = current_set.iter().position(|b| !b.valid) {
            return way;
        }
        let core = self.core;
        core.find_victim(self.set_mut(access.set))
    }

    fn update(&mut self, access: &Access, way: usize, _evicted_address: Option<u64>, hit: bool) {
        let core = self.core;
        let line = &mut self.set_mut(access.set)[way];
        if hit {
            core.promote(line);
        } else {
            core.fill(line, core.max_priority().saturating_sub(1));
            line.valid = true;
        }
    }

    fn geometry(&self) -> (usize, usize) {
        (self.num_sets, self.ways)
    }
}
