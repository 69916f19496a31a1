use crate::counter::Saturating;

/// Replacement metadata for one way of one set
///
/// The priority belongs to the current occupant. The dead counter belongs to the way: it survives a
/// refill, and so describes how the previous occupants of this way fared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    /// Re-reference priority, 0 is kept longest and `P_MAX` is evicted first
    pub priority: u8,
    /// SHiP signature of the instruction which filled the current occupant
    pub signature: u16,
    /// Dead evictions seen in this way since its last hit, saturating
    pub dead_counter: u8,
    /// The way has held a line since the engine was initialised
    pub valid: bool,
    /// The current occupant has been hit since it was filled
    pub reused: bool,
    /// The current occupant was filled by a demand access, so its eviction can train the predictors
    pub demand: bool,
}

impl LineState {
    /// An empty way, already at the most evictable priority
    pub fn empty(max_priority: u8) -> Self {
        Self {
            priority: max_priority,
            signature: 0,
            dead_counter: 0,
            valid: false,
            reused: false,
            demand: false,
        }
    }
}

/// The re-reference interval prediction core
///
/// Holds no state of its own beyond the priority range; it operates on the lines of one set at a
/// time, as handed to it by the owner of the metadata
#[derive(Debug, Clone, Copy)]
pub struct RripCore {
    max_priority: u8,
}

impl RripCore {
    pub fn new(max_priority: u8) -> Self {
        Self { max_priority }
    }

    pub fn max_priority(&self) -> u8 {
        self.max_priority
    }

    /// Finds the first way at `P_MAX`, ageing the whole set until one exists
    ///
    /// Each ageing pass raises the highest priority in the set by one, so at most `P_MAX` passes
    /// age the set and the scan after the last of them always succeeds
    ///
    /// # Arguments
    ///
    /// * `set`: The metadata of every way of the set. Must not be empty
    ///
    /// returns: usize, the victim way
    pub fn find_victim(&self, set: &mut [LineState]) -> usize {
        debug_assert!(!set.is_empty(), "victim search over an empty set");
        for _ in 0..self.max_priority {
            if let Some(way) = self.first_at_max(set) {
                return way;
            }
            for line in set.iter_mut() {
                line.priority.sat_inc(self.max_priority);
            }
        }
        self.first_at_max(set).unwrap_or(0)
    }

    #[inline]
    fn first_at_max(&self, set: &[LineState]) -> Option<usize> {
        set.iter().position(|line| line.priority >= self.max_priority)
    }

    /// A hit, the line is now expected to be re-referenced soonest
    #[inline]
    pub fn promote(&self, line: &mut LineState) {
        line.priority = 0;
    }

    /// Writes the insertion priority chosen for a newly filled line
    #[inline]
    pub fn fill(&self, line: &mut LineState, priority: u8) {
        line.priority = priority.min(self.max_priority);
    }
}
