use serde::{Deserialize, Serialize};
use crate::config::DuelingPair;
use crate::counter::SatCounter;

/// A global insertion policy which can win the duel
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Static RRIP, every fill at `P_MAX - 1`
    Srrip,
    /// Bimodal RRIP, fills at `P_MAX` except one in every period at `P_MAX - 1`
    Brrip,
    /// LRU insertion, every fill at `P_MAX`
    Lip,
    /// Bimodal insertion, fills at `P_MAX` except one in every period at 0
    Bip,
}

impl DuelingPair {
    /// The policy favoured while PSEL sits in the upper half of its range
    pub fn policy_a(&self) -> Policy {
        match self {
            DuelingPair::Drrip => Policy::Srrip,
            DuelingPair::Dip => Policy::Bip,
        }
    }

    pub fn policy_b(&self) -> Policy {
        match self {
            DuelingPair::Drrip => Policy::Brrip,
            DuelingPair::Dip => Policy::Lip,
        }
    }
}

/// Whether a set runs a fixed policy or follows the winner
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetRole {
    Leader(Policy),
    Follower,
}

/// Set dueling between the two policies of a `DuelingPair`
///
/// Leader sets always insert under their own policy and vote with their hits; every other set
/// adopts whichever policy PSEL currently favours
#[derive(Debug, Clone)]
pub struct SetDuelingArbiter {
    pair: DuelingPair,
    psel: SatCounter,
    bimodal_period: u32,
    bimodal_fills: u32,
    max_priority: u8,
}

impl SetDuelingArbiter {
    pub fn new(pair: DuelingPair, psel_max: u16, bimodal_period: u32, max_priority: u8) -> Self {
        let psel = SatCounter::new(0, psel_max);
        Self {
            pair,
            psel: SatCounter::new(psel.midpoint(), psel_max),
            bimodal_period,
            bimodal_fills: 0,
            max_priority,
        }
    }

    pub fn reset(&mut self) {
        let midpoint = self.psel.midpoint();
        self.psel.reset(midpoint);
        self.bimodal_fills = 0;
    }

    /// Assigns the fixed role of a set
    ///
    /// Leaders are spread evenly over the index space, alternating between the two policies
    ///
    /// # Arguments
    ///
    /// * `set`: The set index
    /// * `num_sets`: The number of sets in the cache
    /// * `leader_sets`: The total number of leaders, even and at most `num_sets`
    ///
    /// returns: SetRole
    pub fn role_for(&self, set: usize, num_sets: usize, leader_sets: usize) -> SetRole {
        if leader_sets == 0 {
            return SetRole::Follower;
        }
        let stride = num_sets / leader_sets;
        if set % stride != 0 || set / stride >= leader_sets {
            return SetRole::Follower;
        }
        if (set / stride) % 2 == 0 {
            SetRole::Leader(self.pair.policy_a())
        } else {
            SetRole::Leader(self.pair.policy_b())
        }
    }

    pub fn selected_policy(&self, role: SetRole) -> Policy {
        match role {
            SetRole::Leader(policy) => policy,
            SetRole::Follower => self.winner(),
        }
    }

    /// The policy followers currently adopt
    pub fn winner(&self) -> Policy {
        if self.psel.value() >= self.psel.midpoint() {
            self.pair.policy_a()
        } else {
            self.pair.policy_b()
        }
    }

    /// Records a demand hit in a set. Only leaders vote
    pub fn record_hit(&mut self, role: SetRole) {
        let before = self.winner();
        match role {
            SetRole::Leader(policy) if policy == self.pair.policy_a() => self.psel.increment(),
            SetRole::Leader(_) => self.psel.decrement(),
            SetRole::Follower => return,
        }
        let after = self.winner();
        if before != after {
            log::debug!("set dueling winner changed from {before:?} to {after:?}, psel {}", self.psel.value());
        }
    }

    /// The insertion priority `policy` gives to its next fill
    pub fn baseline_priority(&mut self, policy: Policy) -> u8 {
        let max = self.max_priority;
        match policy {
            Policy::Srrip => max.saturating_sub(1),
            Policy::Lip => max,
            Policy::Brrip => if self.bimodal_coin() { max.saturating_sub(1) } else { max },
            Policy::Bip => if self.bimodal_coin() { 0 } else { max },
        }
    }

    /// Deterministic stand-in for a 1-in-period random draw
    fn bimodal_coin(&mut self) -> bool {
        self.bimodal_fills = (self.bimodal_fills + 1) % self.bimodal_period;
        self.bimodal_fills == 0
    }

    pub fn psel(&self) -> u16 {
        self.psel.value()
    }

    pub fn psel_max(&self) -> u16 {
        self.psel.max()
    }
}
