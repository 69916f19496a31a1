use crate::config::EngineConfig;
use crate::dead_block::DeadBlockApproximator;
use crate::dueling::{Policy, SetDuelingArbiter, SetRole};
use crate::error::ConfigError;
use crate::replacement_policies::{Access, Block, ReplacementPolicy};
use crate::rrip::{LineState, RripCore};
use crate::ship::{Reuse, ShipPredictor};
use crate::stats::{EngineStats, InsertionCounts, InsertionReason};
use crate::streaming::StreamDetector;

/// Per-set state besides the lines themselves
#[derive(Debug, Clone)]
struct SetState {
    stream: StreamDetector,
    role: SetRole,
}

/// Event counters, kept for the diagnostic reports only
#[derive(Debug, Clone, Default)]
struct Counters {
    accesses: u64,
    hits: u64,
    fills: u64,
    by_priority: Vec<u64>,
    insertions: InsertionCounts,
}

/// The hybrid replacement engine
///
/// An RRIP core decides victims. Insertion priority is decided fresh on every fill, in order of
/// precedence:
///
/// 1. A streaming set filled by a PC with no record of reuse inserts at `P_MAX`
/// 2. A PC whose SHiP signature predicts reuse inserts at 0
/// 3. A way whose previous occupants died unused inserts at the dueling baseline, raised to at
///    least `P_MAX - 1`
/// 4. Otherwise the set's dueling policy (its own if a leader, the current winner if a follower)
///
/// True bypass isn't possible as the harness always fills the returned way, inserting at `P_MAX`
/// is the closest approximation
///
/// All of the state is owned by the engine value, several engines can coexist
#[derive(Debug, Clone)]
pub struct ReplacementEngine {
    config: EngineConfig,
    rrip: RripCore,
    lines: Vec<LineState>,
    sets: Vec<SetState>,
    ship: ShipPredictor,
    dead: DeadBlockApproximator,
    dueling: SetDuelingArbiter,
    counters: Counters,
}

impl ReplacementEngine {
    /// Creates and initialises an engine
    ///
    /// # Arguments
    ///
    /// * `config`: The engine configuration, validated here
    ///
    /// returns: Result<ReplacementEngine, ConfigError>
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_priority = config.max_priority();
        let mut engine = Self {
            rrip: RripCore::new(max_priority),
            lines: Vec::new(),
            sets: Vec::new(),
            ship: ShipPredictor::new(
                config.ship_signature_bits,
                config.ship_counter_max() as u8,
                config.ship_initial as u8,
                config.ship_threshold() as u8,
            ),
            dead: DeadBlockApproximator::new(
                config.dead_counter_max() as u8,
                config.dead_threshold() as u8,
                config.decay_interval,
            ),
            dueling: SetDuelingArbiter::new(config.dueling, config.psel_max(), config.bimodal_period, max_priority),
            counters: Counters::default(),
            config,
        };
        engine.init();
        Ok(engine)
    }

    /// Zeroes every line, set and global structure and reassigns the leader sets
    pub fn init(&mut self) {
        let config = &self.config;
        self.lines = vec![LineState::empty(self.rrip.max_priority()); config.num_sets * config.ways];
        let dueling = &self.dueling;
        self.sets = (0..config.num_sets)
            .map(|set| SetState {
                stream: StreamDetector::new(config.stream_confidence_max),
                role: dueling.role_for(set, config.num_sets, config.leader_sets),
            })
            .collect();
        self.ship.reset();
        self.dead.reset();
        self.dueling.reset();
        self.counters = Counters {
            by_priority: vec![0; self.rrip.max_priority() as usize + 1],
            ..Counters::default()
        };
        log::debug!(
            "initialised {:?} engine: {} sets x {} ways, P_MAX {}, {} leader sets, {} signatures",
            config.dueling,
            config.num_sets,
            config.ways,
            self.rrip.max_priority(),
            config.leader_sets,
            self.ship.entries()
        );
    }

    /// Picks the way to evict from `access.set`
    ///
    /// An invalid way is always taken first, otherwise the RRIP core ages the set until a line
    /// reaches `P_MAX`. Ties go to the lowest way
    pub fn find_victim(&mut self, access: &Access, current_set: &[Block]) -> usize {
        let ways = self.config.ways;
        if let Some(way) = current_set.iter().take(ways).position(|b| !b.valid) {
            return way;
        }
        let base = access.set * ways;
        self.rrip.find_victim(&mut self.lines[base..base + ways])
    }

    /// Observes an access once the harness has resolved its way
    ///
    /// # Arguments
    ///
    /// * `access`: The access
    /// * `way`: The way hit, or the way filled on a miss
    /// * `evicted_address`: The address displaced by the fill, if any
    /// * `hit`: Whether the access hit
    pub fn update(&mut self, access: &Access, way: usize, evicted_address: Option<u64>, hit: bool) {
        self.counters.accesses += 1;
        if access.access_type.is_demand() {
            self.sets[access.set].stream.observe(access.address >> self.config.block_bits);
        }
        let index = access.set * self.config.ways + way;
        if hit {
            self.on_hit(access, index);
        } else {
            self.on_fill(access, index, evicted_address);
        }
    }

    fn on_hit(&mut self, access: &Access, index: usize) {
        self.counters.hits += 1;
        // Writebacks say nothing about the reuse of the line
        if !access.access_type.is_demand() {
            return;
        }
        let line = &mut self.lines[index];
        self.rrip.promote(line);
        self.ship.train_hit(line.signature);
        self.dead.on_hit(line);
        line.reused = true;
        self.dueling.record_hit(self.sets[access.set].role);
    }

    fn on_fill(&mut self, access: &Access, index: usize, evicted_address: Option<u64>) {
        self.counters.fills += 1;
        let line = &mut self.lines[index];
        if line.valid && line.demand && !line.reused {
            self.ship.train_dead(line.signature);
            self.dead.on_dead_eviction(line);
        }

        let (priority, reason) = self.insertion_priority(access, index);
        let signature = self.ship.signature(access.pc);
        let line = &mut self.lines[index];
        self.rrip.fill(line, priority);
        line.signature = signature;
        line.valid = true;
        line.reused = false;
        line.demand = access.access_type.is_demand();

        self.counters.by_priority[line.priority as usize] += 1;
        self.counters.insertions.record(reason);
        log::trace!(
            "cpu {} set {} way {}: fill {:#x} (pc {:#x}, evicted {:?}) at priority {} for {:?}",
            access.cpu,
            access.set,
            index % self.config.ways,
            access.address,
            access.pc,
            evicted_address,
            line.priority,
            reason
        );
        self.dead.note_fill(&mut self.lines);
    }

    /// Decides the insertion priority of a fill into the way at `index`
    ///
    /// Must run after the evicted line has been accounted for, so the dead-block check sees the
    /// way's up to date history
    fn insertion_priority(&mut self, access: &Access, index: usize) -> (u8, InsertionReason) {
        let max = self.rrip.max_priority();
        if !access.access_type.is_demand() {
            return (max, InsertionReason::Writeback);
        }
        let reuse = self.ship.predict(access.pc);
        let set = &self.sets[access.set];
        if reuse == Reuse::Cold && set.stream.is_streaming(self.config.stream_threshold) {
            (max, InsertionReason::StreamingCold)
        } else if reuse == Reuse::Hot {
            (0, InsertionReason::HotSignature)
        } else {
            let policy = self.dueling.selected_policy(set.role);
            let baseline = self.dueling.baseline_priority(policy);
            if self.dead.is_likely_dead(&self.lines[index]) {
                // Not P_MAX: a way pinned there takes every miss and the rest of the set never ages
                (baseline.max(max.saturating_sub(1)), InsertionReason::DeadWay)
            } else {
                (baseline, InsertionReason::Dueling(policy))
            }
        }
    }

    /// End of run diagnostics, also logged at info level
    pub fn report_stats(&self) -> EngineStats {
        let stats = self.snapshot();
        log::info!("replacement engine final statistics\n{stats}");
        stats
    }

    /// Heartbeat diagnostics, also logged at debug level
    pub fn report_periodic_stats(&self) -> EngineStats {
        let stats = self.snapshot();
        log::debug!("replacement engine heartbeat\n{stats}");
        stats
    }

    fn snapshot(&self) -> EngineStats {
        EngineStats {
            num_sets: self.config.num_sets,
            ways: self.config.ways,
            accesses: self.counters.accesses,
            hits: self.counters.hits,
            fills: self.counters.fills,
            psel: self.dueling.psel(),
            psel_max: self.dueling.psel_max(),
            winner: self.dueling.winner(),
            streaming_sets: (0..self.config.num_sets).filter(|set| self.is_streaming(*set)).count(),
            hot_signatures: self.ship.hot_signatures(),
            signature_entries: self.ship.entries(),
            dead_lines: self.lines.iter().filter(|line| self.dead.is_likely_dead(line)).count(),
            decay_sweeps: self.dead.decays(),
            insertions_by_priority: self.counters.by_priority.clone(),
            insertions: self.counters.insertions.clone(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn max_priority(&self) -> u8 {
        self.rrip.max_priority()
    }

    pub fn line(&self, set: usize, way: usize) -> &LineState {
        &self.lines[set * self.config.ways + way]
    }

    /// The metadata of every way in `set`
    pub fn set_lines(&self, set: usize) -> &[LineState] {
        let base = set * self.config.ways;
        &self.lines[base..base + self.config.ways]
    }

    pub fn psel(&self) -> u16 {
        self.dueling.psel()
    }

    pub fn role(&self, set: usize) -> SetRole {
        self.sets[set].role
    }

    pub fn selected_policy(&self, set: usize) -> Policy {
        self.dueling.selected_policy(self.sets[set].role)
    }

    pub fn is_streaming(&self, set: usize) -> bool {
        self.sets[set].stream.is_streaming(self.config.stream_threshold)
    }

    pub fn predict(&self, pc: u64) -> Reuse {
        self.ship.predict(pc)
    }

    pub fn signature(&self, pc: u64) -> u16 {
        self.ship.signature(pc)
    }

    /// The SHiP counter `pc` currently maps to
    pub fn ship_counter(&self, pc: u64) -> u8 {
        self.ship.counter(self.ship.signature(pc))
    }
}

impl ReplacementPolicy for ReplacementEngine {
    fn init(&mut self) {
        ReplacementEngine::init(self);
    }

    fn find_victim(&mut self, access: &Access, current_set: &[Block]) -> usize {
        ReplacementEngine::find_victim(self, access, current_set)
    }

    fn update(&mut self, access: &Access, way: usize, evicted_address: Option<u64>, hit: bool) {
        ReplacementEngine::update(self, access, way, evicted_address, hit);
    }

    fn geometry(&self) -> (usize, usize) {
        (self.config.num_sets, self.config.ways)
    }
}
