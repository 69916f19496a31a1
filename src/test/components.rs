use crate::config::DuelingPair;
use crate::counter::{max_for_bits, SatCounter, Saturating};
use crate::dead_block::DeadBlockApproximator;
use crate::dueling::{Policy, SetDuelingArbiter, SetRole};
use crate::rrip::{LineState, RripCore};
use crate::ship::{Reuse, ShipPredictor};
use crate::streaming::StreamDetector;

fn lines_with(priorities: &[u8]) -> Vec<LineState> {
    priorities
        .iter()
        .map(|p| LineState { priority: *p, valid: true, ..LineState::empty(3) })
        .collect()
}

// Counters

#[test]
fn saturating_increment_holds_at_max() {
    let mut v: u8 = 2;
    v.sat_inc(3);
    assert_eq!(v, 3);
    v.sat_inc(3);
    assert_eq!(v, 3);
}

#[test]
fn saturating_decrement_holds_at_zero() {
    let mut v: u16 = 1;
    v.sat_dec();
    v.sat_dec();
    assert_eq!(v, 0);
}

#[test]
fn saturating_increment_pulls_an_out_of_band_value_back() {
    let mut v: u8 = 9;
    v.sat_inc(3);
    assert_eq!(v, 3);
}

#[test]
fn counter_bounds_follow_bit_widths() {
    assert_eq!(max_for_bits(2), 3);
    assert_eq!(max_for_bits(10), 1023);
    assert_eq!(max_for_bits(16), u16::MAX);
    let psel = SatCounter::new(5000, 1023);
    assert_eq!(psel.value(), 1023);
    assert_eq!(psel.midpoint(), 512);
}

// RRIP core

#[test]
fn victim_is_first_line_at_max_priority() {
    let core = RripCore::new(3);
    let mut set = lines_with(&[1, 3, 0, 3]);
    assert_eq!(core.find_victim(&mut set), 1);
    // No ageing was needed
    assert_eq!(set.iter().map(|l| l.priority).collect::<Vec<_>>(), vec![1, 3, 0, 3]);
}

#[test]
fn victim_search_ages_the_set_until_a_line_reaches_max() {
    let core = RripCore::new(3);
    let mut set = lines_with(&[0, 1, 2, 1]);
    assert_eq!(core.find_victim(&mut set), 2);
    assert_eq!(set.iter().map(|l| l.priority).collect::<Vec<_>>(), vec![1, 2, 3, 2]);
}

#[test]
fn victim_search_from_all_zero_takes_max_passes() {
    let core = RripCore::new(3);
    let mut set = lines_with(&[0, 0, 0]);
    assert_eq!(core.find_victim(&mut set), 0);
    assert!(set.iter().all(|l| l.priority == 3));
}

#[test]
fn single_way_set_always_yields_way_zero() {
    let core = RripCore::new(7);
    let mut set = lines_with(&[0]);
    assert_eq!(core.find_victim(&mut set), 0);
}

#[test]
fn fill_clamps_and_promote_zeroes() {
    let core = RripCore::new(3);
    let mut line = LineState::empty(3);
    core.fill(&mut line, 200);
    assert_eq!(line.priority, 3);
    core.promote(&mut line);
    assert_eq!(line.priority, 0);
}

// Streaming detector

#[test]
fn constant_stride_becomes_streaming_after_threshold_matches() {
    let threshold = 2;
    let mut detector = StreamDetector::new(3);
    // One access to record an address, one to record the stride, then `threshold` matches
    for block in 0..threshold as u64 + 1 {
        detector.observe(block);
        assert!(!detector.is_streaming(threshold));
    }
    detector.observe(threshold as u64 + 1);
    assert!(detector.is_streaming(threshold));
    for block in threshold as u64 + 2..200 {
        detector.observe(block);
        assert!(detector.is_streaming(threshold));
    }
    assert_eq!(detector.confidence(), 3);
}

#[test]
fn descending_strides_stream_too() {
    let mut detector = StreamDetector::new(3);
    for block in [1000, 996, 992, 988, 984] {
        detector.observe(block);
    }
    assert!(detector.is_streaming(2));
    assert_eq!(detector.last_delta(), -4);
}

#[test]
fn a_single_outlier_only_costs_one_step() {
    let mut detector = StreamDetector::new(3);
    for block in 0..5 {
        detector.observe(block);
    }
    assert_eq!(detector.confidence(), 3);
    detector.observe(100);
    assert_eq!(detector.confidence(), 2);
    assert!(detector.is_streaming(2));
}

#[test]
fn repeated_block_is_not_a_stream() {
    let mut detector = StreamDetector::new(3);
    for _ in 0..20 {
        detector.observe(42);
    }
    assert_eq!(detector.confidence(), 0);
}

// SHiP

#[test]
fn signatures_stay_inside_the_table() {
    let ship = ShipPredictor::new(6, 3, 1, 2);
    for pc in (0..100_000u64).step_by(37) {
        assert!((ship.signature(pc) as usize) < ship.entries());
    }
    assert_eq!(ship.entries(), 64);
}

#[test]
fn aliased_pcs_share_a_counter() {
    let mut ship = ShipPredictor::new(6, 3, 1, 2);
    assert_eq!(ship.signature(0x0), ship.signature(0x40));
    ship.train_hit(ship.signature(0x0));
    assert_eq!(ship.predict(0x40), Reuse::Hot);
}

#[test]
fn prediction_learns_reuse_and_forgets_it() {
    let (max, threshold) = (3u8, 2u8);
    let mut ship = ShipPredictor::new(6, max, 0, threshold);
    let pc = 0x401a2c;
    let sig = ship.signature(pc);
    assert_eq!(ship.predict(pc), Reuse::Cold);

    let mut hits = 0;
    while ship.predict(pc) == Reuse::Cold {
        ship.train_hit(sig);
        hits += 1;
    }
    assert_eq!(hits, threshold);

    while ship.counter(sig) < max {
        ship.train_hit(sig);
    }
    let mut deaths = 0;
    while ship.predict(pc) == Reuse::Hot {
        ship.train_dead(sig);
        deaths += 1;
    }
    assert_eq!(deaths, max - threshold + 1);

    for _ in 0..10 {
        ship.train_dead(sig);
    }
    assert_eq!(ship.counter(sig), 0);
}

#[test]
fn reset_restores_initial_counters() {
    let mut ship = ShipPredictor::new(4, 3, 1, 2);
    for sig in 0..16 {
        ship.train_hit(sig);
    }
    assert_eq!(ship.hot_signatures(), 16);
    ship.reset();
    assert_eq!(ship.hot_signatures(), 0);
    assert_eq!(ship.counter(5), 1);
}

// Dead-block approximation

#[test]
fn dead_counter_saturates_and_hit_revives() {
    let dead = DeadBlockApproximator::new(3, 3, 4096);
    let mut line = LineState::empty(3);
    for _ in 0..10 {
        dead.on_dead_eviction(&mut line);
    }
    assert_eq!(line.dead_counter, 3);
    assert!(dead.is_likely_dead(&line));
    dead.on_hit(&mut line);
    assert_eq!(line.dead_counter, 0);
    assert!(!dead.is_likely_dead(&line));
}

#[test]
fn decay_runs_once_per_interval() {
    let mut dead = DeadBlockApproximator::new(3, 3, 4);
    let mut lines = vec![LineState { dead_counter: 3, ..LineState::empty(3) }; 8];
    for _ in 0..3 {
        assert!(!dead.note_fill(&mut lines));
    }
    assert!(lines.iter().all(|l| l.dead_counter == 3));
    assert!(dead.note_fill(&mut lines));
    assert!(lines.iter().all(|l| l.dead_counter == 2));
    assert_eq!(dead.decays(), 1);
    for _ in 0..12 {
        dead.note_fill(&mut lines);
    }
    assert_eq!(dead.decays(), 4);
    assert!(lines.iter().all(|l| l.dead_counter == 0));
}

// Set dueling

#[test]
fn leaders_are_spread_evenly_and_alternate() {
    let arbiter = SetDuelingArbiter::new(DuelingPair::Drrip, 1023, 32, 3);
    let roles: Vec<SetRole> = (0..64).map(|set| arbiter.role_for(set, 64, 8)).collect();
    assert_eq!(roles[0], SetRole::Leader(Policy::Srrip));
    assert_eq!(roles[8], SetRole::Leader(Policy::Brrip));
    assert_eq!(roles[56], SetRole::Leader(Policy::Brrip));
    assert_eq!(roles[1], SetRole::Follower);
    let a = roles.iter().filter(|r| **r == SetRole::Leader(Policy::Srrip)).count();
    let b = roles.iter().filter(|r| **r == SetRole::Leader(Policy::Brrip)).count();
    assert_eq!((a, b), (4, 4));
}

#[test]
fn no_leaders_means_every_set_follows() {
    let arbiter = SetDuelingArbiter::new(DuelingPair::Dip, 1023, 32, 3);
    assert!((0..16).all(|set| arbiter.role_for(set, 16, 0) == SetRole::Follower));
}

#[test]
fn psel_starts_at_midpoint_favouring_policy_a() {
    let arbiter = SetDuelingArbiter::new(DuelingPair::Drrip, 1023, 32, 3);
    assert_eq!(arbiter.psel(), 512);
    assert_eq!(arbiter.selected_policy(SetRole::Follower), Policy::Srrip);
    assert_eq!(arbiter.selected_policy(SetRole::Leader(Policy::Brrip)), Policy::Brrip);
}

#[test]
fn only_leader_hits_vote() {
    let mut arbiter = SetDuelingArbiter::new(DuelingPair::Drrip, 1023, 32, 3);
    arbiter.record_hit(SetRole::Follower);
    assert_eq!(arbiter.psel(), 512);
    arbiter.record_hit(SetRole::Leader(Policy::Srrip));
    assert_eq!(arbiter.psel(), 513);
    arbiter.record_hit(SetRole::Leader(Policy::Brrip));
    arbiter.record_hit(SetRole::Leader(Policy::Brrip));
    assert_eq!(arbiter.psel(), 511);
    assert_eq!(arbiter.winner(), Policy::Brrip);
}

#[test]
fn psel_saturates_at_both_ends() {
    let mut arbiter = SetDuelingArbiter::new(DuelingPair::Dip, 1023, 32, 3);
    for _ in 0..2000 {
        arbiter.record_hit(SetRole::Leader(Policy::Bip));
    }
    assert_eq!(arbiter.psel(), 1023);
    for _ in 0..3000 {
        arbiter.record_hit(SetRole::Leader(Policy::Lip));
    }
    assert_eq!(arbiter.psel(), 0);
    assert_eq!(arbiter.winner(), Policy::Lip);
}

#[test]
fn bimodal_policies_take_the_alternate_insertion_one_in_period() {
    let mut arbiter = SetDuelingArbiter::new(DuelingPair::Drrip, 1023, 32, 3);
    let brrip: Vec<u8> = (0..64).map(|_| arbiter.baseline_priority(Policy::Brrip)).collect();
    let long: Vec<usize> = brrip.iter().enumerate().filter(|(_, p)| **p == 2).map(|(i, _)| i).collect();
    assert_eq!(long, vec![31, 63]);
    assert!(brrip.iter().all(|p| *p == 2 || *p == 3));

    arbiter.reset();
    let bip: Vec<u8> = (0..32).map(|_| arbiter.baseline_priority(Policy::Bip)).collect();
    assert_eq!(bip.iter().filter(|p| **p == 0).count(), 1);
    assert_eq!(bip.iter().filter(|p| **p == 3).count(), 31);
}

#[test]
fn static_policies_are_constant() {
    let mut arbiter = SetDuelingArbiter::new(DuelingPair::Drrip, 1023, 32, 3);
    assert!((0..100).all(|_| arbiter.baseline_priority(Policy::Srrip) == 2));
    assert!((0..100).all(|_| arbiter.baseline_priority(Policy::Lip) == 3));
}

// Baseline

#[test]
fn srrip_baseline_fills_long_and_promotes_on_hit() {
    use crate::replacement_policies::{Block, ReplacementPolicy, Srrip};
    use crate::test::load;

    let mut srrip = Srrip::new(1, 2, 2);
    let empty = [Block::default(); 2];
    assert_eq!(srrip.find_victim(&load(0, 0x400, 0), &empty), 0);
    srrip.update(&load(0, 0x400, 0), 0, None, false);
    srrip.update(&load(0, 0x400, 64), 1, None, false);
    assert_eq!((srrip.priority(0, 0), srrip.priority(0, 1)), (2, 2));

    srrip.update(&load(0, 0x400, 64), 1, None, true);
    let full = [Block { valid: true, address: 0 }, Block { valid: true, address: 1 }];
    assert_eq!(srrip.find_victim(&load(0, 0x400, 128), &full), 0);
    assert_eq!((srrip.priority(0, 0), srrip.priority(0, 1)), (3, 1));

    srrip.init();
    assert_eq!(srrip.priority(0, 1), 3);
}

#[test]
fn one_dead_eviction_undoes_one_hit_from_the_initial_value() {
    let mut ship = ShipPredictor::new(6, 3, 1, 2);
    let sig = ship.signature(0x400);
    assert_eq!(ship.predict_signature(sig), Reuse::Cold);
    ship.train_hit(sig);
    assert_eq!(ship.predict_signature(sig), Reuse::Hot);
    ship.train_dead(sig);
    assert_eq!(ship.predict_signature(sig), Reuse::Cold);
}
