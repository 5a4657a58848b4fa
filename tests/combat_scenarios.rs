//! End-to-end combat scenarios through the arena frame driver
//!
//! Each test builds a weightless arena (no gravity, so bodies hold their
//! placement) with the fighter's torso at a chosen distance from the bag.

use chog_core::animation::MoveId;
use chog_core::combat::{CombatEvent, MissReason};
use chog_core::engine::{Arena, ArenaConfig};
use chog_core::input::Intent;

const FRAME_MS: f32 = 16.0;

/// Bag body centre for the default bag: anchor y + links + half the bag
fn bag_centre_y(config: &ArenaConfig) -> f32 {
    config.bag.y + config.bag.segment_length * config.bag.segment_count as f32 + 40.0
}

fn arena_at_distance(dx: f32) -> Arena {
    let mut config = ArenaConfig::weightless();
    config.bag.x = 600.0;
    config.fighter.x = config.bag.x - dx;
    config.fighter.y = bag_centre_y(&config);
    Arena::new(config).unwrap()
}

/// Tick until `pred` matches an emitted event; returns everything emitted meanwhile.
fn run_until(arena: &mut Arena, max_frames: usize, pred: impl Fn(&CombatEvent) -> bool) -> Vec<CombatEvent> {
    let mut seen = Vec::new();
    for _ in 0..max_frames {
        arena.tick(FRAME_MS);
        let batch = arena.drain_events();
        let done = batch.iter().any(&pred);
        seen.extend(batch);
        if done {
            break;
        }
    }
    seen
}

fn is_hit(event: &CombatEvent) -> bool {
    matches!(event, CombatEvent::Hit { .. })
}

#[test]
fn scenario_light_punch_lands_at_close_range() {
    let mut arena = arena_at_distance(50.0);
    assert_eq!(arena.stats().energy, 100.0);
    assert_eq!(arena.stats().health, 100.0);

    assert!(arena.submit_intent(Intent::attack(MoveId::PunchLight)));
    assert!((arena.stats().energy - 95.0).abs() < 1e-4);

    let events = run_until(&mut arena, 30, is_hit);
    let hit = events.iter().find(|e| is_hit(e)).expect("punch should land");
    match hit {
        CombatEvent::Hit { move_id, damage, combo_count, .. } => {
            assert_eq!(*move_id, MoveId::PunchLight);
            assert!((damage - 5.0).abs() < 1e-4);
            assert_eq!(*combo_count, 1);
        }
        _ => unreachable!(),
    }
    assert!(!events.iter().any(|e| matches!(e, CombatEvent::ComboExtended { .. })));
    assert_eq!(arena.stats().hits, 1);
    assert_eq!(arena.stats().combo, 1);
}

#[test]
fn scenario_chained_heavy_punch_extends_combo() {
    let mut arena = arena_at_distance(50.0);
    arena.submit_intent(Intent::attack(MoveId::PunchLight));
    run_until(&mut arena, 30, is_hit);

    // Still inside the light punch's combo window
    assert!(arena.director().combo_window_remaining_ms() > 0.0);
    assert!(arena.submit_intent(Intent::attack(MoveId::PunchHeavy)));
    assert_eq!(arena.director().chain_count(), 2);

    let events = run_until(&mut arena, 30, is_hit);
    let damage = events
        .iter()
        .find_map(|e| match e {
            CombatEvent::Hit { move_id: MoveId::PunchHeavy, damage, .. } => Some(*damage),
            _ => None,
        })
        .expect("heavy punch should land");
    assert!((damage - 8.0 * 1.1).abs() < 1e-3);
    assert!(events
        .iter()
        .any(|e| matches!(e, CombatEvent::ComboExtended { combo_count: 2 })));
    assert_eq!(arena.stats().combo, 2);
    assert_eq!(arena.stats().max_combo, 2);
}

#[test]
fn unchained_attack_inside_break_window_scores_at_base() {
    let mut config = ArenaConfig::weightless();
    config.bag.x = 600.0;
    config.fighter.x = config.bag.x - 50.0;
    config.fighter.y = bag_centre_y(&config);
    config.combat.knockback_per_damage = 0.0;
    let mut arena = Arena::new(config).unwrap();

    arena.submit_intent(Intent::attack(MoveId::PunchLight));
    run_until(&mut arena, 30, is_hit);
    assert_eq!(arena.stats().combo, 1);

    // Past the combo window, well inside the 2000 ms break timer
    for _ in 0..40 {
        arena.tick(FRAME_MS);
    }
    arena.drain_events();
    assert_eq!(arena.stats().combo, 1);

    // Kick-light is not the light punch's successor
    assert!(arena.submit_intent(Intent::attack(MoveId::KickLight)));
    assert_eq!(arena.director().chain_count(), 1);
    assert_eq!(arena.stats().combo, 0);

    let events = run_until(&mut arena, 40, is_hit);
    let (damage, combo_count) = events
        .iter()
        .find_map(|e| match e {
            CombatEvent::Hit { move_id: MoveId::KickLight, damage, combo_count, .. } => Some((*damage, *combo_count)),
            _ => None,
        })
        .expect("kick should land");
    assert!((damage - 10.0).abs() < 1e-4);
    assert_eq!(combo_count, 1);
    assert!(!events.iter().any(|e| matches!(e, CombatEvent::ComboExtended { .. })));
    assert_eq!(arena.stats().max_combo, 1);
}

#[test]
fn scenario_combo_breaks_after_timeout() {
    let mut arena = arena_at_distance(50.0);
    arena.submit_intent(Intent::attack(MoveId::PunchLight));
    run_until(&mut arena, 30, is_hit);
    arena.submit_intent(Intent::attack(MoveId::PunchHeavy));
    run_until(&mut arena, 30, is_hit);
    assert_eq!(arena.stats().combo, 2);

    // 2000 ms break plus slack, no further attacks
    let events = run_until(&mut arena, 140, |e| matches!(e, CombatEvent::ComboBroken { .. }));
    assert!(events
        .iter()
        .any(|e| matches!(e, CombatEvent::ComboBroken { combo_count: 2 })));
    assert_eq!(arena.stats().combo, 0);
    assert_eq!(arena.stats().max_combo, 2);
}

#[test]
fn scenario_out_of_range_punch_misses() {
    let mut arena = arena_at_distance(500.0);
    assert!(arena.submit_intent(Intent::attack(MoveId::PunchLight)));

    let events = run_until(&mut arena, 30, |e| matches!(e, CombatEvent::Miss { .. }));
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::Miss {
            move_id: MoveId::PunchLight,
            reason: MissReason::OutOfRange,
            ..
        }
    )));
    assert!(!events.iter().any(is_hit));
    assert_eq!(arena.stats().combo, 0);
    assert_eq!(arena.stats().hits, 0);
    assert_eq!(arena.stats().score, 0);
}

#[test]
fn scenario_exhausted_roundhouse_is_rejected() {
    let mut arena = arena_at_distance(50.0);
    arena.tick(FRAME_MS);
    let before = arena.director().current_move();
    arena.stats_mut().energy = 3.0;

    assert!(!arena.submit_intent(Intent::attack(MoveId::Roundhouse)));
    assert_eq!(arena.stats().energy, 3.0);
    assert_eq!(arena.director().current_move(), before);

    arena.tick(0.0);
    let events = arena.drain_events();
    assert_eq!(
        events,
        vec![CombatEvent::Miss {
            move_id: MoveId::Roundhouse,
            reason: MissReason::Exhausted,
            position: None,
        }]
    );
}

#[test]
fn incoming_damage_is_reduced_while_blocking() {
    let mut arena = arena_at_distance(50.0);
    assert!(arena.submit_intent(Intent::Block));
    let taken = arena.receive_hit(10.0);
    assert!((taken - 2.0).abs() < 1e-4);

    arena.submit_intent(Intent::attack(MoveId::PunchLight));
    let taken = arena.receive_hit(10.0);
    assert_eq!(taken, 10.0);
    assert_eq!(arena.director().current_move(), Some(MoveId::HitReaction));
    assert!((arena.stats().health - 88.0).abs() < 1e-4);
}

#[test]
fn knockback_swings_the_bag_away() {
    let mut arena = arena_at_distance(50.0);
    let start = arena.snapshot().body("bag").unwrap().position;
    arena.submit_intent(Intent::attack(MoveId::Uppercut));
    run_until(&mut arena, 30, is_hit);
    for _ in 0..5 {
        arena.tick(FRAME_MS);
    }
    let after = arena.snapshot().body("bag").unwrap().position;
    assert!(after.x > start.x);
}
