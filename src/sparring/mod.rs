//! Seeded scripted sparring input.
//!
//! Drives the arena without a human: the demo binary and the benches feed it
//! frame deltas and forward whatever intents or raw pointer events come out.
//! Same seed, same sequence.

use bevy::math::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::animation::MoveId;
use crate::input::{Direction, InputEvent, Intent};

/// Weighted intent table: attacks dominate, with an occasional block or step.
const SCRIPT: &[(u32, Intent)] = &[
    (30, Intent::Attack { move_id: MoveId::PunchLight }),
    (15, Intent::Attack { move_id: MoveId::PunchHeavy }),
    (8, Intent::Attack { move_id: MoveId::Uppercut }),
    (15, Intent::Attack { move_id: MoveId::KickLight }),
    (6, Intent::Attack { move_id: MoveId::KickHeavy }),
    (4, Intent::Attack { move_id: MoveId::Roundhouse }),
    (8, Intent::Block),
    (5, Intent::Move { direction: Direction::Left }),
    (5, Intent::Move { direction: Direction::Right }),
    (4, Intent::Jump),
];

#[derive(Debug, Clone)]
pub struct SparringBot {
    rng: Xoshiro256PlusPlus,
    /// Min/max pause between intents
    cadence_ms: (f32, f32),
    cooldown_ms: f32,
    clock_ms: f64,
    next_pointer: u64,
}

impl SparringBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            cadence_ms: (120.0, 450.0),
            cooldown_ms: 0.0,
            clock_ms: 0.0,
            next_pointer: 1,
        }
    }

    pub fn with_cadence(mut self, min_ms: f32, max_ms: f32) -> Self {
        let min_ms = min_ms.max(0.0);
        self.cadence_ms = (min_ms, max_ms.max(min_ms));
        self
    }

    /// Advance the bot's clock; returns an intent when the pause has elapsed.
    pub fn step(&mut self, dt_ms: f32) -> Option<Intent> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.clock_ms += dt_ms as f64;
        self.cooldown_ms -= dt_ms;
        if self.cooldown_ms > 0.0 {
            return None;
        }
        self.cooldown_ms = self.pause();
        Some(self.pick())
    }

    /// Draw one intent from the script, ignoring cadence.
    pub fn pick(&mut self) -> Intent {
        let total: u32 = SCRIPT.iter().map(|(w, _)| w).sum();
        let mut roll = self.rng.gen_range(0..total);
        for (weight, intent) in SCRIPT {
            if roll < *weight {
                return *intent;
            }
            roll -= weight;
        }
        Intent::Block
    }

    /// A tap or swipe as raw pointer events, for exercising the recognizer.
    pub fn gesture(&mut self, viewport: Vec2) -> Vec<InputEvent> {
        let id = self.next_pointer;
        self.next_pointer += 1;

        let start = Vec2::new(
            self.rng.gen_range(0.0..viewport.x.max(1.0)),
            self.rng.gen_range(0.0..viewport.y.max(1.0)),
        );
        let (end, duration) = if self.rng.gen_bool(0.5) {
            (start + Vec2::new(2.0, -1.0), 80.0)
        } else {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            (start + Vec2::from_angle(angle) * 120.0, 150.0)
        };

        let t0 = self.clock_ms;
        self.clock_ms += duration;
        vec![
            InputEvent::PointerDown { id, x: start.x, y: start.y, time_ms: t0 },
            InputEvent::PointerMove { id, x: end.x, y: end.y },
            InputEvent::PointerUp { id, x: end.x, y: end.y, time_ms: t0 + duration },
        ]
    }

    fn pause(&mut self) -> f32 {
        let (min, max) = self.cadence_ms;
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_script() {
        let mut a = SparringBot::new(7);
        let mut b = SparringBot::new(7);
        for _ in 0..50 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_cadence_respected() {
        let mut bot = SparringBot::new(1).with_cadence(100.0, 100.0);
        assert!(bot.step(16.0).is_some());
        // 96 ms in: still waiting
        for _ in 0..6 {
            assert!(bot.step(16.0).is_none());
        }
        assert!(bot.step(16.0).is_some());
    }

    #[test]
    fn test_script_covers_attacks() {
        let mut bot = SparringBot::new(3);
        let attacks = (0..500)
            .filter(|_| matches!(bot.pick(), Intent::Attack { .. }))
            .count();
        assert!(attacks > 250);
    }

    #[test]
    fn test_gesture_shape() {
        let mut bot = SparringBot::new(9);
        let events = bot.gesture(Vec2::new(800.0, 600.0));
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], InputEvent::PointerDown { id: 1, .. }));
        assert!(matches!(events[2], InputEvent::PointerUp { id: 1, .. }));
        let next = bot.gesture(Vec2::new(800.0, 600.0));
        assert!(matches!(next[0], InputEvent::PointerDown { id: 2, .. }));
    }
}
