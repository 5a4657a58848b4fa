//! Raw pointer and keyboard events in, [`Intent`]s out.
//!
//! The recognizer never touches physics or animation state.

use std::collections::HashMap;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::animation::MoveId;
use crate::engine::config::InputConfig;

pub mod gesture;
pub mod keyboard;

pub use gesture::{classify, Gesture, Region};
pub use keyboard::intent_for_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Move-agnostic description of what the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Intent {
    Attack {
        #[serde(rename = "move")]
        move_id: MoveId,
    },
    Block,
    Move {
        direction: Direction,
    },
    Jump,
}

impl Intent {
    pub fn attack(move_id: MoveId) -> Self {
        Intent::Attack { move_id }
    }

    /// Build from the loose string form; anything malformed yields `None`.
    pub fn parse(kind: &str, move_name: Option<&str>, direction: Option<&str>) -> Option<Self> {
        match kind {
            "attack" => move_name?.parse().ok().map(Intent::attack),
            "block" => Some(Intent::Block),
            "move" => direction.and_then(Direction::parse).map(|direction| Intent::Move { direction }),
            "jump" => Some(Intent::Jump),
            _ => None,
        }
    }
}

/// Host input event, as delivered by a windowing or touch layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputEvent {
    PointerDown { id: u64, x: f32, y: f32, time_ms: f64 },
    PointerMove { id: u64, x: f32, y: f32 },
    PointerUp { id: u64, x: f32, y: f32, time_ms: f64 },
    PointerCancel { id: u64 },
    Key { key: String },
}

#[derive(Debug, Clone, Copy)]
struct PointerRecord {
    start: Vec2,
    start_ms: f64,
    current: Vec2,
}

pub struct InputRecognizer {
    config: InputConfig,
    viewport: Vec2,
    pointers: HashMap<u64, PointerRecord>,
    special_charge: f32,
}

impl InputRecognizer {
    pub fn new(config: InputConfig) -> Self {
        let viewport = Vec2::from(config.viewport);
        Self {
            config,
            viewport,
            pointers: HashMap::new(),
            special_charge: 0.0,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn special_charge(&self) -> f32 {
        self.special_charge
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    pub fn handle(&mut self, event: &InputEvent) -> Option<Intent> {
        match *event {
            InputEvent::PointerDown { id, x, y, time_ms } => {
                self.pointer_down(id, Vec2::new(x, y), time_ms);
                None
            }
            InputEvent::PointerMove { id, x, y } => {
                self.pointer_move(id, Vec2::new(x, y));
                None
            }
            InputEvent::PointerUp { id, x, y, time_ms } => self.pointer_up(id, Vec2::new(x, y), time_ms),
            InputEvent::PointerCancel { id } => {
                self.pointer_cancel(id);
                None
            }
            InputEvent::Key { ref key } => self.key_down(key),
        }
    }

    /// Open a record for a new contact; a repeated id restarts it.
    pub fn pointer_down(&mut self, id: u64, position: Vec2, time_ms: f64) {
        self.pointers.insert(
            id,
            PointerRecord {
                start: position,
                start_ms: time_ms,
                current: position,
            },
        );
    }

    pub fn pointer_move(&mut self, id: u64, position: Vec2) {
        if let Some(record) = self.pointers.get_mut(&id) {
            record.current = position;
        }
    }

    pub fn pointer_cancel(&mut self, id: u64) {
        self.pointers.remove(&id);
    }

    /// Close the record and classify it. Unknown ids produce nothing.
    pub fn pointer_up(&mut self, id: u64, position: Vec2, time_ms: f64) -> Option<Intent> {
        let record = self.pointers.remove(&id)?;
        let duration_ms = (time_ms - record.start_ms).max(0.0) as f32;
        let gesture = classify(record.start, position, duration_ms, &self.config);
        let region = Region::of(record.start, self.viewport);
        trace!(?gesture, ?region, duration_ms, "pointer released");
        self.intent_for(gesture, region)
    }

    pub fn key_down(&mut self, key: &str) -> Option<Intent> {
        intent_for_key(key)
    }

    fn intent_for(&mut self, gesture: Gesture, region: Region) -> Option<Intent> {
        let intent = match gesture {
            Gesture::Tap if region.left && region.upper => Intent::attack(MoveId::PunchLight),
            Gesture::Tap if region.left => Intent::attack(MoveId::KickLight),
            Gesture::Tap => Intent::Block,
            Gesture::SwipeRight if region.left => Intent::Move {
                direction: Direction::Right,
            },
            Gesture::SwipeLeft if !region.left => Intent::Move {
                direction: Direction::Left,
            },
            Gesture::SwipeRight | Gesture::SwipeLeft => Intent::attack(MoveId::PunchHeavy),
            Gesture::SwipeUp if region.upper => Intent::Jump,
            Gesture::SwipeUp => Intent::attack(MoveId::Uppercut),
            Gesture::SwipeDown => Intent::attack(MoveId::KickHeavy),
            Gesture::Hold => return self.charge_special(),
            Gesture::None => return None,
        };
        Some(intent)
    }

    fn charge_special(&mut self) -> Option<Intent> {
        self.special_charge = (self.special_charge + self.config.hold_charge_step)
            .min(self.config.special_charge_max);
        if self.special_charge >= self.config.special_charge_max {
            debug!("special charged, firing roundhouse");
            self.special_charge = 0.0;
            return Some(Intent::attack(MoveId::Roundhouse));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> InputRecognizer {
        InputRecognizer::new(InputConfig {
            viewport: [800.0, 600.0],
            ..Default::default()
        })
    }

    fn gesture(r: &mut InputRecognizer, from: (f32, f32), to: (f32, f32), ms: f64) -> Option<Intent> {
        r.pointer_down(1, Vec2::new(from.0, from.1), 1000.0);
        r.pointer_move(1, Vec2::new(to.0, to.1));
        r.pointer_up(1, Vec2::new(to.0, to.1), 1000.0 + ms)
    }

    #[test]
    fn test_tap_regions() {
        let mut r = recognizer();
        assert_eq!(gesture(&mut r, (100.0, 100.0), (105.0, 100.0), 80.0), Some(Intent::attack(MoveId::PunchLight)));
        assert_eq!(gesture(&mut r, (100.0, 500.0), (100.0, 500.0), 80.0), Some(Intent::attack(MoveId::KickLight)));
        assert_eq!(gesture(&mut r, (600.0, 100.0), (600.0, 100.0), 80.0), Some(Intent::Block));
        assert_eq!(gesture(&mut r, (600.0, 500.0), (600.0, 500.0), 80.0), Some(Intent::Block));
    }

    #[test]
    fn test_region_uses_start_point() {
        let mut r = recognizer();
        // Starts left, ends right: still a left-side swipe
        assert_eq!(
            gesture(&mut r, (300.0, 300.0), (500.0, 300.0), 100.0),
            Some(Intent::Move { direction: Direction::Right })
        );
        assert_eq!(
            gesture(&mut r, (700.0, 300.0), (500.0, 300.0), 100.0),
            Some(Intent::Move { direction: Direction::Left })
        );
        assert_eq!(gesture(&mut r, (500.0, 300.0), (700.0, 300.0), 100.0), Some(Intent::attack(MoveId::PunchHeavy)));
        assert_eq!(gesture(&mut r, (300.0, 300.0), (100.0, 300.0), 100.0), Some(Intent::attack(MoveId::PunchHeavy)));
    }

    #[test]
    fn test_vertical_swipes() {
        let mut r = recognizer();
        assert_eq!(gesture(&mut r, (200.0, 250.0), (200.0, 100.0), 100.0), Some(Intent::Jump));
        assert_eq!(gesture(&mut r, (200.0, 500.0), (200.0, 350.0), 100.0), Some(Intent::attack(MoveId::Uppercut)));
        assert_eq!(gesture(&mut r, (200.0, 100.0), (200.0, 300.0), 100.0), Some(Intent::attack(MoveId::KickHeavy)));
    }

    #[test]
    fn test_hold_charges_then_fires() {
        let mut r = recognizer();
        for expected in [20.0, 40.0, 60.0, 80.0] {
            assert_eq!(gesture(&mut r, (400.0, 300.0), (410.0, 300.0), 600.0), None);
            assert!((r.special_charge() - expected).abs() < 1e-4);
        }
        assert_eq!(
            gesture(&mut r, (400.0, 300.0), (410.0, 300.0), 600.0),
            Some(Intent::attack(MoveId::Roundhouse))
        );
        assert_eq!(r.special_charge(), 0.0);
    }

    #[test]
    fn test_slow_drag_is_nothing() {
        let mut r = recognizer();
        // 100px over 400ms: too slow to swipe, too far to hold
        assert_eq!(gesture(&mut r, (100.0, 100.0), (200.0, 100.0), 400.0), None);
    }

    #[test]
    fn test_unknown_and_cancelled_pointers() {
        let mut r = recognizer();
        assert_eq!(r.pointer_up(9, Vec2::ZERO, 10.0), None);

        r.pointer_down(2, Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(r.active_pointers(), 1);
        r.pointer_cancel(2);
        assert_eq!(r.active_pointers(), 0);
        assert_eq!(r.pointer_up(2, Vec2::new(100.0, 100.0), 50.0), None);
    }

    #[test]
    fn test_multiple_contacts_tracked_independently() {
        let mut r = recognizer();
        r.pointer_down(1, Vec2::new(100.0, 100.0), 0.0);
        r.pointer_down(2, Vec2::new(700.0, 100.0), 10.0);
        assert_eq!(r.pointer_up(2, Vec2::new(700.0, 100.0), 60.0), Some(Intent::Block));
        assert_eq!(r.pointer_up(1, Vec2::new(100.0, 100.0), 70.0), Some(Intent::attack(MoveId::PunchLight)));
    }

    #[test]
    fn test_event_dispatch() {
        let mut r = recognizer();
        assert_eq!(r.handle(&InputEvent::PointerDown { id: 3, x: 700.0, y: 100.0, time_ms: 0.0 }), None);
        assert_eq!(r.handle(&InputEvent::PointerUp { id: 3, x: 700.0, y: 100.0, time_ms: 50.0 }), Some(Intent::Block));
        assert_eq!(r.handle(&InputEvent::Key { key: "J".into() }), Some(Intent::attack(MoveId::PunchLight)));
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!(Intent::parse("attack", Some("uppercut"), None), Some(Intent::attack(MoveId::Uppercut)));
        assert_eq!(Intent::parse("attack", Some("punch9"), None), None);
        assert_eq!(Intent::parse("attack", None, None), None);
        assert_eq!(
            Intent::parse("move", None, Some("left")),
            Some(Intent::Move { direction: Direction::Left })
        );
        assert_eq!(Intent::parse("move", None, Some("up")), None);
        assert_eq!(Intent::parse("dance", None, None), None);
    }

    #[test]
    fn test_intent_wire_shape() {
        let json = serde_json::to_value(Intent::attack(MoveId::KickLight)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "attack", "move": "kick-light"}));
        let parsed: Intent = serde_json::from_str(r#"{"kind":"move","direction":"right"}"#).unwrap();
        assert_eq!(parsed, Intent::Move { direction: Direction::Right });
    }
}
