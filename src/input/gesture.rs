use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::engine::config::InputConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    Tap,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    Hold,
    None,
}

/// Screen quadrant of a contact's start point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: bool,
    pub upper: bool,
}

impl Region {
    pub fn of(point: Vec2, viewport: Vec2) -> Self {
        Self {
            left: point.x < viewport.x / 2.0,
            upper: point.y < viewport.y / 2.0,
        }
    }
}

/// Classify a released contact from its endpoints and duration.
pub fn classify(start: Vec2, end: Vec2, duration_ms: f32, config: &InputConfig) -> Gesture {
    let delta = end - start;
    let distance = delta.length();
    // Zero-length contacts still get a finite velocity
    let velocity = distance / duration_ms.max(1.0);

    if distance < config.tap_max_distance && duration_ms < config.tap_max_duration_ms {
        return Gesture::Tap;
    }
    if distance > config.swipe_min_distance && velocity > config.swipe_min_velocity {
        return swipe_direction(delta);
    }
    if duration_ms > config.hold_min_duration_ms && distance < config.hold_max_distance {
        return Gesture::Hold;
    }
    Gesture::None
}

/// Four 90° sectors around the drag vector, y grows downward.
fn swipe_direction(delta: Vec2) -> Gesture {
    let angle = delta.y.atan2(delta.x).to_degrees();
    if (-45.0..45.0).contains(&angle) {
        Gesture::SwipeRight
    } else if (45.0..135.0).contains(&angle) {
        Gesture::SwipeDown
    } else if (-135.0..-45.0).contains(&angle) {
        Gesture::SwipeUp
    } else {
        Gesture::SwipeLeft
    }
}
