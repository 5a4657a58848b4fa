//! Data-driven keyframe animations and the director that plays them on the fighter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::rig::Limb;

pub mod director;
pub mod library;

pub use director::{AnimationDirector, PlayOutcome, PlayRejection, Strike};
pub use library::{AnimationLibrary, LibraryError};

/// Move identifier. Written in kebab-case everywhere it is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MoveId {
    Idle,
    Walk,
    Jump,
    PunchLight,
    PunchHeavy,
    KickLight,
    KickHeavy,
    Uppercut,
    Roundhouse,
    Block,
    HitReaction,
}

impl MoveId {
    pub const ALL: [MoveId; 11] = [
        MoveId::Idle,
        MoveId::Walk,
        MoveId::Jump,
        MoveId::PunchLight,
        MoveId::PunchHeavy,
        MoveId::KickLight,
        MoveId::KickHeavy,
        MoveId::Uppercut,
        MoveId::Roundhouse,
        MoveId::Block,
        MoveId::HitReaction,
    ];

    pub const ATTACKS: [MoveId; 6] = [
        MoveId::PunchLight,
        MoveId::PunchHeavy,
        MoveId::KickLight,
        MoveId::KickHeavy,
        MoveId::Uppercut,
        MoveId::Roundhouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveId::Idle => "idle",
            MoveId::Walk => "walk",
            MoveId::Jump => "jump",
            MoveId::PunchLight => "punch-light",
            MoveId::PunchHeavy => "punch-heavy",
            MoveId::KickLight => "kick-light",
            MoveId::KickHeavy => "kick-heavy",
            MoveId::Uppercut => "uppercut",
            MoveId::Roundhouse => "roundhouse",
            MoveId::Block => "block",
            MoveId::HitReaction => "hit-reaction",
        }
    }

    pub fn is_attack(&self) -> bool {
        Self::ATTACKS.contains(self)
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown move: {s}"))
    }
}

impl TryFrom<String> for MoveId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MoveId> for String {
    fn from(id: MoveId) -> Self {
        id.as_str().to_string()
    }
}

/// Per-limb nudge for one keyframe
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimbTarget {
    pub dx: f32,
    pub dy: f32,
    /// Absolute angle, radians
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub x: f32,
    pub y: f32,
}

impl Knockback {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Damage payload carried by the keyframe where a hit lands
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitPayload {
    #[serde(default)]
    pub damage: Option<f32>,
    #[serde(default)]
    pub knockback: Option<Knockback>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub duration_ms: f32,
    #[serde(default)]
    pub hitbox_active: bool,
    #[serde(default)]
    pub hit: Option<HitPayload>,
    #[serde(default)]
    pub targets: BTreeMap<Limb, LimbTarget>,
}

fn cancel_allowed_default() -> bool {
    true
}

/// Immutable once loaded into a library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: MoveId,
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub looping: bool,
    #[serde(default = "cancel_allowed_default")]
    pub cancel_allowed: bool,
    #[serde(default)]
    pub next_combo: Option<MoveId>,
}

impl Animation {
    pub fn total_duration_ms(&self) -> f32 {
        self.keyframes.iter().map(|k| k.duration_ms).sum()
    }

    /// Indices of keyframes that can land a hit
    pub fn hit_keyframes(&self) -> impl Iterator<Item = usize> + '_ {
        self.keyframes
            .iter()
            .enumerate()
            .filter(|(_, k)| k.hitbox_active)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_id_wire_names() {
        assert_eq!(serde_json::to_string(&MoveId::PunchLight).unwrap(), "\"punch-light\"");
        let parsed: MoveId = serde_json::from_str("\"hit-reaction\"").unwrap();
        assert_eq!(parsed, MoveId::HitReaction);
        assert!(serde_json::from_str::<MoveId>("\"punch1\"").is_err());
    }

    #[test]
    fn test_attack_set() {
        assert!(MoveId::Roundhouse.is_attack());
        assert!(MoveId::KickHeavy.is_attack());
        assert!(!MoveId::Block.is_attack());
        assert!(!MoveId::Idle.is_attack());
        assert!(!MoveId::HitReaction.is_attack());
    }
}
