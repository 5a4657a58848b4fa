use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::animation::MoveId;
use crate::combat::{CombatStats, ComboRank};
use crate::physics::{BodyKind, BodySnapshot};

// =====================================================
// Readable state for rendering and the reward check
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyStateMsg {
    pub name: String,
    pub kind: BodyKind,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
}

impl From<&BodySnapshot> for BodyStateMsg {
    fn from(snap: &BodySnapshot) -> Self {
        Self {
            name: snap.name.clone(),
            kind: snap.kind,
            position: snap.position,
            rotation: snap.rotation,
            velocity: snap.velocity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStateMsg {
    pub current: Option<MoveId>,
    pub frame_index: Option<usize>,
    pub attacking: bool,
    pub blocking: bool,
    pub facing: f32,
    pub chain_count: u32,
    pub combo_progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub fighter: Vec<BodyStateMsg>,
    pub bag: Vec<BodyStateMsg>,
    pub bag_swing_angle: f32,
    pub animation: AnimationStateMsg,
    pub stats: CombatStats,
    pub combo_rank: Option<ComboRank>,
    pub special_charge: f32,
    pub reward_eligible: bool,
}

impl ArenaSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn body(&self, name: &str) -> Option<&BodyStateMsg> {
        self.fighter
            .iter()
            .chain(self.bag.iter())
            .find(|body| body.name == name)
    }
}
