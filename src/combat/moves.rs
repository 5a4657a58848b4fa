//! Per-move costs and reach.
//!
//! Base damage here is the fallback; a hit keyframe's own damage wins when present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::MoveId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    pub base_damage: f32,
    pub energy_cost: f32,
    /// Max torso-to-target distance, exclusive
    pub range: f32,
}

impl MoveSpec {
    pub const fn new(base_damage: f32, energy_cost: f32, range: f32) -> Self {
        Self {
            base_damage,
            energy_cost,
            range,
        }
    }
}

/// Attack moves only; anything missing is not an attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTable {
    moves: BTreeMap<MoveId, MoveSpec>,
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::from_entries([
            (MoveId::PunchLight, MoveSpec::new(5.0, 5.0, 100.0)),
            (MoveId::PunchHeavy, MoveSpec::new(8.0, 10.0, 110.0)),
            (MoveId::Uppercut, MoveSpec::new(12.0, 20.0, 90.0)),
            (MoveId::KickLight, MoveSpec::new(10.0, 15.0, 130.0)),
            (MoveId::KickHeavy, MoveSpec::new(13.0, 25.0, 140.0)),
            (MoveId::Roundhouse, MoveSpec::new(15.0, 50.0, 150.0)),
        ])
    }
}

impl MoveTable {
    /// Non-attack moves are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = (MoveId, MoveSpec)>) -> Self {
        Self {
            moves: entries.into_iter().filter(|(id, _)| id.is_attack()).collect(),
        }
    }

    pub fn get(&self, id: MoveId) -> Option<&MoveSpec> {
        self.moves.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MoveId, &MoveSpec)> {
        self.moves.iter().map(|(id, spec)| (*id, spec))
    }
}
