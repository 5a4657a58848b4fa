use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::animation::MoveId;
use crate::engine::config::CombatConfig;

pub mod moves;
pub mod resolver;

pub use moves::{MoveSpec, MoveTable};
pub use resolver::CombatResolver;

/// Session stats read by rendering and the external reward check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Time left before the current combo breaks
    pub combo_timer_ms: f32,
    /// Landed hits this session
    pub hits: u32,
}

impl CombatStats {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            health: config.max_health,
            max_health: config.max_health,
            energy: config.max_energy,
            max_energy: config.max_energy,
            score: 0,
            combo: 0,
            max_combo: 0,
            combo_timer_ms: 0.0,
            hits: 0,
        }
    }

    pub fn reward_eligible(&self, threshold: u32) -> bool {
        self.hits >= threshold
    }

    pub fn combo_rank(&self) -> Option<ComboRank> {
        ComboRank::for_combo(self.combo)
    }

    pub fn is_knocked_out(&self) -> bool {
        self.health <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissReason {
    /// Strike landed outside the move's range
    OutOfRange,
    /// Not enough energy to start the move
    Exhausted,
}

/// Everything the resolver reports to UI, audio and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CombatEvent {
    Hit {
        move_id: MoveId,
        damage: f32,
        position: Vec2,
        combo_count: u32,
    },
    Miss {
        move_id: MoveId,
        reason: MissReason,
        position: Option<Vec2>,
    },
    ComboExtended {
        combo_count: u32,
    },
    ComboBroken {
        combo_count: u32,
    },
    Damaged {
        amount: f32,
        blocked: bool,
        health: f32,
    },
    EnergyFull,
}

impl CombatEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            CombatEvent::Hit { .. } => "hit",
            CombatEvent::Miss { .. } => "miss",
            CombatEvent::ComboExtended { .. } => "comboExtended",
            CombatEvent::ComboBroken { .. } => "comboBroken",
            CombatEvent::Damaged { .. } => "damaged",
            CombatEvent::EnergyFull => "energyFull",
        }
    }
}

/// Subscriber for combat events (audio, UI, scoring).
pub trait CombatEventSink: Send + Sync {
    fn on_event(&mut self, event: &CombatEvent);
}

/// Collects events into a shared buffer
impl CombatEventSink for std::sync::Arc<std::sync::Mutex<Vec<CombatEvent>>> {
    fn on_event(&mut self, event: &CombatEvent) {
        if let Ok(mut events) = self.lock() {
            events.push(event.clone());
        }
    }
}

/// Damage multiplier for a hit landing with `combo` prior hits in the chain
pub fn combo_multiplier(combo: u32, step: f32, cap: Option<u32>) -> f32 {
    let counted = cap.map_or(combo, |cap| combo.min(cap));
    1.0 + counted as f32 * step
}

/// Strict: a target exactly at `range` is out of reach
pub fn in_range(attacker: Vec2, target: Vec2, range: f32) -> bool {
    attacker.distance(target) < range
}

/// Display label for long combos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComboRank {
    Great,
    Amazing,
    Unstoppable,
    Godlike,
}

impl ComboRank {
    pub fn for_combo(combo: u32) -> Option<Self> {
        match combo {
            20.. => Some(Self::Godlike),
            15.. => Some(Self::Unstoppable),
            10.. => Some(Self::Amazing),
            5.. => Some(Self::Great),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Great => "GREAT!",
            Self::Amazing => "AMAZING!",
            Self::Unstoppable => "UNSTOPPABLE!",
            Self::Godlike => "GODLIKE!",
        }
    }
}
