use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full tuning surface for one arena. Every section falls back to its defaults
/// when omitted from a config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub physics: PhysicsConfig,
    pub fighter: FighterConfig,
    pub bag: BagConfig,
    pub animation: AnimationConfig,
    pub combat: CombatConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// px/s², y grows downward
    pub gravity: [f32; 2],
    pub arena_width: f32,
    pub arena_height: f32,
    pub wall_thickness: f32,
    pub length_unit: f32,
    pub substeps: u32,
    pub max_step_ms: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, GRAVITY_Y],
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            length_unit: LENGTH_UNIT,
            substeps: SUBSTEPS,
            max_step_ms: MAX_STEP_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FighterConfig {
    /// Torso centre
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for FighterConfig {
    fn default() -> Self {
        // Feet sit on the ground at scale 1
        Self {
            x: 300.0,
            y: ARENA_HEIGHT - 96.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BagConfig {
    /// Ceiling anchor
    pub x: f32,
    pub y: f32,
    pub segment_count: u32,
    pub segment_length: f32,
    pub stiffness: f32,
}

impl Default for BagConfig {
    fn default() -> Self {
        Self {
            x: 350.0,
            y: 300.0,
            segment_count: 4,
            segment_length: 30.0,
            stiffness: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub combo_window_ms: f32,
    pub smoothing: f32,
    /// RON library replacing the built-in one
    pub library_path: Option<PathBuf>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            combo_window_ms: COMBO_WINDOW_MS,
            smoothing: LIMB_SMOOTHING,
            library_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub max_health: f32,
    pub max_energy: f32,
    pub energy_regen_per_sec: f32,
    pub combo_break_ms: f32,
    pub combo_step: f32,
    /// `None` leaves the multiplier uncapped
    pub combo_cap: Option<u32>,
    pub knockback_per_damage: f32,
    pub block_reduction: f32,
    pub score_per_damage: f32,
    pub reward_hit_threshold: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_health: MAX_HEALTH,
            max_energy: MAX_ENERGY,
            energy_regen_per_sec: ENERGY_REGEN_PER_SEC,
            combo_break_ms: COMBO_BREAK_MS,
            combo_step: COMBO_STEP_MULT,
            combo_cap: Some(COMBO_MULT_CAP),
            knockback_per_damage: KNOCKBACK_PER_DAMAGE,
            block_reduction: BLOCK_REDUCTION,
            score_per_damage: SCORE_PER_DAMAGE,
            reward_hit_threshold: REWARD_HIT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub tap_max_distance: f32,
    pub tap_max_duration_ms: f32,
    pub swipe_min_distance: f32,
    pub swipe_min_velocity: f32,
    pub hold_min_duration_ms: f32,
    pub hold_max_distance: f32,
    pub hold_charge_step: f32,
    pub special_charge_max: f32,
    pub viewport: [f32; 2],
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tap_max_distance: TAP_MAX_DISTANCE,
            tap_max_duration_ms: TAP_MAX_DURATION_MS,
            swipe_min_distance: SWIPE_MIN_DISTANCE,
            swipe_min_velocity: SWIPE_MIN_VELOCITY,
            hold_min_duration_ms: HOLD_MIN_DURATION_MS,
            hold_max_distance: HOLD_MAX_DISTANCE,
            hold_charge_step: HOLD_CHARGE_STEP,
            special_charge_max: SPECIAL_CHARGE_MAX,
            viewport: [ARENA_WIDTH, ARENA_HEIGHT],
        }
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
    }
}

impl ArenaConfig {
    /// Load from a `.ron` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported config extension: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        positive("physics.arena_width", p.arena_width)?;
        positive("physics.arena_height", p.arena_height)?;
        positive("physics.wall_thickness", p.wall_thickness)?;
        positive("physics.length_unit", p.length_unit)?;
        positive("physics.max_step_ms", p.max_step_ms)?;
        if p.substeps == 0 {
            return Err(ConfigError::Invalid("physics.substeps must be at least 1".into()));
        }
        if !p.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Invalid("physics.gravity must be finite".into()));
        }

        positive("fighter.scale", self.fighter.scale)?;
        if self.bag.segment_count == 0 {
            return Err(ConfigError::Invalid("bag.segment_count must be at least 1".into()));
        }
        positive("bag.segment_length", self.bag.segment_length)?;
        if !(0.0..=1.0).contains(&self.bag.stiffness) {
            return Err(ConfigError::Invalid(format!(
                "bag.stiffness must be within 0..1, got {}",
                self.bag.stiffness
            )));
        }

        positive("animation.combo_window_ms", self.animation.combo_window_ms)?;
        if !(0.0..=1.0).contains(&self.animation.smoothing) {
            return Err(ConfigError::Invalid(format!(
                "animation.smoothing must be within 0..1, got {}",
                self.animation.smoothing
            )));
        }

        let c = &self.combat;
        positive("combat.max_health", c.max_health)?;
        positive("combat.max_energy", c.max_energy)?;
        positive("combat.combo_break_ms", c.combo_break_ms)?;
        non_negative("combat.energy_regen_per_sec", c.energy_regen_per_sec)?;
        non_negative("combat.combo_step", c.combo_step)?;
        non_negative("combat.knockback_per_damage", c.knockback_per_damage)?;
        non_negative("combat.score_per_damage", c.score_per_damage)?;
        if !(0.0..=1.0).contains(&c.block_reduction) {
            return Err(ConfigError::Invalid(format!(
                "combat.block_reduction must be within 0..1, got {}",
                c.block_reduction
            )));
        }

        let i = &self.input;
        positive("input.tap_max_distance", i.tap_max_distance)?;
        positive("input.tap_max_duration_ms", i.tap_max_duration_ms)?;
        positive("input.swipe_min_distance", i.swipe_min_distance)?;
        positive("input.swipe_min_velocity", i.swipe_min_velocity)?;
        positive("input.hold_min_duration_ms", i.hold_min_duration_ms)?;
        positive("input.hold_max_distance", i.hold_max_distance)?;
        positive("input.hold_charge_step", i.hold_charge_step)?;
        positive("input.special_charge_max", i.special_charge_max)?;
        positive("input.viewport.width", i.viewport[0])?;
        positive("input.viewport.height", i.viewport[1])?;
        Ok(())
    }

    /// Arena with gravity switched off, handy for scripted checks.
    pub fn weightless() -> Self {
        Self {
            physics: PhysicsConfig {
                gravity: [0.0, 0.0],
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.combat.combo_cap, Some(20));
        assert!((config.animation.combo_window_ms - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = ArenaConfig::from_ron_str("(combat: (max_energy: 50.0))").unwrap();
        assert!((config.combat.max_energy - 50.0).abs() < f32::EPSILON);
        assert!((config.combat.max_health - MAX_HEALTH).abs() < f32::EPSILON);
        assert_eq!(config.physics, PhysicsConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ArenaConfig::weightless();
        let json = config.to_json().unwrap();
        let parsed = ArenaConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ArenaConfig::default();
        config.physics.substeps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ArenaConfig::default();
        config.combat.block_reduction = 1.5;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.input.tap_max_duration_ms = 0.0;
        assert!(config.validate().is_err());
    }
}
