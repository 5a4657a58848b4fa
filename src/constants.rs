//! Centralized tuning constants for the ChogPunch combat core.
//!
//! Defaults for [`crate::engine::config::ArenaConfig`] are drawn from here so the
//! config layer, the resolver and the tests agree on one set of numbers. Per-move
//! numbers (damage, cost, range) live in [`crate::combat::moves`].

// =====================================================
// Combat
// =====================================================

/// Per-combo-step damage multiplier: final = 1.0 + combo * COMBO_STEP_MULT
pub const COMBO_STEP_MULT: f32 = 0.1;

/// Combo count at which the damage multiplier stops growing
pub const COMBO_MULT_CAP: u32 = 20;

/// Inactivity time after the last landed hit before the combo breaks
pub const COMBO_BREAK_MS: f32 = 2000.0;

/// Starting and maximum health
pub const MAX_HEALTH: f32 = 100.0;

/// Starting and maximum energy
pub const MAX_ENERGY: f32 = 100.0;

/// Passive energy regeneration per second
pub const ENERGY_REGEN_PER_SEC: f32 = 10.0;

/// Fraction of incoming damage absorbed while blocking
pub const BLOCK_REDUCTION: f32 = 0.8;

/// Knockback force applied per point of effective damage
pub const KNOCKBACK_PER_DAMAGE: f32 = 8000.0;

/// Score awarded per point of effective damage
pub const SCORE_PER_DAMAGE: f32 = 10.0;

/// Landed hits needed before the external claim flow unlocks
pub const REWARD_HIT_THRESHOLD: u32 = 20;

// =====================================================
// Animation
// =====================================================

/// Time after `play` during which the declared successor counts as a combo
pub const COMBO_WINDOW_MS: f32 = 300.0;

/// Fraction of a keyframe offset applied to a limb per tick
pub const LIMB_SMOOTHING: f32 = 0.1;

// =====================================================
// Physics
// =====================================================

/// World gravity in px/s² (y grows downward)
pub const GRAVITY_Y: f32 = 980.0;

/// Default arena extent in pixels
pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;

/// Thickness of the ground and side walls
pub const WALL_THICKNESS: f32 = 60.0;

/// Typical object size handed to the solver so its tolerances match pixel scale
pub const LENGTH_UNIT: f32 = 50.0;

/// Solver steps per `update`
pub const SUBSTEPS: u32 = 2;

/// Longest tick the simulator integrates in one `update`
pub const MAX_STEP_MS: f32 = 50.0;

/// Spring stiffness for a joint with stiffness coefficient 1.0
pub const SPRING_STIFFNESS_SCALE: f32 = 20_000.0;

/// Spring damping shared by all soft joints
pub const SPRING_DAMPING: f32 = 60.0;

// =====================================================
// Input
// =====================================================

pub const TAP_MAX_DISTANCE: f32 = 30.0;
pub const TAP_MAX_DURATION_MS: f32 = 200.0;
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;
/// px per ms
pub const SWIPE_MIN_VELOCITY: f32 = 0.5;
pub const HOLD_MIN_DURATION_MS: f32 = 500.0;
pub const HOLD_MAX_DISTANCE: f32 = 50.0;

/// Special charge gained per recognized hold
pub const HOLD_CHARGE_STEP: f32 = 20.0;

/// Charge at which the special fires
pub const SPECIAL_CHARGE_MAX: f32 = 100.0;

// =====================================================
// Locomotion
// =====================================================

/// Horizontal impulse on the torso per walk intent
pub const WALK_IMPULSE: f32 = 240.0;

/// Upward impulse on the torso per jump
pub const JUMP_IMPULSE: f32 = 2400.0;

/// How far above the ground the feet may be and still count as grounded
pub const GROUND_TOLERANCE: f32 = 4.0;
