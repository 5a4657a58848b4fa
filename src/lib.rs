//! ChogPunch combat core
//!
//! Real-time 2D fighter-versus-punching-bag sandbox:
//! - Rigid-body simulation with joints (rapier2d underneath)
//! - Jointed fighter rig and chained punching bag
//! - Data-driven keyframe animation with combo chaining
//! - Touch/keyboard recognition into move-agnostic intents
//! - Hit resolution, energy, combos and score
//! - Bevy plugin and headless frame driver

pub mod animation;
pub mod combat;
pub mod constants;
pub mod engine;
pub mod input;
pub mod logging;
pub mod movement;
pub mod physics;
pub mod rig;
pub mod sparring;

pub use engine::{Arena, ArenaConfig, ArenaError, ArenaPlugin, ArenaSnapshot};
