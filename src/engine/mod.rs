//! Arena runtime
//!
//! Wires the simulator, both rigs, the animation director, input recognition
//! and combat resolution into one tick-driven [`Arena`], and exposes it to
//! Bevy apps through [`ArenaPlugin`].

pub mod arena;
pub mod config;
pub mod messages;
pub mod plugin;

pub use arena::{Arena, ArenaError};
pub use config::{ArenaConfig, ConfigError};
pub use messages::{AnimationStateMsg, ArenaSnapshot, BodyStateMsg};
pub use plugin::{ArenaPlugin, ArenaResource, CombatEventMessage, IntentEvent, RawInputEvent};
