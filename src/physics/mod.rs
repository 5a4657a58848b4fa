//! Rigid-body world for the fighter and the bag.
//!
//! The simulator keeps an arena of named bodies on top of rapier2d and exposes
//! only ids, names, snapshots and queued commands. Collision layers keep the
//! fighter and the bag out of each other's way: both only touch the environment.

use rapier2d::prelude::{Group, InteractionGroups};

pub mod body;
pub mod simulator;

pub use body::{BodyCommand, BodyId, BodyKind, BodyShape, BodySnapshot, BodySpec, JointSpec};
pub use simulator::{PhysicsError, RigidBodySimulator};

/// Collision group constants for physics filtering.
pub struct PhysicsLayers;

impl PhysicsLayers {
    /// Torso, head and limbs
    pub const FIGHTER: Group = Group::GROUP_1;
    /// Chain links and the bag itself
    pub const BAG: Group = Group::GROUP_2;
    /// Ground, walls and anchors
    pub const ENVIRONMENT: Group = Group::GROUP_3;

    pub fn groups_for(kind: BodyKind) -> InteractionGroups {
        match kind {
            BodyKind::TorsoRoot | BodyKind::Limb => {
                InteractionGroups::new(Self::FIGHTER, Self::ENVIRONMENT)
            }
            BodyKind::ChainLink | BodyKind::Bag => {
                InteractionGroups::new(Self::BAG, Self::ENVIRONMENT)
            }
            BodyKind::Static => InteractionGroups::new(Self::ENVIRONMENT, Self::FIGHTER | Self::BAG),
        }
    }
}
