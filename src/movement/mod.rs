use bevy::math::Vec2;
use tracing::trace;

use crate::animation::{AnimationDirector, MoveId};
use crate::constants::{GROUND_TOLERANCE, JUMP_IMPULSE, WALK_IMPULSE};
use crate::input::Direction;
use crate::physics::RigidBodySimulator;
use crate::rig::FighterRig;

/// Turns move and jump intents into torso impulses plus the matching animation.
#[derive(Debug, Clone)]
pub struct Locomotion {
    pub walk_impulse: f32,
    pub jump_impulse: f32,
    pub ground_tolerance: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            walk_impulse: WALK_IMPULSE,
            jump_impulse: JUMP_IMPULSE,
            ground_tolerance: GROUND_TOLERANCE,
        }
    }
}

impl Locomotion {
    /// Feet within tolerance of the ground's top surface
    pub fn is_grounded(&self, rig: &FighterRig, sim: &RigidBodySimulator) -> bool {
        rig.feet_bottom(sim)
            .is_some_and(|feet| feet >= sim.ground_top() - self.ground_tolerance)
    }

    /// One stride in `direction`; the director falls back to idle when it ends.
    /// Refused while a locked animation plays.
    pub fn walk(
        &self,
        direction: Direction,
        rig: &FighterRig,
        sim: &mut RigidBodySimulator,
        director: &mut AnimationDirector,
    ) -> bool {
        if director.current_move() != Some(MoveId::Walk) && !director.play(MoveId::Walk, false).accepted() {
            trace!(?direction, "walk ignored: animation locked");
            return false;
        }
        sim.apply_impulse(
            rig.reference_body(),
            Vec2::new(direction.sign() * self.walk_impulse, 0.0),
        );
        true
    }

    /// Jump if standing on the ground.
    pub fn jump(&self, rig: &FighterRig, sim: &mut RigidBodySimulator, director: &mut AnimationDirector) -> bool {
        if !self.is_grounded(rig, sim) {
            trace!("jump ignored: airborne");
            return false;
        }
        if !director.play(MoveId::Jump, false).accepted() {
            return false;
        }
        sim.apply_impulse(rig.reference_body(), Vec2::new(0.0, -self.jump_impulse));
        true
    }
}
