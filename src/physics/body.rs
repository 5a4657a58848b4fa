//! Arena-side descriptions of bodies, joints and the commands that move them.
//!
//! Nothing here holds a solver handle. Bodies are addressed by [`BodyId`] (an index
//! into the simulator's arena) or by their stable string name.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Index of a body inside one [`super::RigidBodySimulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Role of a body within its rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    TorsoRoot,
    Limb,
    ChainLink,
    Bag,
    /// Ground, walls and pinned anchors
    Static,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::TorsoRoot => "torso-root",
            BodyKind::Limb => "limb",
            BodyKind::ChainLink => "chain-link",
            BodyKind::Bag => "bag",
            BodyKind::Static => "static",
        }
    }

    pub fn is_fighter(&self) -> bool {
        matches!(self, BodyKind::TorsoRoot | BodyKind::Limb)
    }

    pub fn is_bag(&self) -> bool {
        matches!(self, BodyKind::ChainLink | BodyKind::Bag)
    }
}

/// Collision shape, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    Box { half_width: f32, half_height: f32 },
    Ball { radius: f32 },
}

impl BodyShape {
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            BodyShape::Box {
                half_width,
                half_height,
            } => Vec2::new(half_width, half_height),
            BodyShape::Ball { radius } => Vec2::splat(radius),
        }
    }
}

/// Everything needed to create one body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub name: String,
    pub kind: BodyKind,
    pub position: Vec2,
    pub rotation: f32,
    pub shape: BodyShape,
    /// Mass per px²
    pub density: f32,
    /// Pinned bodies never move
    pub fixed: bool,
    /// Name of the rig root this body is grouped under, looked up by name only
    pub parent: Option<String>,
}

impl BodySpec {
    pub fn new(name: impl Into<String>, kind: BodyKind, position: Vec2, shape: BodyShape) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            rotation: 0.0,
            shape,
            density: 0.001,
            fixed: kind == BodyKind::Static,
            parent: None,
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

/// A two-body constraint. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub body_a: String,
    pub body_b: String,
    /// Anchor in `body_a`'s local frame
    pub anchor_a: [f32; 2],
    /// Anchor in `body_b`'s local frame
    pub anchor_b: [f32; 2],
    /// 0..1, where 1 with a zero rest length is a rigid pin
    pub stiffness: f32,
    pub rest_length: f32,
}

impl JointSpec {
    /// Rigid pin joining two anchors that coincide in world space
    pub fn pin(body_a: impl Into<String>, anchor_a: Vec2, body_b: impl Into<String>, anchor_b: Vec2) -> Self {
        Self {
            body_a: body_a.into(),
            body_b: body_b.into(),
            anchor_a: anchor_a.to_array(),
            anchor_b: anchor_b.to_array(),
            stiffness: 1.0,
            rest_length: 0.0,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness.clamp(0.0, 1.0);
        self
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = rest_length.max(0.0);
        self
    }

    pub fn is_rigid_pin(&self) -> bool {
        self.rest_length <= f32::EPSILON && self.stiffness >= 1.0
    }
}

/// Read-only copy of a body's state
#[derive(Debug, Clone, PartialEq)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub mass: f32,
    pub half_extents: Vec2,
    pub parent: Option<String>,
}

impl BodySnapshot {
    /// Lowest y reached by the body's bounding box (y grows downward)
    pub fn bottom(&self) -> f32 {
        self.position.y + self.half_extents.y
    }
}

/// Queued mutation, consumed once at the start of the next `update`.
///
/// `SetTransform` is the kinematic override channel used by the animation layer;
/// `ApplyForce`/`ApplyImpulse` go through the solver like any other load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    SetTransform {
        id: BodyId,
        position: Option<Vec2>,
        angle: Option<f32>,
    },
    /// Force integrated over the whole tick
    ApplyForce { id: BodyId, force: Vec2 },
    ApplyImpulse { id: BodyId, impulse: Vec2 },
}

impl BodyCommand {
    pub fn target(&self) -> BodyId {
        match *self {
            BodyCommand::SetTransform { id, .. }
            | BodyCommand::ApplyForce { id, .. }
            | BodyCommand::ApplyImpulse { id, .. } => id,
        }
    }
}
