use bevy::math::Vec2;
use tracing::debug;

use super::{Limb, LimbBodies};
use crate::physics::{BodyId, BodyKind, BodyShape, BodySpec, JointSpec, PhysicsError, RigidBodySimulator};

pub const FIGHTER_ROOT_NAME: &str = "fighter-torso";

const TORSO_DENSITY: f32 = 0.002;
const LIMB_DENSITY: f32 = 0.001;

/// Ids of the ten fighter parts, indexed like [`Limb::ALL`].
#[derive(Debug, Clone)]
pub struct FighterRig {
    parts: [BodyId; 10],
    scale: f32,
}

struct Part {
    limb: Limb,
    offset: Vec2,
    shape: BodyShape,
}

fn boxed(limb: Limb, offset: Vec2, half: Vec2) -> Part {
    Part {
        limb,
        offset,
        shape: BodyShape::Box {
            half_width: half.x,
            half_height: half.y,
        },
    }
}

/// Offsets from the torso centre at scale 1. Feet end 95px below it.
fn layout(s: f32) -> [Part; 10] {
    let v = |x: f32, y: f32| Vec2::new(x * s, y * s);
    [
        boxed(Limb::Torso, Vec2::ZERO, v(15.0, 25.0)),
        Part {
            limb: Limb::Head,
            offset: v(0.0, -37.0),
            shape: BodyShape::Ball { radius: 12.0 * s },
        },
        boxed(Limb::LeftUpperArm, v(-20.0, -11.0), v(5.0, 14.0)),
        boxed(Limb::LeftLowerArm, v(-20.0, 16.0), v(4.0, 13.0)),
        boxed(Limb::RightUpperArm, v(20.0, -11.0), v(5.0, 14.0)),
        boxed(Limb::RightLowerArm, v(20.0, 16.0), v(4.0, 13.0)),
        boxed(Limb::LeftUpperLeg, v(-8.0, 43.0), v(6.0, 18.0)),
        boxed(Limb::LeftLowerLeg, v(-8.0, 78.0), v(5.0, 17.0)),
        boxed(Limb::RightUpperLeg, v(8.0, 43.0), v(6.0, 18.0)),
        boxed(Limb::RightLowerLeg, v(8.0, 78.0), v(5.0, 17.0)),
    ]
}

/// (parent, parent-local anchor, child, child-local anchor), anchors coincide at rest
fn pins(s: f32) -> [(Limb, Vec2, Limb, Vec2); 9] {
    let v = |x: f32, y: f32| Vec2::new(x * s, y * s);
    [
        (Limb::Torso, v(0.0, -25.0), Limb::Head, v(0.0, 12.0)),
        (Limb::Torso, v(-20.0, -25.0), Limb::LeftUpperArm, v(0.0, -14.0)),
        (Limb::LeftUpperArm, v(0.0, 14.0), Limb::LeftLowerArm, v(0.0, -13.0)),
        (Limb::Torso, v(20.0, -25.0), Limb::RightUpperArm, v(0.0, -14.0)),
        (Limb::RightUpperArm, v(0.0, 14.0), Limb::RightLowerArm, v(0.0, -13.0)),
        (Limb::Torso, v(-8.0, 25.0), Limb::LeftUpperLeg, v(0.0, -18.0)),
        (Limb::LeftUpperLeg, v(0.0, 18.0), Limb::LeftLowerLeg, v(0.0, -17.0)),
        (Limb::Torso, v(8.0, 25.0), Limb::RightUpperLeg, v(0.0, -18.0)),
        (Limb::RightUpperLeg, v(0.0, 18.0), Limb::RightLowerLeg, v(0.0, -17.0)),
    ]
}

/// Build the fighter with its torso centred at (`x`, `y`).
pub fn create_fighter(
    sim: &mut RigidBodySimulator,
    x: f32,
    y: f32,
    scale: f32,
) -> Result<FighterRig, PhysicsError> {
    let origin = Vec2::new(x, y);
    let mut parts = [BodyId(0); 10];

    for (slot, part) in layout(scale).into_iter().enumerate() {
        let (kind, density) = if part.limb == Limb::Torso {
            (BodyKind::TorsoRoot, TORSO_DENSITY)
        } else {
            (BodyKind::Limb, LIMB_DENSITY)
        };
        let mut spec = BodySpec::new(part.limb.body_name(), kind, origin + part.offset, part.shape)
            .with_density(density);
        if part.limb != Limb::Torso {
            spec = spec.with_parent(FIGHTER_ROOT_NAME);
        }
        parts[slot] = sim.add_body(spec)?;
    }

    for (parent, anchor_a, child, anchor_b) in pins(scale) {
        sim.add_joint(JointSpec::pin(
            parent.body_name(),
            anchor_a,
            child.body_name(),
            anchor_b,
        ))?;
    }

    debug!(x, y, scale, "fighter rig created");
    Ok(FighterRig { parts, scale })
}

impl FighterRig {
    /// Torso, the attacker's reference point for range checks
    pub fn reference_body(&self) -> BodyId {
        self.parts[0]
    }

    pub fn body(&self, limb: Limb) -> BodyId {
        self.parts[limb as usize]
    }

    pub fn parts(&self) -> impl Iterator<Item = (Limb, BodyId)> + '_ {
        Limb::ALL.into_iter().zip(self.parts.iter().copied())
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// +1 when `point` lies to the right of the torso, -1 otherwise
    pub fn facing_towards(&self, sim: &RigidBodySimulator, point: Vec2) -> f32 {
        match sim.position(self.reference_body()) {
            Some(torso) if point.x < torso.x => -1.0,
            _ => 1.0,
        }
    }

    /// Lowest point of either lower leg
    pub fn feet_bottom(&self, sim: &RigidBodySimulator) -> Option<f32> {
        [Limb::LeftLowerLeg, Limb::RightLowerLeg]
            .into_iter()
            .filter_map(|limb| sim.snapshot(self.body(limb)))
            .map(|snap| snap.bottom())
            .reduce(f32::max)
    }
}

impl LimbBodies for FighterRig {
    fn limb_body(&self, limb: Limb) -> Option<BodyId> {
        Some(self.body(limb))
    }
}
