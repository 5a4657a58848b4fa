use bevy::math::Vec2;
use tracing::debug;

use crate::physics::{BodyId, BodyKind, BodyShape, BodySpec, JointSpec, PhysicsError, RigidBodySimulator};

pub const BAG_ANCHOR_NAME: &str = "bag-anchor";
pub const BAG_NAME: &str = "bag";

const LINK_HALF_WIDTH: f32 = 3.0;
const LINK_DENSITY: f32 = 0.0005;
const BAG_HALF: Vec2 = Vec2::new(20.0, 40.0);
const BAG_DENSITY: f32 = 0.001;

/// Chained pendulum: fixed anchor, `links`, then the bag.
#[derive(Debug, Clone)]
pub struct BagRig {
    anchor: BodyId,
    links: Vec<BodyId>,
    bag: BodyId,
    segment_length: f32,
}

fn link_name(index: usize) -> String {
    format!("bag-link-{index}")
}

/// Hang a bag from (`x`, `y`) on `segment_count` links. `stiffness` below 1 turns the
/// link pins into springs.
pub fn create_punching_bag(
    sim: &mut RigidBodySimulator,
    x: f32,
    y: f32,
    segment_count: u32,
    segment_length: f32,
    stiffness: f32,
) -> Result<BagRig, PhysicsError> {
    let half_link = segment_length / 2.0;
    let anchor = sim.add_body(BodySpec::new(
        BAG_ANCHOR_NAME,
        BodyKind::Static,
        Vec2::new(x, y),
        BodyShape::Ball { radius: 4.0 },
    ))?;

    let mut links = Vec::with_capacity(segment_count as usize);
    let mut previous = (BAG_ANCHOR_NAME.to_string(), Vec2::ZERO);
    for i in 0..segment_count as usize {
        let name = link_name(i);
        let centre = Vec2::new(x, y + segment_length * (i as f32 + 0.5));
        links.push(sim.add_body(
            BodySpec::new(
                name.clone(),
                BodyKind::ChainLink,
                centre,
                BodyShape::Box {
                    half_width: LINK_HALF_WIDTH,
                    half_height: half_link,
                },
            )
            .with_density(LINK_DENSITY)
            .with_parent(BAG_ANCHOR_NAME),
        )?);
        sim.add_joint(
            JointSpec::pin(previous.0, previous.1, name.clone(), Vec2::new(0.0, -half_link))
                .with_stiffness(stiffness),
        )?;
        previous = (name, Vec2::new(0.0, half_link));
    }

    let bag_centre = Vec2::new(x, y + segment_length * segment_count as f32 + BAG_HALF.y);
    let bag = sim.add_body(
        BodySpec::new(
            BAG_NAME,
            BodyKind::Bag,
            bag_centre,
            BodyShape::Box {
                half_width: BAG_HALF.x,
                half_height: BAG_HALF.y,
            },
        )
        .with_density(BAG_DENSITY)
        .with_parent(BAG_ANCHOR_NAME),
    )?;
    sim.add_joint(
        JointSpec::pin(previous.0, previous.1, BAG_NAME, Vec2::new(0.0, -BAG_HALF.y))
            .with_stiffness(stiffness),
    )?;

    debug!(x, y, segment_count, segment_length, stiffness, "punching bag created");
    Ok(BagRig {
        anchor,
        links,
        bag,
        segment_length,
    })
}

impl BagRig {
    /// The body hit checks aim at
    pub fn target_body(&self) -> BodyId {
        self.bag
    }

    pub fn anchor(&self) -> BodyId {
        self.anchor
    }

    pub fn links(&self) -> &[BodyId] {
        &self.links
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    /// Angle of the anchor→bag line from vertical, positive when swung right
    pub fn swing_angle(&self, sim: &RigidBodySimulator) -> f32 {
        match (sim.position(self.anchor), sim.position(self.bag)) {
            (Some(anchor), Some(bag)) => {
                let d = bag - anchor;
                d.x.atan2(d.y)
            }
            _ => 0.0,
        }
    }
}
