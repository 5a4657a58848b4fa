//! rapier2d-backed simulator with a name-keyed body arena.
//!
//! Mutations from gameplay code are queued as [`BodyCommand`]s and drained at the
//! start of [`RigidBodySimulator::update`], before the solver runs.

use std::collections::HashMap;

use bevy::math::Vec2;
use rapier2d::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use super::body::{BodyCommand, BodyId, BodyKind, BodyShape, BodySnapshot, BodySpec, JointSpec};
use super::PhysicsLayers;
use crate::constants::{SPRING_DAMPING, SPRING_STIFFNESS_SCALE};
use crate::engine::config::PhysicsConfig;

#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    #[error("body already exists: {0}")]
    DuplicateBody(String),
    #[error("unknown body: {0}")]
    UnknownBody(String),
}

pub const GROUND_NAME: &str = "arena-ground";
pub const LEFT_WALL_NAME: &str = "arena-wall-left";
pub const RIGHT_WALL_NAME: &str = "arena-wall-right";

struct BodyEntry {
    spec: BodySpec,
    handle: RigidBodyHandle,
}

pub struct RigidBodySimulator {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    entries: Vec<BodyEntry>,
    by_name: HashMap<String, BodyId>,
    joints: Vec<JointSpec>,
    commands: Vec<BodyCommand>,
    arena_size: Vec2,
    substeps: u32,
    max_step_ms: f32,
    steps: u64,
    destroyed: bool,
}

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn damping_for(kind: BodyKind) -> (f32, f32) {
    match kind {
        BodyKind::TorsoRoot | BodyKind::Limb => (0.5, 2.0),
        BodyKind::ChainLink | BodyKind::Bag => (0.2, 0.5),
        BodyKind::Static => (0.0, 0.0),
    }
}

impl RigidBodySimulator {
    /// Empty world bounded by a ground slab and two side walls.
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.length_unit = config.length_unit;

        let mut sim = Self {
            gravity: vector![config.gravity[0], config.gravity[1]],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: Vec::new(),
            by_name: HashMap::new(),
            joints: Vec::new(),
            commands: Vec::new(),
            arena_size: Vec2::new(config.arena_width, config.arena_height),
            substeps: config.substeps.max(1),
            max_step_ms: config.max_step_ms,
            steps: 0,
            destroyed: false,
        };
        sim.insert_bounds(config.wall_thickness);
        sim
    }

    fn insert_bounds(&mut self, thickness: f32) {
        let Vec2 { x: w, y: h } = self.arena_size;
        let half = thickness / 2.0;

        self.insert_body(BodySpec::new(
            GROUND_NAME,
            BodyKind::Static,
            Vec2::new(w / 2.0, h + half),
            BodyShape::Box {
                half_width: w / 2.0 + thickness,
                half_height: half,
            },
        ));
        for (name, x) in [(LEFT_WALL_NAME, -half), (RIGHT_WALL_NAME, w + half)] {
            self.insert_body(BodySpec::new(
                name,
                BodyKind::Static,
                Vec2::new(x, h / 2.0),
                BodyShape::Box {
                    half_width: half,
                    half_height: h / 2.0 + thickness,
                },
            ));
        }
    }

    /// Register a new body under a unique name.
    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyId, PhysicsError> {
        if self.by_name.contains_key(&spec.name) {
            return Err(PhysicsError::DuplicateBody(spec.name));
        }
        Ok(self.insert_body(spec))
    }

    fn insert_body(&mut self, spec: BodySpec) -> BodyId {
        let (linear_damping, angular_damping) = damping_for(spec.kind);
        let mut builder = if spec.fixed {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        // Keeps the rig upright; limbs still swing on their pins
        if spec.kind == BodyKind::TorsoRoot {
            builder = builder.lock_rotations();
        }
        let body = builder
            .translation(to_vector(spec.position))
            .rotation(spec.rotation)
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .build();
        let handle = self.bodies.insert(body);

        let shape = match spec.shape {
            BodyShape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
            BodyShape::Ball { radius } => ColliderBuilder::ball(radius),
        };
        let collider = shape
            .density(spec.density)
            .friction(0.6)
            .restitution(0.1)
            .collision_groups(PhysicsLayers::groups_for(spec.kind))
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let id = BodyId(self.entries.len() as u32);
        trace!(name = %spec.name, kind = spec.kind.as_str(), "body added");
        self.by_name.insert(spec.name.clone(), id);
        self.entries.push(BodyEntry { spec, handle });
        self.destroyed = false;
        id
    }

    /// Connect two named bodies. Returns the joint's index.
    pub fn add_joint(&mut self, spec: JointSpec) -> Result<usize, PhysicsError> {
        let a = self.handle_by_name(&spec.body_a)?;
        let b = self.handle_by_name(&spec.body_b)?;
        let anchor_a = point![spec.anchor_a[0], spec.anchor_a[1]];
        let anchor_b = point![spec.anchor_b[0], spec.anchor_b[1]];

        let joint: GenericJoint = if spec.is_rigid_pin() {
            RevoluteJointBuilder::new()
                .local_anchor1(anchor_a)
                .local_anchor2(anchor_b)
                .build()
                .into()
        } else {
            SpringJointBuilder::new(
                spec.rest_length,
                spec.stiffness * SPRING_STIFFNESS_SCALE,
                SPRING_DAMPING,
            )
            .local_anchor1(anchor_a)
            .local_anchor2(anchor_b)
            .build()
            .into()
        };
        self.impulse_joints.insert(a, b, joint, true);
        self.joints.push(spec);
        Ok(self.joints.len() - 1)
    }

    fn handle_by_name(&self, name: &str) -> Result<RigidBodyHandle, PhysicsError> {
        self.by_name
            .get(name)
            .and_then(|id| self.entries.get(id.index()))
            .map(|entry| entry.handle)
            .ok_or_else(|| PhysicsError::UnknownBody(name.to_string()))
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    /// Snapshot by name, `None` for unknown names or after `destroy`.
    pub fn get_body(&self, name: &str) -> Option<BodySnapshot> {
        self.body_id(name).and_then(|id| self.snapshot(id))
    }

    pub fn snapshot(&self, id: BodyId) -> Option<BodySnapshot> {
        let entry = self.entries.get(id.index())?;
        let body = self.bodies.get(entry.handle)?;
        Some(BodySnapshot {
            id,
            name: entry.spec.name.clone(),
            kind: entry.spec.kind,
            position: to_vec2(body.translation()),
            velocity: to_vec2(body.linvel()),
            rotation: body.rotation().angle(),
            angular_velocity: body.angvel(),
            mass: body.mass(),
            half_extents: entry.spec.shape.half_extents(),
            parent: entry.spec.parent.clone(),
        })
    }

    /// Position without building a full snapshot.
    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        let entry = self.entries.get(id.index())?;
        self.bodies
            .get(entry.handle)
            .map(|body| to_vec2(body.translation()))
    }

    pub fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
        (0..self.entries.len() as u32).filter_map(|i| self.snapshot(BodyId(i)))
    }

    pub fn body_count(&self) -> usize {
        self.entries.len()
    }

    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    pub fn set_position(&mut self, id: BodyId, position: Vec2) {
        self.push(BodyCommand::SetTransform {
            id,
            position: Some(position),
            angle: None,
        });
    }

    pub fn set_angle(&mut self, id: BodyId, angle: f32) {
        self.push(BodyCommand::SetTransform {
            id,
            position: None,
            angle: Some(angle),
        });
    }

    pub fn apply_force(&mut self, id: BodyId, force: Vec2) {
        self.push(BodyCommand::ApplyForce { id, force });
    }

    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        self.push(BodyCommand::ApplyImpulse { id, impulse });
    }

    /// Queue a command; commands for unknown ids are dropped.
    pub fn push(&mut self, command: BodyCommand) {
        if command.target().index() < self.entries.len() {
            self.commands.push(command);
        }
    }

    pub fn pending_commands(&self) -> &[BodyCommand] {
        &self.commands
    }

    /// Drain queued commands, then advance the solver by `dt_ms`.
    pub fn update(&mut self, dt_ms: f32) {
        if self.destroyed {
            self.commands.clear();
            return;
        }
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.max_step_ms)
        } else {
            0.0
        };
        let dt = dt_ms / 1000.0;
        self.apply_commands(dt);
        if dt <= 0.0 {
            return;
        }

        self.integration_parameters.dt = dt / self.substeps as f32;
        for _ in 0..self.substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                &(),
                &(),
            );
        }
        self.steps += self.substeps as u64;
    }

    fn apply_commands(&mut self, dt: f32) {
        for command in std::mem::take(&mut self.commands) {
            let Some(entry) = self.entries.get(command.target().index()) else {
                continue;
            };
            let Some(body) = self.bodies.get_mut(entry.handle) else {
                continue;
            };
            match command {
                BodyCommand::SetTransform {
                    position, angle, ..
                } => {
                    let translation = position.map(to_vector).unwrap_or(*body.translation());
                    let angle = angle.unwrap_or_else(|| body.rotation().angle());
                    body.set_position(Isometry::new(translation, angle), true);
                }
                BodyCommand::ApplyForce { force, .. } => {
                    if dt > 0.0 {
                        body.apply_impulse(to_vector(force * dt), true);
                    }
                }
                BodyCommand::ApplyImpulse { impulse, .. } => {
                    body.apply_impulse(to_vector(impulse), true);
                }
            }
        }
    }

    /// Release every body, joint and solver structure.
    pub fn destroy(&mut self) {
        debug!(bodies = self.entries.len(), joints = self.joints.len(), "destroying simulator");
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.islands = IslandManager::new();
        self.broad_phase = BroadPhaseBvh::new();
        self.narrow_phase = NarrowPhase::new();
        self.ccd_solver = CCDSolver::new();
        self.entries.clear();
        self.by_name.clear();
        self.joints.clear();
        self.commands.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn gravity(&self) -> Vec2 {
        to_vec2(&self.gravity)
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_vector(gravity);
    }

    /// y of the ground's top surface
    pub fn ground_top(&self) -> f32 {
        self.arena_size.y
    }

    pub fn arena_size(&self) -> Vec2 {
        self.arena_size
    }

    /// Solver steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_g() -> PhysicsConfig {
        PhysicsConfig {
            gravity: [0.0, 0.0],
            ..Default::default()
        }
    }

    fn crate_box(name: &str, at: Vec2) -> BodySpec {
        BodySpec::new(
            name,
            BodyKind::Bag,
            at,
            BodyShape::Box {
                half_width: 10.0,
                half_height: 10.0,
            },
        )
    }

    #[test]
    fn test_bounds_present() {
        let sim = RigidBodySimulator::new(&PhysicsConfig::default());
        assert_eq!(sim.body_count(), 3);
        assert!(sim.get_body(GROUND_NAME).is_some());
        assert!(sim.get_body(LEFT_WALL_NAME).is_some());
        assert!(sim.get_body(RIGHT_WALL_NAME).is_some());
        assert!(sim.get_body("nobody").is_none());
    }

    #[test]
    fn test_duplicate_body_rejected() {
        let mut sim = RigidBodySimulator::new(&zero_g());
        sim.add_body(crate_box("box", Vec2::new(100.0, 100.0))).unwrap();
        let err = sim.add_body(crate_box("box", Vec2::new(200.0, 100.0)));
        assert_eq!(err, Err(PhysicsError::DuplicateBody("box".into())));
    }

    #[test]
    fn test_joint_with_unknown_body() {
        let mut sim = RigidBodySimulator::new(&zero_g());
        sim.add_body(crate_box("a", Vec2::new(100.0, 100.0))).unwrap();
        let err = sim.add_joint(JointSpec::pin("a", Vec2::ZERO, "ghost", Vec2::ZERO));
        assert_eq!(err, Err(PhysicsError::UnknownBody("ghost".into())));
        assert!(sim.joints().is_empty());
    }

    #[test]
    fn test_set_position_applied_on_update() {
        let mut sim = RigidBodySimulator::new(&zero_g());
        let id = sim.add_body(crate_box("box", Vec2::new(100.0, 100.0))).unwrap();

        sim.set_position(id, Vec2::new(250.0, 120.0));
        sim.set_angle(id, 0.5);
        // Queued, not yet applied
        assert_eq!(sim.pending_commands().len(), 2);
        assert!((sim.position(id).unwrap().x - 100.0).abs() < 1e-3);

        sim.update(16.0);
        let snap = sim.snapshot(id).unwrap();
        assert!((snap.position.x - 250.0).abs() < 1e-2);
        assert!((snap.position.y - 120.0).abs() < 1e-2);
        assert!((snap.rotation - 0.5).abs() < 1e-3);
        assert!(sim.pending_commands().is_empty());
    }

    #[test]
    fn test_zero_dt_applies_commands_without_stepping() {
        let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
        let id = sim.add_body(crate_box("box", Vec2::new(100.0, 100.0))).unwrap();
        sim.set_position(id, Vec2::new(140.0, 100.0));
        sim.update(0.0);
        assert_eq!(sim.steps(), 0);
        assert!((sim.position(id).unwrap().x - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
        let id = sim.add_body(crate_box("box", Vec2::new(400.0, 100.0))).unwrap();
        for _ in 0..10 {
            sim.update(16.0);
        }
        assert!(sim.position(id).unwrap().y > 100.0);
    }

    #[test]
    fn test_ground_stops_fall() {
        let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
        let id = sim.add_body(crate_box("box", Vec2::new(400.0, 500.0))).unwrap();
        for _ in 0..240 {
            sim.update(16.0);
        }
        let snap = sim.snapshot(id).unwrap();
        assert!(snap.bottom() < sim.ground_top() + 2.0);
        assert!(snap.bottom() > sim.ground_top() - 5.0);
    }

    #[test]
    fn test_force_accelerates() {
        let mut sim = RigidBodySimulator::new(&zero_g());
        let id = sim.add_body(crate_box("box", Vec2::new(400.0, 300.0))).unwrap();
        sim.apply_force(id, Vec2::new(5000.0, 0.0));
        sim.update(16.0);
        let snap = sim.snapshot(id).unwrap();
        assert!(snap.velocity.x > 0.0);
        assert!(snap.position.x > 400.0);
    }

    #[test]
    fn test_pinned_pair_stays_together() {
        let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
        sim.add_body(
            BodySpec::new(
                "anchor",
                BodyKind::Static,
                Vec2::new(400.0, 50.0),
                BodyShape::Ball { radius: 4.0 },
            ),
        )
        .unwrap();
        let weight = sim
            .add_body(crate_box("weight", Vec2::new(400.0, 110.0)))
            .unwrap();
        sim.add_joint(JointSpec::pin(
            "anchor",
            Vec2::ZERO,
            "weight",
            Vec2::new(0.0, -60.0),
        ))
        .unwrap();

        for _ in 0..120 {
            sim.update(16.0);
        }
        let pos = sim.position(weight).unwrap();
        let distance = pos.distance(Vec2::new(400.0, 50.0));
        assert!((distance - 60.0).abs() < 3.0, "distance drifted to {distance}");
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut sim = RigidBodySimulator::new(&zero_g());
        let id = sim.add_body(crate_box("box", Vec2::new(100.0, 100.0))).unwrap();
        sim.destroy();

        assert!(sim.is_destroyed());
        assert_eq!(sim.body_count(), 0);
        assert!(sim.get_body("box").is_none());
        sim.set_position(id, Vec2::ZERO);
        assert!(sim.pending_commands().is_empty());
        sim.update(16.0);
        assert_eq!(sim.steps(), 0);
    }

    #[test]
    fn test_non_finite_dt_ignored() {
        let mut sim = RigidBodySimulator::new(&PhysicsConfig::default());
        sim.update(f32::NAN);
        sim.update(-5.0);
        assert_eq!(sim.steps(), 0);
    }
}
