use thiserror::Error;
use tracing::{debug, info, warn};

use crate::animation::{AnimationDirector, AnimationLibrary, LibraryError};
use crate::combat::{CombatEvent, CombatEventSink, CombatResolver, CombatStats, MoveTable};
use crate::engine::config::{ArenaConfig, ConfigError};
use crate::engine::messages::{AnimationStateMsg, ArenaSnapshot, BodyStateMsg};
use crate::input::{InputEvent, InputRecognizer, Intent};
use crate::logging::TimingSpan;
use crate::movement::Locomotion;
use crate::physics::{PhysicsError, RigidBodySimulator};
use crate::rig::{create_fighter, create_punching_bag, BagRig, FighterRig};

/// Events kept for `drain_events` before the oldest are dropped
const EVENT_BUFFER_LIMIT: usize = 1024;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("animation library error: {0}")]
    Library(#[from] LibraryError),

    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),
}

/// One fighter, one bag, and the frame driver that runs them.
///
/// `tick` order: director → simulator → resolver → event dispatch.
pub struct Arena {
    config: ArenaConfig,
    sim: RigidBodySimulator,
    fighter: FighterRig,
    bag: BagRig,
    director: AnimationDirector,
    resolver: CombatResolver,
    recognizer: InputRecognizer,
    locomotion: Locomotion,
    sinks: Vec<Box<dyn CombatEventSink>>,
    events: Vec<CombatEvent>,
    elapsed_ms: f64,
    ticks: u64,
    shut_down: bool,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let library = match &config.animation.library_path {
            Some(path) => AnimationLibrary::load(path)?,
            None => AnimationLibrary::builtin()?,
        };
        Self::with_library(config, library)
    }

    pub fn with_library(config: ArenaConfig, library: AnimationLibrary) -> Result<Self, ArenaError> {
        let mut sim = RigidBodySimulator::new(&config.physics);
        let fighter = create_fighter(&mut sim, config.fighter.x, config.fighter.y, config.fighter.scale)?;
        let bag = create_punching_bag(
            &mut sim,
            config.bag.x,
            config.bag.y,
            config.bag.segment_count,
            config.bag.segment_length,
            config.bag.stiffness,
        )?;

        let director = AnimationDirector::new(library)
            .with_combo_window(config.animation.combo_window_ms)
            .with_smoothing(config.animation.smoothing);
        let resolver = CombatResolver::new(
            config.combat.clone(),
            MoveTable::default(),
            fighter.reference_body(),
            bag.target_body(),
        );
        let recognizer = InputRecognizer::new(config.input.clone());

        info!(bodies = sim.body_count(), joints = sim.joints().len(), "arena ready");
        Ok(Self {
            config,
            sim,
            fighter,
            bag,
            director,
            resolver,
            recognizer,
            locomotion: Locomotion::default(),
            sinks: Vec::new(),
            events: Vec::new(),
            elapsed_ms: 0.0,
            ticks: 0,
            shut_down: false,
        })
    }

    /// Register a subscriber; it sees every event at the end of each tick.
    pub fn subscribe(&mut self, sink: Box<dyn CombatEventSink>) {
        self.sinks.push(sink);
    }

    pub fn submit_intent(&mut self, intent: Intent) -> bool {
        if self.shut_down {
            return false;
        }
        self.face_target();
        let accepted = match intent {
            Intent::Move { direction } => {
                self.locomotion
                    .walk(direction, &self.fighter, &mut self.sim, &mut self.director)
            }
            Intent::Jump => self.locomotion.jump(&self.fighter, &mut self.sim, &mut self.director),
            Intent::Attack { .. } | Intent::Block => self.resolver.submit(intent, &mut self.director),
        };
        debug!(?intent, accepted, "intent submitted");
        accepted
    }

    /// Feed a raw host event; any recognized intent is submitted right away.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Intent> {
        let intent = self.recognizer.handle(event)?;
        self.submit_intent(intent);
        Some(intent)
    }

    pub fn key_down(&mut self, key: &str) -> Option<Intent> {
        self.handle_input(&InputEvent::Key { key: key.to_string() })
    }

    /// Damage from outside the arena (an opponent, a hazard)
    pub fn receive_hit(&mut self, amount: f32) -> f32 {
        if self.shut_down {
            return 0.0;
        }
        self.resolver.receive_hit(amount, &mut self.director)
    }

    /// Advance everything by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.shut_down {
            return;
        }
        let _timing = TimingSpan::new("arena_tick");
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        self.face_target();
        self.director.update(dt_ms, &mut self.sim, &self.fighter);
        self.sim.update(dt_ms);
        self.resolver.update(dt_ms, &mut self.director, &mut self.sim);
        self.dispatch();

        self.elapsed_ms += dt_ms as f64;
        self.ticks += 1;
    }

    // Facing only turns between attacks so a strike never flips mid-swing
    fn face_target(&mut self) {
        if self.director.is_attacking() {
            return;
        }
        if let Some(target) = self.sim.position(self.bag.target_body()) {
            let facing = self.fighter.facing_towards(&self.sim, target);
            self.director.set_facing(facing);
        }
    }

    fn dispatch(&mut self) {
        for event in self.resolver.drain_events() {
            for sink in &mut self.sinks {
                sink.on_event(&event);
            }
            self.events.push(event);
        }
        if self.events.len() > EVENT_BUFFER_LIMIT {
            let overflow = self.events.len() - EVENT_BUFFER_LIMIT;
            warn!(dropped = overflow, "combat event buffer full, dropping oldest");
            self.events.drain(..overflow);
        }
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        let stats = self.resolver.stats().clone();
        let fighter = self
            .fighter
            .parts()
            .filter_map(|(_, id)| self.sim.snapshot(id))
            .map(|snap| BodyStateMsg::from(&snap))
            .collect();
        let bag = self
            .sim
            .bodies()
            .filter(|snap| snap.kind.is_bag())
            .map(|snap| BodyStateMsg::from(&snap))
            .collect();

        ArenaSnapshot {
            tick: self.ticks,
            elapsed_ms: self.elapsed_ms,
            fighter,
            bag,
            bag_swing_angle: self.bag.swing_angle(&self.sim),
            animation: AnimationStateMsg {
                current: self.director.current_move(),
                frame_index: self.director.frame_index(),
                attacking: self.director.is_attacking(),
                blocking: self.director.is_blocking(),
                facing: self.director.facing(),
                chain_count: self.director.chain_count(),
                combo_progress: self.director.combo_progress(),
            },
            combo_rank: stats.combo_rank(),
            reward_eligible: stats.reward_eligible(self.config.combat.reward_hit_threshold),
            special_charge: self.recognizer.special_charge(),
            stats,
        }
    }

    /// Stop limb targeting and release the physics world. Further calls are no-ops.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.director.stop();
        self.sim.destroy();
        self.shut_down = true;
        info!(ticks = self.ticks, "arena shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn stats(&self) -> &CombatStats {
        self.resolver.stats()
    }

    pub fn stats_mut(&mut self) -> &mut CombatStats {
        self.resolver.stats_mut()
    }

    pub fn simulator(&self) -> &RigidBodySimulator {
        &self.sim
    }

    pub fn director(&self) -> &AnimationDirector {
        &self.director
    }

    pub fn fighter(&self) -> &FighterRig {
        &self.fighter
    }

    pub fn bag(&self) -> &BagRig {
        &self.bag
    }

    pub fn recognizer_mut(&mut self) -> &mut InputRecognizer {
        &mut self.recognizer
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
