//! Hit and scoring protocol.
//!
//! Attack intents are gated on energy and on the director's cancel rules. The
//! range check runs when the move's hitbox keyframe arrives, as a closed-form
//! distance test between the attacker's torso and the target body; it never
//! consults the solver's contacts.

use bevy::math::Vec2;
use tracing::{debug, trace};

use super::{combo_multiplier, in_range, CombatEvent, CombatStats, MissReason, MoveTable};
use crate::animation::{AnimationDirector, MoveId, PlayOutcome, Strike};
use crate::engine::config::CombatConfig;
use crate::input::Intent;
use crate::physics::{BodyId, RigidBodySimulator};

pub struct CombatResolver {
    config: CombatConfig,
    moves: MoveTable,
    attacker: BodyId,
    target: BodyId,
    stats: CombatStats,
    events: Vec<CombatEvent>,
}

impl CombatResolver {
    pub fn new(config: CombatConfig, moves: MoveTable, attacker: BodyId, target: BodyId) -> Self {
        let stats = CombatStats::new(&config);
        Self {
            config,
            moves,
            attacker,
            target,
            stats,
            events: Vec::new(),
        }
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Direct access for hosts that restore or script a session
    pub fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }

    pub fn moves(&self) -> &MoveTable {
        &self.moves
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Handle an attack or block intent. Returns true when an animation started.
    /// Move and jump intents belong to locomotion and are ignored here.
    pub fn submit(&mut self, intent: Intent, director: &mut AnimationDirector) -> bool {
        match intent {
            Intent::Attack { move_id } => self.start_attack(move_id, director),
            Intent::Block => director.play(MoveId::Block, false).accepted(),
            Intent::Move { .. } | Intent::Jump => false,
        }
    }

    fn start_attack(&mut self, move_id: MoveId, director: &mut AnimationDirector) -> bool {
        let Some(spec) = self.moves.get(move_id).copied() else {
            trace!(%move_id, "attack ignored: not an attack move");
            return false;
        };
        if self.stats.energy < spec.energy_cost {
            debug!(%move_id, energy = self.stats.energy, cost = spec.energy_cost, "too exhausted to attack");
            self.events.push(CombatEvent::Miss {
                move_id,
                reason: MissReason::Exhausted,
                position: None,
            });
            return false;
        }
        if !director.can_play(move_id) {
            trace!(%move_id, "attack ignored: animation locked");
            return false;
        }

        self.stats.energy -= spec.energy_cost;
        match director.play(move_id, false) {
            PlayOutcome::Started => {
                // Only a chained successor keeps the running combo
                if self.stats.combo > 0 {
                    trace!(%move_id, combo = self.stats.combo, "fresh attack resets combo");
                }
                self.stats.combo = 0;
                self.stats.combo_timer_ms = 0.0;
                true
            }
            PlayOutcome::ComboContinued { .. } => true,
            PlayOutcome::Rejected(_) => false,
        }
    }

    /// Advance timers, then resolve any strike the director armed this tick.
    pub fn update(&mut self, dt_ms: f32, director: &mut AnimationDirector, sim: &mut RigidBodySimulator) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.regenerate(dt_ms);
        self.tick_combo(dt_ms);
        if let Some(strike) = director.take_strike() {
            self.resolve_strike(strike, director.facing(), sim);
        }
    }

    fn regenerate(&mut self, dt_ms: f32) {
        let stats = &mut self.stats;
        if stats.energy >= stats.max_energy {
            return;
        }
        stats.energy = (stats.energy + self.config.energy_regen_per_sec * dt_ms / 1000.0).min(stats.max_energy);
        if stats.energy >= stats.max_energy {
            self.events.push(CombatEvent::EnergyFull);
        }
    }

    fn tick_combo(&mut self, dt_ms: f32) {
        if self.stats.combo == 0 {
            return;
        }
        self.stats.combo_timer_ms -= dt_ms;
        if self.stats.combo_timer_ms <= 0.0 {
            debug!(combo = self.stats.combo, "combo broken");
            self.events.push(CombatEvent::ComboBroken {
                combo_count: self.stats.combo,
            });
            self.stats.combo = 0;
            self.stats.combo_timer_ms = 0.0;
        }
    }

    fn resolve_strike(&mut self, strike: Strike, facing: f32, sim: &mut RigidBodySimulator) {
        let Some(spec) = self.moves.get(strike.animation).copied() else {
            return;
        };
        let (Some(attacker), Some(target)) = (sim.position(self.attacker), sim.position(self.target)) else {
            return;
        };

        if !in_range(attacker, target, spec.range) {
            debug!(move_id = %strike.animation, distance = attacker.distance(target), range = spec.range, "strike missed");
            self.events.push(CombatEvent::Miss {
                move_id: strike.animation,
                reason: MissReason::OutOfRange,
                position: Some(attacker),
            });
            return;
        }

        let base = strike.payload.damage.unwrap_or(spec.base_damage);
        let damage = base * combo_multiplier(self.stats.combo, self.config.combo_step, self.config.combo_cap);

        let stats = &mut self.stats;
        stats.combo += 1;
        stats.max_combo = stats.max_combo.max(stats.combo);
        stats.hits += 1;
        stats.score += (damage * self.config.score_per_damage).round() as u64;
        stats.combo_timer_ms = self.config.combo_break_ms;
        let combo = stats.combo;

        let mut direction = strike.payload.knockback.map_or(Vec2::X, |k| k.to_vec2());
        direction.x *= facing;
        let direction = direction.try_normalize().unwrap_or(Vec2::new(facing, 0.0));
        sim.apply_force(self.target, direction * damage * self.config.knockback_per_damage);

        debug!(move_id = %strike.animation, damage, combo, "hit landed");
        self.events.push(CombatEvent::Hit {
            move_id: strike.animation,
            damage,
            position: target,
            combo_count: combo,
        });
        if combo >= 2 {
            self.events.push(CombatEvent::ComboExtended { combo_count: combo });
        }
    }

    /// Incoming damage. Blocking absorbs part of it; otherwise the fighter flinches.
    /// Returns the damage actually taken.
    pub fn receive_hit(&mut self, amount: f32, director: &mut AnimationDirector) -> f32 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let blocked = director.is_blocking();
        let taken = if blocked {
            amount * (1.0 - self.config.block_reduction)
        } else {
            director.play(MoveId::HitReaction, true);
            amount
        };
        self.stats.health = (self.stats.health - taken).max(0.0);
        debug!(taken, blocked, health = self.stats.health, "damage received");
        self.events.push(CombatEvent::Damaged {
            amount: taken,
            blocked,
            health: self.stats.health,
        });
        taken
    }

    pub fn pending_events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}
