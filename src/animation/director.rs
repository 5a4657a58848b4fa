//! Playback state machine for one fighter.
//!
//! The director owns the current animation, the keyframe clock and the combo
//! window. Each tick it nudges the limbs named by the current keyframe through the
//! simulator's kinematic override channel, and it arms a [`Strike`] whenever a
//! hitbox-active keyframe is entered.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Animation, AnimationLibrary, HitPayload, Keyframe, MoveId};
use crate::constants::{COMBO_WINDOW_MS, LIMB_SMOOTHING};
use crate::physics::RigidBodySimulator;
use crate::rig::LimbBodies;

/// Hit opportunity produced by entering a hitbox-active keyframe. Consumed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub animation: MoveId,
    pub keyframe: usize,
    pub payload: HitPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayRejection {
    /// Not in the library
    Unknown,
    /// Current animation may not be cancelled
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    Started,
    ComboContinued { chain: u32 },
    Rejected(PlayRejection),
}

impl PlayOutcome {
    pub fn accepted(&self) -> bool {
        !matches!(self, PlayOutcome::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    animation: MoveId,
    frame_index: usize,
    frame_elapsed_ms: f32,
    combo_window_ms: f32,
}

pub struct AnimationDirector {
    library: AnimationLibrary,
    playback: Option<Playback>,
    combo_window_ms: f32,
    smoothing: f32,
    chain_count: u32,
    /// +1 facing right, -1 facing left
    facing: f32,
    pending_strike: Option<Strike>,
}

impl AnimationDirector {
    pub fn new(library: AnimationLibrary) -> Self {
        Self {
            library,
            playback: None,
            combo_window_ms: COMBO_WINDOW_MS,
            smoothing: LIMB_SMOOTHING,
            chain_count: 0,
            facing: 1.0,
            pending_strike: None,
        }
    }

    pub fn with_combo_window(mut self, window_ms: f32) -> Self {
        self.combo_window_ms = window_ms.max(0.0);
        self
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    pub fn set_facing(&mut self, facing: f32) {
        self.facing = if facing < 0.0 { -1.0 } else { 1.0 };
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Whether `play(id, false)` would be accepted right now
    pub fn can_play(&self, id: MoveId) -> bool {
        self.library.contains(id) && self.current_animation().map_or(true, |a| a.cancel_allowed)
    }

    /// Start `id` from keyframe 0. Unknown names and locked animations are no-ops
    /// unless `force` overrides the lock.
    pub fn play(&mut self, id: MoveId, force: bool) -> PlayOutcome {
        if !self.library.contains(id) {
            trace!(animation = %id, "play ignored: not in library");
            return PlayOutcome::Rejected(PlayRejection::Unknown);
        }
        if !force && !self.can_play(id) {
            trace!(animation = %id, "play ignored: current animation is locked");
            return PlayOutcome::Rejected(PlayRejection::Locked);
        }

        let combo = self.playback.is_some_and(|pb| {
            pb.combo_window_ms > 0.0
                && self.library.get(pb.animation).and_then(|a| a.next_combo) == Some(id)
        });
        self.chain_count = if combo {
            self.chain_count + 1
        } else if id.is_attack() {
            1
        } else {
            0
        };

        self.pending_strike = None;
        self.start(id);

        if combo {
            debug!(animation = %id, chain = self.chain_count, "combo continued");
            PlayOutcome::ComboContinued {
                chain: self.chain_count,
            }
        } else {
            PlayOutcome::Started
        }
    }

    /// Return to idle regardless of locks
    pub fn stop(&mut self) {
        self.play(MoveId::Idle, true);
    }

    fn start(&mut self, id: MoveId) {
        self.playback = Some(Playback {
            animation: id,
            frame_index: 0,
            frame_elapsed_ms: 0.0,
            combo_window_ms: self.combo_window_ms,
        });
        self.arm_if_hit_frame(id, 0);
    }

    fn arm_if_hit_frame(&mut self, id: MoveId, index: usize) {
        let Some(keyframe) = self.library.get(id).and_then(|a| a.keyframes.get(index)) else {
            return;
        };
        if keyframe.hitbox_active {
            trace!(animation = %id, keyframe = index, "strike armed");
            self.pending_strike = Some(Strike {
                animation: id,
                keyframe: index,
                payload: keyframe.hit.unwrap_or_default(),
            });
        }
    }

    /// Advance the keyframe clock by `dt_ms` and push the current keyframe's limb
    /// targets into the simulator.
    pub fn update(&mut self, dt_ms: f32, sim: &mut RigidBodySimulator, limbs: &impl LimbBodies) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        if self.playback.is_none() {
            self.play(MoveId::Idle, true);
            return;
        }

        if self.advance(dt_ms) {
            // Natural end keeps any strike armed on the way
            self.chain_count = 0;
            self.start(MoveId::Idle);
        }
        self.apply_targets(sim, limbs);
    }

    /// Returns true when a non-looping animation ran out of keyframes.
    fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(mut pb) = self.playback else {
            return false;
        };
        let Some(animation) = self.library.get(pb.animation) else {
            return true;
        };

        pb.combo_window_ms = (pb.combo_window_ms - dt_ms).max(0.0);
        pb.frame_elapsed_ms += dt_ms;
        let total = animation.total_duration_ms();
        if animation.looping && total > 0.0 && pb.frame_elapsed_ms > total {
            pb.frame_elapsed_ms %= total;
        }

        let mut finished = false;
        let mut armed = None;
        loop {
            let duration = animation.keyframes[pb.frame_index].duration_ms.max(1.0);
            if pb.frame_elapsed_ms < duration {
                break;
            }
            pb.frame_elapsed_ms -= duration;
            pb.frame_index += 1;
            if pb.frame_index >= animation.keyframes.len() {
                if animation.looping {
                    pb.frame_index = 0;
                } else {
                    finished = true;
                    break;
                }
            }
            if animation.keyframes[pb.frame_index].hitbox_active {
                armed = Some(pb.frame_index);
            }
        }

        let id = pb.animation;
        self.playback = Some(pb);
        if let Some(index) = armed {
            self.arm_if_hit_frame(id, index);
        }
        if finished {
            trace!(animation = %id, "animation finished");
        }
        finished
    }

    fn apply_targets(&self, sim: &mut RigidBodySimulator, limbs: &impl LimbBodies) {
        let Some(frame) = self.current_frame() else {
            return;
        };
        for (limb, target) in &frame.targets {
            let Some(id) = limbs.limb_body(*limb) else {
                continue;
            };
            let Some(position) = sim.position(id) else {
                continue;
            };
            let delta = Vec2::new(target.dx * self.facing, target.dy) * self.smoothing;
            sim.set_position(id, position + delta);
            sim.set_angle(id, target.rotation * self.facing);
        }
    }

    /// `None` only before anything has been played
    pub fn current_frame(&self) -> Option<&Keyframe> {
        let pb = self.playback.as_ref()?;
        self.library
            .get(pb.animation)
            .and_then(|a| a.keyframes.get(pb.frame_index))
    }

    pub fn current_animation(&self) -> Option<&Animation> {
        self.playback
            .as_ref()
            .and_then(|pb| self.library.get(pb.animation))
    }

    pub fn current_move(&self) -> Option<MoveId> {
        self.playback.map(|pb| pb.animation)
    }

    pub fn frame_index(&self) -> Option<usize> {
        self.playback.map(|pb| pb.frame_index)
    }

    pub fn frame_elapsed_ms(&self) -> f32 {
        self.playback.map_or(0.0, |pb| pb.frame_elapsed_ms)
    }

    pub fn is_attacking(&self) -> bool {
        self.current_move().is_some_and(|id| id.is_attack())
    }

    pub fn is_blocking(&self) -> bool {
        self.current_move() == Some(MoveId::Block)
    }

    pub fn combo_window_remaining_ms(&self) -> f32 {
        self.playback.map_or(0.0, |pb| pb.combo_window_ms)
    }

    /// Remaining combo window as a fraction of its full length
    pub fn combo_progress(&self) -> f32 {
        if self.combo_window_ms <= 0.0 {
            return 0.0;
        }
        (self.combo_window_remaining_ms() / self.combo_window_ms).clamp(0.0, 1.0)
    }

    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    pub fn take_strike(&mut self) -> Option<Strike> {
        self.pending_strike.take()
    }

    pub fn has_pending_strike(&self) -> bool {
        self.pending_strike.is_some()
    }
}
