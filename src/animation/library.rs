use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::{Animation, MoveId};

const BUILTIN_ANIMATIONS: &str = include_str!("../../assets/animations.ron");

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("animation {0} has no keyframes")]
    Empty(MoveId),

    #[error("animation {name} keyframe {index} has a non-positive duration")]
    BadDuration { name: MoveId, index: usize },

    #[error("animation {0} is defined more than once")]
    Duplicate(MoveId),

    #[error("library has no idle animation")]
    MissingIdle,

    #[error("animation {name} chains into {next}, which is not in the library")]
    UnknownCombo { name: MoveId, next: MoveId },
}

/// Validated set of animations keyed by move.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    animations: BTreeMap<MoveId, Animation>,
}

impl AnimationLibrary {
    /// The move set shipped in `assets/animations.ron`
    pub fn builtin() -> Result<Self, LibraryError> {
        Self::from_ron_str(BUILTIN_ANIMATIONS)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, LibraryError> {
        let animations: Vec<Animation> = ron::from_str(s)?;
        Self::from_animations(animations)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let library = Self::from_ron_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), animations = library.len(), "animation library loaded");
        Ok(library)
    }

    pub fn from_animations(animations: Vec<Animation>) -> Result<Self, LibraryError> {
        let mut map = BTreeMap::new();
        for animation in animations {
            if animation.keyframes.is_empty() {
                return Err(LibraryError::Empty(animation.name));
            }
            if let Some(index) = animation
                .keyframes
                .iter()
                .position(|k| !(k.duration_ms.is_finite() && k.duration_ms > 0.0))
            {
                return Err(LibraryError::BadDuration {
                    name: animation.name,
                    index,
                });
            }
            let name = animation.name;
            if map.insert(name, animation).is_some() {
                return Err(LibraryError::Duplicate(name));
            }
        }

        if !map.contains_key(&MoveId::Idle) {
            return Err(LibraryError::MissingIdle);
        }
        for animation in map.values() {
            if let Some(next) = animation.next_combo {
                if !map.contains_key(&next) {
                    return Err(LibraryError::UnknownCombo {
                        name: animation.name,
                        next,
                    });
                }
            }
        }
        Ok(Self { animations: map })
    }

    pub fn get(&self, id: MoveId) -> Option<&Animation> {
        self.animations.get(&id)
    }

    pub fn contains(&self, id: MoveId) -> bool {
        self.animations.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MoveId> + '_ {
        self.animations.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
