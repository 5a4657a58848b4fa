//! Composite bodies built on the simulator: the jointed fighter and the chained bag.
//!
//! Rigs keep only [`BodyId`]s and names. The animation layer addresses limbs by
//! [`Limb`], which maps onto the stable `fighter-<limb>` body names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod bag;
pub mod fighter;

pub use bag::{create_punching_bag, BagRig, BAG_ANCHOR_NAME, BAG_NAME};
pub use fighter::{create_fighter, FighterRig, FIGHTER_ROOT_NAME};

use crate::physics::BodyId;

/// Named fighter part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Limb {
    Torso,
    Head,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
}

impl Limb {
    pub const ALL: [Limb; 10] = [
        Limb::Torso,
        Limb::Head,
        Limb::LeftUpperArm,
        Limb::LeftLowerArm,
        Limb::RightUpperArm,
        Limb::RightLowerArm,
        Limb::LeftUpperLeg,
        Limb::LeftLowerLeg,
        Limb::RightUpperLeg,
        Limb::RightLowerLeg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Limb::Torso => "torso",
            Limb::Head => "head",
            Limb::LeftUpperArm => "leftUpperArm",
            Limb::LeftLowerArm => "leftLowerArm",
            Limb::RightUpperArm => "rightUpperArm",
            Limb::RightLowerArm => "rightLowerArm",
            Limb::LeftUpperLeg => "leftUpperLeg",
            Limb::LeftLowerLeg => "leftLowerLeg",
            Limb::RightUpperLeg => "rightUpperLeg",
            Limb::RightLowerLeg => "rightLowerLeg",
        }
    }

    /// Simulator body name, e.g. `fighter-leftUpperArm`
    pub fn body_name(&self) -> String {
        format!("fighter-{}", self.as_str())
    }

    pub fn is_leg(&self) -> bool {
        matches!(
            self,
            Limb::LeftUpperLeg | Limb::LeftLowerLeg | Limb::RightUpperLeg | Limb::RightLowerLeg
        )
    }
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Limb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Limb::ALL
            .into_iter()
            .find(|limb| limb.as_str() == s)
            .ok_or_else(|| format!("unknown limb: {s}"))
    }
}

/// Limb → body lookup for whoever drives the rig.
pub trait LimbBodies {
    fn limb_body(&self, limb: Limb) -> Option<BodyId>;
}
