//! Anatomical part vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anatomical category assigned to a sprite region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartLabel {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    WeaponOrAccessory,
    Other,
}

impl PartLabel {
    /// All labels in canonical order
    pub const ALL: [PartLabel; 8] = [
        PartLabel::Head,
        PartLabel::Torso,
        PartLabel::LeftArm,
        PartLabel::RightArm,
        PartLabel::LeftLeg,
        PartLabel::RightLeg,
        PartLabel::WeaponOrAccessory,
        PartLabel::Other,
    ];

    /// Labels naming a concrete limb, head or accessory
    ///
    /// When a torso has to be reconstructed from the primary region, every
    /// pixel already claimed by one of these labels is carved away first.
    pub const SPECIFIC: [PartLabel; 6] = [
        PartLabel::Head,
        PartLabel::LeftArm,
        PartLabel::RightArm,
        PartLabel::LeftLeg,
        PartLabel::RightLeg,
        PartLabel::WeaponOrAccessory,
    ];

    /// Wire name used in JSON payloads
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PartLabel::Head => "head",
            PartLabel::Torso => "torso",
            PartLabel::LeftArm => "left_arm",
            PartLabel::RightArm => "right_arm",
            PartLabel::LeftLeg => "left_leg",
            PartLabel::RightLeg => "right_leg",
            PartLabel::WeaponOrAccessory => "weapon_or_accessory",
            PartLabel::Other => "other",
        }
    }

    /// Human-readable name for overlay text
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            PartLabel::Head => "head",
            PartLabel::Torso => "torso",
            PartLabel::LeftArm => "left arm",
            PartLabel::RightArm => "right arm",
            PartLabel::LeftLeg => "left leg",
            PartLabel::RightLeg => "right leg",
            PartLabel::WeaponOrAccessory => "weapon or accessory",
            PartLabel::Other => "other",
        }
    }
}

impl fmt::Display for PartLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
