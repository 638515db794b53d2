//! Screenshot classification and clipping.
//!
//! Weapon detection runs first because it is cheap to reject; the character
//! divider search only runs when neither the weapon nor the summon probe hit.

use tracing::debug;

use crate::{
    HsvImage, OwnedImage, Settings,
    compose::Row,
    screen::{
        character::{self, CharacterDetection},
        weapon::{self, WeaponDetection},
    },
};

/// A screenshot reduced to the part worth keeping, tagged by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedImage {
    Weapon {
        is_additional: bool,
        is_dual: bool,
        image: OwnedImage,
    },
    Summon {
        image: OwnedImage,
    },
    Character {
        image: OwnedImage,
    },
    /// Nothing recognised; carries a copy of the whole input.
    Unknown {
        image: OwnedImage,
    },
}

impl ClassifiedImage {
    pub fn image(&self) -> &OwnedImage {
        match self {
            Self::Weapon { image, .. }
            | Self::Summon { image }
            | Self::Character { image }
            | Self::Unknown { image } => image,
        }
    }

    pub fn into_image(self) -> OwnedImage {
        match self {
            Self::Weapon { image, .. }
            | Self::Summon { image }
            | Self::Character { image }
            | Self::Unknown { image } => image,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weapon { .. } => "Weapon",
            Self::Summon { .. } => "Summon",
            Self::Character { .. } => "Character",
            Self::Unknown { .. } => "Unknown",
        }
    }

    /// Output row this image belongs to.
    pub fn row(&self) -> Row {
        match self {
            Self::Weapon { .. } | Self::Summon { .. } => Row::Upper,
            Self::Character { .. } | Self::Unknown { .. } => Row::Lower,
        }
    }
}

/// Outcome of [`classify`], with the intermediate detections for debugging.
#[derive(Debug, Clone)]
pub struct Classification {
    pub image: ClassifiedImage,
    pub weapon: WeaponDetection,
    /// Only present when the character path ran.
    pub character: Option<CharacterDetection>,
}

pub fn classify(image: &OwnedImage, settings: &Settings) -> Classification {
    let hsv = HsvImage::from_image(image);
    let weapon = weapon::detect(image, &hsv, settings);

    if let Some(layout) = weapon.layout {
        if weapon.is_weapon {
            let main = image.crop(layout.weapon_pos1);
            let clipped = if weapon.is_additional {
                OwnedImage::stack_vertical(&main, &image.crop(layout.weapon_pos2))
            } else {
                main
            };
            return Classification {
                image: ClassifiedImage::Weapon {
                    is_additional: weapon.is_additional,
                    is_dual: weapon.is_dual,
                    image: clipped,
                },
                weapon,
                character: None,
            };
        }

        if weapon.is_summon {
            let clipped = OwnedImage::stack_vertical(
                &image.crop(layout.summon_pos1),
                &image.crop(layout.summon_pos2),
            );
            return Classification {
                image: ClassifiedImage::Summon { image: clipped },
                weapon,
                character: None,
            };
        }
    }

    let character = character::detect(&hsv, settings);
    let clipped = match character.character_pos {
        Some(rect) => ClassifiedImage::Character {
            image: image.crop(rect),
        },
        None => {
            debug!(width = image.width(), height = image.height(), "no layout matched");
            ClassifiedImage::Unknown {
                image: image.clone(),
            }
        }
    };

    Classification {
        image: clipped,
        weapon,
        character: Some(character),
    }
}
