mod color;
pub use color::*;
mod image;
pub use self::image::*;
mod raster;
pub use raster::*;
mod rect;
pub use rect::{Pos, Rect, detect_rects, merge_overlapping};
mod settings;
pub use settings::*;
mod classify;
pub use classify::*;

pub mod compose;
pub mod overlay;
pub mod screen;

use compose::Collage;

pub struct Clipper {
	settings: Settings,
}

impl Clipper {
	pub fn new(settings: Settings) -> Self {
		Self { settings }
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Classify a screenshot and clip the part worth keeping.
	pub fn classify(&self, image: &OwnedImage) -> Classification {
		classify::classify(image, &self.settings)
	}

	/// Weapon/summon detection only, without clipping.
	pub fn weapon_detect(&self, image: &OwnedImage) -> screen::weapon::WeaponDetection {
		screen::weapon::detect(image, &HsvImage::from_image(image), &self.settings)
	}

	/// Character divider detection only, without clipping.
	pub fn character_detect(&self, image: &OwnedImage) -> screen::character::CharacterDetection {
		screen::character::detect(&HsvImage::from_image(image), &self.settings)
	}

	/// Panel-and-line character detection, an alternative to the divider search.
	pub fn extra_back_detect(&self, image: &OwnedImage) -> screen::character::ExtraBackDetection {
		screen::character::detect_extra_back(&HsvImage::from_image(image))
	}

	/// Render a collage with the configured row heights.
	pub fn compose(&self, collage: &Collage) -> anyhow::Result<Option<OwnedImage>> {
		collage.compose(self.settings.rows)
	}
}

impl Default for Clipper {
	fn default() -> Self {
		Self::new(Settings::default())
	}
}
