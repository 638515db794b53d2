//! Collage composition.
//!
//! Classified images are collected into two rows. Each row is scaled to a
//! fixed height and laid out left to right; the rows are stacked on a white
//! canvas.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::{ClassifiedImage, Color, OwnedImage, settings::RowHeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    /// Weapons and summons.
    Upper,
    /// Characters and anything unrecognised.
    Lower,
}

#[derive(Debug, Clone, Default)]
pub struct Collage {
    upper: Vec<ClassifiedImage>,
    lower: Vec<ClassifiedImage>,
}

impl Collage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the row matching the image kind.
    pub fn push(&mut self, image: ClassifiedImage) {
        match image.row() {
            Row::Upper => self.upper.push(image),
            Row::Lower => self.lower.push(image),
        }
    }

    pub fn remove(&mut self, row: Row, index: usize) -> Option<ClassifiedImage> {
        let items = self.row_mut(row);
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn row(&self, row: Row) -> &[ClassifiedImage] {
        match row {
            Row::Upper => &self.upper,
            Row::Lower => &self.lower,
        }
    }

    fn row_mut(&mut self, row: Row) -> &mut Vec<ClassifiedImage> {
        match row {
            Row::Upper => &mut self.upper,
            Row::Lower => &mut self.lower,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }

    pub fn len(&self) -> usize {
        self.upper.len() + self.lower.len()
    }

    /// Render both rows into one image, or `None` when there is nothing to draw.
    pub fn compose(&self, heights: RowHeights) -> Result<Option<OwnedImage>> {
        let upper = scale_row(&self.upper, heights.upper).context("scale upper row")?;
        let lower = scale_row(&self.lower, heights.lower).context("scale lower row")?;

        let width = row_width(&upper).max(row_width(&lower));
        let upper_h = if upper.is_empty() { 0 } else { heights.upper };
        let lower_h = if lower.is_empty() { 0 } else { heights.lower };
        let height = upper_h + lower_h;

        if width == 0 || height == 0 {
            return Ok(None);
        }

        debug!(width, height, upper = upper.len(), lower = lower.len(), "composing collage");

        let mut canvas = OwnedImage::filled(width, height, Color::WHITE);
        for (row, y) in [(&upper, 0), (&lower, upper_h)] {
            let mut x = 0;
            for img in row.iter() {
                canvas.draw_over(img, x, y);
                x += img.width();
            }
        }

        Ok(Some(canvas))
    }
}

fn scale_row(items: &[ClassifiedImage], height: u32) -> Result<Vec<OwnedImage>> {
    items
        .iter()
        .map(ClassifiedImage::image)
        .filter(|img| {
            let empty = img.width() == 0 || img.height() == 0;
            if empty {
                warn!("skipping empty image in collage row");
            }
            !empty
        })
        .map(|img| img.resized_h(height))
        .collect()
}

fn row_width(row: &[OwnedImage]) -> u32 {
    row.iter().map(OwnedImage::width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHTS: RowHeights = RowHeights { upper: 60, lower: 40 };

    fn weapon(w: u32, h: u32) -> ClassifiedImage {
        ClassifiedImage::Weapon {
            is_additional: false,
            is_dual: false,
            image: OwnedImage::filled(w, h, Color::new(200, 0, 0)),
        }
    }

    fn character(w: u32, h: u32) -> ClassifiedImage {
        ClassifiedImage::Character {
            image: OwnedImage::filled(w, h, Color::new(0, 0, 200)),
        }
    }

    #[test]
    fn empty_collage_has_no_output() {
        assert_eq!(Collage::new().compose(HEIGHTS).unwrap(), None);
    }

    #[test]
    fn buckets_by_kind() {
        let mut c = Collage::new();
        c.push(weapon(10, 10));
        c.push(character(10, 10));
        c.push(ClassifiedImage::Summon { image: OwnedImage::new(3, 3) });
        c.push(ClassifiedImage::Unknown { image: OwnedImage::new(3, 3) });
        assert_eq!(c.len(), 4);
        assert_eq!(c.row(Row::Upper).len(), 2);
        assert_eq!(c.row(Row::Lower).len(), 2);
        assert_eq!(c.row(Row::Lower)[1].kind(), "Unknown");
    }

    #[test]
    fn canvas_size_follows_rows() {
        let mut c = Collage::new();
        // 30x60 -> 30 wide, 60x30 -> 120 wide at height 60
        c.push(weapon(30, 60));
        c.push(weapon(60, 30));
        // 20x20 -> 40 wide at height 40
        c.push(character(20, 20));
        let out = c.compose(HEIGHTS).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (150, 100));

        // lower row is narrower, the rest of it stays white
        assert_eq!(out.rgba(100, 80), [255, 255, 255, 255]);
        let [r, _, b, _] = out.rgba(10, 80);
        assert!(b > 150 && r < 50);
        let [r, _, _, _] = out.rgba(10, 10);
        assert!(r > 150);
    }

    #[test]
    fn single_row_only_uses_its_height() {
        let mut c = Collage::new();
        c.push(character(40, 20));
        let out = c.compose(HEIGHTS).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (80, 40));
    }

    #[test]
    fn transparent_pixels_become_white() {
        let mut c = Collage::new();
        c.push(ClassifiedImage::Summon { image: OwnedImage::new(60, 60) });
        let out = c.compose(HEIGHTS).unwrap().unwrap();
        assert!(out.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn remove_drops_entry() {
        let mut c = Collage::new();
        c.push(character(10, 10));
        assert!(c.remove(Row::Upper, 0).is_none());
        assert!(c.remove(Row::Lower, 0).is_some());
        assert!(c.is_empty());
    }
}
