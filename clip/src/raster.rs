//! Per-pixel rasters derived from an `OwnedImage`: HSV values and boolean masks.

use rayon::prelude::*;

use crate::{Hsv, OwnedImage, color::in_range_hsv};

/// Row-major HSV raster, one entry per source pixel.
#[derive(Debug, Clone)]
pub struct HsvImage {
    width: u32,
    height: u32,
    data: Vec<Hsv>,
}

impl HsvImage {
    /// Convert every pixel of `image` to HSV. Alpha is discarded.
    pub fn from_image(image: &OwnedImage) -> Self {
        // Indexed parallel collect keeps row-major order.
        let data = image
            .as_bytes()
            .par_chunks_exact(4)
            .map(|v| crate::Color::new(v[0], v[1], v[2]).to_hsv())
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            data,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_slice(&self) -> &[Hsv] {
        &self.data
    }

    /// Bounds-checked lookup; `None` for anything outside the raster.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Hsv> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        self.data.get(x as usize + y as usize * self.width as usize).copied()
    }

    /// True if any pixel `p` in `[x, x+box_w) x [y, y+box_h)` satisfies
    /// `in_range_hsv(p, target, threshold)`.
    ///
    /// A window whose origin lies past the right or bottom edge never matches;
    /// pixels outside the raster are skipped.
    pub fn find_pixel(&self, x: i64, y: i64, box_w: u32, box_h: u32, target: Hsv, threshold: f64) -> bool {
        if x > self.width as i64 || y > self.height as i64 {
            return false;
        }
        for iy in y..y + box_h as i64 {
            for ix in x..x + box_w as i64 {
                let Some(px) = self.get(ix, iy) else {
                    continue;
                };
                if in_range_hsv(px, target, threshold) {
                    return true;
                }
            }
        }
        false
    }
}

/// Boolean raster marking membership in a colour-defined region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32, data: Vec<bool>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            data.len() == width as usize * height as usize,
            "mask holds {} cells, {}x{} needs {}",
            data.len(),
            width,
            height,
            width as usize * height as usize
        );
        Ok(Self { width, height, data })
    }

    /// Evaluate `f` for every HSV pixel.
    pub fn from_fn(hsv: &HsvImage, f: impl Fn(Hsv) -> bool + Sync) -> Self {
        let data = hsv.as_slice().par_iter().map(|&p| f(p)).collect();
        Self {
            width: hsv.width(),
            height: hsv.height(),
            data,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[x as usize + y as usize * self.width as usize]
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
