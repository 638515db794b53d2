//! Image primitives and utilities.
//!
//! `OwnedImage` is a tightly packed RGBA raster. Screenshots come in as RGBA
//! and crops keep their alpha so that out-of-bounds padding stays transparent
//! until the compositor flattens everything onto white.
//!
//! For read-only work we borrow a view (`Image<'a>`) instead of copying pixels.
//! Crops are always materialized into a fresh `OwnedImage`.

use anyhow::{Context, Result, ensure};

use crate::{Color, Rect};

const CHANNELS: usize = 4;

/// Owned RGBA image, row-major, 4 bytes per pixel, no padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl OwnedImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Opaque image filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let data = [color.r, color.g, color.b, 255]
            .into_iter()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self { width, height, data }
    }

    /// Build an `OwnedImage` from RGBA bytes.
    ///
    /// The buffer must be tightly packed: `width * height * 4` bytes.
    pub fn try_from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        ensure!(
            bytes.len() == expected,
            "rgba buffer holds {} bytes, {}x{} needs {}",
            bytes.len(),
            width,
            height,
            expected
        );
        Ok(Self {
            width,
            height,
            data: bytes,
        })
    }

    pub fn from_rgba_image(image: &image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.as_raw().clone(),
        }
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        // Length is an invariant of `OwnedImage`, so this cannot fail.
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
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
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (x as usize + y as usize * self.width as usize) * CHANNELS
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn set_rgba(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
    }

    /// Iterate over RGB colours in row-major order (alpha dropped).
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|v| Color::new(v[0], v[1], v[2]))
    }

    /// Create a borrowed view of this entire image.
    pub fn as_image<'a>(&'a self) -> Image<'a> {
        Image {
            x1: 0,
            y1: 0,
            x2: self.width,
            y2: self.height,
            true_width: self.width,
            data: &self.data,
        }
    }

    /// Copy `rect` out of this image.
    ///
    /// The result always measures `rect.w x rect.h`; any part of the rectangle
    /// outside the source is transparent black.
    pub fn crop(&self, rect: Rect) -> OwnedImage {
        let mut out = OwnedImage::new(rect.w, rect.h);

        let x1 = rect.x.max(0) as i64;
        let y1 = rect.y.max(0) as i64;
        let x2 = rect.right().min(self.width as i64);
        let y2 = rect.bottom().min(self.height as i64);
        if x2 <= x1 || y2 <= y1 {
            return out;
        }

        let visible = self
            .as_image()
            .sub_image(x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32)
            .to_owned_image();
        out.put(&visible, (x1 - rect.x as i64) as u32, (y1 - rect.y as i64) as u32);
        out
    }

    /// Overwrite pixels with `src` at `(x, y)`, alpha included. Clipped to bounds.
    pub fn put(&mut self, src: &OwnedImage, x: u32, y: u32) {
        let w = src.width.min(self.width.saturating_sub(x));
        let h = src.height.min(self.height.saturating_sub(y));
        let row_len = w as usize * CHANNELS;
        for row in 0..h {
            let s = src.offset(0, row);
            let d = self.offset(x, y + row);
            self.data[d..d + row_len].copy_from_slice(&src.data[s..s + row_len]);
        }
    }

    /// Alpha-composite `src` over this image at `(x, y)`. Clipped to bounds.
    pub fn draw_over(&mut self, src: &OwnedImage, x: u32, y: u32) {
        let w = src.width.min(self.width.saturating_sub(x));
        let h = src.height.min(self.height.saturating_sub(y));
        for sy in 0..h {
            for sx in 0..w {
                let [r, g, b, a] = src.rgba(sx, sy);
                if a == 0 {
                    continue;
                }
                let dst = self.rgba(x + sx, y + sy);
                let px = if a == 255 {
                    [r, g, b, 255]
                } else {
                    let af = a as f32 / 255.0;
                    let da = dst[3] as f32 / 255.0;
                    let out_a = af + da * (1.0 - af);
                    let blend = |s: u8, d: u8| -> u8 {
                        if out_a == 0.0 {
                            return 0;
                        }
                        let v = (s as f32 * af + d as f32 * da * (1.0 - af)) / out_a;
                        v.round().clamp(0.0, 255.0) as u8
                    };
                    [
                        blend(r, dst[0]),
                        blend(g, dst[1]),
                        blend(b, dst[2]),
                        (out_a * 255.0).round() as u8,
                    ]
                };
                self.set_rgba(x + sx, y + sy, px);
            }
        }
    }

    /// Stack two images vertically on a transparent canvas.
    ///
    /// The canvas is as wide as the wider input; `top` lands at the origin and
    /// `bottom` directly beneath it.
    pub fn stack_vertical(top: &OwnedImage, bottom: &OwnedImage) -> OwnedImage {
        let mut out = OwnedImage::new(
            top.width.max(bottom.width),
            top.height + bottom.height,
        );
        out.put(top, 0, 0);
        out.put(bottom, 0, top.height);
        out
    }

    /// Resize to exactly `width x height`.
    ///
    /// Uses `fast_image_resize` (SIMD-optimized).
    pub fn resized(&self, width: u32, height: u32) -> Result<OwnedImage> {
        use fast_image_resize as fr;

        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let src = fr::images::ImageRef::new(self.width, self.height, &self.data, fr::PixelType::U8x4)
            .context("fast_image_resize: ImageRef::new failed")?;
        let mut dst = fr::images::Image::new(width, height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Interpolation(fr::FilterType::CatmullRom));

        resizer
            .resize(&src, &mut dst, &Some(options))
            .context("fast_image_resize: resize failed")?;

        Ok(OwnedImage {
            width,
            height,
            data: dst.into_vec(),
        })
    }

    /// Resize to the given height, preserving aspect ratio.
    ///
    /// The new width is `round(height / self.height * self.width)`.
    pub fn resized_h(&self, height: u32) -> Result<OwnedImage> {
        ensure!(self.width > 0 && self.height > 0, "cannot resize an empty image");
        let width = (height as f64 / self.height as f64 * self.width as f64).round() as u32;
        self.resized(width, height)
    }
}

// ----------

/// Borrowed image view into an `OwnedImage`.
#[derive(Clone, Copy)]
pub struct Image<'a> {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
    true_width: u32,
    data: &'a [u8],
}

impl<'a> Image<'a> {
    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn to_owned_image(self) -> OwnedImage {
        let mut data = Vec::with_capacity(self.width() as usize * self.height() as usize * CHANNELS);
        for y in self.y1..self.y2 {
            let start = (self.x1 as usize + y as usize * self.true_width as usize) * CHANNELS;
            let end = start + self.width() as usize * CHANNELS;
            data.extend_from_slice(&self.data[start..end]);
        }

        OwnedImage {
            width: self.width(),
            height: self.height(),
            data,
        }
    }

    /// Create an arbitrary subimage (relative coordinates), clamped to the view.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width());
        let y = y.min(self.height());
        let width = width.min(self.width() - x);
        let height = height.min(self.height() - y);

        Self {
            x1: self.x1 + x,
            y1: self.y1 + y,
            x2: self.x1 + x + width,
            y2: self.y1 + y + height,
            true_width: self.true_width,
            data: self.data,
        }
    }
}
