//! Debug overlay: paints mask pixels and outlines rectangles on a copy of the
//! source image.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;

use crate::{Mask, OwnedImage, Rect};

pub const MASK_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const RECT_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Outline thickness in pixels.
const THICKNESS: i32 = 5;

pub fn draw(image: &OwnedImage, mask: Option<&Mask>, rects: &[Rect]) -> RgbaImage {
    let mut out = image.to_rgba_image();

    if let Some(mask) = mask.filter(|m| m.width() == out.width() && m.height() == out.height()) {
        for (i, _) in mask.as_slice().iter().enumerate().filter(|(_, set)| **set) {
            let x = (i % mask.width() as usize) as u32;
            let y = (i / mask.width() as usize) as u32;
            out.put_pixel(x, y, MASK_COLOR);
        }
    }

    for r in rects.iter().filter(|r| r.w > 0 && r.h > 0) {
        // Concentric outlines grow inwards; imageproc clips to the canvas.
        for t in 0..THICKNESS {
            let (w, h) = (r.w as i32 - 2 * t, r.h as i32 - 2 * t);
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = imageproc::rect::Rect::at(r.x + t, r.y + t).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut out, rect, RECT_COLOR);
        }
    }

    out
}
