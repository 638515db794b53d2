//! Colour primitives: RGB/HSV conversion and tolerance-band matching.
//!
//! Every detector in the crate compares pixels in HSV space. Hue is kept in
//! degrees (`0..360`), saturation and value in `0..=1`.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    #[inline]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    #[inline]
    pub fn to_rgb(self) -> Color {
        hsv_to_rgb(self)
    }
}

/// Convert an RGB triple to HSV.
///
/// The hue comes from whichever channel equals the maximum, checked in
/// r, g, b order. Achromatic pixels get hue 0.
pub fn rgb_to_hsv(color: Color) -> Hsv {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let sector = if max == min {
        0.0
    } else if max == r {
        (g - b) / diff + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / diff + 2.0
    } else {
        (r - g) / diff + 4.0
    };
    let h = sector / 6.0;

    let s = if max == 0.0 { 0.0 } else { diff / max };

    Hsv { h: h * 360.0, s, v: max }
}

/// Convert HSV (hue in degrees) back to RGB.
///
/// Only needed for preview colours and for building synthetic fixtures.
pub fn hsv_to_rgb(hsv: Hsv) -> Color {
    let h = hsv.h / 360.0;
    let s = hsv.s;
    let v = hsv.v;

    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Color::new(to_channel(r), to_channel(g), to_channel(b))
}

#[inline]
fn to_channel(v: f64) -> u8 {
    (v * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Inclusive range check.
#[inline]
pub fn in_range(target: f64, min: f64, max: f64) -> bool {
    min <= target && target <= max
}

/// True if `b` lies inside the multiplicative band around `a`.
///
/// For each component, `b` must satisfy `a * threshold <= b <= a / threshold`,
/// so `threshold` in `(0, 1]` widens the band as it shrinks. A zero component
/// in `a` only accepts an exact zero in `b`.
pub fn in_range_hsv(a: Hsv, b: Hsv, threshold: f64) -> bool {
    in_range(b.h, a.h * threshold, a.h / threshold)
        && in_range(b.s, a.s * threshold, a.s / threshold)
        && in_range(b.v, a.v * threshold, a.v / threshold)
}
