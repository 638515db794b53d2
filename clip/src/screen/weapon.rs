//! Weapon and summon card detection.
//!
//! Both layouts share a header with a green marker on the left and an orange
//! marker above and to the right of it. The horizontal distance between the
//! two markers is 305px on the reference capture; every other coordinate is
//! a reference offset from the green marker scaled by that distance.

use tracing::{debug, warn};

use crate::{
    Color, Hsv, HsvImage, OwnedImage, Pos, Rect, Settings,
    color::in_range_hsv,
};

/// Marker distance on the reference capture.
const REFERENCE_SPAN: f64 = 305.0;
/// The orange marker sits within this many rows above the green one.
const ORANGE_ROWS_ABOVE: i64 = 30;
/// Minimum horizontal gap between the markers, and the right margin excluded
/// from the orange search.
const ORANGE_MARGIN: i64 = 100;

/// One fixed-offset single-pixel check.
struct Probe {
    dx: f64,
    dy: f64,
    target: Hsv,
    tolerance: f64,
}

/// Frame around a dual-wield icon.
const DUAL: Probe = Probe { dx: 63.0, dy: 71.0, target: Hsv::new(19.0, 0.86, 0.52), tolerance: 0.8 };
/// Panel shown under weapons with an additional skill.
const ADDITIONAL: Probe = Probe { dx: 61.0, dy: 537.0, target: Hsv::new(211.0, 0.44, 0.76), tolerance: 0.9 };
const WEAPON: Probe = Probe { dx: 40.0, dy: 30.0, target: Hsv::new(181.0, 0.49, 0.65), tolerance: 0.8 };
const SUMMON: Probe = Probe { dx: 0.0, dy: 30.0, target: Hsv::new(33.0, 0.49, 0.49), tolerance: 0.8 };

/// Per-pixel classification used by the anchor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub color: Color,
    pub hsv: Hsv,
    pub is_green: bool,
    pub is_orange: bool,
}

/// Build one `PixelSample` per pixel, row-major.
pub fn sample_pixels(image: &OwnedImage, hsv: &HsvImage, settings: &Settings) -> Vec<PixelSample> {
    let green = settings.green_anchor;
    let orange = settings.orange_anchor;
    image
        .colors()
        .zip(hsv.as_slice())
        .map(|(color, &hsv)| PixelSample {
            color,
            hsv,
            is_green: in_range_hsv(hsv, green.hsv, green.tolerance),
            is_orange: in_range_hsv(hsv, orange.hsv, orange.tolerance),
        })
        .collect()
}

#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[inline]
fn scale_offset(origin: i32, offset: f64, ratio: f64) -> i32 {
    round_half_up(origin as f64 + offset * ratio) as i32
}

#[inline]
fn scale_len(len: f64, ratio: f64) -> u32 {
    round_half_up(len * ratio).max(1.0) as u32
}

/// The four crop rectangles of a weapon/summon card.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct WeaponLayout {
    pub ratio: f64,
    /// Card art and main skill. Dual weapons are 10 reference px taller.
    pub weapon_pos1: Rect,
    /// Additional skill panel.
    pub weapon_pos2: Rect,
    pub summon_pos1: Rect,
    pub summon_pos2: Rect,
}

impl WeaponLayout {
    pub fn from_anchors(green: Pos, orange: Pos, is_dual: bool) -> Self {
        let ratio = Self::ratio(green, orange);
        let rect = |dx: f64, dy: f64, w: f64, h: f64| {
            Rect::new(
                scale_offset(green.x, dx, ratio),
                scale_offset(green.y, dy, ratio),
                scale_len(w, ratio),
                scale_len(h, ratio),
            )
        };

        Self {
            ratio,
            weapon_pos1: rect(-8.0, 40.0, 598.0, if is_dual { 474.0 } else { 464.0 }),
            weapon_pos2: rect(-8.0, 526.0, 598.0, 158.0),
            summon_pos1: rect(-4.0, 50.0, 600.0, 460.0),
            summon_pos2: rect(-2.0, 546.0, 600.0, 140.0),
        }
    }

    #[inline]
    pub fn ratio(green: Pos, orange: Pos) -> f64 {
        (orange.x - green.x) as f64 / REFERENCE_SPAN
    }
}

/// Result of the weapon/summon detector.
///
/// When either marker is missing the anchors are `None`, there is no layout
/// and every flag is false.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponDetection {
    pub green_pos: Option<Pos>,
    pub orange_pos: Option<Pos>,
    pub is_weapon: bool,
    pub is_dual: bool,
    pub is_additional: bool,
    pub is_summon: bool,
    pub layout: Option<WeaponLayout>,
}

impl WeaponDetection {
    pub fn ratio(&self) -> Option<f64> {
        self.layout.map(|l| l.ratio)
    }
}

/// Leftmost green sample; ties on x keep the first one in row-major order.
fn find_green(samples: &[PixelSample], width: u32) -> Option<Pos> {
    let mut found: Option<Pos> = None;
    for (n, p) in samples.iter().enumerate() {
        if !p.is_green {
            continue;
        }
        let x = (n % width as usize) as i32;
        if found.is_none_or(|f| x < f.x) {
            found = Some(Pos::new(x, (n / width as usize) as i32));
        }
    }
    found
}

/// Leftmost orange sample in the band above and to the right of `green`.
fn find_orange(samples: &[PixelSample], width: u32, green: Pos) -> Option<Pos> {
    let w = width as i64;
    let y_start = (green.y as i64 - ORANGE_ROWS_ABOVE).max(0);
    let mut found: Option<Pos> = None;
    for y in y_start..green.y as i64 {
        for x in green.x as i64 + ORANGE_MARGIN..w - ORANGE_MARGIN {
            let p = &samples[(x + y * w) as usize];
            if p.is_orange && found.is_none_or(|f| (x as i32) < f.x) {
                found = Some(Pos::new(x as i32, y as i32));
            }
        }
    }
    found
}

fn probe(hsv: &HsvImage, green: Pos, ratio: f64, probe: &Probe) -> bool {
    hsv.find_pixel(
        scale_offset(green.x, probe.dx, ratio) as i64,
        scale_offset(green.y, probe.dy, ratio) as i64,
        1,
        1,
        probe.target,
        probe.tolerance,
    )
}

pub fn detect(image: &OwnedImage, hsv: &HsvImage, settings: &Settings) -> WeaponDetection {
    let samples = sample_pixels(image, hsv, settings);
    detect_samples(&samples, hsv)
}

/// Run the detector on precomputed samples.
pub fn detect_samples(samples: &[PixelSample], hsv: &HsvImage) -> WeaponDetection {
    let width = hsv.width();

    let Some(green) = find_green(samples, width) else {
        debug!("no green anchor");
        return WeaponDetection::default();
    };
    let Some(orange) = find_orange(samples, width, green) else {
        debug!(?green, "no orange anchor");
        return WeaponDetection {
            green_pos: Some(green),
            ..Default::default()
        };
    };

    let ratio = WeaponLayout::ratio(green, orange);
    let is_dual = probe(hsv, green, ratio, &DUAL);
    let is_additional = probe(hsv, green, ratio, &ADDITIONAL);
    let is_weapon = probe(hsv, green, ratio, &WEAPON);
    let is_summon = probe(hsv, green, ratio, &SUMMON);

    debug!(?green, ?orange, ratio, is_weapon, is_summon, is_dual, is_additional, "weapon probes");
    if is_weapon && is_summon {
        warn!(?green, ratio, "both weapon and summon probes matched; treating as weapon");
    }

    WeaponDetection {
        green_pos: Some(green),
        orange_pos: Some(orange),
        is_weapon,
        is_dual,
        is_additional,
        is_summon,
        layout: Some(WeaponLayout::from_anchors(green, orange, is_dual)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(img: &mut OwnedImage, x: u32, y: u32, hsv: Hsv) {
        let c = hsv.to_rgb();
        img.set_rgba(x, y, [c.r, c.g, c.b, 255]);
    }

    fn run(img: &OwnedImage) -> WeaponDetection {
        detect(img, &HsvImage::from_image(img), &Settings::default())
    }

    #[test]
    fn reference_layout_at_unit_ratio() {
        let layout = WeaponLayout::from_anchors(Pos::new(100, 100), Pos::new(405, 100), false);
        assert_eq!(layout.ratio, 1.0);
        assert_eq!(layout.weapon_pos1, Rect::new(92, 140, 598, 464));
        assert_eq!(layout.weapon_pos2, Rect::new(92, 626, 598, 158));
        assert_eq!(layout.summon_pos1, Rect::new(96, 150, 600, 460));
        assert_eq!(layout.summon_pos2, Rect::new(98, 646, 600, 140));

        let dual = WeaponLayout::from_anchors(Pos::new(100, 100), Pos::new(405, 100), true);
        assert_eq!(dual.weapon_pos1.h, 474);
    }

    #[test]
    fn layout_scales_with_ratio() {
        // ratio 2.0
        let layout = WeaponLayout::from_anchors(Pos::new(20, 30), Pos::new(630, 10), false);
        assert_eq!(layout.ratio, 2.0);
        assert_eq!(layout.weapon_pos1, Rect::new(4, 110, 1196, 928));
    }

    #[test]
    fn leftmost_green_wins_first_in_scan_order() {
        let settings = Settings::default();
        let mut img = OwnedImage::new(20, 20);
        paint(&mut img, 9, 2, settings.green_anchor.hsv);
        paint(&mut img, 5, 8, settings.green_anchor.hsv);
        paint(&mut img, 5, 12, settings.green_anchor.hsv);
        let hsv = HsvImage::from_image(&img);
        let samples = sample_pixels(&img, &hsv, &settings);
        assert_eq!(find_green(&samples, 20), Some(Pos::new(5, 8)));
    }

    #[test]
    fn no_green_anchor_means_nothing_matches() {
        let img = OwnedImage::filled(400, 400, Color::WHITE);
        let det = run(&img);
        assert_eq!(det.green_pos, None);
        assert_eq!(det.orange_pos, None);
        assert_eq!(det.layout, None);
        assert!(!det.is_weapon && !det.is_summon && !det.is_dual && !det.is_additional);
    }

    #[test]
    fn orange_must_be_in_the_band_above() {
        let settings = Settings::default();
        let mut img = OwnedImage::new(800, 200);
        paint(&mut img, 50, 50, settings.green_anchor.hsv);
        // same row as the green marker: outside the band
        paint(&mut img, 355, 50, settings.orange_anchor.hsv);
        let det = run(&img);
        assert_eq!(det.green_pos, Some(Pos::new(50, 50)));
        assert_eq!(det.orange_pos, None);
        assert!(det.layout.is_none());
    }

    #[test]
    fn weapon_probe_sets_flag() {
        let settings = Settings::default();
        let mut img = OwnedImage::new(800, 800);
        paint(&mut img, 50, 50, settings.green_anchor.hsv);
        paint(&mut img, 355, 45, settings.orange_anchor.hsv);
        paint(&mut img, 90, 80, WEAPON.target);
        paint(&mut img, 113, 121, DUAL.target);
        let det = run(&img);
        assert_eq!(det.ratio(), Some(1.0));
        assert!(det.is_weapon);
        assert!(det.is_dual);
        assert!(!det.is_summon);
        assert!(!det.is_additional);
        assert_eq!(det.layout.unwrap().weapon_pos1, Rect::new(42, 90, 598, 474));
    }

    #[test]
    fn summon_probe_sets_flag() {
        let settings = Settings::default();
        let mut img = OwnedImage::new(800, 800);
        paint(&mut img, 50, 50, settings.green_anchor.hsv);
        paint(&mut img, 355, 45, settings.orange_anchor.hsv);
        paint(&mut img, 50, 80, SUMMON.target);
        let det = run(&img);
        assert!(det.is_summon);
        assert!(!det.is_weapon);
    }
}
