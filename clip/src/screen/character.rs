//! Character portrait detection.
//!
//! Character cards frame the portrait with a bright cyan divider of a fixed
//! aspect ratio. We mask that hue band and look for divider-shaped rectangles.
//! [`detect_extra_back`] is a second detector that measures the portrait from
//! the dark panel beside it instead.

use tracing::debug;

use crate::{
    Hsv, HsvImage, Mask, Pos, Rect, Settings,
    color::{in_range, in_range_hsv},
    rect::detect_rects,
};

#[derive(Debug, Clone)]
pub struct CharacterDetection {
    /// Leftmost divider-shaped rectangle, if any.
    pub character_pos: Option<Rect>,
    /// Every merged rectangle found in the mask, before the shape filter.
    pub candidates: Vec<Rect>,
    /// Hue-band mask, kept for debug overlays.
    pub mask: Mask,
}

impl CharacterDetection {
    #[inline]
    pub fn is_character(&self) -> bool {
        self.character_pos.is_some()
    }
}

pub fn divider_mask(hsv: &HsvImage, settings: &Settings) -> Mask {
    let band = settings.divider;
    Mask::from_fn(hsv, |p| p.v > band.min_value && in_range(p.h, band.hue_min, band.hue_max))
}

pub fn detect(hsv: &HsvImage, settings: &Settings) -> CharacterDetection {
    let band = settings.divider;
    let mask = divider_mask(hsv, settings);
    let candidates = detect_rects(&mask);

    let mut bars: Vec<Rect> = candidates
        .iter()
        .copied()
        .filter(|r| r.w > band.min_width && in_range(r.aspect(), band.aspect_min, band.aspect_max))
        .collect();
    bars.sort_by_key(|r| r.x);

    debug!(
        masked = mask.count(),
        candidates = candidates.len(),
        bars = bars.len(),
        "character divider search"
    );

    CharacterDetection {
        character_pos: bars.first().copied(),
        candidates,
        mask,
    }
}

/// Dark backing panel to the right of the portrait.
const EXTRA_BACK: Hsv = Hsv::new(246.0, 0.53, 0.36);
const EXTRA_BACK_TOLERANCE: f64 = 0.97;
/// A later, further-left match must lie within this many rows of the current one.
const EXTRA_BACK_ROW_SLACK: i64 = 10;
/// Rows skipped below the panel before looking for the bright line.
const LINE_SKIP: i64 = 50;
/// Panel-to-line distance on the reference capture.
const REFERENCE_LINE_DISTANCE: f64 = 197.0;

/// Result of the panel-and-line character detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraBackDetection {
    pub extra_back_pos: Option<Pos>,
    /// Row of the bright line found below the panel.
    pub line_y: Option<i64>,
    pub character_pos: Option<Rect>,
}

impl ExtraBackDetection {
    #[inline]
    pub fn is_character(&self) -> bool {
        self.character_pos.is_some()
    }
}

fn find_extra_back(hsv: &HsvImage) -> Option<Pos> {
    let (w, h) = (hsv.width() as i64, hsv.height() as i64);
    let mut found: Option<Pos> = None;
    for y in 0..h {
        for x in 0..w {
            let Some(px) = hsv.get(x, y) else { continue };
            if !in_range_hsv(px, EXTRA_BACK, EXTRA_BACK_TOLERANCE) {
                continue;
            }
            let replaces = match found {
                None => true,
                Some(f) => x < f.x as i64 && (f.y as i64 - y).abs() < EXTRA_BACK_ROW_SLACK,
            };
            if replaces {
                found = Some(Pos::new(x as i32, y as i32));
            }
        }
    }
    found
}

/// Alternative character detector.
///
/// Anchors on the leftmost pixel of the dark backing panel, then walks down
/// that column to the bright cyan line under the portrait. The panel-to-line
/// distance gives the scale of the portrait rectangle.
pub fn detect_extra_back(hsv: &HsvImage) -> ExtraBackDetection {
    let Some(back) = find_extra_back(hsv) else {
        debug!("no extra-back panel");
        return ExtraBackDetection {
            extra_back_pos: None,
            line_y: None,
            character_pos: None,
        };
    };

    let line_y = (back.y as i64 + LINE_SKIP..hsv.height() as i64).find(|&y| {
        hsv.get(back.x as i64, y)
            .is_some_and(|p| in_range(p.h, 180.0, 190.0) && in_range(p.v, 0.99, 1.0))
    });

    let character_pos = line_y.map(|line_y| {
        let ratio = (line_y - back.y as i64) as f64 / REFERENCE_LINE_DISTANCE;
        let round = |v: f64| (v + 0.5).floor();
        Rect::new(
            round(back.x as f64 - 380.0 * ratio) as i32,
            round(back.y as f64 + 196.0 * ratio) as i32,
            round(570.0 * ratio) as u32,
            round(332.0 * ratio) as u32,
        )
    });

    debug!(?back, ?line_y, ?character_pos, "extra-back search");

    ExtraBackDetection {
        extra_back_pos: Some(back),
        line_y,
        character_pos,
    }
}
