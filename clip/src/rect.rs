//! Rectangle detection over boolean masks.

use crate::Mask;

/// Axis-aligned rectangle in image coordinates, half-open extents.
///
/// The origin is signed because ratio-derived rectangles may start left of or
/// above the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.w as f64 / self.h as f64
    }

    /// Same origin within `ORIGIN_SLACK` and both sides within `SIZE_RATIO`.
    fn is_near_duplicate(&self, other: &Rect) -> bool {
        let dx = (self.x as i64 - other.x as i64).abs();
        let dy = (self.y as i64 - other.y as i64).abs();
        dx < ORIGIN_SLACK
            && dy < ORIGIN_SLACK
            && side_ratio(self.w, other.w) < SIZE_RATIO
            && side_ratio(self.h, other.h) < SIZE_RATIO
    }
}

/// A single point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Blank cells a run may bridge before it ends.
pub const GAP_TOLERANCE: u32 = 10;
/// Runs shorter than this in either direction are noise.
pub const MIN_SIDE: u32 = 50;
const ORIGIN_SLACK: i64 = 10;
const SIZE_RATIO: f64 = 1.1;

#[inline]
fn side_ratio(a: u32, b: u32) -> f64 {
    a.max(b) as f64 / a.min(b) as f64
}

/// Length of a gap-tolerant run starting at a set cell.
///
/// `cells` yields the cells after the start, in walking order.
fn run_length(cells: impl Iterator<Item = bool>) -> u32 {
    let mut len = 1;
    let mut blank = 0;
    for set in cells {
        if set {
            len += blank + 1;
            blank = 0;
        } else {
            blank += 1;
            if blank > GAP_TOLERANCE {
                break;
            }
        }
    }
    len
}

/// Find rectangles starting at every set cell of `mask`, then drop near-duplicates.
///
/// Width is measured along the starting row and height down the starting
/// column. Both tolerate gaps of up to `GAP_TOLERANCE` cells.
pub fn detect_rects(mask: &Mask) -> Vec<Rect> {
    let (w, h) = (mask.width(), mask.height());
    let mut rects = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if !mask.get(x, y) {
                continue;
            }

            let run_w = run_length((x + 1..w).map(|ix| mask.get(ix, y)));
            let run_h = run_length((y + 1..h).map(|iy| mask.get(x, iy)));

            if run_w >= MIN_SIDE && run_h >= MIN_SIDE {
                rects.push(Rect::new(x as i32, y as i32, run_w, run_h));
            }
        }
    }

    tracing::trace!(candidates = rects.len(), "rect candidates before merge");
    merge_overlapping(&rects)
}

/// Keep each rectangle unless an already-kept one is a near-duplicate.
///
/// Greedy and order dependent: a chain of slowly drifting rectangles can keep
/// several members.
pub fn merge_overlapping(rects: &[Rect]) -> Vec<Rect> {
    let mut result: Vec<Rect> = Vec::new();
    for a in rects {
        if !result.iter().any(|b| a.is_near_duplicate(b)) {
            result.push(*a);
        }
    }
    result
}
