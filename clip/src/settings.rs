use crate::Hsv;

/// A reference colour and the multiplicative tolerance used to match it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ColorTarget {
    pub hsv: Hsv,
    pub tolerance: f64,
}

impl ColorTarget {
    pub const fn new(h: f64, s: f64, v: f64, tolerance: f64) -> Self {
        Self {
            hsv: Hsv::new(h, s, v),
            tolerance,
        }
    }
}

/// The cyan divider bar that frames a character portrait.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DividerBand {
    pub hue_min: f64,
    pub hue_max: f64,
    /// Pixels must be strictly brighter than this.
    pub min_value: f64,
    /// Candidates must be strictly wider than this.
    pub min_width: u32,
    pub aspect_min: f64,
    pub aspect_max: f64,
}

/// Target heights of the two output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RowHeights {
    pub upper: u32,
    pub lower: u32,
}

/// Detection and layout tunables.
///
/// The defaults are sampled from the game UI; they are exposed so that a
/// config file can follow small palette changes without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    /// Anchor at the left edge of the weapon/summon card header.
    pub green_anchor: ColorTarget,
    /// Anchor above and to the right of the green one.
    pub orange_anchor: ColorTarget,
    pub divider: DividerBand,
    pub rows: RowHeights,
}

impl Settings {
    pub const DEFAULT: Self = Self {
        green_anchor: ColorTarget::new(90.0, 0.61, 0.99, 0.85),
        orange_anchor: ColorTarget::new(26.0, 0.76, 0.78, 0.85),
        divider: DividerBand {
            hue_min: 170.0,
            hue_max: 194.0,
            min_value: 0.5,
            min_width: 100,
            aspect_min: 1.7,
            aspect_max: 1.75,
        },
        rows: RowHeights {
            upper: 600,
            lower: 400,
        },
    };
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
