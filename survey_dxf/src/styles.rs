//! Display parameters and the color/symbol rules for survey markers.

use serde::{Deserialize, Serialize};

/// AutoCAD color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AciColor(pub u8);

impl AciColor {
    pub const RED: Self = Self(1);
    pub const YELLOW: Self = Self(2);
    pub const GREEN: Self = Self(3);
    pub const CYAN: Self = Self(4);

    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Size of rendered markers and labels in drawing units. These never affect
/// the projected coordinates or the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    /// Half-width of the X marker arms.
    pub marker_size: f64,
    /// Height of label text.
    pub text_height: f64,
}

impl DisplayParams {
    pub fn new(marker_size: f64, text_height: f64) -> Self {
        Self {
            marker_size,
            text_height,
        }
    }
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self::new(0.05, 0.3)
    }
}

/// GNSS solution class taken from the `Fix ID` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixQuality {
    /// Code 4, fixed RTK solution.
    RtkFixed,
    /// Code 5, float RTK solution.
    RtkFloat,
    #[default]
    Other,
}

impl FixQuality {
    pub fn from_code(code: f64) -> Self {
        if code == 4.0 {
            FixQuality::RtkFixed
        } else if code == 5.0 {
            FixQuality::RtkFloat
        } else {
            FixQuality::Other
        }
    }

    /// Color for the marker and its labels.
    pub fn color(&self) -> AciColor {
        match self {
            FixQuality::RtkFixed => AciColor::RED,
            _ => AciColor::YELLOW,
        }
    }

    /// Whether the X marker gets a horizontal bisecting bar.
    pub fn has_bisector(&self) -> bool {
        matches!(self, FixQuality::RtkFloat)
    }
}

/// Color used for line features.
pub const LINE_COLOR: AciColor = AciColor::CYAN;

/// Color used for polygon features.
pub const POLYGON_COLOR: AciColor = AciColor::GREEN;
