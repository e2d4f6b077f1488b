use serde::{Deserialize, Serialize};

/// Target aspect ratios supported by the capture use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    FourToThree,
    SixteenToNine,
}

const RATIO_4_3: f64 = 4.0 / 3.0;
const RATIO_16_9: f64 = 16.0 / 9.0;

impl AspectRatio {
    /// Pick the supported ratio closest to the given display bounds.
    ///
    /// Compares `max(w, h) / min(w, h)` against 4:3 and 16:9 by absolute
    /// distance. Ties favor 4:3. Symmetric in width/height.
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let long = width.max(height) as f64;
        let short = width.min(height).max(1) as f64;
        let preview_ratio = long / short;

        if (preview_ratio - RATIO_4_3).abs() <= (preview_ratio - RATIO_16_9).abs() {
            AspectRatio::FourToThree
        } else {
            AspectRatio::SixteenToNine
        }
    }
}

/// Display rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}
