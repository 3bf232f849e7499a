//! Photo count per strip and the viewport width class.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Number of photos in one strip: 2, 3 or 4.
///
/// Fixed once a capture run starts; bounds the sequencer loop and drives
/// strip geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LayoutCount(u8);

impl LayoutCount {
    pub const TWO: LayoutCount = LayoutCount(2);
    pub const THREE: LayoutCount = LayoutCount(3);
    pub const FOUR: LayoutCount = LayoutCount(4);

    /// Every supported layout, smallest first.
    pub const ALL: [LayoutCount; 3] = [Self::TWO, Self::THREE, Self::FOUR];

    /// Validate a raw photo count.
    pub fn new(count: u32) -> Result<Self, ModelError> {
        match count {
            2..=4 => Ok(Self(count as u8)),
            other => Err(ModelError::InvalidLayout(other)),
        }
    }

    /// The photo count.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The photo count as `usize`, for indexing.
    pub fn len(self) -> usize {
        self.0 as usize
    }

    /// Never empty; present for API symmetry with [`LayoutCount::len`].
    pub fn is_empty(self) -> bool {
        false
    }

    /// Badge text shown under the layout, e.g. `"3 Photos"`.
    pub fn label(self) -> String {
        format!("{} Photos", self.0)
    }
}

impl Default for LayoutCount {
    fn default() -> Self {
        Self::FOUR
    }
}

impl TryFrom<u8> for LayoutCount {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as u32)
    }
}

impl From<LayoutCount> for u8 {
    fn from(value: LayoutCount) -> Self {
        value.0
    }
}

impl FromStr for LayoutCount {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ModelError::InvalidLayout(0))?;
        Self::new(count)
    }
}

impl fmt::Display for LayoutCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse bucket of the viewport width, used to pick responsive sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    /// Phones: width below 640 px.
    Narrow,
    /// Tablets: width below 1024 px.
    Medium,
    /// Desktops.
    #[default]
    Wide,
}

impl ViewportClass {
    pub const ALL: [ViewportClass; 3] = [Self::Narrow, Self::Medium, Self::Wide];

    /// Classify a viewport width in CSS pixels.
    pub fn from_width(width_px: u32) -> Self {
        if width_px < 640 {
            Self::Narrow
        } else if width_px < 1024 {
            Self::Medium
        } else {
            Self::Wide
        }
    }

    /// Whether the compositor should use its compact size tier.
    ///
    /// The strip only has two tiers: narrow, and everything else.
    pub fn is_narrow(self) -> bool {
        self == Self::Narrow
    }

    /// Requested camera resolution `(width, height)` for this class.
    /// Portrait, since the booth frames a single face.
    pub fn capture_constraints(self) -> (u32, u32) {
        match self {
            Self::Narrow => (480, 640),
            Self::Medium => (600, 800),
            Self::Wide => (720, 960),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Medium => "medium",
            Self::Wide => "wide",
        }
    }
}

impl FromStr for ViewportClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrow" | "mobile" => Ok(Self::Narrow),
            "medium" | "tablet" => Ok(Self::Medium),
            "wide" | "desktop" => Ok(Self::Wide),
            other => Err(ModelError::UnknownViewport(other.to_string())),
        }
    }
}

impl fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
