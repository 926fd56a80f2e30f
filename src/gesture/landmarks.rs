//! Hand landmark types produced by the Landmark Provider.
//!
//! Coordinates are normalized to the image: `x` and `y` lie in `0.0 – 1.0`
//! with `y` growing *downward*, `z` is depth relative to the wrist.
//!
//! # Landmark layout
//!
//! ```text
//!            8   12  16  20        tips
//!            7   11  15  19        DIP
//!     4      6   10  14  18        PIP   (thumb: 3 = IP)
//!     3      5   9   13  17        MCP
//!      2 ─┐   \  |   |  /
//!      1 ─┴──── 0 (wrist)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Landmark indices
// ---------------------------------------------------------------------------

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

// ---------------------------------------------------------------------------
// GestureError
// ---------------------------------------------------------------------------

/// Errors raised while building or parsing landmark data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureError {
    /// A handedness label was neither `Left`, `Right`, `Unknown_<n>` nor empty.
    #[error("unrecognised handedness label: {0:?}")]
    InvalidHandedness(String),
}

// ---------------------------------------------------------------------------
// Landmark
// ---------------------------------------------------------------------------

/// A single normalized 3D point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane (`z` ignored).
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Which hand the provider believes it detected.
///
/// Serialized as the provider's label: `"Left"`, `"Right"`, `"Unknown_<n>"`
/// (no label reported for the n-th hand) or `""` for the synthetic empty hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Handedness {
    Left,
    Right,
    Unknown(usize),
    #[default]
    Unspecified,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => f.write_str("Left"),
            Handedness::Right => f.write_str("Right"),
            Handedness::Unknown(index) => write!(f, "Unknown_{index}"),
            Handedness::Unspecified => Ok(()),
        }
    }
}

impl TryFrom<String> for Handedness {
    type Error = GestureError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl std::str::FromStr for Handedness {
    type Err = GestureError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            "" => Ok(Handedness::Unspecified),
            other => other
                .strip_prefix("Unknown_")
                .and_then(|n| n.parse().ok())
                .map(Handedness::Unknown)
                .ok_or_else(|| GestureError::InvalidHandedness(other.to_string())),
        }
    }
}

impl From<Handedness> for String {
    fn from(h: Handedness) -> Self {
        h.to_string()
    }
}

// ---------------------------------------------------------------------------
// Hand
// ---------------------------------------------------------------------------

/// All landmarks of one detected hand in one frame.
///
/// A `Hand` is created fresh for every frame and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub handedness: Handedness,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// The placeholder hand attached to a zero-hand gesture.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when all 21 landmarks are present.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}
