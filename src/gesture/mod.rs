//! Gesture vocabulary and single-frame classification.
//!
//! * [`landmarks`]: [`Landmark`], [`Hand`], [`Handedness`] and the 21-point
//!   index constants.
//! * [`classifier`]: [`GestureClassifier`], the pure landmarks → gesture
//!   mapping.
//!
//! [`GestureType`] is a closed set.  `None` is the explicit "nothing
//! recognised" sentinel, and consumers must treat it as "do nothing" no matter
//! what confidence accompanies it.

pub mod classifier;
pub mod landmarks;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use classifier::{palm_centroid, ClassifierConfig, FingerStates, GestureClassifier};
pub use landmarks::{GestureError, Hand, Handedness, Landmark, LANDMARK_COUNT};

// ---------------------------------------------------------------------------
// GestureType
// ---------------------------------------------------------------------------

/// Every gesture the pipeline can report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    Fist,
    OpenPalm,
    Pointing,
    ThumbsUp,
    ThumbsDown,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Pinch,
    #[default]
    None,
}

impl GestureType {
    pub const ALL: [GestureType; 11] = [
        GestureType::Fist,
        GestureType::OpenPalm,
        GestureType::Pointing,
        GestureType::ThumbsUp,
        GestureType::ThumbsDown,
        GestureType::SwipeLeft,
        GestureType::SwipeRight,
        GestureType::SwipeUp,
        GestureType::SwipeDown,
        GestureType::Pinch,
        GestureType::None,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::Fist => "fist",
            GestureType::OpenPalm => "open_palm",
            GestureType::Pointing => "pointing",
            GestureType::ThumbsUp => "thumbs_up",
            GestureType::ThumbsDown => "thumbs_down",
            GestureType::SwipeLeft => "swipe_left",
            GestureType::SwipeRight => "swipe_right",
            GestureType::SwipeUp => "swipe_up",
            GestureType::SwipeDown => "swipe_down",
            GestureType::Pinch => "pinch",
            GestureType::None => "none",
        }
    }

    /// Human-readable name for announcements, e.g. `"open palm"`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// `true` for the four directional gestures subject to the swipe cooldown.
    pub fn is_swipe(&self) -> bool {
        matches!(
            self,
            GestureType::SwipeLeft
                | GestureType::SwipeRight
                | GestureType::SwipeUp
                | GestureType::SwipeDown
        )
    }

    pub fn is_none(&self) -> bool {
        *self == GestureType::None
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A gesture label together with its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub gesture_type: GestureType,
    pub confidence: f32,
}

impl Classification {
    pub fn new(gesture_type: GestureType, confidence: f32) -> Self {
        Self {
            gesture_type,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// `none` with zero confidence.
    pub fn none() -> Self {
        Self::new(GestureType::None, 0.0)
    }
}

// ---------------------------------------------------------------------------
// Gesture
// ---------------------------------------------------------------------------

/// A gesture event handed to the registered callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    #[serde(rename = "type")]
    pub gesture_type: GestureType,
    pub confidence: f32,
    pub hand: Hand,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Gesture {
    pub fn new(classification: Classification, hand: Hand, timestamp: u64) -> Self {
        Self {
            gesture_type: classification.gesture_type,
            confidence: classification.confidence,
            hand,
            timestamp,
        }
    }

    /// The synthetic gesture reported when no hand is in view.
    pub fn empty(timestamp: u64) -> Self {
        Self::new(Classification::none(), Hand::empty(), timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        for ty in GestureType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn labels_replace_every_underscore() {
        assert_eq!(GestureType::OpenPalm.label(), "open palm");
        assert_eq!(GestureType::SwipeLeft.label(), "swipe left");
        assert_eq!(GestureType::Fist.label(), "fist");
    }

    #[test]
    fn only_directional_gestures_are_swipes() {
        let swipes: Vec<_> = GestureType::ALL.iter().filter(|t| t.is_swipe()).collect();
        assert_eq!(swipes.len(), 4);
        assert!(!GestureType::Pointing.is_swipe());
    }

    #[test]
    fn confidence_is_clamped_into_unit_range() {
        assert_eq!(Classification::new(GestureType::Fist, 1.7).confidence, 1.0);
        assert_eq!(Classification::new(GestureType::Fist, -0.2).confidence, 0.0);
    }

    #[test]
    fn empty_gesture_is_none_with_zero_confidence() {
        let g = Gesture::empty(42);
        assert_eq!(g.gesture_type, GestureType::None);
        assert_eq!(g.confidence, 0.0);
        assert!(g.hand.landmarks.is_empty());
        assert_eq!(g.timestamp, 42);
    }

    #[test]
    fn gesture_serializes_type_field() {
        let g = Gesture::empty(1);
        let value = serde_json::to_value(&g).unwrap();
        assert_eq!(value["type"], "none");
        assert_eq!(value["hand"]["handedness"], "");
    }
}
