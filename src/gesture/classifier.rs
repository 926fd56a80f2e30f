//! Single-frame gesture classification from landmark geometry.
//!
//! # Algorithm
//!
//! 1. A digit is *extended* when its tip sits above (smaller `y`) its middle
//!    joint: PIP for the four fingers, IP for the thumb.
//! 2. 0 extended → `fist`, 5 → `open_palm`, only the index → `pointing`.
//! 3. Otherwise, thumb tip within `pinch_threshold` of the index tip → `pinch`.
//! 4. Otherwise `none`.
//!
//! Swipes need motion across frames and are left to the
//! [`TemporalStabilizer`](crate::stabilizer::TemporalStabilizer).
//!
//! Confidence is a constant per gesture type.  It is a placeholder rather
//! than a calibrated probability; consumers only rely on it lying in
//! `[0, 1]` and being comparable against a threshold.

use serde::{Deserialize, Serialize};

use super::landmarks::{
    Hand, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_MCP,
    PINKY_PIP, PINKY_TIP, RING_MCP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};
use super::{Classification, GestureType};

/// Default maximum thumb-tip / index-tip distance for a pinch.
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.05;

const STATIC_POSE_CONFIDENCE: f32 = 0.9;
const PINCH_CONFIDENCE: f32 = 0.8;
const FALLBACK_CONFIDENCE: f32 = 0.5;

/// (tip, middle joint) per digit, thumb first.
const DIGITS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_IP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Tunables for [`GestureClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum 2D thumb/index tip distance (normalized units) for `pinch`.
    pub pinch_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// FingerStates
// ---------------------------------------------------------------------------

/// Extension flag for each of the five digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    /// Evaluate the tip-above-joint test.  `None` for an incomplete hand.
    pub fn from_hand(hand: &Hand) -> Option<Self> {
        if !hand.is_complete() {
            return None;
        }
        let lm = &hand.landmarks;
        let [thumb, index, middle, ring, pinky] =
            DIGITS.map(|(tip, joint)| lm[tip].y < lm[joint].y);
        Some(Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        })
    }

    pub fn extended_count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&e| e)
            .count()
    }
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Stateless landmark → gesture mapping.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Per-digit extension flags, for diagnostics.
    pub fn finger_states(&self, hand: &Hand) -> Option<FingerStates> {
        FingerStates::from_hand(hand)
    }

    /// Classify one hand.
    ///
    /// An incomplete hand (fewer than 21 landmarks) yields `none` with zero
    /// confidence.
    pub fn classify(&self, hand: &Hand) -> Classification {
        let Some(fingers) = FingerStates::from_hand(hand) else {
            log::warn!(
                "classifier: incomplete hand ({} landmarks), treating as none",
                hand.landmarks.len()
            );
            return Classification::none();
        };

        let gesture_type = self.gesture_type(hand, &fingers);
        log::trace!("classifier: {fingers:?} → {gesture_type}");
        Classification::new(gesture_type, confidence_for(gesture_type))
    }

    /// Classify the first detected hand, or the synthetic `none` for an empty
    /// frame.  Only one hand drives the pipeline.
    pub fn classify_frame<'a>(&self, hands: &'a [Hand]) -> (Classification, Option<&'a Hand>) {
        match hands.first() {
            Some(hand) => (self.classify(hand), Some(hand)),
            None => (Classification::none(), None),
        }
    }

    fn gesture_type(&self, hand: &Hand, fingers: &FingerStates) -> GestureType {
        match fingers.extended_count() {
            0 => return GestureType::Fist,
            5 => return GestureType::OpenPalm,
            1 if fingers.index => return GestureType::Pointing,
            _ => {}
        }

        let lm = &hand.landmarks;
        if lm[THUMB_TIP].distance_2d(&lm[INDEX_TIP]) < self.config.pinch_threshold {
            return GestureType::Pinch;
        }

        GestureType::None
    }
}

/// Constant confidence assigned to each gesture type.
pub fn confidence_for(gesture_type: GestureType) -> f32 {
    match gesture_type {
        GestureType::Fist | GestureType::OpenPalm | GestureType::Pointing => STATIC_POSE_CONFIDENCE,
        GestureType::Pinch => PINCH_CONFIDENCE,
        _ => FALLBACK_CONFIDENCE,
    }
}

/// Mean image-plane position of the wrist and the four finger MCP joints.
///
/// The palm moves with the whole hand but not with individual fingers, which
/// makes it a stable anchor for tracking motion across frames.
pub fn palm_centroid(hand: &Hand) -> Option<(f32, f32)> {
    if !hand.is_complete() {
        return None;
    }
    let n = PALM_POINTS.len() as f32;
    let (sx, sy) = PALM_POINTS
        .iter()
        .map(|&i| &hand.landmarks[i])
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some((sx / n, sy / n))
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::gesture::landmarks::Landmark;

    fn classify(hand: &Hand) -> Classification {
        GestureClassifier::default().classify(hand)
    }

    #[test]
    fn all_digits_extended_is_open_palm() {
        let c = classify(&open_palm());
        assert_eq!(c.gesture_type, GestureType::OpenPalm);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn no_digits_extended_is_fist() {
        let c = classify(&fist());
        assert_eq!(c.gesture_type, GestureType::Fist);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn only_index_extended_is_pointing() {
        let c = classify(&hand_with([false, true, false, false, false]));
        assert_eq!(c.gesture_type, GestureType::Pointing);
        assert_eq!(c.confidence, 0.9);
    }

    #[test]
    fn only_middle_extended_is_not_pointing() {
        let c = classify(&hand_with([false, false, true, false, false]));
        assert_eq!(c.gesture_type, GestureType::None);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn finger_states_reports_each_digit() {
        let states = GestureClassifier::default()
            .finger_states(&hand_with([true, false, true, false, true]))
            .unwrap();
        assert!(states.thumb && states.middle && states.pinky);
        assert!(!states.index && !states.ring);
        assert_eq!(states.extended_count(), 3);
        assert!(GestureClassifier::default().finger_states(&Hand::empty()).is_none());
    }

    #[test]
    fn touching_thumb_and_index_is_pinch() {
        // Thumb and index both extended (2 digits), tips almost touching.
        let mut hand = hand_with([true, true, false, false, false]);
        hand.landmarks[THUMB_TIP] = Landmark::new(0.40, 0.30, 0.0);
        hand.landmarks[INDEX_TIP] = Landmark::new(0.42, 0.31, 0.0);

        let c = classify(&hand);
        assert_eq!(c.gesture_type, GestureType::Pinch);
        assert_eq!(c.confidence, 0.8);
    }

    #[test]
    fn pinch_threshold_is_exclusive() {
        let mut hand = hand_with([true, true, false, false, false]);
        hand.landmarks[THUMB_TIP] = Landmark::new(0.40, 0.30, 0.0);
        hand.landmarks[INDEX_TIP] = Landmark::new(0.46, 0.30, 0.0);
        assert_eq!(classify(&hand).gesture_type, GestureType::None);

        let loose = GestureClassifier::new(ClassifierConfig {
            pinch_threshold: 0.1,
        });
        assert_eq!(loose.classify(&hand).gesture_type, GestureType::Pinch);
    }

    #[test]
    fn static_poses_take_priority_over_pinch() {
        // Index alone extended with the thumb tip right next to it.
        let mut hand = hand_with([false, true, false, false, false]);
        hand.landmarks[INDEX_TIP] = Landmark::new(0.35, 0.49, 0.0);
        hand.landmarks[THUMB_TIP] = Landmark::new(0.35, 0.51, 0.0);
        let c = classify(&hand);
        assert_eq!(c.gesture_type, GestureType::Pointing);
    }

    #[test]
    fn every_extension_pattern_maps_consistently() {
        for bits in 0u8..32 {
            let ext = [0, 1, 2, 3, 4].map(|i| bits & (1 << i) != 0);
            let c = classify(&hand_with(ext));
            let count = ext.iter().filter(|&&e| e).count();
            let expected = match count {
                0 => GestureType::Fist,
                5 => GestureType::OpenPalm,
                1 if ext[1] => GestureType::Pointing,
                _ => GestureType::None,
            };
            assert_eq!(c.gesture_type, expected, "pattern {ext:?}");
            assert!((0.0..=1.0).contains(&c.confidence));
        }
    }

    #[test]
    fn incomplete_hand_is_none_with_zero_confidence() {
        let mut hand = open_palm();
        hand.landmarks.truncate(10);
        assert_eq!(classify(&hand), Classification::none());
    }

    #[test]
    fn empty_frame_classifies_as_none() {
        let (c, hand) = GestureClassifier::default().classify_frame(&[]);
        assert_eq!(c.gesture_type, GestureType::None);
        assert_eq!(c.confidence, 0.0);
        assert!(hand.is_none());
    }

    #[test]
    fn first_hand_drives_the_frame() {
        let hands = vec![fist(), open_palm()];
        let (c, hand) = GestureClassifier::default().classify_frame(&hands);
        assert_eq!(c.gesture_type, GestureType::Fist);
        assert_eq!(hand, Some(&hands[0]));
    }

    #[test]
    fn confidence_table() {
        assert_eq!(confidence_for(GestureType::Pinch), 0.8);
        assert_eq!(confidence_for(GestureType::None), 0.5);
        assert_eq!(confidence_for(GestureType::ThumbsUp), 0.5);
        assert_eq!(confidence_for(GestureType::SwipeLeft), 0.5);
    }

    #[test]
    fn centroid_follows_translation() {
        let hand = open_palm();
        let (x0, y0) = palm_centroid(&hand).unwrap();
        let (x1, y1) = palm_centroid(&translated(&hand, -0.2, 0.1)).unwrap();
        assert!((x1 - (x0 - 0.2)).abs() < 1e-5);
        assert!((y1 - (y0 + 0.1)).abs() < 1e-5);
        assert!(palm_centroid(&Hand::empty()).is_none());
    }
}
