//! Pure per-hand gesture classifiers.
//!
//! Every function here is stateless and evaluated fresh per hand per frame;
//! the only stateful piece is the [`EdgeDetector`] debouncer. Coordinate
//! convention throughout: y grows downward, so "tip.y > base.y" means the
//! tip is folded below its base.

use serde::Deserialize;

use crate::hand::{
    Hand, Handedness, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_MCP, PINKY_PIP, PINKY_TIP, Point, RING_MCP, RING_PIP, RING_TIP, THUMB_MCP, THUMB_TIP,
    WRIST,
};

pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.1;

const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
const FINGER_PIPS: [usize; 4] = [INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];
const FINGER_MCPS: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Fist: all four non-thumb tips strictly below their PIP bases. The thumb
/// is ignored; a half-closed thumb does not break fist detection.
pub fn is_fist(hand: &Hand) -> bool {
    FINGER_TIPS
        .iter()
        .zip(FINGER_PIPS)
        .all(|(&tip, base)| hand.landmarks[tip].y > hand.landmarks[base].y)
}

/// Thumb rule: x-vs-thumb-MCP with the comparison direction flipped by
/// handedness. Unknown hands use the Right rule.
fn thumb_extended(hand: &Hand) -> bool {
    let tip = hand.landmarks[THUMB_TIP].x;
    let base = hand.landmarks[THUMB_MCP].x;
    match hand.handedness {
        Handedness::Left => tip > base,
        Handedness::Right | Handedness::Unknown => tip < base,
    }
}

/// Number of extended fingers, thumb included, in 0..=5.
pub fn count_fingers(hand: &Hand) -> u8 {
    let mut count = 0;
    for (tip, base) in FINGER_TIPS.iter().zip(FINGER_PIPS) {
        if hand.landmarks[*tip].y < hand.landmarks[base].y {
            count += 1;
        }
    }
    if thumb_extended(hand) {
        count += 1;
    }
    count
}

/// Thumbs-down: thumb tip below both the wrist and the thumb MCP, with all
/// four non-thumb fingers folded horizontally past their MCPs. The fold
/// direction flips with handedness, same as the thumb rule.
pub fn is_dislike_sign(hand: &Hand) -> bool {
    let lm = &hand.landmarks;
    let thumb_down = lm[THUMB_TIP].y > lm[WRIST].y && lm[THUMB_TIP].y > lm[THUMB_MCP].y;
    if !thumb_down {
        return false;
    }
    FINGER_TIPS
        .iter()
        .zip(FINGER_MCPS)
        .all(|(&tip, mcp)| match hand.handedness {
            Handedness::Left => lm[mcp].x > lm[tip].x,
            Handedness::Right | Handedness::Unknown => lm[tip].x > lm[mcp].x,
        })
}

/// Normalized thumb-tip-to-index-tip distance.
pub fn pinch_distance(hand: &Hand) -> f32 {
    hand.point(THUMB_TIP).distance(hand.point(INDEX_TIP))
}

pub fn is_pinching(hand: &Hand, threshold: f32) -> bool {
    pinch_distance(hand) < threshold
}

/// Which landmark drives the on-screen pointer. Palm center for hover-heavy
/// games, a fingertip for pointing and grabbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerAnchor {
    PalmCenter,
    IndexTip,
    MiddleMcp,
}

impl PointerAnchor {
    pub fn resolve(self, hand: &Hand) -> Point {
        match self {
            PointerAnchor::PalmCenter => hand.palm_center(),
            PointerAnchor::IndexTip => hand.point(INDEX_TIP),
            PointerAnchor::MiddleMcp => hand.point(MIDDLE_MCP),
        }
    }
}

/// Per-hand derived classification, recomputed fresh every frame. Pure
/// function of the hand it was computed from; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub is_fist: bool,
    pub is_dislike: bool,
    pub finger_count: u8,
    pub pinch_distance: f32,
    pub palm_center: Point,
    pub pointer: Point,
}

impl GestureState {
    pub fn classify(hand: &Hand, anchor: PointerAnchor) -> GestureState {
        GestureState {
            is_fist: is_fist(hand),
            is_dislike: is_dislike_sign(hand),
            finger_count: count_fingers(hand),
            pinch_distance: pinch_distance(hand),
            palm_center: hand.palm_center(),
            pointer: anchor.resolve(hand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolarity {
    Rising,
    Falling,
}

/// Boolean edge detector: fires exactly once per qualifying transition,
/// never while the level is held.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    polarity: EdgePolarity,
    last: bool,
}

impl EdgeDetector {
    pub fn new(polarity: EdgePolarity) -> Self {
        Self { polarity, last: false }
    }

    pub fn update(&mut self, value: bool) -> bool {
        let fired = match self.polarity {
            EdgePolarity::Rising => value && !self.last,
            EdgePolarity::Falling => !value && self.last,
        };
        self.last = value;
        fired
    }

    /// Forget the previous level, e.g. when the hand leaves the frame.
    pub fn reset(&mut self) {
        self.last = false;
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::testkit::*;

    #[test]
    fn fist_when_all_tips_below_bases() {
        let open = open_hand(Handedness::Right);
        assert!(!is_fist(&open));
        let fist = fist_hand(Handedness::Right);
        assert!(is_fist(&fist));
    }

    #[test]
    fn fist_scenario_from_tracking_coordinates() {
        let mut hand = flat_hand(Handedness::Right);
        for tip in [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            set(&mut hand, tip, 0.5, 0.3);
        }
        for base in [INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP] {
            set(&mut hand, base, 0.5, 0.5);
        }
        // Tips above bases (smaller y): open hand.
        assert!(!is_fist(&hand));
        for tip in [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            set(&mut hand, tip, 0.5, 0.7);
        }
        assert!(is_fist(&hand));
    }

    #[test]
    fn one_raised_tip_breaks_the_fist() {
        let mut hand = fist_hand(Handedness::Right);
        set(&mut hand, RING_TIP, 0.5, 0.25);
        assert!(!is_fist(&hand));
    }

    #[test]
    fn count_fingers_full_open_right_hand() {
        let mut hand = open_hand(Handedness::Right);
        set(&mut hand, THUMB_MCP, 0.5, 0.5);
        set(&mut hand, THUMB_TIP, 0.25, 0.5);
        assert_eq!(count_fingers(&hand), 5);
    }

    #[test]
    fn count_fingers_thumb_flips_with_handedness() {
        let mut right = fist_hand(Handedness::Right);
        set(&mut right, THUMB_MCP, 0.5, 0.5);
        set(&mut right, THUMB_TIP, 0.25, 0.5);
        assert_eq!(count_fingers(&right), 1);

        let mut left = fist_hand(Handedness::Left);
        set(&mut left, THUMB_MCP, 0.5, 0.5);
        set(&mut left, THUMB_TIP, 0.25, 0.5);
        assert_eq!(count_fingers(&left), 0);
        set(&mut left, THUMB_TIP, 0.75, 0.5);
        assert_eq!(count_fingers(&left), 1);
    }

    #[test]
    fn count_fingers_is_monotonic_under_extension() {
        // Extend fingers one at a time from a closed right hand; the count
        // must never decrease.
        let mut hand = fist_hand(Handedness::Right);
        set(&mut hand, THUMB_MCP, 0.5, 0.5);
        set(&mut hand, THUMB_TIP, 0.75, 0.5);
        let mut last = count_fingers(&hand);
        assert_eq!(last, 0);
        for tip in [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
            set(&mut hand, tip, 0.5, 0.25);
            let now = count_fingers(&hand);
            assert!(now >= last);
            last = now;
        }
        set(&mut hand, THUMB_TIP, 0.25, 0.5);
        assert!(count_fingers(&hand) >= last);
        assert_eq!(count_fingers(&hand), 5);
    }

    #[test]
    fn dislike_sign_right_hand_scenario() {
        let mut hand = flat_hand(Handedness::Right);
        set(&mut hand, WRIST, 0.5, 0.5);
        set(&mut hand, THUMB_MCP, 0.5, 0.6);
        set(&mut hand, THUMB_TIP, 0.5, 0.9);
        for (tip, mcp) in [
            (INDEX_TIP, INDEX_MCP),
            (MIDDLE_TIP, MIDDLE_MCP),
            (RING_TIP, RING_MCP),
            (PINKY_TIP, PINKY_MCP),
        ] {
            set(&mut hand, mcp, 0.4, 0.5);
            set(&mut hand, tip, 0.6, 0.5);
        }
        assert!(is_dislike_sign(&hand));

        // Same pose labeled Left folds the wrong way.
        let mut left = hand.clone();
        left.handedness = Handedness::Left;
        assert!(!is_dislike_sign(&left));
    }

    #[test]
    fn dislike_requires_thumb_below_wrist() {
        let mut hand = flat_hand(Handedness::Right);
        set(&mut hand, WRIST, 0.5, 0.9);
        set(&mut hand, THUMB_MCP, 0.5, 0.6);
        set(&mut hand, THUMB_TIP, 0.5, 0.8); // below the MCP, above the wrist
        for (tip, mcp) in [
            (INDEX_TIP, INDEX_MCP),
            (MIDDLE_TIP, MIDDLE_MCP),
            (RING_TIP, RING_MCP),
            (PINKY_TIP, PINKY_MCP),
        ] {
            set(&mut hand, mcp, 0.4, 0.5);
            set(&mut hand, tip, 0.6, 0.5);
        }
        assert!(!is_dislike_sign(&hand));
    }

    #[test]
    fn pinch_distance_and_threshold() {
        let mut hand = flat_hand(Handedness::Right);
        set(&mut hand, THUMB_TIP, 0.5, 0.5);
        set(&mut hand, INDEX_TIP, 0.56, 0.5);
        assert!((pinch_distance(&hand) - 0.06).abs() < 1e-6);
        assert!(is_pinching(&hand, DEFAULT_PINCH_THRESHOLD));
        assert!(!is_pinching(&hand, 0.05));
    }

    #[test]
    fn pointer_anchor_selection() {
        let mut hand = flat_hand(Handedness::Right);
        set(&mut hand, INDEX_TIP, 0.1, 0.2);
        set(&mut hand, MIDDLE_MCP, 0.3, 0.4);
        let tip = PointerAnchor::IndexTip.resolve(&hand);
        assert_eq!((tip.x, tip.y), (0.1, 0.2));
        let mcp = PointerAnchor::MiddleMcp.resolve(&hand);
        assert_eq!((mcp.x, mcp.y), (0.3, 0.4));
        assert_eq!(PointerAnchor::PalmCenter.resolve(&hand), hand.palm_center());
    }

    #[test]
    fn classify_bundles_everything() {
        let hand = fist_hand(Handedness::Right);
        let state = GestureState::classify(&hand, PointerAnchor::PalmCenter);
        assert!(state.is_fist);
        assert!(!state.is_dislike);
        assert_eq!(state.pointer, hand.palm_center());
    }

    #[test]
    fn rising_edge_fires_exactly_on_transitions() {
        let mut edge = EdgeDetector::new(EdgePolarity::Rising);
        let inputs = [false, true, true, true, false, true];
        let fired: Vec<bool> = inputs.iter().map(|&v| edge.update(v)).collect();
        assert_eq!(fired, [false, true, false, false, false, true]);
        assert_eq!(fired.iter().filter(|&&f| f).count(), 2);
    }

    #[test]
    fn falling_edge_fires_on_release() {
        let mut edge = EdgeDetector::new(EdgePolarity::Falling);
        let inputs = [true, true, false, false, true, false];
        let fired: Vec<bool> = inputs.iter().map(|&v| edge.update(v)).collect();
        assert_eq!(fired, [false, false, true, false, false, true]);
    }

    #[test]
    fn edge_reset_forgets_the_level() {
        let mut edge = EdgeDetector::new(EdgePolarity::Rising);
        assert!(edge.update(true));
        edge.reset();
        assert!(edge.update(true));
    }
}
