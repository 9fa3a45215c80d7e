//! Hand landmark data model, frame boundary and geometry primitives.

use log::warn;
use serde::Deserialize;
use thiserror::Error;

// MediaPipe hand landmark indices.
pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
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

pub const LANDMARK_COUNT: usize = 21;

/// A frame never carries more hands than this; extras are dropped at the
/// boundary with a warning.
pub const MAX_HANDS: usize = 2;

/// Anchor points for the palm center: wrist plus the four finger MCPs.
/// Averaging them gives a much lower-jitter pointer than any single tip.
pub const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// One normalized landmark in [0,1] image space; z is relative depth with
/// the tracking source's sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// Which hand the tracking source believes this is, reported from the
/// camera's unmirrored perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    Unknown,
}

impl Handedness {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Left" => Handedness::Left,
            "Right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
            Handedness::Unknown => "Unknown",
        }
    }
}

/// A complete hand: exactly 21 landmarks. Partial hands never make it past
/// the frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub handedness: Handedness,
}

impl Hand {
    /// Horizontal flip for selfie-view displays: every x becomes `1 - x`.
    /// Callers decide once per rendering context and apply consistently to
    /// drawing and hit-testing.
    pub fn mirror_x(&self) -> Hand {
        let mut out = self.clone();
        for lm in out.landmarks.iter_mut() {
            lm.x = 1.0 - lm.x;
        }
        out
    }

    /// Mean of the wrist and the four finger bases.
    pub fn palm_center(&self) -> Point {
        let mut x = 0.0;
        let mut y = 0.0;
        for &i in &PALM_POINTS {
            x += self.landmarks[i].x;
            y += self.landmarks[i].y;
        }
        let n = PALM_POINTS.len() as f32;
        Point { x: x / n, y: y / n }
    }

    /// Wrist-to-middle-MCP distance, a proxy for how close the hand is to
    /// the camera. Scales the drawing brush.
    pub fn palm_size(&self) -> f32 {
        self.point(WRIST).distance(self.point(MIDDLE_MCP))
    }

    pub fn point(&self, index: usize) -> Point {
        let lm = self.landmarks[index];
        Point { x: lm.x, y: lm.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn to_screen(self, width: f32, height: f32) -> Point {
        Point {
            x: self.x * width,
            y: self.y * height,
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned box in screen pixels, used for hover and drop-zone tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y - height / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y + height / 2.0,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }
}

/// One tracking tick: zero, one or two hands plus the source timestamp.
/// Processed atomically; array order is not a stable hand identity.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub timestamp_ms: u64,
    pub hands: Vec<Hand>,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("hand has {0} landmarks, expected 21")]
    MalformedHand(usize),
    #[error("invalid frame json: {0}")]
    BadJson(#[from] serde_json::Error),
}

// Wire structs for the NDJSON stream the tracking source emits.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawHand {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score: Option<f32>,
    landmarks: Vec<Landmark>,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    timestamp_ms: u64,
    #[serde(default)]
    hands: Vec<RawHand>,
}

impl Hand {
    fn from_raw(raw: RawHand) -> Result<Hand, FrameError> {
        let count = raw.landmarks.len();
        let landmarks: [Landmark; LANDMARK_COUNT] = raw
            .landmarks
            .try_into()
            .map_err(|_| FrameError::MalformedHand(count))?;
        let handedness = raw
            .handedness
            .as_deref()
            .map(Handedness::from_label)
            .unwrap_or(Handedness::Unknown);
        Ok(Hand { landmarks, handedness })
    }
}

impl Frame {
    /// Parse one NDJSON line. Malformed hands are dropped, extra hands
    /// truncated; only unparseable json is an error.
    pub fn from_json(line: &str) -> Result<Frame, FrameError> {
        let raw: RawFrame = serde_json::from_str(line)?;
        let mut hands = Vec::with_capacity(raw.hands.len().min(MAX_HANDS));
        for (i, rh) in raw.hands.into_iter().enumerate() {
            if hands.len() == MAX_HANDS {
                warn!("frame {}: ignoring extra hand #{i}", raw.timestamp_ms);
                continue;
            }
            match Hand::from_raw(rh) {
                Ok(h) => hands.push(h),
                Err(e) => warn!("frame {}: dropping hand #{i}: {e}", raw.timestamp_ms),
            }
        }
        Ok(Frame {
            timestamp_ms: raw.timestamp_ms,
            hands,
        })
    }
}

// ── Test helpers shared across modules ─────────────────────


// ── Tests ──────────────────────────────────────────────────
