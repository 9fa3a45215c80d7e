//! Shared interaction machinery: phases, the navigation latch, prompt
//! dismissal, hover tracking and drag tracking. Each game owns one set of
//! these; there is exactly one writer (the frame callback), so no locking.

use crate::gestures;
use crate::hand::{Frame, Point, Rect};

/// Lifecycle of a game session. `Navigating` is terminal and idempotent:
/// once entered, every further frame is a no-op, which keeps late frame
/// callbacks from firing a second navigation before the page unloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPrompt,
    Active,
    Navigating,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::AwaitingPrompt => "awaiting-prompt",
            Phase::Active => "active",
            Phase::Navigating => "navigating",
        }
    }
}

/// One-way latch checked at the top of every frame handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavLatch {
    set: bool,
}

impl NavLatch {
    pub fn set(&mut self) {
        self.set = true;
    }

    pub fn is_set(&self) -> bool {
        self.set
    }
}

/// A selectable on-screen element: id plus bounding box in pixels.
#[derive(Debug, Clone)]
pub struct Hotspot {
    pub id: String,
    pub rect: Rect,
}

impl Hotspot {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self { id: id.into(), rect }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverChange {
    Entered(String),
    Cleared,
}

/// Tracks the currently hovered element. First containing hotspot wins;
/// re-hovering the same element is a no-op so styling is not churned.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<String>,
}

impl HoverTracker {
    /// Feed this frame's pointer (already in screen pixels, `None` when no
    /// hand is present). Returns a change only when the hovered element
    /// actually changed.
    pub fn update(&mut self, pointer: Option<Point>, hotspots: &[Hotspot]) -> Option<HoverChange> {
        let hit = pointer.and_then(|p| {
            hotspots
                .iter()
                .find(|h| h.rect.contains(p))
                .map(|h| h.id.clone())
        });
        if hit == self.current {
            return None;
        }
        self.current = hit.clone();
        Some(match hit {
            Some(id) => HoverChange::Entered(id),
            None => HoverChange::Cleared,
        })
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Gate in front of a game's instructional overlay. Dismissal couples
/// spatial hover with a confirming gesture: exactly one hand, its palm
/// center over the OK control, and a fist on the same frame.
#[derive(Debug, Clone)]
pub struct PromptGate {
    pub ok_rect: Rect,
}

impl PromptGate {
    pub fn new(ok_rect: Rect) -> Self {
        Self { ok_rect }
    }

    pub fn try_dismiss(&self, frame: &Frame, mirror: bool, screen: (f32, f32)) -> bool {
        if frame.hands.len() != 1 {
            return false;
        }
        let hand = if mirror {
            frame.hands[0].mirror_x()
        } else {
            frame.hands[0].clone()
        };
        let at = hand.palm_center().to_screen(screen.0, screen.1);
        self.ok_rect.contains(at) && gestures::is_fist(&hand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Pickup succeeded this frame; the pointer is the new item position.
    Started(Point),
    Moved(Point),
    /// Grab released with the hand still present: evaluate drop targets.
    Dropped(Point),
    Idle,
}

/// Drag lifecycle: pickup on grab within reach, reposition every held
/// frame, drop on the grab's release edge. Losing the hand mid-drag resets
/// without a drop evaluation.
#[derive(Debug, Default)]
pub struct DragTracker {
    active: bool,
}

impl DragTracker {
    pub fn update(
        &mut self,
        grab: bool,
        pointer: Option<Point>,
        can_pick: impl FnOnce(Point) -> bool,
    ) -> DragEvent {
        match (self.active, grab, pointer) {
            (false, true, Some(p)) if can_pick(p) => {
                self.active = true;
                DragEvent::Started(p)
            }
            (true, true, Some(p)) => DragEvent::Moved(p),
            (true, false, Some(p)) => {
                self.active = false;
                DragEvent::Dropped(p)
            }
            (true, _, None) => {
                self.active = false;
                DragEvent::Idle
            }
            _ => DragEvent::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

// ── Tests ──────────────────────────────────────────────────
