//! Shape sorting: pinch the spawned shape, carry it, release it over the
//! matching pile. Evaluation happens on the release frame.

use crate::actions::{Effect, ShapeKind};
use crate::config::Profile;
use crate::games::{Game, Picker, tracked_hands};
use crate::gestures;
use crate::hand::{Frame, Point, Rect};
use crate::session::{DragEvent, DragTracker, Phase};

const SHAPE_HALF: f32 = 30.0;
const PILE_SIZE: f32 = 150.0;

#[derive(Debug, Clone)]
pub struct Pile {
    pub kind: ShapeKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy)]
struct ShapeState {
    kind: ShapeKind,
    at: Point,
}

pub struct ShapesGame {
    profile: Profile,
    screen: (f32, f32),
    picker: Picker,
    piles: Vec<Pile>,
    shape: Option<ShapeState>,
    drag: DragTracker,
    score: u32,
}

fn default_piles(screen: (f32, f32)) -> Vec<Pile> {
    let (w, h) = screen;
    let top = h - PILE_SIZE;
    [(0.1, ShapeKind::Circle), (0.5, ShapeKind::Square), (0.9, ShapeKind::Triangle)]
        .into_iter()
        .map(|(fx, kind)| Pile {
            kind,
            rect: Rect::new(
                w * fx - PILE_SIZE / 2.0,
                top,
                w * fx + PILE_SIZE / 2.0,
                top + PILE_SIZE,
            ),
        })
        .collect()
}

impl ShapesGame {
    pub fn new(profile: Profile, screen: (f32, f32), seed: u64) -> Self {
        let piles = default_piles(screen);
        Self {
            profile,
            screen,
            picker: Picker::new(seed),
            piles,
            shape: None,
            drag: DragTracker::default(),
            score: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn spawn(&mut self, out: &mut Vec<Effect>) {
        let kind = *self.picker.pick(&ShapeKind::ALL);
        self.shape = Some(ShapeState {
            kind,
            at: Point {
                x: self.screen.0 / 2.0,
                y: self.screen.1 / 2.0,
            },
        });
        out.push(Effect::ShapeSpawned(kind));
    }

    /// First overlapping pile wins; a drop over empty floor leaves the
    /// shape where it fell.
    fn evaluate_drop(&mut self, at: Point, out: &mut Vec<Effect>) {
        let Some(shape) = self.shape else { return };
        let footprint = Rect::from_center(at, SHAPE_HALF * 2.0, SHAPE_HALF * 2.0);
        let Some(pile) = self.piles.iter().find(|p| p.rect.overlaps(&footprint)) else {
            return;
        };
        let matched = pile.kind == shape.kind;
        out.push(Effect::ShapeDropped { matched });
        if matched {
            self.score += 1;
            out.push(Effect::Score(1));
            self.shape = None;
            self.spawn(out);
        }
    }
}

impl Game for ShapesGame {
    fn update(&mut self, frame: &Frame) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.shape.is_none() {
            self.spawn(&mut out);
        }

        let hand = tracked_hands(frame, self.profile.tracking.max_hands)
            .first()
            .map(|h| {
                if self.profile.pointer.mirror {
                    h.mirror_x()
                } else {
                    h.clone()
                }
            });
        let pointer = hand.as_ref().map(|h| {
            self.profile
                .pointer
                .anchor
                .resolve(h)
                .to_screen(self.screen.0, self.screen.1)
        });
        let grab = hand
            .as_ref()
            .map(|h| gestures::is_pinching(h, self.profile.thresholds.pinch))
            .unwrap_or(false);

        let shape_at = self.shape.map(|s| s.at);
        let reach = self.profile.thresholds.grab_radius_px;
        let event = self.drag.update(grab, pointer, |p| {
            shape_at.map(|at| p.distance(at) <= reach).unwrap_or(false)
        });

        match event {
            DragEvent::Started(p) | DragEvent::Moved(p) => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.at = p;
                    out.push(Effect::ShapeMoved(p));
                }
            }
            DragEvent::Dropped(p) => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.at = p;
                }
                self.evaluate_drop(p, &mut out);
            }
            DragEvent::Idle => {}
        }
        out
    }

    fn phase(&self) -> Phase {
        Phase::Active
    }
}

// ── Tests ──────────────────────────────────────────────────
