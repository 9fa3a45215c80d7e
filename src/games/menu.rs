//! Game selector: hover a tile with the hand, make a fist to open it.

use crate::actions::{Effect, Page};
use crate::config::Profile;
use crate::games::{Game, tracked_hands};
use crate::gestures::GestureState;
use crate::hand::{Frame, Rect};
use crate::session::{HoverChange, HoverTracker, Hotspot, NavLatch, Phase};

pub struct MenuGame {
    profile: Profile,
    screen: (f32, f32),
    tiles: Vec<Hotspot>,
    hover: HoverTracker,
    latch: NavLatch,
}

fn default_tiles(screen: (f32, f32)) -> Vec<Hotspot> {
    // Four tiles in a centered row, sized relative to the screen.
    let (w, h) = screen;
    let tile_w = w * 0.18;
    let tile_h = h * 0.3;
    let gap = w * 0.04;
    let total = 4.0 * tile_w + 3.0 * gap;
    let top = h * 0.35;
    ["colors", "draw", "pong", "shapes"]
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let left = (w - total) / 2.0 + i as f32 * (tile_w + gap);
            Hotspot::new(id, Rect::new(left, top, left + tile_w, top + tile_h))
        })
        .collect()
}

fn page_for(tile: &str) -> Option<Page> {
    match tile {
        "colors" => Some(Page::Colors),
        "draw" => Some(Page::Draw),
        "pong" => Some(Page::Pong),
        "shapes" => Some(Page::Shapes),
        _ => None,
    }
}

impl MenuGame {
    pub fn new(profile: Profile, screen: (f32, f32)) -> Self {
        let tiles = default_tiles(screen);
        Self::with_tiles(profile, screen, tiles)
    }

    pub fn with_tiles(profile: Profile, screen: (f32, f32), tiles: Vec<Hotspot>) -> Self {
        Self {
            profile,
            screen,
            tiles,
            hover: HoverTracker::default(),
            latch: NavLatch::default(),
        }
    }
}

impl Game for MenuGame {
    fn update(&mut self, frame: &Frame) -> Vec<Effect> {
        if self.latch.is_set() {
            return Vec::new();
        }
        let mut out = Vec::new();

        let state = tracked_hands(frame, self.profile.tracking.max_hands)
            .first()
            .map(|h| {
                let hand = if self.profile.pointer.mirror {
                    h.mirror_x()
                } else {
                    h.clone()
                };
                GestureState::classify(&hand, self.profile.pointer.anchor)
            });
        let pointer = state
            .as_ref()
            .map(|s| s.pointer.to_screen(self.screen.0, self.screen.1));

        match self.hover.update(pointer, &self.tiles) {
            Some(HoverChange::Entered(id)) => out.push(Effect::Highlight(Some(id))),
            Some(HoverChange::Cleared) => out.push(Effect::Highlight(None)),
            None => {}
        }

        // Selection needs hover and fist on the same frame; hover alone
        // never navigates.
        if let (Some(s), Some(tile)) = (state.as_ref(), self.hover.current()) {
            if s.is_fist {
                if let Some(page) = page_for(tile) {
                    self.latch.set();
                    out.push(Effect::Navigate(page));
                }
            }
        }
        out
    }

    fn phase(&self) -> Phase {
        if self.latch.is_set() {
            Phase::Navigating
        } else {
            Phase::Active
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::PointerAnchor;
    use crate::hand::testkit::*;
    use crate::hand::{Handedness, MIDDLE_MCP};

    fn game() -> MenuGame {
        // One 100x100 tile named "pong" at 100..200 x 100..200.
        MenuGame::with_tiles(
            Profile::test(1, PointerAnchor::MiddleMcp),
            (1000.0, 1000.0),
            vec![Hotspot::new("pong", Rect::new(100.0, 100.0, 200.0, 200.0))],
        )
    }

    // Pointer is the mirrored middle MCP: raw x 0.85 lands at screen x 150.
    fn hand_over_tile(fist: bool) -> crate::hand::Hand {
        let mut hand = if fist {
            fist_hand(Handedness::Right)
        } else {
            open_hand(Handedness::Right)
        };
        set(&mut hand, MIDDLE_MCP, 0.85, 0.15);
        hand
    }

    #[test]
    fn hover_highlights_once_and_fist_selects() {
        let mut game = game();

        let hover = game.update(&frame_of(vec![hand_over_tile(false)]));
        assert_eq!(hover, vec![Effect::Highlight(Some("pong".into()))]);

        // Same hover again: no churn.
        assert!(game.update(&frame_of(vec![hand_over_tile(false)])).is_empty());

        let select = game.update(&frame_of(vec![hand_over_tile(true)]));
        assert_eq!(select, vec![Effect::Navigate(Page::Pong)]);
        assert_eq!(game.phase(), Phase::Navigating);
    }

    #[test]
    fn fist_off_tile_does_not_select() {
        let mut game = game();
        let mut hand = fist_hand(Handedness::Right);
        set(&mut hand, MIDDLE_MCP, 0.1, 0.9);
        let out = game.update(&frame_of(vec![hand]));
        assert!(!out.iter().any(|e| matches!(e, Effect::Navigate(_))));
    }

    #[test]
    fn losing_the_hand_clears_the_highlight() {
        let mut game = game();
        game.update(&frame_of(vec![hand_over_tile(false)]));
        let out = game.update(&frame_of(vec![]));
        assert_eq!(out, vec![Effect::Highlight(None)]);
    }

    #[test]
    fn latch_blocks_adversarial_frames() {
        let mut game = game();
        game.update(&frame_of(vec![hand_over_tile(true)]));
        assert_eq!(game.phase(), Phase::Navigating);

        // Two fists over the tile after navigation: nothing happens.
        let adversarial = frame_of(vec![hand_over_tile(true), hand_over_tile(true)]);
        assert!(game.update(&adversarial).is_empty());
        assert_eq!(game.phase(), Phase::Navigating);
    }
}
