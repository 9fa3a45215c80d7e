//! Freehand spray painting. An instruction overlay gates the session; once
//! dismissed, the open hand sprays from the palm center with a brush scaled
//! to palm size, a fist edge picks a new color, and a thumbs-down from both
//! hands returns to the menu.

use crate::actions::{Effect, Page, Rgb};
use crate::config::Profile;
use crate::games::{Game, Picker, tracked_hands};
use crate::gestures::{self, EdgeDetector};
use crate::hand::{Frame, Hand, Rect};
use crate::session::{NavLatch, Phase, PromptGate};

pub struct DrawGame {
    profile: Profile,
    screen: (f32, f32),
    phase: Phase,
    gate: PromptGate,
    latch: NavLatch,
    edge: EdgeDetector,
    color: Rgb,
    picker: Picker,
}

fn ok_button(screen: (f32, f32)) -> Rect {
    // The overlay's OK control sits at the middle of the screen.
    let (w, h) = screen;
    Rect::from_center(crate::hand::Point { x: w / 2.0, y: h / 2.0 }, 160.0, 60.0)
}

impl DrawGame {
    pub fn new(profile: Profile, screen: (f32, f32), seed: u64) -> Self {
        let mut picker = Picker::new(seed);
        let color = picker.rgb();
        let edge = EdgeDetector::new(profile.debounce.polarity);
        Self {
            profile,
            screen,
            phase: Phase::AwaitingPrompt,
            gate: PromptGate::new(ok_button(screen)),
            latch: NavLatch::default(),
            edge,
            color,
            picker,
        }
    }

    pub fn brush_color(&self) -> Rgb {
        self.color
    }

    fn brush_scale(&self, hand: &Hand) -> f32 {
        let th = &self.profile.thresholds;
        (hand.palm_size() * th.brush_gain).clamp(th.brush_min, th.brush_max)
    }

    fn view(&self, hand: &Hand) -> Hand {
        if self.profile.pointer.mirror {
            hand.mirror_x()
        } else {
            hand.clone()
        }
    }
}

impl Game for DrawGame {
    fn update(&mut self, frame: &Frame) -> Vec<Effect> {
        if self.latch.is_set() {
            return Vec::new();
        }
        let mut out = Vec::new();

        match self.phase {
            Phase::AwaitingPrompt => {
                if self
                    .gate
                    .try_dismiss(frame, self.profile.pointer.mirror, self.screen)
                {
                    self.phase = Phase::Active;
                    out.push(Effect::DismissPrompt);
                }
            }
            Phase::Active => {
                let hands = tracked_hands(frame, self.profile.tracking.max_hands);
                let dislikes = hands
                    .iter()
                    .filter(|h| gestures::is_dislike_sign(&self.view(h)))
                    .count();
                if dislikes >= self.profile.thresholds.dislike_hands {
                    self.latch.set();
                    self.phase = Phase::Navigating;
                    out.push(Effect::Navigate(Page::Menu));
                    return out;
                }
                match hands {
                    [hand] => {
                        let view = self.view(hand);
                        let fist = gestures::is_fist(&view);
                        if self.edge.update(fist) {
                            self.color = self.picker.rgb();
                            out.push(Effect::BrushColor(self.color));
                        }
                        if !fist {
                            let at = view.palm_center().to_screen(self.screen.0, self.screen.1);
                            out.push(Effect::Spray {
                                at,
                                color: self.color,
                                scale: self.brush_scale(&view),
                            });
                        }
                    }
                    [] => {
                        // Hand lost: forget the fist level so a re-entering
                        // fist fires a fresh edge.
                        self.edge.reset();
                    }
                    _ => {}
                }
            }
            Phase::Navigating => {}
        }
        out
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::PointerAnchor;
    use crate::hand::testkit::*;
    use crate::hand::{
        Handedness, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP, PINKY_TIP, RING_MCP,
        RING_TIP, THUMB_MCP, THUMB_TIP, WRIST,
    };

    const SCREEN: (f32, f32) = (800.0, 600.0);

    fn game() -> DrawGame {
        DrawGame::new(Profile::test(2, PointerAnchor::PalmCenter), SCREEN, 5)
    }

    fn dismissed_game() -> DrawGame {
        let mut game = game();
        let out = game.update(&frame_of(vec![fist_hand(Handedness::Right)]));
        assert_eq!(out, vec![Effect::DismissPrompt]);
        // Release the fist so the dismissal does not count as a color edge.
        game.update(&frame_of(vec![open_hand(Handedness::Right)]));
        game
    }

    #[test]
    fn prompt_gate_requires_palm_over_ok_with_fist() {
        let mut game = game();
        // Open hand over the button: no dismissal.
        assert!(game.update(&frame_of(vec![open_hand(Handedness::Right)])).is_empty());
        assert_eq!(game.phase(), Phase::AwaitingPrompt);

        // Fist with the palm centered on screen: the default fixture palm
        // sits at (400, 300), inside the OK box.
        let out = game.update(&frame_of(vec![fist_hand(Handedness::Right)]));
        assert!(out.contains(&Effect::DismissPrompt));
        assert_eq!(game.phase(), Phase::Active);
    }

    #[test]
    fn open_hand_sprays_with_palm_scaled_brush() {
        let mut game = dismissed_game();
        let mut hand = open_hand(Handedness::Right);
        set(&mut hand, WRIST, 0.5, 0.8);
        set(&mut hand, MIDDLE_MCP, 0.5, 0.5); // palm size 0.3 → scale 3.0
        let out = game.update(&frame_of(vec![hand]));
        let spray = out.iter().find_map(|e| match e {
            Effect::Spray { scale, color, .. } => Some((*scale, *color)),
            _ => None,
        });
        let (scale, color) = spray.expect("open hand should spray");
        assert!((scale - 3.0).abs() < 1e-5);
        assert_eq!(color, game.brush_color());
    }

    #[test]
    fn brush_scale_clamps_both_ends() {
        let game = dismissed_game();
        let mut tiny = open_hand(Handedness::Right);
        set(&mut tiny, WRIST, 0.5, 0.5);
        set(&mut tiny, MIDDLE_MCP, 0.5, 0.51);
        assert_eq!(game.brush_scale(&tiny), 0.5);

        let mut huge = open_hand(Handedness::Right);
        set(&mut huge, WRIST, 0.5, 1.0);
        set(&mut huge, MIDDLE_MCP, 0.5, 0.0);
        assert_eq!(game.brush_scale(&huge), 5.0);
    }

    #[test]
    fn fist_edge_changes_color_once_and_holds_do_not_repeat() {
        let mut game = dismissed_game();
        let before = game.brush_color();

        let fist = frame_of(vec![fist_hand(Handedness::Right)]);
        let out = game.update(&fist);
        assert!(matches!(out.as_slice(), [Effect::BrushColor(_)]));
        let after = game.brush_color();
        assert_ne!(before, after);

        // Held fist: no spray, no further color change.
        assert!(game.update(&fist).is_empty());
        assert!(game.update(&fist).is_empty());
        assert_eq!(game.brush_color(), after);
    }

    #[test]
    fn losing_the_hand_rearms_the_color_edge() {
        let mut game = dismissed_game();
        let fist = frame_of(vec![fist_hand(Handedness::Right)]);
        game.update(&fist);
        let first = game.brush_color();
        game.update(&frame_of(vec![])); // hand lost
        let out = game.update(&fist);
        assert!(matches!(out.as_slice(), [Effect::BrushColor(_)]));
        assert_ne!(game.brush_color(), first);
    }

    fn dislike_hand() -> crate::hand::Hand {
        // Folded left of the MCPs raw, so the mirrored view folds right.
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
            set(&mut hand, mcp, 0.6, 0.5);
            set(&mut hand, tip, 0.4, 0.5);
        }
        hand
    }

    #[test]
    fn two_dislike_hands_navigate_home() {
        let mut game = dismissed_game();
        let out = game.update(&frame_of(vec![dislike_hand(), dislike_hand()]));
        assert_eq!(out, vec![Effect::Navigate(Page::Menu)]);
        assert_eq!(game.phase(), Phase::Navigating);
        assert!(game.update(&frame_of(vec![dislike_hand(), dislike_hand()])).is_empty());
    }

    #[test]
    fn one_dislike_hand_is_not_enough() {
        let mut game = dismissed_game();
        let out = game.update(&frame_of(vec![dislike_hand()]));
        assert!(!out.iter().any(|e| matches!(e, Effect::Navigate(_))));
        assert_eq!(game.phase(), Phase::Active);
    }

    #[test]
    fn two_open_hands_do_not_spray() {
        let mut game = dismissed_game();
        let out = game.update(&frame_of(vec![
            open_hand(Handedness::Right),
            open_hand(Handedness::Left),
        ]));
        assert!(out.is_empty());
    }
}
