//! Color-matching quiz: pick a language, hear a color name, fist the pile
//! that matches. Correct picks score +10, wrong ones −5, and a short pause
//! separates rounds.

use crate::actions::{Cue, Effect, Lang, Page};
use crate::config::Profile;
use crate::games::{Game, Picker, tracked_hands};
use crate::gestures::GestureState;
use crate::hand::{Frame, Rect};
use crate::session::{HoverChange, HoverTracker, Hotspot, NavLatch, Phase};

pub const COLORS: [&str; 15] = [
    "red", "orange", "yellow", "green", "blue", "indigo", "violet", "pink", "cyan", "magenta",
    "lime", "teal", "brown", "black", "white",
];

const COLORS_DE: [&str; 15] = [
    "rot", "orange", "gelb", "grün", "blau", "indigo", "violett", "rosa", "cyan", "magenta",
    "limette", "blaugrün", "braun", "schwarz", "weiß",
];

const COLORS_IT: [&str; 15] = [
    "rosso", "arancione", "giallo", "verde", "blu", "indaco", "viola", "rosa", "ciano", "magenta",
    "lime", "verde acqua", "marrone", "nero", "bianco",
];

pub fn translate(lang: Lang, color_index: usize) -> &'static str {
    match lang {
        Lang::En => COLORS[color_index],
        Lang::De => COLORS_DE[color_index],
        Lang::It => COLORS_IT[color_index],
    }
}

const PILE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizPhase {
    LanguageSelect,
    Round,
    /// Feedback showing; rounds resume once the frame clock passes this.
    Paused { until_ms: u64 },
}

pub struct ColorQuiz {
    profile: Profile,
    screen: (f32, f32),
    picker: Picker,
    latch: NavLatch,
    hover: HoverTracker,
    quiz: QuizPhase,
    lang: Lang,
    score: i32,
    target: usize,
    flags: Vec<Hotspot>,
    piles: Vec<Hotspot>,
}

fn flag_row(screen: (f32, f32)) -> Vec<Hotspot> {
    let (w, h) = screen;
    let flag_w = 150.0;
    let flag_h = 90.0;
    let gap = 50.0;
    let total = 3.0 * flag_w + 2.0 * gap;
    let top = h / 2.0 - flag_h / 2.0;
    ["en", "de", "it"]
        .into_iter()
        .enumerate()
        .map(|(i, code)| {
            let left = (w - total) / 2.0 + i as f32 * (flag_w + gap);
            Hotspot::new(code, Rect::new(left, top, left + flag_w, top + flag_h))
        })
        .collect()
}

fn pile_row(screen: (f32, f32), colors: &[&'static str]) -> Vec<Hotspot> {
    let (w, h) = screen;
    let pile = 150.0;
    let gap = 40.0;
    let total = colors.len() as f32 * pile + (colors.len() - 1) as f32 * gap;
    let top = h * 0.6;
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let left = (w - total) / 2.0 + i as f32 * (pile + gap);
            Hotspot::new(*color, Rect::new(left, top, left + pile, top + pile))
        })
        .collect()
}

impl ColorQuiz {
    pub fn new(profile: Profile, screen: (f32, f32), seed: u64) -> Self {
        let flags = flag_row(screen);
        Self {
            profile,
            screen,
            picker: Picker::new(seed),
            latch: NavLatch::default(),
            hover: HoverTracker::default(),
            quiz: QuizPhase::LanguageSelect,
            lang: Lang::En,
            score: 0,
            target: 0,
            flags,
            piles: Vec::new(),
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Pick a target color, two decoys, shuffle the piles, announce.
    fn start_round(&mut self, out: &mut Vec<Effect>) {
        self.target = self.picker.below(COLORS.len());
        let mut choices = vec![COLORS[self.target]];
        while choices.len() < PILE_COUNT {
            let candidate = COLORS[self.picker.below(COLORS.len())];
            if !choices.contains(&candidate) {
                choices.push(candidate);
            }
        }
        self.picker.shuffle(&mut choices);
        self.piles = pile_row(self.screen, &choices);

        let word = translate(self.lang, self.target).to_string();
        out.push(Effect::RoundStarted {
            color: COLORS[self.target],
            word: word.clone(),
        });
        out.push(Effect::Speak {
            lang: self.lang,
            word,
        });
        self.quiz = QuizPhase::Round;
    }

    fn score_pick(&mut self, pile: &str, out: &mut Vec<Effect>, now_ms: u64) {
        let correct = pile == COLORS[self.target];
        let delta = if correct { 10 } else { -5 };
        self.score += delta;
        out.push(Effect::Score(delta));
        out.push(Effect::Feedback { correct });
        out.push(Effect::PlayCue(if correct { Cue::Correct } else { Cue::Incorrect }));
        self.quiz = QuizPhase::Paused {
            until_ms: now_ms + self.profile.thresholds.feedback_pause_ms,
        };
    }
}

impl Game for ColorQuiz {
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

        // The dislike exit works from any quiz phase.
        let dislikes = tracked_hands(frame, self.profile.tracking.max_hands)
            .iter()
            .filter(|h| {
                let hand = if self.profile.pointer.mirror {
                    h.mirror_x()
                } else {
                    (*h).clone()
                };
                crate::gestures::is_dislike_sign(&hand)
            })
            .count();
        if dislikes >= self.profile.thresholds.dislike_hands {
            self.latch.set();
            out.push(Effect::Navigate(Page::Menu));
            return out;
        }

        let pointer = state
            .as_ref()
            .map(|s| s.pointer.to_screen(self.screen.0, self.screen.1));

        match self.quiz {
            QuizPhase::LanguageSelect => {
                match self.hover.update(pointer, &self.flags) {
                    Some(HoverChange::Entered(id)) => out.push(Effect::Highlight(Some(id))),
                    Some(HoverChange::Cleared) => out.push(Effect::Highlight(None)),
                    None => {}
                }
                let picked = match (state.as_ref(), self.hover.current()) {
                    (Some(s), Some(code)) if s.is_fist => Lang::from_code(code),
                    _ => None,
                };
                if let Some(lang) = picked {
                    self.lang = lang;
                    self.hover = HoverTracker::default();
                    out.push(Effect::Highlight(None));
                    self.start_round(&mut out);
                }
            }
            QuizPhase::Round => {
                match self.hover.update(pointer, &self.piles) {
                    Some(HoverChange::Entered(id)) => out.push(Effect::Highlight(Some(id))),
                    Some(HoverChange::Cleared) => out.push(Effect::Highlight(None)),
                    None => {}
                }
                let picked = match (state.as_ref(), self.hover.current()) {
                    (Some(s), Some(pile)) if s.is_fist => Some(pile.to_string()),
                    _ => None,
                };
                if let Some(pile) = picked {
                    self.score_pick(&pile, &mut out, frame.timestamp_ms);
                }
            }
            QuizPhase::Paused { until_ms } => {
                if frame.timestamp_ms >= until_ms {
                    self.hover = HoverTracker::default();
                    out.push(Effect::Highlight(None));
                    self.start_round(&mut out);
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
