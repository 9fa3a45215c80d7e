//! Effects: the callback contract between the gesture core and whatever
//! renders, navigates and plays audio. Games emit values; sinks act on
//! them. Nothing in here touches a screen.

use log::{debug, info};

use crate::hand::Point;

/// Navigation targets, one per game page plus the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Menu,
    Colors,
    Draw,
    Pong,
    Shapes,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Menu => "index",
            Page::Colors => "colors",
            Page::Draw => "draw",
            Page::Pong => "pong",
            Page::Shapes => "shapes",
        }
    }
}

/// Speech languages the quiz supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    De,
    It,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::De => "de",
            Lang::It => "it",
        }
    }

    /// Voice name handed to the speech engine.
    pub fn voice(self) -> &'static str {
        match self {
            Lang::En => "UK English Female",
            Lang::De => "Deutsch Female",
            Lang::It => "Italian Female",
        }
    }

    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "en" => Some(Lang::En),
            "de" => Some(Lang::De),
            "it" => Some(Lang::It),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Highlight the named element; `None` clears the current highlight.
    Highlight(Option<String>),
    Navigate(Page),
    DismissPrompt,
    Score(i32),
    Feedback { correct: bool },
    PlayCue(Cue),
    Speak { lang: Lang, word: String },
    RoundStarted { color: &'static str, word: String },
    Spray { at: Point, color: Rgb, scale: f32 },
    BrushColor(Rgb),
    ShapeSpawned(ShapeKind),
    ShapeMoved(Point),
    ShapeDropped { matched: bool },
    PointScored(Side),
}

pub trait EffectSink {
    fn emit(&mut self, effect: Effect);
}

/// Logs every effect; the stand-in sink for running without a renderer.
/// Per-frame pointer noise (spray, shape moves) goes to debug.
pub struct LogSink;

impl EffectSink for LogSink {
    fn emit(&mut self, effect: Effect) {
        match &effect {
            Effect::Highlight(Some(id)) => info!("highlight {id}"),
            Effect::Highlight(None) => info!("highlight cleared"),
            Effect::Navigate(page) => info!("navigate -> {}", page.as_str()),
            Effect::DismissPrompt => info!("prompt dismissed"),
            Effect::Score(delta) => info!("score {delta:+}"),
            Effect::Feedback { correct } => info!("feedback: {}", if *correct { "correct" } else { "incorrect" }),
            Effect::PlayCue(cue) => info!("cue: {cue:?}"),
            Effect::Speak { lang, word } => {
                info!("speak [{}] '{word}' with voice '{}'", lang.code(), lang.voice())
            }
            Effect::RoundStarted { color, word } => info!("round: {color} ({word})"),
            Effect::Spray { at, scale, .. } => debug!("spray at ({:.0},{:.0}) x{scale:.1}", at.x, at.y),
            Effect::BrushColor(Rgb(r, g, b)) => info!("brush color rgb({r},{g},{b})"),
            Effect::ShapeSpawned(kind) => info!("shape spawned: {}", kind.as_str()),
            Effect::ShapeMoved(at) => debug!("shape at ({:.0},{:.0})", at.x, at.y),
            Effect::ShapeDropped { matched } => info!("shape dropped, matched={matched}"),
            Effect::PointScored(side) => info!("point: {side:?}"),
        }
    }
}

/// Collects effects for inspection; used by the replay summary and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl EffectSink for RecordingSink {
    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

// ── Tests ──────────────────────────────────────────────────
