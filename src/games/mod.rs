//! The five interaction layers and what they share: the per-frame update
//! contract, game construction, and a deterministic picker for round
//! colors, decoys, serves and spray tints.

use anyhow::{Result, anyhow};

pub mod colors;
pub mod draw;
pub mod menu;
pub mod pong;
pub mod shapes;

use crate::actions::{Effect, Rgb};
use crate::config::Profile;
use crate::hand::{Frame, Hand};
use crate::session::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Menu,
    Colors,
    Draw,
    Pong,
    Shapes,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Menu,
        GameKind::Colors,
        GameKind::Draw,
        GameKind::Pong,
        GameKind::Shapes,
    ];

    pub fn parse(s: &str) -> Result<GameKind> {
        match s {
            "menu" => Ok(GameKind::Menu),
            "colors" => Ok(GameKind::Colors),
            "draw" => Ok(GameKind::Draw),
            "pong" => Ok(GameKind::Pong),
            "shapes" => Ok(GameKind::Shapes),
            other => Err(anyhow!(
                "unknown game: {other} (expected menu|colors|draw|pong|shapes)"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Menu => "menu",
            GameKind::Colors => "colors",
            GameKind::Draw => "draw",
            GameKind::Pong => "pong",
            GameKind::Shapes => "shapes",
        }
    }
}

/// One frame in, effects out. All interaction state lives behind
/// `&mut self`; the caller owns nothing but the sink it forwards to.
pub trait Game {
    fn update(&mut self, frame: &Frame) -> Vec<Effect>;
    fn phase(&self) -> Phase;
}

pub fn build(kind: GameKind, profile: Profile, screen: (f32, f32), seed: u64) -> Box<dyn Game> {
    match kind {
        GameKind::Menu => Box::new(menu::MenuGame::new(profile, screen)),
        GameKind::Colors => Box::new(colors::ColorQuiz::new(profile, screen, seed)),
        GameKind::Draw => Box::new(draw::DrawGame::new(profile, screen, seed)),
        GameKind::Pong => Box::new(pong::PongGame::new(profile, screen, seed)),
        GameKind::Shapes => Box::new(shapes::ShapesGame::new(profile, screen, seed)),
    }
}

/// The hands a game actually tracks: the first `max` of the frame, in
/// arrival order. Extra hands are ignored for the checks that expect
/// fewer, without suppressing other checks on the same frame.
pub(crate) fn tracked_hands(frame: &Frame, max: usize) -> &[Hand] {
    &frame.hands[..frame.hands.len().min(max)]
}

/// xorshift64* generator. Deterministic for a given seed, which keeps
/// round colors, decoys, serves and replays reproducible.
#[derive(Debug, Clone)]
pub struct Picker {
    state: u64,
}

impl Picker {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    pub fn rgb(&mut self) -> Rgb {
        let bits = self.next_u64();
        Rgb(bits as u8, (bits >> 8) as u8, (bits >> 16) as u8)
    }
}

// ── Tests ──────────────────────────────────────────────────
