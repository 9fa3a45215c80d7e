//! Two-paddle pong driven by index fingertips. The hand on each half of
//! the (mirrored) screen owns the paddle on that side; a single hand only
//! moves its own side. Physics advances one step per frame.

use crate::actions::{Effect, Side};
use crate::config::Profile;
use crate::games::{Game, Picker, tracked_hands};
use crate::hand::{Frame, Point};
use crate::session::Phase;

const PADDLE_WIDTH: f32 = 10.0;
const PADDLE_HEIGHT: f32 = 100.0;
const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 5.0;

#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct PongWorld {
    pub width: f32,
    pub height: f32,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub left_score: u32,
    pub right_score: u32,
}

impl PongWorld {
    fn new(screen: (f32, f32)) -> Self {
        let (width, height) = screen;
        Self {
            width,
            height,
            ball: Ball {
                x: width / 2.0,
                y: height / 2.0,
                vx: BALL_SPEED,
                vy: BALL_SPEED,
            },
            left: Paddle {
                x: 20.0,
                y: height / 2.0 - PADDLE_HEIGHT / 2.0,
            },
            right: Paddle {
                x: width - 30.0,
                y: height / 2.0 - PADDLE_HEIGHT / 2.0,
            },
            left_score: 0,
            right_score: 0,
        }
    }

    fn clamp_paddle(&self, y: f32) -> f32 {
        y.clamp(0.0, self.height - PADDLE_HEIGHT)
    }

    fn set_paddle(&mut self, side: Side, pointer_y: f32) {
        let y = self.clamp_paddle(pointer_y - PADDLE_HEIGHT / 2.0);
        match side {
            Side::Left => self.left.y = y,
            Side::Right => self.right.y = y,
        }
    }

    /// Advance one frame; returns the scoring side if the ball went out.
    fn step(&mut self, picker: &mut Picker) -> Option<Side> {
        let ball = &mut self.ball;
        ball.x += ball.vx;
        ball.y += ball.vy;

        if ball.y - BALL_RADIUS < 0.0 || ball.y + BALL_RADIUS > self.height {
            ball.vy = -ball.vy;
        }

        // Only bounce when the ball travels toward the paddle, so a ball
        // overlapping the paddle face cannot re-flip every frame.
        if ball.vx < 0.0
            && ball.x - BALL_RADIUS < self.left.x + PADDLE_WIDTH
            && ball.y > self.left.y
            && ball.y < self.left.y + PADDLE_HEIGHT
        {
            ball.vx = -ball.vx;
        }
        if ball.vx > 0.0
            && ball.x + BALL_RADIUS > self.right.x
            && ball.y > self.right.y
            && ball.y < self.right.y + PADDLE_HEIGHT
        {
            ball.vx = -ball.vx;
        }

        if ball.x < 0.0 {
            self.right_score += 1;
            self.serve(picker);
            return Some(Side::Right);
        }
        if ball.x > self.width {
            self.left_score += 1;
            self.serve(picker);
            return Some(Side::Left);
        }
        None
    }

    fn serve(&mut self, picker: &mut Picker) {
        self.ball.x = self.width / 2.0;
        self.ball.y = self.height / 2.0;
        self.ball.vx = -self.ball.vx;
        self.ball.vy = if picker.coin() { BALL_SPEED } else { -BALL_SPEED };
    }
}

pub struct PongGame {
    profile: Profile,
    screen: (f32, f32),
    world: PongWorld,
    picker: Picker,
}

impl PongGame {
    pub fn new(profile: Profile, screen: (f32, f32), seed: u64) -> Self {
        Self {
            profile,
            screen,
            world: PongWorld::new(screen),
            picker: Picker::new(seed),
        }
    }

    pub fn world(&self) -> &PongWorld {
        &self.world
    }

    fn pointer(&self, hand: &crate::hand::Hand) -> Point {
        let view = if self.profile.pointer.mirror {
            hand.mirror_x()
        } else {
            hand.clone()
        };
        self.profile
            .pointer
            .anchor
            .resolve(&view)
            .to_screen(self.screen.0, self.screen.1)
    }
}

impl Game for PongGame {
    fn update(&mut self, frame: &Frame) -> Vec<Effect> {
        let mut out = Vec::new();

        // Paddle sides come from pointer x every frame; hand array order
        // is no identity, so nothing is remembered between frames.
        match tracked_hands(frame, self.profile.tracking.max_hands) {
            [hand] => {
                let p = self.pointer(hand);
                let side = if p.x < self.screen.0 / 2.0 {
                    Side::Left
                } else {
                    Side::Right
                };
                self.world.set_paddle(side, p.y);
            }
            [a, b] => {
                let pa = self.pointer(a);
                let pb = self.pointer(b);
                let (left, right) = if pa.x < pb.x { (pa, pb) } else { (pb, pa) };
                self.world.set_paddle(Side::Left, left.y);
                self.world.set_paddle(Side::Right, right.y);
            }
            _ => {}
        }

        if let Some(side) = self.world.step(&mut self.picker) {
            out.push(Effect::PointScored(side));
            out.push(Effect::Score(1));
        }
        out
    }

    fn phase(&self) -> Phase {
        Phase::Active
    }
}

// ── Tests ──────────────────────────────────────────────────
