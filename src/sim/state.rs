//! Game state and core simulation types
//!
//! Paddles, ball, scoreboard and the static wall zones. Everything here is
//! owned by a single [`GameState`] and mutated only through [`super::tick`].

use std::fmt;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::tick::{Key, KeyEvent, Transition};
use crate::consts::*;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Right paddle, Up/Down keys
    One,
    /// Left paddle, W/S keys
    Two,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Something that happened during a tick (drives audio and logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball left idle with a fresh direction
    Served { dir: IVec2 },
    /// Ball bounced off the top or bottom wall
    WallBounce,
    /// Ball bounced off a paddle
    PaddleBounce,
    /// Ball went off screen; point awarded to `player`
    Scored(Player),
}

/// The static wall zones bounding the playfield
///
/// Zones are fixed at construction and only readable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    top: Rect,
    bottom: Rect,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        Self {
            top: Rect::new(0, TOP_WALL_Y, SCREEN_WIDTH, TOP_WALL_HEIGHT),
            bottom: Rect::new(0, BOTTOM_WALL_Y, SCREEN_WIDTH, BOTTOM_WALL_HEIGHT),
        }
    }

    #[inline]
    pub fn top(&self) -> &Rect {
        &self.top
    }

    #[inline]
    pub fn bottom(&self) -> &Rect {
        &self.bottom
    }

    /// True if `rect` intrudes into either wall
    pub fn blocks(&self, rect: &Rect) -> bool {
        rect.overlaps(&self.top) || rect.overlaps(&self.bottom)
    }
}

/// The key pair driving a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub up: Key,
    pub down: Key,
}

impl Controls {
    pub fn for_player(player: Player) -> Self {
        match player {
            Player::One => Self {
                up: Key::Up,
                down: Key::Down,
            },
            Player::Two => Self {
                up: Key::W,
                down: Key::S,
            },
        }
    }
}

/// A player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Pixels per frame, negative is up
    pub y_vel: i32,
    pub controls: Controls,
}

impl Paddle {
    pub fn new(player: Player) -> Self {
        let x = match player {
            Player::One => PLAYER1_PADDLE_X,
            Player::Two => PLAYER2_PADDLE_X,
        };
        Self {
            rect: Rect::new(x, SCREEN_HEIGHT / 2, PADDLE_WIDTH, PADDLE_HEIGHT),
            y_vel: 0,
            controls: Controls::for_player(player),
        }
    }

    /// Apply a key transition; keys outside this paddle's pair are ignored
    ///
    /// Press and release are exact inverses, so holding both keys nets zero.
    pub fn handle_input(&mut self, event: KeyEvent) {
        let sign = if event.key == self.controls.up {
            -1
        } else if event.key == self.controls.down {
            1
        } else {
            return;
        };

        match event.transition {
            Transition::Pressed => self.y_vel += sign * PADDLE_STEP,
            Transition::Released => self.y_vel -= sign * PADDLE_STEP,
        }
    }

    /// Move by the current velocity, reverting if that would enter a wall
    ///
    /// Velocity is kept on revert so the paddle stays pinned while the key is
    /// held. Returns whether the paddle moved.
    pub fn advance(&mut self, arena: &Arena) -> bool {
        if self.y_vel == 0 {
            return false;
        }
        let moved = self.rect.translated(0, self.y_vel);
        if arena.blocks(&moved) {
            return false;
        }
        self.rect = moved;
        true
    }
}

/// The two random draws that decide a serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeRoll {
    /// 0 launches right, 1 launches left
    pub coin: u32,
    /// 0..100, thresholded at 50 for the vertical direction
    pub percent: u32,
}

impl ServeRoll {
    /// Resolve the roll into a (x, y) direction pair
    pub fn direction(&self) -> IVec2 {
        if self.coin == 0 {
            let y = if self.percent >= 50 { 1 } else { -1 };
            IVec2::new(1, y)
        } else {
            let y = if self.percent < 50 { -1 } else { 1 };
            IVec2::new(-1, y)
        }
    }
}

/// Source of serve draws (seeded RNG in play, scripted in tests)
pub trait ServeSource {
    fn roll(&mut self) -> ServeRoll;
}

impl ServeSource for Pcg32 {
    fn roll(&mut self) -> ServeRoll {
        let coin = self.random_range(0..2);
        let percent = self.random_range(0..100);
        ServeRoll { coin, percent }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    /// Speed per axis, always positive
    pub vel: IVec2,
    /// Direction per axis, each +1 or -1
    pub dir: IVec2,
    /// False until the next serve
    pub moving: bool,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Ball {
    pub fn new() -> Self {
        Self {
            rect: Rect::new(SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2, BALL_WIDTH, BALL_HEIGHT),
            vel: IVec2::splat(BALL_SPEED),
            dir: IVec2::ONE,
            moving: false,
        }
    }

    /// Pick a fresh direction and start moving
    pub fn serve(&mut self, roll: ServeRoll, events: &mut Vec<GameEvent>) {
        self.dir = roll.direction();
        self.moving = true;
        events.push(GameEvent::Served { dir: self.dir });
    }

    /// Advance one frame against the receiving paddle
    ///
    /// Checks run in a fixed order (top, bottom, paddle going right, paddle
    /// going left) and their nudges compose. Scoring leaves the ball idle at
    /// the center of the screen.
    pub fn advance(
        &mut self,
        paddle: &Rect,
        arena: &Arena,
        serve: &mut impl ServeSource,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.moving {
            self.serve(serve.roll(), events);
        }

        self.rect.x += self.dir.x * self.vel.x;
        self.rect.y += self.dir.y * self.vel.y;

        if self.rect.overlaps(arena.top()) {
            events.push(GameEvent::WallBounce);
            self.dir.y = 1;
            self.rect.y += self.vel.y;
        }

        if self.rect.overlaps(arena.bottom()) {
            events.push(GameEvent::WallBounce);
            self.dir.y = -1;
            self.rect.y -= self.vel.y;
        }

        if self.dir.x == 1 && self.rect.overlaps(paddle) {
            events.push(GameEvent::PaddleBounce);
            self.dir.x = -1;
            self.rect.x -= self.vel.x;
        }

        if self.dir.x == -1 && self.rect.overlaps(paddle) {
            events.push(GameEvent::PaddleBounce);
            self.dir.x = 1;
            self.rect.x += self.vel.x;
        }

        if self.rect.x > SCREEN_WIDTH + SCORE_MARGIN {
            self.reset_after_point(Player::Two, events);
        }

        if self.rect.x < -SCORE_MARGIN {
            self.reset_after_point(Player::One, events);
        }
    }

    fn reset_after_point(&mut self, scorer: Player, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::Scored(scorer));
        self.rect.x = SCREEN_WIDTH / 2;
        self.rect.y = SCREEN_HEIGHT / 2;
        self.moving = false;
    }
}

/// Points per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player1: u32,
    pub player2: u32,
}

impl Scoreboard {
    pub fn award(&mut self, player: Player) {
        match player {
            Player::One => self.player1 += 1,
            Player::Two => self.player2 += 1,
        }
    }

    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the serve RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    arena: Arena,
    pub player1: Paddle,
    pub player2: Paddle,
    pub ball: Ball,
    pub scoreboard: Scoreboard,
    /// Frames simulated so far
    pub frame: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given serve seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena: Arena::new(),
            player1: Paddle::new(Player::One),
            player2: Paddle::new(Player::Two),
            ball: Ball::new(),
            scoreboard: Scoreboard::default(),
            frame: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn paddle(&self, player: Player) -> &Paddle {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }

    /// The player whose paddle the ball is heading toward
    pub fn receiving_player(&self) -> Player {
        if self.ball.dir.x == 1 {
            Player::One
        } else {
            Player::Two
        }
    }
}
