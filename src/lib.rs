//! Paddle Pong - a two-paddle arcade game
//!
//! Core modules:
//! - `sim`: Simulation (boxes, paddles, ball, scoring, fixed-step tick)
//! - `game`: The frame loop tying input, simulation, audio and rendering together
//! - `clock`: Frame pacing and FPS measurement
//! - `platform`: Input/rendering collaborators (terminal and headless)
//! - `assets`: Named asset loading, done once at startup
//! - `audio`: Sound effects routed to an audio player
//! - `settings`: Player preferences (never game rules)

pub mod assets;
pub mod audio;
pub mod clock;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions in pixels
    pub const SCREEN_WIDTH: i32 = 531;
    pub const SCREEN_HEIGHT: i32 = 412;

    /// Target frame rate; the loop never runs faster than this
    pub const FPS: u32 = 20;
    /// Per-frame budget in milliseconds
    pub const FRAME_BUDGET_MS: u64 = 1000 / FPS as u64;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 7;
    pub const PADDLE_HEIGHT: i32 = 53;
    /// Velocity change per key transition
    pub const PADDLE_STEP: i32 = PADDLE_HEIGHT / 4;
    /// Player 1 defends the right side, player 2 the left
    pub const PLAYER1_PADDLE_X: i32 = 500;
    pub const PLAYER2_PADDLE_X: i32 = 30;

    /// Ball defaults
    pub const BALL_WIDTH: i32 = 9;
    pub const BALL_HEIGHT: i32 = 9;
    /// Pixels per frame on each axis
    pub const BALL_SPEED: i32 = 4;

    /// How far past the screen edge the ball may travel before a point is scored
    pub const SCORE_MARGIN: i32 = 5;

    /// Wall zones: (y, height), both spanning the full screen width
    pub const TOP_WALL_Y: i32 = 0;
    pub const TOP_WALL_HEIGHT: i32 = 24;
    pub const BOTTOM_WALL_Y: i32 = 390;
    pub const BOTTOM_WALL_HEIGHT: i32 = 50;

    /// Score text anchors
    pub const PLAYER1_SCORE_POS: (i32, i32) = (SCREEN_WIDTH / 2 + 27, 40);
    pub const PLAYER2_SCORE_POS: (i32, i32) = (SCREEN_WIDTH / 2 - 40, 40);
}
