//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per frame
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use state::{
    Arena, Ball, Controls, GameEvent, GameState, Paddle, Player, Scoreboard, ServeRoll,
    ServeSource,
};
pub use tick::{Key, KeyEvent, TickInput, Transition, tick};
