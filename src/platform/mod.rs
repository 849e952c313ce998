//! Platform abstraction layer
//!
//! The frame loop only talks to these traits:
//! - [`InputSource`]: discrete key transitions and quit requests
//! - [`RenderSurface`]: image and text placement, then present
//! - [`crate::audio::AudioPlayer`] and [`crate::assets::AssetLoader`]
//!
//! `terminal` implements them on a real terminal, `headless` records calls for
//! tests and unattended runs.

pub mod headless;
pub mod terminal;

use std::io;

use thiserror::Error;

use crate::assets::{FontHandle, ImageHandle};
use crate::sim::KeyEvent;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal too small: need {need_cols}x{need_rows}, have {cols}x{rows}")]
    TooSmall {
        need_cols: u16,
        need_rows: u16,
        cols: u16,
        rows: u16,
    },
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Quit,
}

/// Delivers pending input without blocking
pub trait InputSource {
    /// Next pending event, or `None` when the queue is drained for this frame
    fn poll(&mut self) -> Result<Option<InputEvent>, PlatformError>;
}

/// Screen buffer the frame is composed on
pub trait RenderSurface {
    fn draw_image(&mut self, x: i32, y: i32, image: ImageHandle);
    fn draw_text(&mut self, x: i32, y: i32, font: FontHandle, text: &str);
    /// Show the composed frame
    fn present(&mut self) -> Result<(), PlatformError>;
}
