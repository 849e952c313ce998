//! Headless platform: scripted input, recorded output

use std::collections::{HashSet, VecDeque};

use super::{InputEvent, InputSource, PlatformError, RenderSurface};
use crate::assets::{AssetError, AssetLoader, FontHandle, ImageHandle, SoundHandle};
use crate::audio::{AudioPlayer, Channel};

/// A recorded draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Image { x: i32, y: i32, image: ImageHandle },
    Text { x: i32, y: i32, text: String },
}

#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    /// (frame, event) pairs, delivered once `frame` is reached
    script: VecDeque<(u64, InputEvent)>,
    quit_after: Option<u64>,
    quit_sent: bool,
    missing: HashSet<String>,
    next_handle: u32,
    current: Vec<DrawCall>,
    /// Draw calls of the last presented frame
    pub last_frame: Vec<DrawCall>,
    pub frames_presented: u64,
    /// Every clip played, in order
    pub sounds: Vec<(SoundHandle, Channel)>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request quit during frame `frames`, so that many frames get presented
    ///
    /// The game loop always completes the frame in which quit arrives, so
    /// `0` behaves like `1`.
    pub fn quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Deliver `event` during the given frame (1-based)
    pub fn with_event(mut self, frame: u64, event: InputEvent) -> Self {
        self.script.push_back((frame, event));
        self.script.make_contiguous().sort_by_key(|(f, _)| *f);
        self
    }

    /// Make loading `name` fail
    pub fn without_asset(mut self, name: &str) -> Self {
        self.missing.insert(name.to_string());
        self
    }

    fn current_frame(&self) -> u64 {
        self.frames_presented + 1
    }

    fn handle(&mut self, name: &str) -> Option<u32> {
        if self.missing.contains(name) {
            return None;
        }
        self.next_handle += 1;
        Some(self.next_handle)
    }
}

impl InputSource for HeadlessPlatform {
    fn poll(&mut self) -> Result<Option<InputEvent>, PlatformError> {
        let frame = self.current_frame();
        if self.script.front().is_some_and(|(f, _)| *f <= frame) {
            return Ok(self.script.pop_front().map(|(_, event)| event));
        }
        if !self.quit_sent && self.quit_after.is_some_and(|n| frame >= n) {
            self.quit_sent = true;
            return Ok(Some(InputEvent::Quit));
        }
        Ok(None)
    }
}

impl RenderSurface for HeadlessPlatform {
    fn draw_image(&mut self, x: i32, y: i32, image: ImageHandle) {
        self.current.push(DrawCall::Image { x, y, image });
    }

    fn draw_text(&mut self, x: i32, y: i32, _font: FontHandle, text: &str) {
        self.current.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.last_frame = std::mem::take(&mut self.current);
        self.frames_presented += 1;
        Ok(())
    }
}

impl AudioPlayer for HeadlessPlatform {
    fn play(&mut self, sound: SoundHandle, channel: Channel, _volume: f32) {
        self.sounds.push((sound, channel));
    }
}

impl AssetLoader for HeadlessPlatform {
    fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError> {
        self.handle(name)
            .map(ImageHandle)
            .ok_or_else(|| AssetError::ImageNotFound(name.to_string()))
    }

    fn load_font(&mut self, name: &str, _size: u16) -> Result<FontHandle, AssetError> {
        self.handle(name)
            .map(FontHandle)
            .ok_or_else(|| AssetError::FontNotFound(name.to_string()))
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError> {
        self.handle(name)
            .map(SoundHandle)
            .ok_or_else(|| AssetError::SoundNotFound(name.to_string()))
    }
}
