//! Asset loading
//!
//! Images, fonts and sounds are resolved by name once at startup and handed
//! around as opaque handles afterwards. Any missing asset aborts startup.

use thiserror::Error;

/// Opaque handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Opaque handle to a loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Opaque handle to a loaded sound clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image not found: {0}")]
    ImageNotFound(String),
    #[error("font not found: {0}")]
    FontNotFound(String),
    #[error("sound not found: {0}")]
    SoundNotFound(String),
}

/// Something that can turn asset names into handles
pub trait AssetLoader {
    fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError>;
    fn load_font(&mut self, name: &str, size: u16) -> Result<FontHandle, AssetError>;
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError>;
}

/// Names of every asset the game needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub background: String,
    pub paddle: String,
    pub ball: String,
    pub font: String,
    pub font_size: u16,
    pub beep: String,
    pub boop: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            background: "background.png".into(),
            paddle: "paddle.png".into(),
            ball: "ball.png".into(),
            font: "press.ttf".into(),
            font_size: 15,
            beep: "BEEP.OGG".into(),
            boop: "BOOP.OGG".into(),
        }
    }
}

/// Handles for everything the frame loop draws or plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assets {
    pub background: ImageHandle,
    pub paddle: ImageHandle,
    pub ball: ImageHandle,
    pub font: FontHandle,
    pub beep: SoundHandle,
    pub boop: SoundHandle,
}

impl Assets {
    /// Load every asset in the manifest, failing on the first missing one
    pub fn load(loader: &mut impl AssetLoader, manifest: &AssetManifest) -> Result<Self, AssetError> {
        let assets = Self {
            background: loader.load_image(&manifest.background)?,
            paddle: loader.load_image(&manifest.paddle)?,
            ball: loader.load_image(&manifest.ball)?,
            font: loader.load_font(&manifest.font, manifest.font_size)?,
            beep: loader.load_sound(&manifest.beep)?,
            boop: loader.load_sound(&manifest.boop)?,
        };
        log::info!("Loaded assets: {:?}", assets);
        Ok(assets)
    }
}

/// Lowercased file stem, so "BEEP.OGG" and "beep" name the same asset
pub fn asset_stem(name: &str) -> String {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = file.split('.').next().unwrap_or(file);
    stem.to_ascii_lowercase()
}
