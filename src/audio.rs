//! Audio system
//!
//! The simulation reports what happened; this module decides which clip to
//! play for it and hands the clip to whatever [`AudioPlayer`] the platform
//! provides. Playback is fire-and-forget.

use crate::assets::{Assets, SoundHandle};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a wall or paddle
    Beep,
    /// Point scored
    Boop,
}

impl SoundEffect {
    /// The effect a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallBounce | GameEvent::PaddleBounce => Some(SoundEffect::Beep),
            GameEvent::Scored(_) => Some(SoundEffect::Boop),
            GameEvent::Served { .. } => None,
        }
    }

    /// Bounce beeps share any free channel; the score boop gets priority
    pub fn channel(&self) -> Channel {
        match self {
            SoundEffect::Beep => Channel::Any,
            SoundEffect::Boop => Channel::Priority,
        }
    }
}

/// Playback channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First free channel
    Any,
    /// Must not be dropped when channels are busy
    Priority,
}

/// Plays loaded clips
pub trait AudioPlayer {
    fn play(&mut self, sound: SoundHandle, channel: Channel, volume: f32);
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    beep: SoundHandle,
    boop: SoundHandle,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(assets: &Assets, settings: &Settings) -> Self {
        let mut audio = Self {
            beep: assets.beep,
            boop: assets.boop,
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        };
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, player: &mut impl AudioPlayer, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let clip = match effect {
            SoundEffect::Beep => self.beep,
            SoundEffect::Boop => self.boop,
        };
        player.play(clip, effect.channel(), vol);
    }

    /// Play the effects for one tick's events, in order
    pub fn play_events(&self, player: &mut impl AudioPlayer, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(player, effect);
        }
    }
}
