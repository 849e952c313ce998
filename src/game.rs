//! The frame loop
//!
//! One iteration per frame: drain input, draw the court and scores, advance
//! and draw the paddles and ball, play sounds, present, then pace to the
//! target frame rate. The only way out is a quit request.

use crate::assets::Assets;
use crate::audio::{AudioManager, AudioPlayer};
use crate::clock::FrameClock;
use crate::consts::*;
use crate::platform::{InputEvent, InputSource, PlatformError, RenderSurface};
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, tick};

/// Game instance holding all state
pub struct Game {
    state: GameState,
    assets: Assets,
    audio: AudioManager,
    clock: FrameClock,
    show_fps: bool,
    quit: bool,
}

impl Game {
    pub fn new(seed: u64, assets: Assets, settings: &Settings) -> Self {
        Self {
            state: GameState::new(seed),
            assets,
            audio: AudioManager::new(&assets, settings),
            clock: FrameClock::default(),
            show_fps: settings.show_fps,
            quit: false,
        }
    }

    /// Replace the frame clock (e.g. [`FrameClock::unpaced`] for headless runs)
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// True once a quit request has been seen
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Run frames until the platform asks to quit
    pub fn run<P>(&mut self, platform: &mut P) -> Result<(), PlatformError>
    where
        P: InputSource + RenderSurface + AudioPlayer,
    {
        log::info!("Game loop starting (seed {}, {} FPS)", self.state.seed, FPS);

        while !self.quit {
            self.clock.start();
            self.run_frame(platform)?;
            self.clock.pace();
        }

        log::info!(
            "Quit after {} frames, final score {} - {}",
            self.state.frame,
            self.state.scoreboard.player1,
            self.state.scoreboard.player2
        );
        Ok(())
    }

    /// One unpaced iteration of the loop
    pub fn run_frame<P>(&mut self, platform: &mut P) -> Result<(), PlatformError>
    where
        P: InputSource + RenderSurface + AudioPlayer,
    {
        // Quit takes effect after this frame completes
        let mut input = TickInput::default();
        while let Some(event) = platform.poll()? {
            match event {
                InputEvent::Key(key) => input.keys.push(key),
                InputEvent::Quit => self.quit = true,
            }
        }

        // Scores are drawn before the ball moves, so a point shows next frame
        let player1_score = self.state.scoreboard.player1.to_string();
        let player2_score = self.state.scoreboard.player2.to_string();

        platform.draw_image(0, 0, self.assets.background);
        let (x, y) = PLAYER1_SCORE_POS;
        platform.draw_text(x, y, self.assets.font, &player1_score);
        let (x, y) = PLAYER2_SCORE_POS;
        platform.draw_text(x, y, self.assets.font, &player2_score);

        tick(&mut self.state, &input);

        for paddle in [&self.state.player1, &self.state.player2] {
            platform.draw_image(paddle.rect.x, paddle.rect.y, self.assets.paddle);
        }
        let ball = &self.state.ball.rect;
        platform.draw_image(ball.x, ball.y, self.assets.ball);

        if self.show_fps {
            let fps = format!("{} fps", self.clock.fps());
            platform.draw_text(8, BOTTOM_WALL_Y, self.assets.font, &fps);
        }

        self.audio.play_events(platform, &self.state.events);

        platform.present()
    }
}
