//! Terminal front end built on crossterm
//!
//! The 531x412 pixel playfield is scaled onto a character grid of
//! `CELL_W` x `CELL_H` pixels per cell. Images are built-in glyph sprites
//! resolved by asset name, sounds ring the terminal bell.
//!
//! Key releases are only reported by terminals that support the keyboard
//! enhancement protocol. Elsewhere every press is followed by a synthetic
//! release on the next frame, so each press (or auto-repeat) moves a paddle
//! one step.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use super::{InputEvent, InputSource, PlatformError, RenderSurface};
use crate::assets::{AssetError, AssetLoader, FontHandle, ImageHandle, SoundHandle, asset_stem};
use crate::audio::{AudioPlayer, Channel};
use crate::consts::*;
use crate::sim::{Key, KeyEvent};

/// Pixels per character cell
pub const CELL_W: i32 = 8;
pub const CELL_H: i32 = 16;

/// Grid size needed to show the whole playfield
pub const GRID_COLS: u16 = ((SCREEN_WIDTH + CELL_W - 1) / CELL_W) as u16;
pub const GRID_ROWS: u16 = ((SCREEN_HEIGHT + CELL_H - 1) / CELL_H) as u16;

/// Map a pixel span onto cells, rounding to the nearest cell edge
///
/// Always yields at least one cell so thin sprites stay visible.
pub fn to_cells(start: i32, len: i32, cell: i32) -> (i32, i32) {
    let first = (start + cell / 2).div_euclid(cell);
    let last = ((start + len + cell / 2).div_euclid(cell) - 1).max(first);
    (first, last)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// A built-in image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sprite {
    /// Walls and the center net; clears everything underneath
    Court,
    /// A solid block of `w` x `h` pixels
    Block {
        w: i32,
        h: i32,
        glyph: char,
        color: Color,
    },
}

impl Sprite {
    fn named(stem: &str) -> Option<Self> {
        match stem {
            "background" => Some(Sprite::Court),
            "paddle" => Some(Sprite::Block {
                w: PADDLE_WIDTH,
                h: PADDLE_HEIGHT,
                glyph: '█',
                color: Color::White,
            }),
            "ball" => Some(Sprite::Block {
                w: BALL_WIDTH,
                h: BALL_HEIGHT,
                glyph: '●',
                color: Color::Yellow,
            }),
            _ => None,
        }
    }
}

/// Character framebuffer plus the sprites drawn into it
#[derive(Debug, Clone)]
pub struct Canvas {
    cells: Vec<Cell>,
    sprites: Vec<Sprite>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            cells: vec![BLANK; GRID_COLS as usize * GRID_ROWS as usize],
            sprites: Vec::new(),
        }
    }

    /// Register the sprite for an image name
    pub fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError> {
        let sprite =
            Sprite::named(&asset_stem(name)).ok_or_else(|| AssetError::ImageNotFound(name.to_string()))?;
        self.sprites.push(sprite);
        Ok(ImageHandle(self.sprites.len() as u32 - 1))
    }

    /// Glyph at a cell, if inside the grid
    pub fn glyph_at(&self, col: i32, row: i32) -> Option<char> {
        self.index(col, row).map(|i| self.cells[i].ch)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if (0..GRID_COLS as i32).contains(&col) && (0..GRID_ROWS as i32).contains(&row) {
            Some(row as usize * GRID_COLS as usize + col as usize)
        } else {
            None
        }
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { ch, color };
        }
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char, color: Color) {
        let (c0, c1) = to_cells(x, w, CELL_W);
        let (r0, r1) = to_cells(y, h, CELL_H);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put(col, row, ch, color);
            }
        }
    }

    pub fn draw_image(&mut self, x: i32, y: i32, image: ImageHandle) {
        let Some(&sprite) = self.sprites.get(image.0 as usize) else {
            log::warn!("Unknown image handle {:?}", image);
            return;
        };
        match sprite {
            Sprite::Court => self.draw_court(),
            Sprite::Block { w, h, glyph, color } => self.fill(x, y, w, h, glyph, color),
        }
    }

    fn draw_court(&mut self) {
        self.cells.fill(BLANK);
        self.fill(0, TOP_WALL_Y, SCREEN_WIDTH, TOP_WALL_HEIGHT, '█', Color::DarkGrey);
        self.fill(0, BOTTOM_WALL_Y, SCREEN_WIDTH, BOTTOM_WALL_HEIGHT, '█', Color::DarkGrey);

        let (net_col, _) = to_cells(SCREEN_WIDTH / 2, 1, CELL_W);
        let (_, first) = to_cells(TOP_WALL_Y, TOP_WALL_HEIGHT, CELL_H);
        let (last, _) = to_cells(BOTTOM_WALL_Y, BOTTOM_WALL_HEIGHT, CELL_H);
        for row in (first + 1..last).step_by(2) {
            self.put(net_col, row, '┆', Color::DarkGrey);
        }
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let (col, _) = to_cells(x, 1, CELL_W);
        let (row, _) = to_cells(y, 1, CELL_H);
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, Color::White);
        }
    }

    /// Queue the whole grid for output
    fn queue_frame(&self, out: &mut impl Write) -> io::Result<()> {
        for (row, line) in self.cells.chunks(GRID_COLS as usize).enumerate() {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            let mut run = String::new();
            let mut run_color = line[0].color;
            for cell in line {
                if cell.color != run_color {
                    queue!(out, SetForegroundColor(run_color), Print(&run))?;
                    run.clear();
                    run_color = cell.color;
                }
                run.push(cell.ch);
            }
            queue!(out, SetForegroundColor(run_color), Print(&run))?;
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// What a terminal key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapped {
    Game(Key),
    Quit,
}

/// Translate a terminal key into a game key or quit request
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Mapped> {
    match code {
        KeyCode::Up => Some(Mapped::Game(Key::Up)),
        KeyCode::Down => Some(Mapped::Game(Key::Down)),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Mapped::Quit),
        KeyCode::Char('w' | 'W') => Some(Mapped::Game(Key::W)),
        KeyCode::Char('s' | 'S') => Some(Mapped::Game(Key::S)),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Mapped::Quit),
        _ => None,
    }
}

/// A real terminal acting as input, screen, speaker and asset store
pub struct TerminalPlatform {
    out: Stdout,
    canvas: Canvas,
    /// Bell rings per clip
    sounds: Vec<u8>,
    bell: bool,
    pending_bells: u32,
    release_reporting: bool,
    /// Synthetic releases for presses made this frame
    next_releases: Vec<Key>,
    /// Synthetic releases to deliver this frame
    due_releases: VecDeque<Key>,
    // Acquired resources, released in Drop
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
    enhanced_keyboard: bool,
}

impl TerminalPlatform {
    /// Take over the terminal; everything acquired here is released on drop
    pub fn open(bell: bool) -> Result<Self, PlatformError> {
        let (cols, rows) = terminal::size()?;
        if cols < GRID_COLS || rows < GRID_ROWS {
            return Err(PlatformError::TooSmall {
                need_cols: GRID_COLS,
                need_rows: GRID_ROWS,
                cols,
                rows,
            });
        }

        let mut platform = Self {
            out: io::stdout(),
            canvas: Canvas::new(),
            sounds: Vec::new(),
            bell,
            pending_bells: 0,
            release_reporting: false,
            next_releases: Vec::new(),
            due_releases: VecDeque::new(),
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
            enhanced_keyboard: false,
        };

        terminal::enable_raw_mode()?;
        platform.raw_mode = true;
        execute!(platform.out, EnterAlternateScreen)?;
        platform.alternate_screen = true;
        execute!(platform.out, cursor::Hide, Clear(ClearType::All))?;
        platform.cursor_hidden = true;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                platform.out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            platform.enhanced_keyboard = true;
            platform.release_reporting = true;
        }

        log::info!(
            "Terminal ready: {}x{} grid, key releases {}",
            GRID_COLS,
            GRID_ROWS,
            if platform.release_reporting { "reported" } else { "synthesized" }
        );
        Ok(platform)
    }
}

/// One acquired terminal resource: a name, whether it was acquired, and how
/// to give it back
type ReleaseStep<W> = (&'static str, bool, fn(&mut W) -> io::Result<()>);

/// Run every acquired release step in order
///
/// A failing step does not stop the ones after it. Returns the names of the
/// steps that failed.
fn release<W>(out: &mut W, steps: &[ReleaseStep<W>]) -> Vec<&'static str> {
    let mut failed = Vec::new();
    for &(name, acquired, step) in steps {
        if !acquired {
            continue;
        }
        if let Err(e) = step(out) {
            log::warn!("Failed to {}: {}", name, e);
            failed.push(name);
        }
    }
    failed
}

impl Drop for TerminalPlatform {
    fn drop(&mut self) {
        let steps: [ReleaseStep<Stdout>; 4] = [
            ("restore keyboard mode", self.enhanced_keyboard, |out| {
                execute!(out, PopKeyboardEnhancementFlags)
            }),
            ("show cursor", self.cursor_hidden, |out| {
                execute!(out, ResetColor, cursor::Show)
            }),
            ("leave alternate screen", self.alternate_screen, |out| {
                execute!(out, LeaveAlternateScreen)
            }),
            ("disable raw mode", self.raw_mode, |_| terminal::disable_raw_mode()),
        ];
        let failed = release(&mut self.out, &steps);
        if failed.is_empty() {
            log::info!("Terminal restored");
        } else {
            log::warn!("Terminal partly restored ({} steps failed)", failed.len());
        }
    }
}

impl InputSource for TerminalPlatform {
    fn poll(&mut self) -> Result<Option<InputEvent>, PlatformError> {
        if let Some(key) = self.due_releases.pop_front() {
            return Ok(Some(InputEvent::Key(KeyEvent::released(key))));
        }

        while event::poll(Duration::ZERO)? {
            let Event::Key(ev) = event::read()? else {
                continue;
            };
            let Some(mapped) = map_key(ev.code, ev.modifiers) else {
                continue;
            };
            match (mapped, ev.kind) {
                (Mapped::Quit, KeyEventKind::Press) => return Ok(Some(InputEvent::Quit)),
                (Mapped::Game(key), KeyEventKind::Press) => {
                    if !self.release_reporting {
                        self.next_releases.push(key);
                    }
                    return Ok(Some(InputEvent::Key(KeyEvent::pressed(key))));
                }
                (Mapped::Game(key), KeyEventKind::Release) => {
                    return Ok(Some(InputEvent::Key(KeyEvent::released(key))));
                }
                // Repeats would stack velocity; the held key already moves the paddle
                (_, KeyEventKind::Repeat) | (Mapped::Quit, KeyEventKind::Release) => {}
            }
        }
        Ok(None)
    }
}

impl RenderSurface for TerminalPlatform {
    fn draw_image(&mut self, x: i32, y: i32, image: ImageHandle) {
        self.canvas.draw_image(x, y, image);
    }

    fn draw_text(&mut self, x: i32, y: i32, _font: FontHandle, text: &str) {
        self.canvas.draw_text(x, y, text);
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.canvas.queue_frame(&mut self.out)?;
        for _ in 0..std::mem::take(&mut self.pending_bells) {
            queue!(self.out, Print('\x07'))?;
        }
        self.out.flush()?;
        self.due_releases.extend(self.next_releases.drain(..));
        Ok(())
    }
}

impl AudioPlayer for TerminalPlatform {
    fn play(&mut self, sound: SoundHandle, channel: Channel, volume: f32) {
        if !self.bell || volume <= 0.0 {
            return;
        }
        let rings = self.sounds.get(sound.0 as usize).copied().unwrap_or(0);
        log::trace!("Bell x{} on {:?} channel", rings, channel);
        self.pending_bells += u32::from(rings);
    }
}

impl AssetLoader for TerminalPlatform {
    fn load_image(&mut self, name: &str) -> Result<ImageHandle, AssetError> {
        self.canvas.load_image(name)
    }

    fn load_font(&mut self, name: &str, size: u16) -> Result<FontHandle, AssetError> {
        log::debug!("Font {} ({}pt) rendered with the terminal font", name, size);
        Ok(FontHandle(0))
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError> {
        // The score clip loops twice after its first play
        let rings = match asset_stem(name).as_str() {
            "beep" => 1,
            "boop" => 3,
            _ => return Err(AssetError::SoundNotFound(name.to_string())),
        };
        self.sounds.push(rings);
        Ok(SoundHandle(self.sounds.len() as u32 - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_continues_after_failure() {
        let steps: [ReleaseStep<Vec<&str>>; 4] = [
            ("first", true, |_| Err(io::Error::other("tty gone"))),
            ("second", true, |log| {
                log.push("second");
                Ok(())
            }),
            ("third", true, |log| {
                log.push("third");
                Ok(())
            }),
            ("fourth", true, |log| {
                log.push("fourth");
                Ok(())
            }),
        ];
        let mut ran = Vec::new();

        let failed = release(&mut ran, &steps);

        assert_eq!(failed, vec!["first"]);
        assert_eq!(ran, vec!["second", "third", "fourth"]);
    }

    #[test]
    fn test_release_skips_unacquired_steps() {
        let steps: [ReleaseStep<Vec<&str>>; 2] = [
            ("never acquired", false, |log| {
                log.push("never acquired");
                Ok(())
            }),
            ("acquired", true, |log| {
                log.push("acquired");
                Ok(())
            }),
        ];
        let mut ran = Vec::new();

        assert!(release(&mut ran, &steps).is_empty());
        assert_eq!(ran, vec!["acquired"]);
    }

    #[test]
    fn test_grid_covers_playfield() {
        assert_eq!(GRID_COLS, 67);
        assert_eq!(GRID_ROWS, 26);
    }

    #[test]
    fn test_to_cells_rounds_to_nearest() {
        // Paddle at x = 500, 7 px wide: one column
        assert_eq!(to_cells(500, PADDLE_WIDTH, CELL_W), (63, 63));
        // Paddle at y = 206, 53 px tall: three rows
        assert_eq!(to_cells(206, PADDLE_HEIGHT, CELL_H), (13, 15));
        // Tiny spans still get a cell
        assert_eq!(to_cells(0, 1, CELL_H), (0, 0));
        // Off-screen to the left stays negative
        assert_eq!(to_cells(-20, BALL_WIDTH, CELL_W).0, -2);
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Up, KeyModifiers::NONE), Some(Mapped::Game(Key::Up)));
        assert_eq!(map_key(KeyCode::Char('W'), KeyModifiers::SHIFT), Some(Mapped::Game(Key::W)));
        assert_eq!(map_key(KeyCode::Char('s'), KeyModifiers::NONE), Some(Mapped::Game(Key::S)));
        assert_eq!(map_key(KeyCode::Esc, KeyModifiers::NONE), Some(Mapped::Quit));
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Mapped::Quit));
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::NONE), None);
        assert_eq!(map_key(KeyCode::Left, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_unknown_image_fails() {
        let mut canvas = Canvas::new();
        assert!(matches!(
            canvas.load_image("title.png"),
            Err(AssetError::ImageNotFound(_))
        ));
    }

    #[test]
    fn test_court_and_sprites() {
        let mut canvas = Canvas::new();
        let court = canvas.load_image("background.png").unwrap();
        let paddle = canvas.load_image("paddle.png").unwrap();
        let ball = canvas.load_image("ball.png").unwrap();

        canvas.draw_image(0, 0, court);
        assert_eq!(canvas.glyph_at(0, 0), Some('█'));
        assert_eq!(canvas.glyph_at(10, GRID_ROWS as i32 - 1), Some('█'));
        assert_eq!(canvas.glyph_at(10, 10), Some(' '));

        canvas.draw_image(PLAYER1_PADDLE_X, SCREEN_HEIGHT / 2, paddle);
        for row in 13..=15 {
            assert_eq!(canvas.glyph_at(63, row), Some('█'));
        }
        assert_eq!(canvas.glyph_at(63, 16), Some(' '));

        canvas.draw_image(SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2, ball);
        assert_eq!(canvas.glyph_at(33, 13), Some('●'));

        // Redrawing the court wipes the previous frame
        canvas.draw_image(0, 0, court);
        assert_eq!(canvas.glyph_at(63, 14), Some(' '));
    }

    #[test]
    fn test_off_grid_drawing_is_clipped() {
        let mut canvas = Canvas::new();
        let ball = canvas.load_image("ball.png").unwrap();
        canvas.draw_image(-40, 200, ball);
        canvas.draw_image(SCREEN_WIDTH + 40, 200, ball);
        assert_eq!(canvas.glyph_at(-5, 12), None);
    }

    #[test]
    fn test_draw_text() {
        let mut canvas = Canvas::new();
        let (x, y) = PLAYER1_SCORE_POS;
        canvas.draw_text(x, y, "12");
        assert_eq!(canvas.glyph_at(37, 3), Some('1'));
        assert_eq!(canvas.glyph_at(38, 3), Some('2'));
    }

    #[test]
    fn test_frame_output_has_every_row() {
        let mut canvas = Canvas::new();
        let court = canvas.load_image("background").unwrap();
        canvas.draw_image(0, 0, court);
        let mut out = Vec::new();
        canvas.queue_frame(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('┆'));
        assert!(text.matches('█').count() >= GRID_COLS as usize * 2);
    }
}
