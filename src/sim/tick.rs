//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, Player};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    W,
    S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Pressed,
    Released,
}

/// A single key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub transition: Transition,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            transition: Transition::Pressed,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            transition: Transition::Released,
        }
    }
}

/// Input commands for a single tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: Vec<KeyEvent>,
}

/// Advance the game state by one frame
///
/// Order: key transitions to both paddles, player 1 then player 2 movement,
/// then the ball against whichever paddle it is heading toward. Points are
/// applied to the scoreboard as the ball reports them. This tick's events are
/// left in `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.frame += 1;

    for &event in &input.keys {
        state.player1.handle_input(event);
        state.player2.handle_input(event);
    }

    let arena = state.arena().clone();
    state.player1.advance(&arena);
    state.player2.advance(&arena);

    let paddle = state.paddle(state.receiving_player()).rect;
    state
        .ball
        .advance(&paddle, &arena, &mut state.rng, &mut state.events);

    for event in &state.events {
        match *event {
            GameEvent::Scored(player) => {
                state.scoreboard.award(player);
                log::info!(
                    "Point to {} ({} - {})",
                    player,
                    state.scoreboard.get(Player::One),
                    state.scoreboard.get(Player::Two)
                );
            }
            GameEvent::Served { dir } => {
                log::debug!("Serve at frame {}: dir=({}, {})", state.frame, dir.x, dir.y);
            }
            GameEvent::WallBounce | GameEvent::PaddleBounce => {
                log::debug!("{:?} at {:?}", event, state.ball.rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::IVec2;

    #[test]
    fn test_tick_serves_idle_ball() {
        let mut state = GameState::new(12345);
        assert!(!state.ball.moving);

        tick(&mut state, &TickInput::default());

        assert!(state.ball.moving);
        assert_eq!(state.frame, 1);
        assert!(matches!(state.events[0], GameEvent::Served { .. }));
    }

    #[test]
    fn test_tick_dispatches_keys_to_both_paddles() {
        let mut state = GameState::new(1);
        let input = TickInput {
            keys: vec![KeyEvent::pressed(Key::Up), KeyEvent::pressed(Key::S)],
        };

        tick(&mut state, &input);

        assert_eq!(state.player1.y_vel, -PADDLE_STEP);
        assert_eq!(state.player2.y_vel, PADDLE_STEP);
        assert_eq!(state.player1.rect.y, SCREEN_HEIGHT / 2 - PADDLE_STEP);
        assert_eq!(state.player2.rect.y, SCREEN_HEIGHT / 2 + PADDLE_STEP);

        // Velocity persists across ticks until release
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player1.rect.y, SCREEN_HEIGHT / 2 - 2 * PADDLE_STEP);

        let release = TickInput {
            keys: vec![KeyEvent::released(Key::Up), KeyEvent::released(Key::S)],
        };
        tick(&mut state, &release);
        assert_eq!(state.player1.y_vel, 0);
        assert_eq!(state.player2.y_vel, 0);
    }

    #[test]
    fn test_tick_awards_points() {
        let mut state = GameState::new(3);
        state.ball.moving = true;
        state.ball.dir = IVec2::new(1, 1);
        state.ball.rect.x = SCREEN_WIDTH + 6;
        state.ball.rect.y = 200;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.scoreboard.player2, 1);
        assert_eq!(state.scoreboard.player1, 0);
        assert_eq!(state.ball.rect.x, SCREEN_WIDTH / 2);
        assert!(!state.ball.moving);
        assert_eq!(state.events, vec![GameEvent::Scored(Player::Two)]);
    }

    #[test]
    fn test_tick_uses_receiving_paddle() {
        let mut state = GameState::new(3);
        state.ball.moving = true;
        // Heading left toward player 2's paddle at x = 30
        state.ball.dir = IVec2::new(-1, 1);
        state.ball.rect.x = 38;
        state.ball.rect.y = 220;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.ball.dir.x, 1);
        assert_eq!(state.events, vec![GameEvent::PaddleBounce]);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for _ in 0..500 {
            tick(&mut a, &TickInput::default());
            tick(&mut b, &TickInput::default());
        }
        assert_eq!(a.ball.rect, b.ball.rect);
        assert_eq!(a.scoreboard, b.scoreboard);
    }
}
