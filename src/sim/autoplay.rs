//! Demo player for attract mode and headless runs
//!
//! Picks an aim offset per falling block from a seeded RNG and taps once the
//! block is within one step of that target. Wider aim spread means sloppier
//! play, so a demo run eventually tops out and restarts.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GamePhase, GameState};

/// Seeded autoplayer
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Maximum aim error as a fraction of the top block width
    spread: f32,
    /// Ticks to linger on the game-over screen before restarting
    restart_delay: u32,
    /// Stack height the current target was chosen for
    target_for: usize,
    target_offset: f32,
    wait_ticks: u32,
}

impl AutoPlayer {
    pub fn new(seed: u64, spread: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            spread: spread.max(0.0),
            restart_delay: 90,
            target_for: 0,
            target_offset: 0.0,
            wait_ticks: 0,
        }
    }

    /// Decide whether to tap on this tick
    pub fn wants_tap(&mut self, state: &GameState) -> bool {
        match state.phase {
            GamePhase::Idle => true,
            GamePhase::GameOver => {
                self.wait_ticks += 1;
                if self.wait_ticks >= self.restart_delay {
                    self.wait_ticks = 0;
                    true
                } else {
                    false
                }
            }
            GamePhase::Running => {
                let (Some(top), Some(falling)) = (state.top_block(), state.falling) else {
                    return false;
                };
                if self.target_for != state.stack.len() {
                    self.target_for = state.stack.len();
                    let max_err = top.width * self.spread;
                    self.target_offset = if max_err > 0.0 {
                        self.rng.random_range(-max_err..=max_err)
                    } else {
                        0.0
                    };
                }
                let target = top.x + self.target_offset;
                (falling.x - target).abs() <= state.speed.max(f32::EPSILON)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn play(player: &mut AutoPlayer, state: &mut GameState, ticks: usize) {
        for _ in 0..ticks {
            let input = TickInput {
                tap: player.wants_tap(state),
            };
            tick(state, &input);
        }
    }

    #[test]
    fn test_idle_player_starts_game() {
        let mut player = AutoPlayer::new(1, 0.0);
        let state = GameState::new(Tuning::default(), 0);
        assert!(player.wants_tap(&state));
    }

    #[test]
    fn test_precise_player_keeps_stacking() {
        let mut player = AutoPlayer::new(7, 0.0);
        let mut state = GameState::new(Tuning::default(), 0);

        play(&mut player, &mut state, 5_000);

        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.score > 5);
    }

    #[test]
    fn test_sloppy_player_eventually_loses() {
        let mut player = AutoPlayer::new(42, 0.6);
        let mut state = GameState::new(Tuning::default(), 0);

        let mut saw_game_over = false;
        for _ in 0..50_000 {
            let input = TickInput {
                tap: player.wants_tap(&state),
            };
            tick(&mut state, &input);
            if state.phase == GamePhase::GameOver {
                saw_game_over = true;
                break;
            }
        }
        assert!(saw_game_over);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = AutoPlayer::new(99, 0.3);
        let mut b = AutoPlayer::new(99, 0.3);
        let mut state_a = GameState::new(Tuning::default(), 0);
        let mut state_b = GameState::new(Tuning::default(), 0);

        play(&mut a, &mut state_a, 3_000);
        play(&mut b, &mut state_b, 3_000);

        assert_eq!(state_a.score, state_b.score);
        assert_eq!(state_a.stack, state_b.stack);
    }
}
