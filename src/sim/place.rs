//! Placement resolution
//!
//! A tap commits the falling block onto the stack, trimmed to the part that
//! overlaps the block below, or ends the run when nothing overlaps.

use super::block::{Block, Overlap};
use super::state::{GameEvent, GamePhase, GameState};

/// What a single `place` call did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceOutcome {
    /// Not running, or nothing falling
    Ignored,
    /// Block committed to the stack
    Stacked { width: f32, perfect: bool },
    /// No overlap; the run is over
    Missed { final_score: u32 },
}

impl GameState {
    /// Resolve a stacking attempt for the current falling block
    pub fn place(&mut self) -> PlaceOutcome {
        if self.phase != GamePhase::Running {
            return PlaceOutcome::Ignored;
        }
        let (Some(top), Some(falling)) = (self.stack.last().copied(), self.falling) else {
            return PlaceOutcome::Ignored;
        };

        let overlap = Overlap::between(&top, &falling);
        if overlap.is_miss() {
            return self.end_run();
        }

        let perfect = overlap.ratio(&top) > self.tuning.perfect_threshold;
        let streak_before = self.consecutive_perfect_stacks;

        if perfect {
            self.perfect_stack_count += 1;
            self.consecutive_perfect_stacks += 1;
            self.emit(GameEvent::PerfectStack {
                streak: self.consecutive_perfect_stacks,
            });
            if self
                .perfect_stack_count
                .checked_rem(self.tuning.diamond_interval)
                == Some(0)
            {
                self.diamonds += 1;
                self.emit(GameEvent::DiamondAwarded {
                    diamonds: self.diamonds,
                });
            }
        } else {
            self.consecutive_perfect_stacks = 0;
        }

        let mut placed = Block::new(
            overlap.start,
            falling.y,
            overlap.width,
            falling.height,
            falling.color,
        );

        // The bonus lands on the first imperfect drop after a long enough
        // perfect streak, not on the drop that completes the streak.
        if !perfect && streak_before >= self.tuning.growth_threshold {
            placed.width =
                (placed.width * self.tuning.growth_factor).min(self.tuning.initial_block_size);
            self.consecutive_perfect_stacks = 0;
            self.emit(GameEvent::GrowthBonus {
                width: placed.width,
            });
        }

        self.stack.push(placed);
        self.score += 1;
        self.speed += self.tuning.speed_increment;
        self.emit(GameEvent::ScoreIncremented { score: self.score });

        log::debug!(
            "Placed block {} (width {:.1}, perfect: {}, speed {:.2})",
            self.score,
            placed.width,
            perfect,
            self.speed
        );

        self.spawn_falling_block();

        PlaceOutcome::Stacked {
            width: placed.width,
            perfect,
        }
    }

    /// The single tap action: start a run when idle or over, else place
    pub fn handle_input(&mut self) -> PlaceOutcome {
        if self.phase == GamePhase::Running {
            self.place()
        } else {
            self.start();
            PlaceOutcome::Ignored
        }
    }

    fn end_run(&mut self) -> PlaceOutcome {
        self.falling = None;
        self.phase = GamePhase::GameOver;

        if self.score > self.high_score {
            self.high_score = self.score;
            self.emit(GameEvent::NewHighScore { score: self.score });
        }
        self.emit(GameEvent::GameOver {
            final_score: self.score,
        });

        log::info!(
            "Game over: score {} (high score {}, diamonds {})",
            self.score,
            self.high_score,
            self.diamonds
        );

        PlaceOutcome::Missed {
            final_score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();
        state.drain_events();
        state
    }

    /// Put the falling block at an x offset relative to the top block
    fn align(state: &mut GameState, offset: f32) {
        let top_x = state.top_block().unwrap().x;
        if let Some(falling) = state.falling.as_mut() {
            falling.x = top_x + offset;
        }
    }

    fn place_perfect(state: &mut GameState) {
        align(state, 0.0);
        assert!(matches!(
            state.place(),
            PlaceOutcome::Stacked { perfect: true, .. }
        ));
    }

    #[test]
    fn test_full_overlap_is_perfect() {
        let mut state = running();
        align(&mut state, 0.0);

        let outcome = state.place();

        assert_eq!(
            outcome,
            PlaceOutcome::Stacked {
                width: 200.0,
                perfect: true
            }
        );
        assert_eq!(state.score, 1);
        assert_eq!(state.perfect_stack_count, 1);
        assert_eq!(state.consecutive_perfect_stacks, 1);
        assert_eq!(state.stack.len(), 2);
        assert_eq!(state.stack[1].width, 200.0);
        assert_eq!(state.stack[1].y, 520.0);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::PerfectStack { streak: 1 },
                GameEvent::ScoreIncremented { score: 1 },
            ]
        );
    }

    #[test]
    fn test_miss_ends_run_and_raises_high_score() {
        let mut state = running();
        state.score = 5;
        state.high_score = 3;
        align(&mut state, 250.0);

        let outcome = state.place();

        assert_eq!(outcome, PlaceOutcome::Missed { final_score: 5 });
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 5);
        assert_eq!(state.score, 5);
        assert!(state.falling.is_none());
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::NewHighScore { score: 5 },
                GameEvent::GameOver { final_score: 5 },
            ]
        );
    }

    #[test]
    fn test_miss_below_high_score_keeps_it() {
        let mut state = running();
        state.score = 2;
        state.high_score = 9;
        align(&mut state, -300.0);

        state.place();

        assert_eq!(state.high_score, 9);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GameOver { final_score: 2 }]
        );
    }

    #[test]
    fn test_growth_bonus_after_perfect_streak() {
        let mut state = running();
        for _ in 0..3 {
            place_perfect(&mut state);
        }
        assert_eq!(state.consecutive_perfect_stacks, 3);
        state.drain_events();

        // 150 of 200 overlaps: ratio 0.75, not perfect
        align(&mut state, 50.0);
        let outcome = state.place();

        let PlaceOutcome::Stacked { width, perfect } = outcome else {
            panic!("expected a stacked block, got {outcome:?}");
        };
        assert!(!perfect);
        assert!((width - 165.0).abs() < 1e-3);
        assert!((state.top_block().unwrap().width - 165.0).abs() < 1e-3);
        assert_eq!(state.consecutive_perfect_stacks, 0);
        // Next falling block inherits the grown width
        assert!((state.falling.unwrap().width - 165.0).abs() < 1e-3);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GrowthBonus { .. }))
        );
    }

    #[test]
    fn test_growth_bonus_capped_at_initial_size() {
        let mut state = running();
        for _ in 0..3 {
            place_perfect(&mut state);
        }
        // 190 of 200: ratio exactly 0.95 is not perfect
        align(&mut state, 10.0);
        state.place();

        assert_eq!(state.top_block().unwrap().width, 200.0);
    }

    #[test]
    fn test_no_growth_after_short_streak() {
        let mut state = running();
        place_perfect(&mut state);
        place_perfect(&mut state);
        align(&mut state, 50.0);
        state.place();

        assert!((state.top_block().unwrap().width - 150.0).abs() < 1e-3);
        assert_eq!(state.consecutive_perfect_stacks, 0);
    }

    #[test]
    fn test_tenth_perfect_awards_one_diamond() {
        let mut state = running();
        for _ in 0..9 {
            place_perfect(&mut state);
        }
        assert_eq!(state.perfect_stack_count, 9);
        assert_eq!(state.diamonds, 0);
        state.drain_events();

        place_perfect(&mut state);

        assert_eq!(state.perfect_stack_count, 10);
        assert_eq!(state.diamonds, 1);
        let diamonds = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::DiamondAwarded { .. }))
            .count();
        assert_eq!(diamonds, 1);
    }

    #[test]
    fn test_trimmed_block_uses_overlap_region() {
        let mut state = running();
        align(&mut state, -30.0);
        state.place();

        let top = state.top_block().unwrap();
        assert_eq!(top.x, 100.0);
        assert!((top.width - 170.0).abs() < 1e-3);
        assert_eq!(top.color, 1);
    }

    #[test]
    fn test_place_ignored_outside_running() {
        let mut state = GameState::new(Tuning::default(), 0);
        assert_eq!(state.place(), PlaceOutcome::Ignored);
        assert_eq!(state.phase, GamePhase::Idle);

        let mut state = running();
        align(&mut state, 500.0);
        state.place();
        let score = state.score;
        assert_eq!(state.place(), PlaceOutcome::Ignored);
        assert_eq!(state.score, score);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_handle_input_starts_then_places() {
        let mut state = GameState::new(Tuning::default(), 0);
        assert_eq!(state.handle_input(), PlaceOutcome::Ignored);
        assert_eq!(state.phase, GamePhase::Running);

        align(&mut state, 0.0);
        assert!(matches!(
            state.handle_input(),
            PlaceOutcome::Stacked { .. }
        ));
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_speed_ramps_per_placement() {
        let mut state = running();
        place_perfect(&mut state);
        place_perfect(&mut state);
        assert!((state.speed - 2.2).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_overlap_never_exceeds_widths(offsets in prop::collection::vec(-260.0f32..260.0, 1..30)) {
            let mut state = running();
            for offset in offsets {
                if !state.is_running() {
                    break;
                }
                let top = *state.top_block().unwrap();
                align(&mut state, offset);
                let falling = state.falling.unwrap();
                let overlap = Overlap::between(&top, &falling);
                prop_assert!(overlap.width >= 0.0);
                prop_assert!(overlap.width <= top.width.min(falling.width));
                state.place();
            }
        }

        #[test]
        fn prop_score_and_speed_monotone(offsets in prop::collection::vec(-40.0f32..40.0, 1..40)) {
            let mut state = running();
            for offset in offsets {
                if !state.is_running() {
                    break;
                }
                let (score, speed) = (state.score, state.speed);
                align(&mut state, offset);
                match state.place() {
                    PlaceOutcome::Stacked { .. } => {
                        prop_assert_eq!(state.score, score + 1);
                        prop_assert!(state.speed >= speed);
                    }
                    PlaceOutcome::Missed { .. } => {
                        prop_assert_eq!(state.score, score);
                        prop_assert_eq!(state.speed, speed);
                    }
                    PlaceOutcome::Ignored => prop_assert!(false, "running state ignored a tap"),
                }
            }
        }

        #[test]
        fn prop_diamonds_track_perfect_count(perfects in prop::collection::vec(any::<bool>(), 1..60)) {
            let mut state = running();
            for perfect in perfects {
                let width = state.top_block().unwrap().width;
                // Imperfect drops overlap 80% so the tower never collapses
                align(&mut state, if perfect { 0.0 } else { width * 0.2 });
                state.place();
                prop_assert_eq!(state.diamonds, state.perfect_stack_count / 10);
            }
        }
    }
}
