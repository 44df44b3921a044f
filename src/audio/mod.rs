//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The event-to-sound mapping is platform independent; playback is wasm only.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started
    Start,
    /// Block landed (trimmed)
    Place,
    /// Block landed perfectly; pitch climbs with the streak
    Perfect { streak: u32 },
    /// Diamond earned
    Diamond,
    /// Block widened by the growth bonus
    Growth,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound to play for an engine event, if any.
    ///
    /// `ScoreIncremented` is only voiced when the same batch carried no
    /// perfect stack, so a perfect drop does not play two sounds.
    pub fn for_events(events: &[GameEvent]) -> Vec<SoundEffect> {
        let perfect = events
            .iter()
            .any(|e| matches!(e, GameEvent::PerfectStack { .. }));
        events
            .iter()
            .filter_map(|event| match *event {
                GameEvent::RunStarted => Some(SoundEffect::Start),
                GameEvent::ScoreIncremented { .. } if !perfect => Some(SoundEffect::Place),
                GameEvent::ScoreIncremented { .. } => None,
                GameEvent::PerfectStack { streak } => Some(SoundEffect::Perfect { streak }),
                GameEvent::DiamondAwarded { .. } => Some(SoundEffect::Diamond),
                GameEvent::GrowthBonus { .. } => Some(SoundEffect::Growth),
                GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
                GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drop_plays_place() {
        let events = [GameEvent::ScoreIncremented { score: 3 }];
        assert_eq!(SoundEffect::for_events(&events), vec![SoundEffect::Place]);
    }

    #[test]
    fn test_perfect_drop_plays_only_chime() {
        let events = [
            GameEvent::PerfectStack { streak: 2 },
            GameEvent::ScoreIncremented { score: 5 },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![SoundEffect::Perfect { streak: 2 }]
        );
    }

    #[test]
    fn test_tenth_perfect_chimes_and_dings() {
        let events = [
            GameEvent::PerfectStack { streak: 10 },
            GameEvent::DiamondAwarded { diamonds: 1 },
            GameEvent::ScoreIncremented { score: 10 },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![SoundEffect::Perfect { streak: 10 }, SoundEffect::Diamond]
        );
    }

    #[test]
    fn test_miss_plays_high_score_then_game_over() {
        let events = [
            GameEvent::NewHighScore { score: 4 },
            GameEvent::GameOver { final_score: 4 },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![SoundEffect::HighScore, SoundEffect::GameOver]
        );
    }

    #[test]
    fn test_growth_and_start_are_voiced() {
        let events = [
            GameEvent::RunStarted,
            GameEvent::GrowthBonus { width: 150.0 },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![SoundEffect::Start, SoundEffect::Growth]
        );
    }

    #[test]
    fn test_empty_batch_is_silent() {
        assert!(SoundEffect::for_events(&[]).is_empty());
    }
}
