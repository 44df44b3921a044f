//! Read-only render snapshot handed to the host each frame

use serde::Serialize;

use super::block::Block;
use super::state::{GamePhase, GameState};

/// A rectangle in screen space (camera offset already applied)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Palette index
    pub color: u8,
    /// True for the block still in motion
    pub falling: bool,
}

impl RenderRect {
    fn from_block(block: &Block, camera_offset: f32, falling: bool) -> Self {
        Self {
            x: block.x,
            y: block.y + camera_offset,
            width: block.width,
            height: block.height,
            color: block.color,
            falling,
        }
    }
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Stack base-first, then the falling block (if any)
    pub rects: Vec<RenderRect>,
    pub camera_offset: f32,
    pub field_width: f32,
    pub field_height: f32,
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub diamonds: u32,
    pub perfect_streak: u32,
}

impl GameState {
    /// Build the render snapshot for the current state
    pub fn snapshot(&self) -> RenderSnapshot {
        let camera_offset = self.camera_offset();
        let mut rects = Vec::with_capacity(self.stack.len() + 1);
        rects.extend(
            self.stack
                .iter()
                .map(|b| RenderRect::from_block(b, camera_offset, false)),
        );
        if let Some(falling) = &self.falling {
            rects.push(RenderRect::from_block(falling, camera_offset, true));
        }

        RenderSnapshot {
            rects,
            camera_offset,
            field_width: self.tuning.field_width,
            field_height: self.tuning.field_height,
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            diamonds: self.diamonds,
            perfect_streak: self.consecutive_perfect_stacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_lists_stack_then_falling() {
        let mut state = GameState::new(Tuning::default(), 4);
        state.start();

        let snap = state.snapshot();

        assert_eq!(snap.rects.len(), 2);
        assert!(!snap.rects[0].falling);
        assert!(snap.rects[1].falling);
        assert_eq!(snap.camera_offset, 0.0);
        assert_eq!(snap.rects[0].y, 560.0);
        assert_eq!(snap.high_score, 4);
        assert_eq!(snap.phase, GamePhase::Running);
    }

    #[test]
    fn test_snapshot_applies_camera_offset() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();
        for _ in 0..9 {
            let top_x = state.top_block().unwrap().x;
            if let Some(falling) = state.falling.as_mut() {
                falling.x = top_x;
            }
            state.place();
        }
        // Ten spawns so far: 400 units of tower, 100 past half the field
        assert_eq!(state.tower_height, 400.0);

        let snap = state.snapshot();

        assert_eq!(snap.camera_offset, 100.0);
        assert_eq!(snap.rects[0].y, 660.0);
        let falling = snap.rects.last().unwrap();
        assert_eq!(falling.y, state.falling.unwrap().y + 100.0);
    }

    #[test]
    fn test_game_over_snapshot_has_no_falling_block() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();
        if let Some(falling) = state.falling.as_mut() {
            falling.x = 1000.0;
        }
        state.place();

        let snap = state.snapshot();
        assert_eq!(snap.phase, GamePhase::GameOver);
        assert!(snap.rects.iter().all(|r| !r.falling));
    }
}
