//! Game state and core simulation types
//!
//! One `GameState` owns the whole run: the placed stack, the falling block
//! and the scalar run counters. Hosts drive it through `start`, `tick` and
//! `place` and read it back through snapshots and drained events.

use serde::{Deserialize, Serialize};

use super::block::{Block, palette_index};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run started yet
    Idle,
    /// Falling block in motion, accepting taps
    Running,
    /// Run ended; only `start` is accepted
    GameOver,
}

/// Discrete notifications for the host (UI, audio, sharing, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ScoreIncremented { score: u32 },
    PerfectStack { streak: u32 },
    DiamondAwarded { diamonds: u32 },
    /// Block widened after a perfect streak
    GrowthBonus { width: f32 },
    /// High score beaten; the host should persist it
    NewHighScore { score: u32 },
    GameOver { final_score: u32 },
}

/// Horizontal travel direction of the falling block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
}

impl Direction {
    /// Unit sign along the x axis
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance values this engine was built with
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Placed blocks, base first
    pub stack: Vec<Block>,
    /// The block in motion (only while running)
    pub falling: Option<Block>,
    pub direction: Direction,
    /// Field units moved per tick
    pub speed: f32,
    /// Sum of block heights spawned this run
    pub tower_height: f32,
    pub consecutive_perfect_stacks: u32,
    pub score: u32,
    pub perfect_stack_count: u32,
    /// Session-wide; survives restarts
    pub diamonds: u32,
    /// Best score seen; seeded from the persistence collaborator
    pub high_score: u32,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Pending events, drained by the host
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle engine
    pub fn new(tuning: Tuning, high_score: u32) -> Self {
        let speed = tuning.initial_speed;
        Self {
            tuning,
            phase: GamePhase::Idle,
            stack: Vec::new(),
            falling: None,
            direction: Direction::Right,
            speed,
            tower_height: 0.0,
            consecutive_perfect_stacks: 0,
            score: 0,
            perfect_stack_count: 0,
            diamonds: 0,
            high_score,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run (valid from any phase)
    pub fn start(&mut self) {
        let t = &self.tuning;
        let base = Block::new(
            (t.field_width - t.initial_block_size) / 2.0,
            t.field_height - t.block_height,
            t.initial_block_size,
            t.block_height,
            palette_index(0),
        );

        self.speed = t.initial_speed;
        self.tower_height = 0.0;
        self.consecutive_perfect_stacks = 0;
        self.score = 0;
        self.perfect_stack_count = 0;
        self.direction = Direction::Right;
        self.time_ticks = 0;
        self.stack.clear();
        self.stack.push(base);

        self.spawn_falling_block();
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::RunStarted);

        log::info!("Run started (high score {})", self.high_score);
    }

    /// Spawn the next falling block above the current top of the stack
    pub(super) fn spawn_falling_block(&mut self) {
        let Some(top) = self.stack.last() else {
            return;
        };

        let x = match self.direction {
            Direction::Right => -top.width,
            Direction::Left => self.tuning.field_width,
        };
        self.falling = Some(Block::new(
            x,
            top.y - self.tuning.block_height,
            top.width,
            self.tuning.block_height,
            palette_index(self.stack.len()),
        ));
        self.tower_height += self.tuning.block_height;

        // Alternate the entry side for the next spawn
        self.direction = self.direction.reversed();
    }

    /// The block currently on top of the stack
    pub fn top_block(&self) -> Option<&Block> {
        self.stack.last()
    }

    /// Vertical shift that keeps the top of a tall tower in view
    pub fn camera_offset(&self) -> f32 {
        (self.tower_height - self.tuning.field_height / 2.0).max(0.0)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.stack.is_empty());
        assert!(state.falling.is_none());
        assert_eq!(state.high_score, 7);
    }

    #[test]
    fn test_start_builds_base_and_first_block() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stack.len(), 1);

        let base = state.stack[0];
        assert_eq!(base.x, 100.0);
        assert_eq!(base.y, 560.0);
        assert_eq!(base.width, 200.0);
        assert_eq!(base.color, 0);

        let falling = state.falling.unwrap();
        assert_eq!(falling.y, 520.0);
        assert_eq!(falling.width, 200.0);
        // Rightward spawn starts fully off the left edge
        assert_eq!(falling.x, -200.0);
        assert_eq!(falling.color, 1);

        assert_eq!(state.tower_height, 40.0);
        assert_eq!(state.direction, Direction::Left);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_leftward_spawn_starts_past_right_edge() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.start();
        state.direction = Direction::Left;
        state.spawn_falling_block();

        assert_eq!(state.falling.unwrap().x, 400.0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.tower_height, 80.0);
    }

    #[test]
    fn test_start_resets_run_but_keeps_session_counters() {
        let mut state = GameState::new(Tuning::default(), 3);
        state.start();
        state.score = 12;
        state.speed = 5.0;
        state.perfect_stack_count = 11;
        state.consecutive_perfect_stacks = 2;
        state.diamonds = 1;
        state.phase = GamePhase::GameOver;

        state.start();

        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 2.0);
        assert_eq!(state.perfect_stack_count, 0);
        assert_eq!(state.consecutive_perfect_stacks, 0);
        assert_eq!(state.diamonds, 1);
        assert_eq!(state.high_score, 3);
        assert_eq!(state.stack.len(), 1);
    }

    #[test]
    fn test_camera_offset_kicks_in_past_half_field() {
        let mut state = GameState::new(Tuning::default(), 0);
        state.tower_height = 200.0;
        assert_eq!(state.camera_offset(), 0.0);
        state.tower_height = 300.0;
        assert_eq!(state.camera_offset(), 0.0);
        state.tower_height = 420.0;
        assert_eq!(state.camera_offset(), 120.0);
    }
}
