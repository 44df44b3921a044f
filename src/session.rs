//! Fixed-timestep session driver
//!
//! Wraps one `GameState` with the frame accumulator, one-shot input latching,
//! the optional demo player, and the high score collaborator. Hosts call
//! `update` once per animation frame and react to the returned events.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScoreStore;
use crate::sim::{AutoPlayer, GameEvent, GameState, RenderSnapshot, TickInput, tick};
use crate::tuning::Tuning;

/// A running game plus everything needed to drive it
pub struct Session<S: HighScoreStore> {
    pub state: GameState,
    store: S,
    accumulator: f32,
    input: TickInput,
    autoplay: Option<AutoPlayer>,
    /// Best score from the store or from a non-demo run
    player_best: u32,
}

impl<S: HighScoreStore> Session<S> {
    /// Create an idle session, reading the high score once
    pub fn new(tuning: Tuning, store: S) -> Self {
        let high_score = store.load_high_score();
        Self {
            state: GameState::new(tuning, high_score),
            store,
            accumulator: 0.0,
            input: TickInput::default(),
            autoplay: None,
            player_best: high_score,
        }
    }

    /// Latch a tap for the next simulation step
    pub fn tap(&mut self) {
        self.input.tap = true;
    }

    /// Hand control to a demo player (or take it back with `None`).
    /// Taking control back drops any best set by the demo.
    pub fn set_autoplay(&mut self, player: Option<AutoPlayer>) {
        if player.is_none() && self.autoplay.is_some() {
            self.state.high_score = self.player_best;
        }
        self.autoplay = player;
    }

    /// Start a fresh run immediately, bypassing the input latch
    pub fn start(&mut self) {
        if self.autoplay.is_none() {
            self.state.high_score = self.player_best;
        }
        self.state.start();
    }

    /// Best score a player (not the demo) has reached
    pub fn player_best(&self) -> u32 {
        self.player_best
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Run as many fixed steps as `dt` seconds cover; returns the events
    /// they produced
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.collect_events()
    }

    /// Run exactly one simulation step
    pub fn step(&mut self) {
        if let Some(player) = self.autoplay.as_mut() {
            if player.wants_tap(&self.state) {
                self.input.tap = true;
            }
        }
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
    }

    /// Drain engine events, persisting any improved high score.
    /// Demo runs never write the player's high score.
    pub fn collect_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::NewHighScore { score } = *event {
                if self.autoplay.is_some() {
                    continue;
                }
                self.player_best = score;
                if let Err(e) = self.store.save_high_score(score) {
                    log::warn!("Failed to persist high score {score}: {e}");
                }
            }
        }
        events
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        self.state.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
