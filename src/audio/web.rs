//! Web Audio playback

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::SoundEffect;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Volume and mute state
    settings: Settings,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            settings: Settings::default(),
        }
    }

    /// Pick up volume and mute state from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    /// Play the sounds for a batch of engine events
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in SoundEffect::for_events(events) {
            self.play(effect);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::Place => self.play_place(ctx, vol),
            SoundEffect::Perfect { streak } => self.play_perfect(ctx, vol, streak),
            SoundEffect::Diamond => self.play_diamond(ctx, vol),
            SoundEffect::Growth => self.play_growth(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single decaying tone starting at `delay` seconds from now
    fn blip(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        level: f32,
        delay: f64,
        length: f64,
    ) {
        if let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }
    }

    /// Start - whoosh up
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Place - solid thump with a chop
    fn play_place(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();

        self.blip(ctx, 300.0, OscillatorType::Triangle, vol * 0.2, 0.0, 0.05);
    }

    /// Perfect - bright chime, one semitone higher per streak step
    fn play_perfect(&self, ctx: &AudioContext, vol: f32, streak: u32) {
        let step = streak.saturating_sub(1).min(12) as f32;
        let base = 600.0 * 2f32.powf(step / 12.0);
        for (i, ratio) in [1.0, 1.5, 2.0].iter().enumerate() {
            self.blip(
                ctx,
                base * ratio,
                OscillatorType::Sine,
                vol * 0.2,
                i as f64 * 0.02,
                0.3,
            );
        }
    }

    /// Diamond - happy ding
    fn play_diamond(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Sine,
                vol * 0.25,
                i as f64 * 0.08,
                0.15,
            );
        }
    }

    /// Growth - rising wobble
    fn play_growth(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency().set_value_at_time(400.0, t + 0.05).ok();
        osc.frequency().set_value_at_time(350.0, t + 0.1).ok();
        osc.frequency().set_value_at_time(500.0, t + 0.15).ok();
        osc.frequency().set_value_at_time(450.0, t + 0.2).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Sine,
                vol * 0.3,
                i as f64 * 0.2,
                0.3,
            );
        }
    }

    /// High score - celebratory
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            self.blip(
                ctx,
                *freq,
                OscillatorType::Triangle,
                vol * 0.25,
                0.9 + i as f64 * 0.08,
                0.25,
            );
        }
    }
}
