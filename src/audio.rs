//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Each
//! effect is a short list of enveloped oscillator tones; only the playback
//! side touches the browser.

use crate::config::AudioSettings;
use crate::launch::LaunchEvent;
use crate::score::ContactEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball released from a drag
    Launch,
    /// Ball touched the ground or another body
    Bounce,
    /// Ball hit the target
    Score,
    /// Ball left the playfield and came back
    Respawn,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// One enveloped tone: starts at `gain` and decays to silence over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Frequency glide target, reached at the end of the tone
    pub glide_to: Option<f32>,
    pub waveform: Waveform,
    pub gain: f32,
    /// Seconds after the effect starts
    pub delay: f64,
    pub duration: f64,
}

impl Tone {
    const fn new(freq: f32, waveform: Waveform, gain: f32, duration: f64) -> Self {
        Self {
            freq,
            glide_to: None,
            waveform,
            gain,
            delay: 0.0,
            duration,
        }
    }

    const fn glide(mut self, to: f32) -> Self {
        self.glide_to = Some(to);
        self
    }

    const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

const LAUNCH: &[Tone] = &[Tone::new(200.0, Waveform::Triangle, 0.3, 0.2).glide(600.0)];

const BOUNCE: &[Tone] = &[Tone::new(150.0, Waveform::Sine, 0.5, 0.12).glide(70.0)];

const SCORE: &[Tone] = &[
    Tone::new(520.0, Waveform::Triangle, 0.3, 0.25),
    Tone::new(660.0, Waveform::Triangle, 0.3, 0.25).after(0.08),
    Tone::new(880.0, Waveform::Triangle, 0.3, 0.4).after(0.16),
];

const RESPAWN: &[Tone] = &[
    Tone::new(300.0, Waveform::Square, 0.12, 0.15).glide(450.0),
    Tone::new(450.0, Waveform::Sine, 0.2, 0.2).after(0.1),
];

impl SoundEffect {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Launch => LAUNCH,
            SoundEffect::Bounce => BOUNCE,
            SoundEffect::Score => SCORE,
            SoundEffect::Respawn => RESPAWN,
        }
    }
}

impl From<&LaunchEvent> for SoundEffect {
    fn from(event: &LaunchEvent) -> Self {
        match event {
            LaunchEvent::Launched { .. } => SoundEffect::Launch,
            LaunchEvent::Respawned { .. } => SoundEffect::Respawn,
        }
    }
}

impl From<&ContactEvent> for SoundEffect {
    fn from(event: &ContactEvent) -> Self {
        match event {
            ContactEvent::Bounce => SoundEffect::Bounce,
            ContactEvent::Scored { .. } => SoundEffect::Score,
        }
    }
}

/// Combined output volume for the given settings
pub fn effective_volume(settings: &AudioSettings) -> f32 {
    if settings.muted {
        0.0
    } else {
        settings.master_volume.clamp(0.0, 1.0) * settings.sfx_volume.clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Waveform, effective_volume};
    use crate::config::AudioSettings;

    impl From<Waveform> for OscillatorType {
        fn from(waveform: Waveform) -> Self {
            match waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Square => OscillatorType::Square,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: AudioSettings,
    }

    impl AudioManager {
        pub fn new(settings: AudioSettings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, settings }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.settings.muted = muted;
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = effective_volume(&self.settings);
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                play_tone(ctx, tone, vol);
            }
        }
    }

    /// Create an oscillator routed through a gain node to the speakers
    fn create_osc(
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

    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, tone.freq, tone.waveform.into()) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;
        let end = t + tone.duration;

        gain.gain().set_value_at_time(vol * tone.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if let Some(to) = tone.glide_to {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}
