//! Audio collaborator
//!
//! The simulation only emits `AudioCue`s. A sink turns them into sound; a
//! failing sink must never disturb the game, so `Game` logs and moves on.

use std::fmt;

use crate::settings::SoundMode;
use crate::sim::AudioCue;

/// Playback failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio device/context
    Unavailable,
    /// Backend rejected the sound
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio unavailable"),
            AudioError::Playback(msg) => write!(f, "playback failed: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue, mode: SoundMode) -> Result<(), AudioError>;
}

/// Headless sink: logs cues instead of playing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue, mode: SoundMode) -> Result<(), AudioError> {
        if !mode.is_muted() {
            log::trace!("audio cue {cue:?} ({})", mode.as_str());
        }
        Ok(())
    }
}

/// Tone parameters for a cue: (start Hz, end Hz, seconds, gain)
pub fn tone_for(cue: AudioCue) -> (f32, f32, f64, f32) {
    match cue {
        AudioCue::Collect => (880.0, 1320.0, 0.12, 0.4),
        AudioCue::Crash => (220.0, 40.0, 0.6, 0.8),
        AudioCue::EngineMoving => (90.0, 140.0, 0.25, 0.25),
        AudioCue::ShieldBreak => (660.0, 330.0, 0.3, 0.5),
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink, tone_for};
    use crate::settings::SoundMode;
    use crate::sim::AudioCue;

    /// Procedural Web Audio sink - no asset files
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudioSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioSink {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let err = |e: wasm_bindgen::JsValue| AudioError::Playback(format!("{e:?}"));
            let osc = ctx.create_oscillator().map_err(err)?;
            let gain = ctx.create_gain().map_err(err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(err)?;
            gain.connect_with_audio_node(&ctx.destination()).map_err(err)?;
            Ok((osc, gain))
        }
    }

    impl AudioSink for WebAudioSink {
        fn play(&mut self, cue: AudioCue, mode: SoundMode) -> Result<(), AudioError> {
            let osc_type = match mode {
                SoundMode::Off => return Ok(()),
                SoundMode::Retro => OscillatorType::Square,
                SoundMode::Soft => OscillatorType::Sine,
            };
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (from, to, secs, level) = tone_for(cue);
            let (osc, gain) = Self::create_osc(ctx, from, osc_type)?;
            let err = |e: wasm_bindgen::JsValue| AudioError::Playback(format!("{e:?}"));
            let t = ctx.current_time();

            gain.gain()
                .set_value_at_time(self.volume * level, t)
                .map_err(err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + secs)
                .map_err(err)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + secs)
                .map_err(err)?;

            osc.start().map_err(err)?;
            osc.stop_with_when(t + secs + 0.05).map_err(err)?;
            Ok(())
        }
    }
}
