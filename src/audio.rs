//! Audio cues
//!
//! Every cue maps to an mp3 under the sounds directory. Playback is
//! best-effort: failures are logged and never reach game logic.

use thiserror::Error;

use crate::cards::Note;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Key card turned face up
    Note(Note),
    /// Pair matched
    Success,
    /// Board cleared
    Win,
}

impl SoundCue {
    /// Asset path relative to `base`
    pub fn asset_path(&self, base: &str) -> String {
        let stem = match self {
            SoundCue::Note(note) => note.sound_stem(),
            SoundCue::Success => "success",
            SoundCue::Win => "win",
        };
        format!("{}/{}.mp3", base, stem)
    }
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("playback of {asset} failed: {message}")]
    Playback { asset: String, message: String },
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
}

/// Volume and mute state shared by the sinks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
        }
    }
}

impl Mixer {
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            muted,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// Sink that only logs (native builds have no audio backend)
#[derive(Debug, Default)]
pub struct SilentAudio {
    pub mixer: Mixer,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        if self.mixer.effective_volume() > 0.0 {
            log::debug!("♪ {:?}", cue);
        }
        Ok(())
    }
}

/// Audio manager backed by `HTMLAudioElement` (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    base: String,
    pub mixer: Mixer,
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new(base: impl Into<String>, mixer: Mixer) -> Self {
        Self {
            base: base.into(),
            mixer,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        let vol = self.mixer.effective_volume();
        if vol <= 0.0 {
            return Ok(());
        }

        let asset = cue.asset_path(&self.base);
        let audio = web_sys::HtmlAudioElement::new_with_src(&asset).map_err(|e| {
            AudioError::Playback {
                asset: asset.clone(),
                message: format!("{:?}", e),
            }
        })?;
        audio.set_volume(vol as f64);

        let promise = audio.play().map_err(|e| AudioError::Playback {
            asset: asset.clone(),
            message: format!("{:?}", e),
        })?;

        // Autoplay restrictions reject the promise later; log it and move on
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::error!("Audio Error ({}): {:?}", asset, e);
            }
        });
        Ok(())
    }
}
