// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! FluidSynth integration for software synthesis.
//!
//! Provides a wrapper around FluidLite for SF2 soundfont playback
//! of parsed MIDI file events.

use std::path::Path;

use fluidlite::{IsSettings, Settings, Synth};

use super::AudioError;
use crate::midi::PlaybackMessage;

/// FluidSynth wrapper for software synthesis
pub struct FluidSynth {
    synth: Synth,
    /// Loaded soundfont ID
    soundfont_id: Option<u32>,
}

impl FluidSynth {
    /// Create a synth running at `sample_rate`
    pub fn new(sample_rate: f64) -> Result<Self, AudioError> {
        let settings = Settings::new()
            .map_err(|e| AudioError::InitFailed(format!("FluidLite settings: {:?}", e)))?;

        if let Some(setting) = settings.num("synth.sample-rate") {
            setting.set(sample_rate);
        }
        if let Some(setting) = settings.num("synth.gain") {
            setting.set(0.5);
        }
        if let Some(setting) = settings.int("synth.midi-channels") {
            setting.set(16);
        }

        let synth = Synth::new(settings)
            .map_err(|e| AudioError::InitFailed(format!("FluidLite synth: {:?}", e)))?;

        Ok(Self {
            synth,
            soundfont_id: None,
        })
    }

    /// Load a soundfont file, replacing any previous one
    pub fn load_soundfont(&mut self, path: &Path) -> Result<(), AudioError> {
        if !path.exists() {
            return Err(AudioError::SoundfontLoadFailed(format!(
                "Soundfont file not found: {}",
                path.display()
            )));
        }

        if let Some(id) = self.soundfont_id.take() {
            let _ = self.synth.sfunload(id, true);
        }

        match self.synth.sfload(path, true) {
            Ok(id) => {
                self.soundfont_id = Some(id);
                Ok(())
            }
            Err(_) => Err(AudioError::SoundfontLoadFailed(format!(
                "Failed to load soundfont: {}",
                path.display()
            ))),
        }
    }

    /// Send a parsed file message to the synth
    pub fn dispatch(&mut self, channel: u8, message: PlaybackMessage) {
        let channel = channel as u32;
        let _ = match message {
            PlaybackMessage::NoteOn { key, velocity } => {
                self.synth.note_on(channel, key as u32, velocity as u32)
            }
            PlaybackMessage::NoteOff { key } => self.synth.note_off(channel, key as u32),
            PlaybackMessage::ProgramChange { program } => {
                self.synth.program_change(channel, program as u32)
            }
            PlaybackMessage::ControlChange { control, value } => {
                self.synth.cc(channel, control as u32, value as u32)
            }
        };
    }

    /// Render audio to buffer (interleaved)
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) {
        if channels == 2 {
            let _ = self.synth.write(&mut *buffer);
        } else if channels == 1 {
            // Mono: render stereo then mix down
            let frames = buffer.len();
            let mut stereo = vec![0.0f32; frames * 2];
            let _ = self.synth.write(stereo.as_mut_slice());
            for i in 0..frames {
                buffer[i] = (stereo[i * 2] + stereo[i * 2 + 1]) * 0.5;
            }
        }
    }

    /// Silence every channel
    pub fn all_notes_off(&mut self) {
        for channel in 0..16 {
            let _ = self.synth.cc(channel, 123, 0);
        }
    }
}
