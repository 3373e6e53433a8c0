// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! simplejam: chord progressions written as Roman numerals, rendered to
//! standard MIDI files and played back through a soundfont synth.
//!
//! Data flows one way: key tables -> progression resolver -> renderer ->
//! MIDI file -> player.

pub mod audio;
pub mod commands;
pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod progression;
pub mod render;

pub use error::{JamError, Result};
pub use progression::{resolve, ChordSequence, KeyChordProgression};
pub use render::{generate_midi_file, render_chords, RenderConfig, TimeSignature, TrackWriter};
