// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types shared by the resolver, renderer and player.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving, rendering or playing a progression
#[derive(Error, Debug)]
pub enum JamError {
    #[error("Key '{key}' is not supported. Available keys: {supported:?}")]
    UnsupportedKey { key: String, supported: Vec<String> },

    #[error("Invalid chord numeral '{degree}' for key '{key}'")]
    UnsupportedDegree { degree: String, key: String },

    #[error("Note value must be one of: 2, 4, 8, or 16 (got {numerator}/{denominator})")]
    InvalidTimeSignature { numerator: u8, denominator: u8 },

    #[error("Tempo of {0} BPM cannot be encoded in a MIDI file")]
    InvalidTempo(u32),

    #[error("Beat scale of {0} quarter notes per chord cannot be encoded in a MIDI file")]
    InvalidBeatScale(u32),

    #[error("Failed to write MIDI file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("MIDI file not found: {}", .0.display())]
    PlaybackNotFound(PathBuf),

    #[error("Error playing MIDI file: {0}")]
    Playback(String),
}

impl JamError {
    /// Setup or persistence failure raised by a track writer
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            JamError::InvalidTempo(_) | JamError::InvalidBeatScale(_) | JamError::Io { .. }
        )
    }

    /// Missing file or audio backend failure
    pub fn is_playback_failure(&self) -> bool {
        matches!(self, JamError::PlaybackNotFound(_) | JamError::Playback(_))
    }
}

pub type Result<T> = std::result::Result<T, JamError>;
