// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The `play` command.
//!
//! Exit codes: 0 after playback finishes, 1 when the file is missing or
//! the audio backend fails. Either failure prints `Error: <message>`.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::audio::{play_midi_file, MidiPlayer};
use crate::error::JamError;

/// Play `file` to completion, report the outcome and return the exit code
pub fn run_play<P, O, E>(
    player: &mut P,
    file: &Path,
    poll_interval: Duration,
    out: &mut O,
    err: &mut E,
) -> i32
where
    P: MidiPlayer + ?Sized,
    O: Write,
    E: Write,
{
    if !file.is_file() {
        let _ = writeln!(err, "Error: {}", JamError::PlaybackNotFound(file.to_path_buf()));
        return 1;
    }
    let file = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());

    match play_midi_file(player, &file, true, poll_interval) {
        Ok(()) => {
            let _ = writeln!(out, "Finished playing: {}", file.display());
            0
        }
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            1
        }
    }
}
