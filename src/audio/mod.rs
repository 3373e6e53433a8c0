// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI file playback.
//!
//! This module provides:
//! - The [`MidiPlayer`] capability (load, play, busy query, stop)
//! - [`play_midi_file`], which drives a player and optionally waits
//! - [`SynthPlayer`], a FluidLite soundfont synth on a cpal output stream

pub mod fluidsynth;
pub mod output;
pub mod player;

pub use fluidsynth::FluidSynth;
pub use output::{AudioConfig, AudioOutput};
pub use player::SynthPlayer;

use std::path::Path;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::error::{JamError, Result};

/// How often a waiting caller checks whether playback has finished
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can play a MIDI file
pub trait MidiPlayer {
    /// Load the file at `path`
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Start playing the loaded file
    fn play(&mut self) -> Result<()>;

    /// Whether playback is still in progress
    fn is_busy(&self) -> bool;

    /// Failure raised by the backend after playback started, if any
    fn take_failure(&mut self) -> Option<JamError> {
        None
    }

    /// Stop playback and release the audio device
    fn stop(&mut self);
}

/// Play `path` on `player`.
///
/// A missing file is reported before the player is touched. Once loading
/// has been attempted the player is always stopped, even on error.
pub fn play_midi_file<P: MidiPlayer + ?Sized>(
    player: &mut P,
    path: &Path,
    wait_for_completion: bool,
    poll_interval: Duration,
) -> Result<()> {
    if !path.exists() {
        return Err(JamError::PlaybackNotFound(path.to_path_buf()));
    }

    let result = start_and_wait(player, path, wait_for_completion, poll_interval);
    player.stop();
    result
}

fn start_and_wait<P: MidiPlayer + ?Sized>(
    player: &mut P,
    path: &Path,
    wait_for_completion: bool,
    poll_interval: Duration,
) -> Result<()> {
    player.load(path)?;
    player.play()?;
    debug!("Playing {:?}", path);

    if wait_for_completion {
        while player.is_busy() {
            thread::sleep(poll_interval);
        }
    }
    match player.take_failure() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Audio backend errors
#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio initialization failed: {0}")]
    InitFailed(String),
    #[error("Soundfont load failed: {0}")]
    SoundfontLoadFailed(String),
    #[error("Audio stream failed: {0}")]
    StreamFailed(String),
    #[error("No audio device available")]
    NoDevice,
    #[error("No MIDI file loaded")]
    NotLoaded,
}

impl From<AudioError> for JamError {
    fn from(err: AudioError) -> Self {
        JamError::Playback(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Player whose busy flag follows a script
    #[derive(Default)]
    struct ScriptedPlayer {
        busy: Vec<bool>,
        busy_queries: Cell<usize>,
        loaded: Option<PathBuf>,
        played: usize,
        stopped: usize,
        fail_play: bool,
        stream_failure: Option<String>,
    }

    impl MidiPlayer for ScriptedPlayer {
        fn load(&mut self, path: &Path) -> Result<()> {
            self.loaded = Some(path.to_path_buf());
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if self.fail_play {
                return Err(AudioError::NoDevice.into());
            }
            self.played += 1;
            Ok(())
        }

        fn is_busy(&self) -> bool {
            let n = self.busy_queries.get();
            self.busy_queries.set(n + 1);
            self.busy.get(n).copied().unwrap_or(false)
        }

        fn take_failure(&mut self) -> Option<JamError> {
            self.stream_failure
                .take()
                .map(|message| AudioError::StreamFailed(message).into())
        }

        fn stop(&mut self) {
            self.stopped += 1;
        }
    }

    fn midi_file(dir: &Path) -> PathBuf {
        let path = dir.join("song.mid");
        fs::write(&path, b"MThd").unwrap();
        path
    }

    #[test]
    fn test_play_and_wait() {
        let dir = tempdir().unwrap();
        let path = midi_file(dir.path());
        let mut player = ScriptedPlayer {
            busy: vec![true, true, false],
            ..Default::default()
        };

        play_midi_file(&mut player, &path, true, Duration::from_millis(1)).unwrap();

        assert_eq!(player.loaded, Some(path));
        assert_eq!(player.played, 1);
        assert_eq!(player.busy_queries.get(), 3);
        assert_eq!(player.stopped, 1);
    }

    #[test]
    fn test_play_without_waiting() {
        let dir = tempdir().unwrap();
        let path = midi_file(dir.path());
        let mut player = ScriptedPlayer {
            busy: vec![true, true, false],
            ..Default::default()
        };

        play_midi_file(&mut player, &path, false, DEFAULT_POLL_INTERVAL).unwrap();

        assert_eq!(player.busy_queries.get(), 0);
        assert_eq!(player.stopped, 1);
    }

    #[test]
    fn test_missing_file() {
        let mut player = ScriptedPlayer::default();
        let path = Path::new("/nonexistent/file.mid");

        let err = play_midi_file(&mut player, path, true, DEFAULT_POLL_INTERVAL).unwrap_err();

        assert!(matches!(err, JamError::PlaybackNotFound(_)));
        assert!(player.loaded.is_none());
        assert_eq!(player.stopped, 0);
    }

    #[test]
    fn test_backend_failure_still_stops() {
        let dir = tempdir().unwrap();
        let path = midi_file(dir.path());
        let mut player = ScriptedPlayer {
            fail_play: true,
            ..Default::default()
        };

        let err = play_midi_file(&mut player, &path, true, DEFAULT_POLL_INTERVAL).unwrap_err();

        assert_eq!(err.to_string(), "Error playing MIDI file: No audio device available");
        assert_eq!(player.stopped, 1);
    }

    #[test]
    fn test_stream_failure_ends_wait() {
        let dir = tempdir().unwrap();
        let path = midi_file(dir.path());
        let mut player = ScriptedPlayer {
            busy: vec![true, false],
            stream_failure: Some("device disconnected".to_string()),
            ..Default::default()
        };

        let err = play_midi_file(&mut player, &path, true, Duration::from_millis(1)).unwrap_err();

        assert!(err.is_playback_failure());
        assert_eq!(
            err.to_string(),
            "Error playing MIDI file: Audio stream failed: device disconnected"
        );
        assert_eq!(player.busy_queries.get(), 2);
        assert_eq!(player.stopped, 1);
    }
}
