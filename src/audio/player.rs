// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Soundfont-based MIDI file player.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{info, warn};

use super::{AudioConfig, AudioError, AudioOutput, FluidSynth, MidiPlayer};
use crate::error::{JamError, Result};
use crate::midi::{MidiFileReader, TimedEvent};

/// Time left for notes to ring out after the last event
const RELEASE_TAIL: Duration = Duration::from_secs(1);

/// Walks a time-ordered event list as playback time advances
#[derive(Debug, Clone, Default)]
pub struct EventCursor {
    events: Vec<TimedEvent>,
    next: usize,
}

impl EventCursor {
    pub fn new(events: Vec<TimedEvent>) -> Self {
        Self { events, next: 0 }
    }

    /// Events due at or before `now` that have not been returned yet
    pub fn due(&mut self, now: Duration) -> &[TimedEvent] {
        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].at <= now {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    /// Whether every event has been returned
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.events.len()
    }

    /// Time at which playback can end
    pub fn end(&self) -> Duration {
        self.events.last().map(|e| e.at).unwrap_or_default() + RELEASE_TAIL
    }
}

/// Completion state shared between the player and the audio thread.
///
/// Playback is over once it has either run to its end or failed; a
/// failure message stays available until taken.
#[derive(Debug)]
pub struct PlaybackStatus {
    finished: AtomicBool,
    error: Mutex<Option<String>>,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            finished: AtomicBool::new(true),
            error: Mutex::new(None),
        }
    }
}

impl PlaybackStatus {
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Mark playback as running and forget any earlier failure
    pub fn start(&self) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.finished.store(false, Ordering::SeqCst);
    }

    pub fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    /// Record a backend failure; playback counts as finished
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("Playback failed: {}", message);
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
        self.finish();
    }

    /// Take the recorded failure, if any
    pub fn take_error(&self) -> Option<String> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// State shared with the audio callback
struct Playback {
    synth: FluidSynth,
    cursor: EventCursor,
    frames_played: u64,
    sample_rate: u32,
    end: Duration,
    status: Arc<PlaybackStatus>,
}

impl Playback {
    fn position(&self) -> Duration {
        Duration::from_secs_f64(self.frames_played as f64 / self.sample_rate as f64)
    }

    fn fill(&mut self, buffer: &mut [f32], channels: usize) {
        let now = self.position();
        for event in self.cursor.due(now).to_vec() {
            self.synth.dispatch(event.channel, event.message);
        }

        self.synth.render(buffer, channels);
        self.frames_played += (buffer.len() / channels.max(1)) as u64;

        if self.cursor.is_exhausted() && self.position() >= self.end {
            self.status.finish();
        }
    }
}

/// Plays MIDI files through FluidLite on the default audio device
pub struct SynthPlayer {
    soundfont: PathBuf,
    config: AudioConfig,
    events: Option<Vec<TimedEvent>>,
    playback: Option<Arc<Mutex<Playback>>>,
    output: Option<AudioOutput>,
    status: Arc<PlaybackStatus>,
}

impl SynthPlayer {
    /// Create a player using the SF2 soundfont at `soundfont`
    pub fn new<P: Into<PathBuf>>(soundfont: P) -> Self {
        Self::with_config(soundfont, AudioConfig::default())
    }

    pub fn with_config<P: Into<PathBuf>>(soundfont: P, config: AudioConfig) -> Self {
        Self {
            soundfont: soundfont.into(),
            config,
            events: None,
            playback: None,
            output: None,
            status: Arc::new(PlaybackStatus::default()),
        }
    }

    pub fn soundfont(&self) -> &Path {
        &self.soundfont
    }
}

impl MidiPlayer for SynthPlayer {
    fn load(&mut self, path: &Path) -> Result<()> {
        let reader = MidiFileReader::open(path)?;
        info!(
            "Loaded {:?} ({} events, {:.1}s)",
            path,
            reader.events().len(),
            reader.duration().as_secs_f64()
        );
        self.events = Some(reader.into_events());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let events = self.events.take().ok_or(AudioError::NotLoaded)?;

        let mut synth = FluidSynth::new(self.config.sample_rate as f64)?;
        synth.load_soundfont(&self.soundfont)?;

        let cursor = EventCursor::new(events);
        self.status.start();
        let playback = Arc::new(Mutex::new(Playback {
            synth,
            end: cursor.end(),
            cursor,
            frames_played: 0,
            sample_rate: self.config.sample_rate,
            status: Arc::clone(&self.status),
        }));

        let shared = Arc::clone(&playback);
        let callback_status = Arc::clone(&self.status);
        let error_status = Arc::clone(&self.status);
        let output = AudioOutput::new(
            self.config.clone(),
            move |buffer, channels| match shared.lock() {
                Ok(mut playback) => playback.fill(buffer, channels),
                Err(_) if !callback_status.is_finished() => {
                    callback_status.fail("playback state poisoned by a panic")
                }
                Err(_) => {}
            },
            move |message| error_status.fail(message),
        );

        match output {
            Ok(output) => {
                info!(
                    "Audio output started at {} Hz ({:.1} ms buffer)",
                    self.config.sample_rate,
                    self.config.latency_ms()
                );
                self.output = Some(output);
                self.playback = Some(playback);
                Ok(())
            }
            Err(e) => {
                self.status.finish();
                Err(e.into())
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.output.is_some() && !self.status.is_finished()
    }

    fn take_failure(&mut self) -> Option<JamError> {
        self.status
            .take_error()
            .map(|message| AudioError::StreamFailed(message).into())
    }

    fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .synth
                .all_notes_off();
        }
        self.output = None;
        self.events = None;
        self.status.finish();
    }
}
