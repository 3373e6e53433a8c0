// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file reading for playback.
//!
//! Parses a file with `midly`, merges all tracks and converts tick
//! positions to wall-clock offsets using the file's tempo map.

use std::fs;
use std::path::Path;
use std::time::Duration;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{JamError, Result};

/// Tempo assumed until the first tempo event (120 BPM)
const DEFAULT_MICROS_PER_QUARTER: u64 = 500_000;

/// Channel message relevant to playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMessage {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8 },
    ProgramChange { program: u8 },
    ControlChange { control: u8, value: u8 },
}

/// A message and when it should sound, relative to the start of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub at: Duration,
    pub channel: u8,
    pub message: PlaybackMessage,
}

/// All playable events of a MIDI file in time order
#[derive(Debug, Clone, Default)]
pub struct MidiFileReader {
    events: Vec<TimedEvent>,
}

impl MidiFileReader {
    /// Read and parse a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            JamError::Playback(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse an in-memory file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let smf = Smf::parse(bytes)
            .map_err(|e| JamError::Playback(format!("Invalid MIDI data: {}", e)))?;

        // (tick, track, index) keeps simultaneous events in file order
        let mut merged = Vec::new();
        for (track_index, track) in smf.tracks.iter().enumerate() {
            let mut tick = 0u64;
            for (event_index, event) in track.iter().enumerate() {
                tick += event.delta.as_int() as u64;
                merged.push((tick, track_index, event_index, event.kind));
            }
        }
        merged.sort_by_key(|&(tick, track, index, _)| (tick, track, index));

        let mut events = Vec::new();
        let mut micros_per_quarter = DEFAULT_MICROS_PER_QUARTER;
        let mut last_tick = 0u64;
        let mut elapsed_micros = 0u64;

        for (tick, _, _, kind) in merged {
            elapsed_micros += match smf.header.timing {
                Timing::Metrical(ppqn) => {
                    (tick - last_tick) * micros_per_quarter / ppqn.as_int().max(1) as u64
                }
                Timing::Timecode(fps, subframes) => {
                    let ticks_per_second = fps.as_f32() as f64 * subframes.max(1) as f64;
                    ((tick - last_tick) as f64 * 1_000_000.0 / ticks_per_second) as u64
                }
            };
            last_tick = tick;

            match kind {
                TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                    micros_per_quarter = tempo.as_int() as u64;
                }
                TrackEventKind::Midi { channel, message } => {
                    let message = match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => {
                            PlaybackMessage::NoteOff { key: key.as_int() }
                        }
                        MidiMessage::NoteOn { key, vel } => PlaybackMessage::NoteOn {
                            key: key.as_int(),
                            velocity: vel.as_int(),
                        },
                        MidiMessage::NoteOff { key, .. } => {
                            PlaybackMessage::NoteOff { key: key.as_int() }
                        }
                        MidiMessage::ProgramChange { program } => PlaybackMessage::ProgramChange {
                            program: program.as_int(),
                        },
                        MidiMessage::Controller { controller, value } => {
                            PlaybackMessage::ControlChange {
                                control: controller.as_int(),
                                value: value.as_int(),
                            }
                        }
                        _ => continue,
                    };
                    events.push(TimedEvent {
                        at: Duration::from_micros(elapsed_micros),
                        channel: channel.as_int(),
                        message,
                    });
                }
                _ => {}
            }
        }

        Ok(Self { events })
    }

    /// Events in playing order
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Time of the last event
    pub fn duration(&self) -> Duration {
        self.events.last().map(|e| e.at).unwrap_or_default()
    }

    /// Take ownership of the events
    pub fn into_events(self) -> Vec<TimedEvent> {
        self.events
    }
}
