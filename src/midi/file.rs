// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Single-track standard MIDI file writer.
//!
//! Events are stored in append order with their delta times and written
//! out as a Type 0 file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::messages;
use crate::error::{JamError, Result};
use crate::render::{NoteKind, NoteMessage, TimeSignature, TrackWriter};

/// Resolution of files written by [`SingleTrackMidiFile`]
pub const TICKS_PER_QUARTER_NOTE: u16 = 480;

/// Largest delta time a variable-length quantity can hold (four bytes)
pub const MAX_DELTA_TICKS: u32 = 0x0FFF_FFFF;

/// Slowest tempo whose microseconds-per-quarter fits in 24 bits
const MIN_TEMPO_BPM: u32 = 4;

/// Event with its delta time
#[derive(Debug, Clone)]
struct TrackEvent {
    /// Ticks since the previous event
    delta: u32,
    /// Event data
    data: Vec<u8>,
}

impl TrackEvent {
    fn note(message: NoteMessage, channel: u8) -> Self {
        let status = match message.kind {
            NoteKind::On => messages::NOTE_ON,
            NoteKind::Off => messages::NOTE_OFF,
        };
        Self {
            delta: message.delta,
            data: vec![status | (channel & 0x0F), message.pitch, message.velocity],
        }
    }

    /// Channel message data bytes must have the high bit clear
    fn check_data_bytes(&self) -> io::Result<()> {
        let is_channel_message = self.data.first().is_some_and(|&status| status < 0xF0);
        if is_channel_message {
            if let Some(byte) = self.data[1..].iter().find(|&&b| b > 0x7F) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("MIDI data byte {} is out of range 0-127", byte),
                ));
            }
        }
        Ok(())
    }

    fn tempo(bpm: u32) -> Self {
        let microseconds = (60_000_000 + bpm / 2) / bpm;
        Self {
            delta: 0,
            data: vec![
                messages::META,
                messages::META_TEMPO,
                0x03,
                ((microseconds >> 16) & 0xFF) as u8,
                ((microseconds >> 8) & 0xFF) as u8,
                (microseconds & 0xFF) as u8,
            ],
        }
    }

    fn time_signature(time_signature: TimeSignature) -> Self {
        Self {
            delta: 0,
            data: vec![
                messages::META,
                messages::META_TIME_SIGNATURE,
                0x04,
                time_signature.numerator(),
                time_signature.denominator_power(),
                24, // MIDI clocks per metronome click
                8,  // 32nd notes per MIDI quarter note
            ],
        }
    }

    fn end_of_track() -> Self {
        Self {
            delta: 0,
            data: vec![messages::META, messages::META_END_OF_TRACK, 0x00],
        }
    }
}

/// A Type 0 MIDI file bound to an output path
pub struct SingleTrackMidiFile {
    path: PathBuf,
    ppqn: u16,
    channel: u8,
    events: Vec<TrackEvent>,
}

impl SingleTrackMidiFile {
    /// Create an empty file bound to `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ppqn: TICKS_PER_QUARTER_NOTE,
            channel: 0,
            events: Vec::new(),
        }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events appended so far
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_header(writer)?;
        self.write_track(writer)
    }

    /// Write MIDI file header chunk
    fn write_header<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"MThd")?;
        // Chunk length (always 6)
        writer.write_all(&[0, 0, 0, 6])?;
        // Format 0
        writer.write_all(&0u16.to_be_bytes())?;
        // One track
        writer.write_all(&1u16.to_be_bytes())?;
        writer.write_all(&self.ppqn.to_be_bytes())?;
        Ok(())
    }

    /// Write the track chunk
    fn write_track<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut track_data = Vec::new();
        let end_of_track = TrackEvent::end_of_track();

        for event in self.events.iter().chain(std::iter::once(&end_of_track)) {
            event.check_data_bytes()?;
            write_variable_length(&mut track_data, event.delta)?;
            track_data.extend_from_slice(&event.data);
        }

        writer.write_all(b"MTrk")?;
        writer.write_all(&(track_data.len() as u32).to_be_bytes())?;
        writer.write_all(&track_data)?;

        Ok(())
    }
}

impl TrackWriter for SingleTrackMidiFile {
    fn ticks_per_quarter_note(&self) -> u16 {
        self.ppqn
    }

    fn set_tempo(&mut self, bpm: u32) -> Result<()> {
        if bpm < MIN_TEMPO_BPM {
            return Err(JamError::InvalidTempo(bpm));
        }
        self.events.push(TrackEvent::tempo(bpm));
        Ok(())
    }

    fn set_time_signature(&mut self, time_signature: TimeSignature) -> Result<()> {
        self.events.push(TrackEvent::time_signature(time_signature));
        Ok(())
    }

    fn append(&mut self, message: NoteMessage) {
        self.events.push(TrackEvent::note(message, self.channel));
    }

    fn save(&mut self) -> Result<()> {
        if self.path.exists() {
            info!("File {:?} already exists, overwriting it", self.path);
        }
        info!("Saving MIDI file to: {:?}", self.path);

        self.to_bytes()
            .and_then(|bytes| fs::write(&self.path, bytes))
            .map_err(|source| JamError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Write variable-length quantity
fn write_variable_length<W: Write>(writer: &mut W, mut value: u32) -> io::Result<()> {
    if value > MAX_DELTA_TICKS {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("delta time {} exceeds {} ticks", value, MAX_DELTA_TICKS),
        ));
    }

    let mut bytes = Vec::with_capacity(4);

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    writer.write_all(&bytes)
}
