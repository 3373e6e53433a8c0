// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file support.
//!
//! This module provides:
//! - A single-track (Type 0) file writer used as the render target
//! - A reader that turns any MIDI file into timed events for playback

pub mod file;
pub mod reader;

pub use file::{SingleTrackMidiFile, MAX_DELTA_TICKS, TICKS_PER_QUARTER_NOTE};
pub use reader::{MidiFileReader, PlaybackMessage, TimedEvent};

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;

    // Meta events (files only)
    pub const META: u8 = 0xFF;
    pub const META_END_OF_TRACK: u8 = 0x2F;
    pub const META_TEMPO: u8 = 0x51;
    pub const META_TIME_SIGNATURE: u8 = 0x58;
}
