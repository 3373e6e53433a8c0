// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord sequence rendering.
//!
//! Converts a [`ChordSequence`] into note-on/note-off messages carrying
//! delta times, and hands them to a [`TrackWriter`] for persistence.
//!
//! Each chord produces six messages. All three note-ons and the last two
//! note-offs carry a zero delta; the note-off of the chord's first pitch
//! carries the whole chord duration.

pub mod time_signature;

pub use time_signature::TimeSignature;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JamError, Result};
use crate::midi::{SingleTrackMidiFile, MAX_DELTA_TICKS};
use crate::music::keys::MidiNote;
use crate::progression::ChordSequence;

/// Note message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    On,
    Off,
}

/// A note message with the ticks to wait before it takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMessage {
    pub kind: NoteKind,
    pub pitch: MidiNote,
    pub velocity: u8,
    /// Delta time in ticks since the previous message
    pub delta: u32,
}

impl NoteMessage {
    pub fn note_on(pitch: MidiNote, velocity: u8, delta: u32) -> Self {
        Self {
            kind: NoteKind::On,
            pitch,
            velocity,
            delta,
        }
    }

    pub fn note_off(pitch: MidiNote, velocity: u8, delta: u32) -> Self {
        Self {
            kind: NoteKind::Off,
            pitch,
            velocity,
            delta,
        }
    }
}

/// Destination for rendered messages (a single-track MIDI container)
pub trait TrackWriter {
    /// Timing resolution of the container
    fn ticks_per_quarter_note(&self) -> u16;

    /// Append a tempo meta event
    fn set_tempo(&mut self, bpm: u32) -> Result<()>;

    /// Append a time signature meta event
    fn set_time_signature(&mut self, time_signature: TimeSignature) -> Result<()>;

    /// Append a note message
    fn append(&mut self, message: NoteMessage);

    /// Persist the container, replacing any existing output
    fn save(&mut self) -> Result<()>;
}

/// Tempo, meter and chord length settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo_bpm: u32,
    #[serde(default)]
    pub time_signature: TimeSignature,
    /// Quarter notes per chord
    #[serde(default = "default_beat_scale")]
    pub beat_scale: u32,
    /// Velocity for every note message
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

fn default_tempo() -> u32 {
    60
}
fn default_beat_scale() -> u32 {
    4
}
fn default_velocity() -> u8 {
    90
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: default_tempo(),
            time_signature: TimeSignature::default(),
            beat_scale: default_beat_scale(),
            velocity: default_velocity(),
        }
    }
}

impl RenderConfig {
    pub fn with_tempo(mut self, bpm: u32) -> Self {
        self.tempo_bpm = bpm;
        self
    }

    pub fn with_time_signature(mut self, time_signature: TimeSignature) -> Self {
        self.time_signature = time_signature;
        self
    }

    /// Ticks each chord lasts.
    ///
    /// The length must be nonzero and fit in a single MIDI delta time.
    pub fn chord_duration(&self, ticks_per_quarter_note: u16) -> Result<u32> {
        (ticks_per_quarter_note as u32)
            .checked_mul(self.beat_scale)
            .filter(|ticks| (1..=MAX_DELTA_TICKS).contains(ticks))
            .ok_or(JamError::InvalidBeatScale(self.beat_scale))
    }
}

/// Render chords into `writer` and save it.
///
/// Returns the number of note messages appended.
pub fn render_chords<W: TrackWriter>(
    writer: &mut W,
    chords: &ChordSequence,
    config: &RenderConfig,
) -> Result<usize> {
    let duration = config.chord_duration(writer.ticks_per_quarter_note())?;

    writer.set_tempo(config.tempo_bpm)?;
    writer.set_time_signature(config.time_signature)?;
    let mut count = 0;

    for (i, triad) in chords.iter().enumerate() {
        debug!(index = i, chord = %triad, "Rendering chord");

        for &pitch in triad.pitches() {
            writer.append(NoteMessage::note_on(pitch, config.velocity, 0));
        }
        for (j, &pitch) in triad.pitches().iter().enumerate() {
            let delta = if j == 0 { duration } else { 0 };
            writer.append(NoteMessage::note_off(pitch, config.velocity, delta));
        }
        count += 6;
    }

    writer.save()?;
    Ok(count)
}

/// Render chords to a standard MIDI file at `path`
pub fn generate_midi_file<P: AsRef<Path>>(
    path: P,
    chords: &ChordSequence,
    config: &RenderConfig,
) -> Result<usize> {
    let mut file = SingleTrackMidiFile::new(path.as_ref());
    render_chords(&mut file, chords, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::keys::Triad;
    use std::io;
    use std::path::PathBuf;

    /// Records every call made by the renderer
    #[derive(Debug, PartialEq)]
    enum Call {
        Tempo(u32),
        TimeSignature(String),
        Note(NoteMessage),
        Save,
    }

    struct RecordingWriter {
        ppqn: u16,
        calls: Vec<Call>,
        fail_save: bool,
    }

    impl RecordingWriter {
        fn new(ppqn: u16) -> Self {
            Self {
                ppqn,
                calls: Vec::new(),
                fail_save: false,
            }
        }

        fn notes(&self) -> Vec<NoteMessage> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Note(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| f(*c)).count()
        }
    }

    impl TrackWriter for RecordingWriter {
        fn ticks_per_quarter_note(&self) -> u16 {
            self.ppqn
        }

        fn set_tempo(&mut self, bpm: u32) -> Result<()> {
            self.calls.push(Call::Tempo(bpm));
            Ok(())
        }

        fn set_time_signature(&mut self, time_signature: TimeSignature) -> Result<()> {
            self.calls.push(Call::TimeSignature(time_signature.to_string()));
            Ok(())
        }

        fn append(&mut self, message: NoteMessage) {
            self.calls.push(Call::Note(message));
        }

        fn save(&mut self) -> Result<()> {
            self.calls.push(Call::Save);
            if self.fail_save {
                return Err(JamError::Io {
                    path: PathBuf::from("/readonly/out.mid"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            Ok(())
        }
    }

    fn two_chords() -> ChordSequence {
        vec![Triad::new(60, 64, 67), Triad::new(65, 69, 72)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.tempo_bpm, 60);
        assert_eq!(config.time_signature.to_string(), "4/4");
        assert_eq!(config.beat_scale, 4);
        assert_eq!(config.velocity, 90);
        assert_eq!(config.chord_duration(480).unwrap(), 1920);
    }

    #[test]
    fn test_chord_duration_bounds() {
        let config = RenderConfig {
            beat_scale: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(config.chord_duration(480), Err(JamError::InvalidBeatScale(0))));

        // Overflows u32
        let config = RenderConfig {
            beat_scale: 10_000_000,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.chord_duration(480),
            Err(JamError::InvalidBeatScale(10_000_000))
        ));

        // Fits in u32 but not in a four-byte delta
        let config = RenderConfig {
            beat_scale: 600_000,
            ..RenderConfig::default()
        };
        assert!(config.chord_duration(480).is_err());

        let config = RenderConfig {
            beat_scale: MAX_DELTA_TICKS / 480,
            ..RenderConfig::default()
        };
        assert!(config.chord_duration(480).unwrap() <= MAX_DELTA_TICKS);
    }

    #[test]
    fn test_invalid_beat_scale_writes_nothing() {
        for beat_scale in [0, 600_000] {
            let mut writer = RecordingWriter::new(480);
            let config = RenderConfig {
                beat_scale,
                ..RenderConfig::default()
            };

            let err = render_chords(&mut writer, &two_chords(), &config).unwrap_err();
            assert!(err.is_render_failure());
            assert!(writer.calls.is_empty());
        }
    }

    #[test]
    fn test_render_two_chords() {
        let mut writer = RecordingWriter::new(480);
        let config = RenderConfig::default().with_tempo(120);

        let count = render_chords(&mut writer, &two_chords(), &config).unwrap();
        assert_eq!(count, 12);

        assert_eq!(writer.calls[0], Call::Tempo(120));
        assert_eq!(writer.calls[1], Call::TimeSignature("4/4".to_string()));
        assert_eq!(writer.calls.last(), Some(&Call::Save));

        let expected = vec![
            NoteMessage::note_on(60, 90, 0),
            NoteMessage::note_on(64, 90, 0),
            NoteMessage::note_on(67, 90, 0),
            NoteMessage::note_off(60, 90, 1920),
            NoteMessage::note_off(64, 90, 0),
            NoteMessage::note_off(67, 90, 0),
            NoteMessage::note_on(65, 90, 0),
            NoteMessage::note_on(69, 90, 0),
            NoteMessage::note_on(72, 90, 0),
            NoteMessage::note_off(65, 90, 1920),
            NoteMessage::note_off(69, 90, 0),
            NoteMessage::note_off(72, 90, 0),
        ];
        assert_eq!(writer.notes(), expected);
    }

    #[test]
    fn test_one_delayed_note_off_per_chord() {
        let chords: ChordSequence = (0..10u8)
            .map(|i| Triad::new(40 + i, 44 + i, 47 + i))
            .collect();
        let mut writer = RecordingWriter::new(96);
        let config = RenderConfig {
            beat_scale: 2,
            ..RenderConfig::default()
        };

        render_chords(&mut writer, &chords, &config).unwrap();

        let notes = writer.notes();
        assert_eq!(notes.len(), 60);
        let delayed: Vec<_> = notes.iter().filter(|n| n.delta != 0).collect();
        assert_eq!(delayed.len(), 10);
        assert!(delayed
            .iter()
            .all(|n| n.kind == NoteKind::Off && n.delta == 192));
        assert_eq!(notes.iter().filter(|n| n.kind == NoteKind::On).count(), 30);
    }

    #[test]
    fn test_delay_follows_position_not_pitch() {
        // Repeated pitches still delay only the first listed note-off.
        let chords: ChordSequence = vec![Triad::new(60, 60, 67)].into_iter().collect();
        let mut writer = RecordingWriter::new(480);
        render_chords(&mut writer, &chords, &RenderConfig::default()).unwrap();

        let deltas: Vec<u32> = writer.notes().iter().map(|n| n.delta).collect();
        assert_eq!(deltas, vec![0, 0, 0, 1920, 0, 0]);
    }

    #[test]
    fn test_render_empty_sequence() {
        let mut writer = RecordingWriter::new(480);
        let count = render_chords(&mut writer, &ChordSequence::new(), &RenderConfig::default()).unwrap();

        assert_eq!(count, 0);
        assert_eq!(writer.count(|c| matches!(c, Call::Tempo(_))), 1);
        assert_eq!(writer.count(|c| matches!(c, Call::TimeSignature(_))), 1);
        assert_eq!(writer.count(|c| matches!(c, Call::Save)), 1);
        assert!(writer.notes().is_empty());
    }

    #[test]
    fn test_save_failure_propagates() {
        let mut writer = RecordingWriter::new(480);
        writer.fail_save = true;

        let err = render_chords(&mut writer, &two_chords(), &RenderConfig::default()).unwrap_err();
        assert!(err.is_render_failure());
        assert_eq!(writer.count(|c| matches!(c, Call::Save)), 1);
    }

    #[test]
    fn test_render_config_yaml() {
        let config: RenderConfig = serde_yaml::from_str("tempo_bpm: 100\ntime_signature: \"6/8\"\n").unwrap();
        assert_eq!(config.tempo_bpm, 100);
        assert_eq!(config.time_signature, TimeSignature::new(6, 8).unwrap());
        assert_eq!(config.beat_scale, 4);
    }
}
