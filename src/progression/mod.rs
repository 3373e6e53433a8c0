// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord progression resolution.
//!
//! Turns per-key Roman numeral sequences into one flat, ordered list of
//! triads. Resolution is all-or-nothing: the first unknown key or numeral
//! aborts the whole call.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::JamError;
use crate::music::keys::{find_key, unsupported_key, Triad};
use crate::render::TimeSignature;

/// A key and the scale degrees to play in it.
///
/// Nothing is validated on construction; see [`resolve`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyChordProgression {
    /// Key identifier (e.g. "C")
    pub key: String,
    /// Roman numerals, any case
    #[serde(alias = "number_chord_sequence")]
    pub degrees: Vec<String>,
}

impl KeyChordProgression {
    pub fn new<K, I, S>(key: K, degrees: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            degrees: degrees.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered triads ready to render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordSequence(Vec<Triad>);

impl ChordSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triads(&self) -> &[Triad] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triad> {
        self.0.iter()
    }
}

impl FromIterator<Triad> for ChordSequence {
    fn from_iter<T: IntoIterator<Item = Triad>>(iter: T) -> Self {
        ChordSequence(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ChordSequence {
    type Item = &'a Triad;
    type IntoIter = std::slice::Iter<'a, Triad>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolve progressions, in order, into one flat chord sequence
pub fn resolve(progressions: &[KeyChordProgression]) -> Result<ChordSequence, JamError> {
    let mut chords = Vec::new();

    for progression in progressions {
        let table = find_key(&progression.key).ok_or_else(|| unsupported_key(&progression.key))?;

        for numeral in &progression.degrees {
            chords.push(table.lookup(numeral)?);
        }

        debug!(
            key = table.name(),
            chords = progression.degrees.len(),
            "Resolved progression"
        );
    }

    Ok(ChordSequence(chords))
}

/// Progressions plus optional render overrides, as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressionFile {
    /// Tempo override in BPM
    #[serde(default)]
    pub tempo: Option<u32>,
    /// Time signature override (e.g. "3/4")
    #[serde(default)]
    pub time_signature: Option<TimeSignature>,
    /// Progressions in playing order
    #[serde(default)]
    pub progressions: Vec<KeyChordProgression>,
}

impl ProgressionFile {
    /// Load from a YAML or TOML file (chosen by extension)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read progression file: {:?}", path))?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse progression YAML")
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse progression TOML")
    }
}
