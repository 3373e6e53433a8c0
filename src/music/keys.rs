// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Diatonic triad tables per key.
//!
//! Each supported key maps the scale degrees I through VIII to a fixed
//! triad of MIDI note numbers. The tables are plain constants: adding a
//! key means adding a table to [`SUPPORTED_KEYS`].

use std::fmt;

use crate::error::{JamError, Result};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Scale degree written as a Roman numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScaleDegree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    /// Octave restatement of I
    VIII,
}

impl ScaleDegree {
    /// All degrees in scale order
    pub const ALL: [ScaleDegree; 8] = [
        ScaleDegree::I,
        ScaleDegree::II,
        ScaleDegree::III,
        ScaleDegree::IV,
        ScaleDegree::V,
        ScaleDegree::VI,
        ScaleDegree::VII,
        ScaleDegree::VIII,
    ];

    /// Parse a numeral, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "I" => Some(ScaleDegree::I),
            "II" => Some(ScaleDegree::II),
            "III" => Some(ScaleDegree::III),
            "IV" => Some(ScaleDegree::IV),
            "V" => Some(ScaleDegree::V),
            "VI" => Some(ScaleDegree::VI),
            "VII" => Some(ScaleDegree::VII),
            "VIII" => Some(ScaleDegree::VIII),
            _ => None,
        }
    }

    /// Zero-based position in the scale
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical uppercase numeral
    pub fn numeral(self) -> &'static str {
        match self {
            ScaleDegree::I => "I",
            ScaleDegree::II => "II",
            ScaleDegree::III => "III",
            ScaleDegree::IV => "IV",
            ScaleDegree::V => "V",
            ScaleDegree::VI => "VI",
            ScaleDegree::VII => "VII",
            ScaleDegree::VIII => "VIII",
        }
    }
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.numeral())
    }
}

/// Three stacked thirds on a scale degree.
///
/// Pitch order is significant: the first pitch anchors the chord's
/// duration when rendered. Triads only come from the key tables, so every
/// pitch is a valid MIDI note (0-127).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triad([MidiNote; 3]);

impl Triad {
    pub(crate) const fn new(root: MidiNote, third: MidiNote, fifth: MidiNote) -> Self {
        Triad([root, third, fifth])
    }

    pub fn pitches(&self) -> &[MidiNote; 3] {
        &self.0
    }

    /// First listed pitch
    pub fn root(&self) -> MidiNote {
        self.0[0]
    }
}

impl fmt::Display for Triad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

/// Diatonic triads for one key, indexed by scale degree
#[derive(Debug, PartialEq, Eq)]
pub struct KeyTable {
    name: &'static str,
    triads: [Triad; 8],
}

impl KeyTable {
    /// Key identifier (e.g. "C")
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Triad for a typed degree
    pub fn triad(&self, degree: ScaleDegree) -> Triad {
        self.triads[degree.index()]
    }

    /// Triad for a numeral such as "ii" or "V"
    pub fn lookup(&self, numeral: &str) -> Result<Triad> {
        ScaleDegree::parse(numeral)
            .map(|degree| self.triad(degree))
            .ok_or_else(|| JamError::UnsupportedDegree {
                degree: numeral.trim().to_uppercase(),
                key: self.name.to_string(),
            })
    }

    /// All eight triads in degree order
    pub fn diatonic_triads(&self) -> impl Iterator<Item = (ScaleDegree, Triad)> + '_ {
        ScaleDegree::ALL.iter().map(move |&d| (d, self.triad(d)))
    }
}

// C4 = 60
pub static C_MAJOR: KeyTable = KeyTable {
    name: "C",
    triads: [
        Triad::new(60, 64, 67), // C
        Triad::new(62, 65, 69), // Dm
        Triad::new(64, 67, 71), // Em
        Triad::new(65, 69, 72), // F
        Triad::new(67, 71, 74), // G
        Triad::new(69, 72, 76), // Am
        Triad::new(71, 74, 77), // Bdim
        Triad::new(72, 76, 79), // C
    ],
};

pub static D_MAJOR: KeyTable = KeyTable {
    name: "D",
    triads: [
        Triad::new(62, 66, 69), // D
        Triad::new(64, 67, 71), // Em
        Triad::new(66, 69, 73), // F#m
        Triad::new(67, 71, 74), // G
        Triad::new(69, 73, 76), // A
        Triad::new(71, 74, 78), // Bm
        Triad::new(73, 76, 79), // C#dim
        Triad::new(74, 78, 81), // D
    ],
};

/// Supported keys in table order
pub static SUPPORTED_KEYS: [&KeyTable; 2] = [&C_MAJOR, &D_MAJOR];

/// Find a key table by exact name
pub fn find_key(name: &str) -> Option<&'static KeyTable> {
    SUPPORTED_KEYS.iter().copied().find(|table| table.name == name)
}

/// Names of the supported keys in table order
pub fn supported_key_names() -> Vec<&'static str> {
    SUPPORTED_KEYS.iter().map(|table| table.name).collect()
}

pub(crate) fn unsupported_key(key: &str) -> JamError {
    JamError::UnsupportedKey {
        key: key.to_string(),
        supported: supported_key_names().into_iter().map(String::from).collect(),
    }
}

/// Look up the triad for `degree` in `key`
pub fn lookup(key: &str, degree: &str) -> Result<Triad> {
    find_key(key).ok_or_else(|| unsupported_key(key))?.lookup(degree)
}
