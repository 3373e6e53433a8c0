// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Command implementations behind the `simplejam` binary.

pub mod demo;
pub mod play;

pub use demo::{
    chord_progression_demo, demo_progressions, diatonic_chords_demo, render_progression_file,
    PROGRESSION_DEMO_FILE,
};
pub use play::run_play;

use std::io::{self, Write};

use crate::music::keys::SUPPORTED_KEYS;

/// Print each supported key with its triads
pub fn print_keys<W: Write>(out: &mut W) -> io::Result<()> {
    for table in SUPPORTED_KEYS {
        writeln!(out, "{}:", table.name())?;
        for (degree, triad) in table.diatonic_triads() {
            writeln!(out, "  {:<5} {}", degree, triad)?;
        }
    }
    Ok(())
}
