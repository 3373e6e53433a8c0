// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Demo file generation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::JamConfig;
use crate::music::keys::SUPPORTED_KEYS;
use crate::progression::{resolve, ChordSequence, KeyChordProgression, ProgressionFile};
use crate::render::generate_midi_file;

/// File written by [`chord_progression_demo`]
pub const PROGRESSION_DEMO_FILE: &str = "chord_progression_demo.mid";

/// ii-V-I-I in C followed by IV-V-I-I in D
pub fn demo_progressions() -> Vec<KeyChordProgression> {
    vec![
        KeyChordProgression::new("C", ["II", "V", "I", "I"]),
        KeyChordProgression::new("D", ["IV", "V", "I", "I"]),
    ]
}

fn ensure_output_directory(config: &JamConfig) -> Result<()> {
    fs::create_dir_all(&config.output_directory).with_context(|| {
        format!(
            "Failed to create output directory: {:?}",
            config.output_directory
        )
    })
}

/// Render the demo progression into the output directory
pub fn chord_progression_demo(config: &JamConfig) -> Result<PathBuf> {
    ensure_output_directory(config)?;

    let chords = resolve(&demo_progressions())?;
    let path = config.output_path(PROGRESSION_DEMO_FILE);
    generate_midi_file(&path, &chords, &config.render)?;

    info!("Generated chord progression demo with {} chords", chords.len());
    Ok(path)
}

/// Render every diatonic triad of each supported key, one file per key
pub fn diatonic_chords_demo(config: &JamConfig) -> Result<Vec<PathBuf>> {
    ensure_output_directory(config)?;

    let mut written = Vec::new();
    for table in SUPPORTED_KEYS {
        let chords: ChordSequence = table.diatonic_triads().map(|(_, triad)| triad).collect();
        let path = config.output_path(&format!("{}_major.mid", table.name().to_lowercase()));
        generate_midi_file(&path, &chords, &config.render)?;
        written.push(path);
    }

    info!("Generated {} diatonic chord files", written.len());
    Ok(written)
}

/// Render a progression file to `output`, returning the chord count
pub fn render_progression_file(config: &JamConfig, input: &Path, output: &Path) -> Result<usize> {
    let file = ProgressionFile::load(input)?;

    let mut render = config.render;
    if let Some(tempo) = file.tempo {
        render.tempo_bpm = tempo;
    }
    if let Some(time_signature) = file.time_signature {
        render.time_signature = time_signature;
    }

    let chords = resolve(&file.progressions)
        .with_context(|| format!("Failed to resolve progressions in {:?}", input))?;
    generate_midi_file(output, &chords, &render)?;
    Ok(chords.len())
}
