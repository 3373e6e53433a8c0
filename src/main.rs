// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{anyhow, Result};
use simplejam::audio::SynthPlayer;
use simplejam::commands::{
    chord_progression_demo, diatonic_chords_demo, print_keys, render_progression_file, run_play,
};
use simplejam::config::JamConfig;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("simplejam - Chord progression MIDI generator");
    println!();
    println!("Usage: simplejam <COMMAND>");
    println!();
    println!("Commands:");
    println!("  play <FILE>                 Play a MIDI file and wait for it to finish");
    println!("  demo progression            Write the ii-V-I demo progression");
    println!("  demo diatonic               Write every diatonic triad of each key");
    println!("  render <PROGRESSIONS> <OUT> Render a YAML/TOML progression file");
    println!("  keys                        List supported keys and their triads");
    println!("  --help                      Show this help message");
    println!();
    println!("Settings are read from simplejam.yaml or the file named by SIMPLEJAM_CONFIG.");
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

fn play(config: &JamConfig, file: &str) -> i32 {
    let Some(soundfont) = config.soundfont.clone() else {
        eprintln!("Error: no soundfont configured (set `soundfont` in simplejam.yaml)");
        return 1;
    };
    let mut player = SynthPlayer::new(soundfont);
    run_play(
        &mut player,
        Path::new(file),
        config.poll_interval(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
}

fn demo(config: &JamConfig, which: &str) -> Result<()> {
    match which {
        "progression" => {
            let path = chord_progression_demo(config)?;
            println!("Generated chord progression demo MIDI file: {}", path.display());
        }
        "diatonic" => {
            for path in diatonic_chords_demo(config)? {
                println!("Generated chords file: {}", path.display());
            }
        }
        other => return Err(anyhow!("Unknown demo: {}", other)),
    }
    Ok(())
}

fn load_config() -> Result<JamConfig> {
    JamConfig::discover(&env::current_dir()?)
}

fn run(args: &[String]) -> Result<i32> {
    match args[1].as_str() {
        "play" => {
            let Some(file) = args.get(2) else {
                eprintln!("Error: play requires a MIDI file path");
                return Ok(1);
            };
            return Ok(play(&load_config()?, file));
        }
        "demo" => {
            let Some(which) = args.get(2) else {
                eprintln!("Error: demo requires `progression` or `diatonic`");
                return Ok(1);
            };
            demo(&load_config()?, which)?;
        }
        "render" => {
            let (Some(input), Some(output)) = (args.get(2), args.get(3)) else {
                eprintln!("Error: render requires a progression file and an output path");
                return Ok(1);
            };
            let config = load_config()?;
            let count = render_progression_file(&config, Path::new(input), Path::new(output))?;
            println!("Rendered {} chords to {}", count, output);
        }
        "keys" => {
            print_keys(&mut io::stdout())?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return Ok(1);
        }
    }

    Ok(0)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    init_logging();

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(code);
}
