// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory data for simplejam.
//!
//! This module holds the per-key triad tables that progressions are
//! resolved against.

pub mod keys;

pub use keys::{find_key, lookup, supported_key_names, KeyTable, MidiNote, ScaleDegree, Triad};
