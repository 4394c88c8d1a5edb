//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines.
//!
//! # Available Engines
//!
//! - `voicebank` - concatenative syllable voicebank (WAV samples, espeak-ng optional)

pub mod voicebank;
