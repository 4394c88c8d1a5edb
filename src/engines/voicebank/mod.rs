//! Syllable voicebank synthesis engine.
//!
//! This module turns IPA into the mora-sized syllables of a pre-recorded
//! voicebank and concatenates the matching samples. There is no model
//! inference: speech comes entirely from the voicebank, one WAV file per
//! syllable.
//!
//! # Pipeline
//!
//! ```text
//! text ─[Phonemizer]→ IPA ─[classifier + syllables]→ Utterance ─[model]→ Waveform
//! ```
//!
//! 1. A [`Phonemizer`] (espeak-ng by default) turns text into IPA.
//! 2. [`classifier`] reduces IPA symbols to five vowels and fourteen consonants.
//! 3. [`syllables`] groups them into voicebank tokens, word by word.
//! 4. [`VoicebankModel::compose`] stitches samples with a legato overlap.
//!
//! # Voicebank Directory Layout
//!
//! ```text
//! voices/GAL/
//! ├── a.wav  i.wav  u.wav  e.wav  o.wav
//! ├── ka.wav ... po.wav            # consonant rows, plus ya/yu/yo, wa/wo, nn
//! ├── 0.wav  ... 9.wav             # digits
//! └── A.wav  ... Z.wav             # letters
//! ```
//!
//! Every file in [`SYLLABARY`] must exist. [`import_voicebank`] builds this
//! layout from a folder of untitled recordings.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ac_voice::{SynthesisEngine, engines::voicebank::VoicebankEngine};
//! use std::path::PathBuf;
//!
//! let mut engine = VoicebankEngine::new();
//! engine.load_model(&PathBuf::from("voices/GAL"))?;
//!
//! let result = engine.synthesize("konnitiwa", None)?;
//! println!("Generated {} samples at {}Hz", result.samples.len(), result.sample_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## With Text Input And Custom Timing
//!
//! ```rust,no_run
//! use ac_voice::{SynthesisEngine, engines::voicebank::{
//!     EspeakConfig, EspeakPhonemizer, Phonemizer, TimingConfig, VoicebankEngine,
//! }};
//! use std::path::PathBuf;
//!
//! let mut engine = VoicebankEngine::new();
//! engine.load_model(&PathBuf::from("voices/GAL"))?;
//!
//! let mut phonemizer = EspeakPhonemizer::new(EspeakConfig::default());
//! let ipa = phonemizer.phonemize("Hello there!")?;
//!
//! let timing = TimingConfig {
//!     clip_syllables_by_ms: 50,
//!     ..Default::default()
//! };
//! engine.synthesize_to_file(&ipa, &PathBuf::from("out.wav"), Some(timing))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod engine;
pub mod import;
pub mod model;
pub mod phonemizer;
pub mod syllables;
pub mod vocab;
pub mod voices;

pub use engine::{TimingConfig, TimingConfigBuilder, VoicebankEngine, VoicebankModelParams};
pub use import::import_voicebank;
pub use model::{VoicebankError, VoicebankModel};
pub use phonemizer::{DictionaryPhonemizer, EspeakConfig, EspeakPhonemizer, Phonemizer};
pub use syllables::{parse_phonemes, ParseError, Syllable, Utterance, Word};
pub use vocab::SYLLABARY;
