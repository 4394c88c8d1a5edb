//! # ac-voice
//!
//! A Rust library that turns a phonetic (IPA) transcription into a stream of
//! mora-sized syllable tokens and stitches the matching voicebank samples into
//! one waveform, in the clipped, babbling style of Animal Crossing voices.
//!
//! ## Features
//!
//! - **Transliteration**: any IPA string is reduced onto a closed syllabary
//!   (`a`, `ka`, `nn`, `si`, digits, capital letters, ...)
//! - **Voicebank synthesis**: one pre-recorded sample per syllable, joined with
//!   a legato overlap and word/line/end silences
//! - **Pluggable phonemizer**: text → IPA is an injected capability, with an
//!   espeak-ng implementation provided
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ac-voice = "2026.10"
//! ```
//!
//! ```ignore
//! use std::path::PathBuf;
//! use ac_voice::{engines::voicebank::VoicebankEngine, SynthesisEngine};
//!
//! let mut engine = VoicebankEngine::new();
//! engine.load_model(&PathBuf::from("voices/GAL"))?;
//!
//! let result = engine.synthesize("konnitiwa", None)?;
//! result.write_wav(&PathBuf::from("output.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engines;
pub mod session;

use std::path::Path;

/// An append-only mono audio buffer.
///
/// Holds raw f32 samples at a fixed sample rate. Besides appending, the only
/// mutation allowed is a bounded trim from the tail, used for the legato
/// overlap between syllables.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio (taken from the voicebank)
    pub sample_rate: u32,
}

impl Waveform {
    /// An empty buffer at the given sample rate.
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Number of frames spanning `ms` milliseconds at this buffer's rate.
    pub fn frames_for_ms(&self, ms: u32) -> usize {
        (ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Append audio to the end of the buffer.
    pub fn append(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Append `ms` milliseconds of silence.
    pub fn append_silence_ms(&mut self, ms: u32) {
        let frames = self.frames_for_ms(ms);
        self.samples.resize(self.samples.len() + frames, 0.0);
    }

    /// Drop up to `ms` milliseconds from the tail.
    ///
    /// Saturates at the start of the buffer. Returns the number of frames
    /// actually removed.
    pub fn trim_tail_ms(&mut self, ms: u32) -> usize {
        let frames = self.frames_for_ms(ms).min(self.samples.len());
        self.samples.truncate(self.samples.len() - frames);
        frames
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Write the audio to a 32-bit float WAV file.
    ///
    /// The file is assembled in a scratch file next to `path` and moved into
    /// place only once it is complete, so a failed export never leaves a
    /// truncated WAV behind.
    pub fn write_wav(&self, path: &Path) -> Result<(), hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut scratch = tempfile::Builder::new()
            .prefix(".ac-voice-")
            .suffix(".wav")
            .tempfile_in(dir)?;
        {
            let mut writer = hound::WavWriter::new(scratch.as_file_mut(), spec)?;
            for &sample in &self.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        scratch.persist(path).map_err(|e| e.error)?;
        log::debug!("Wrote {} samples to {}", self.samples.len(), path.display());
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// This trait defines the standard operations that all synthesis engines must support.
/// Each engine may have different parameter types for model loading and inference configuration.
pub trait SynthesisEngine {
    /// Parameters for configuring synthesis (timings, etc.)
    type SynthesisParams;
    /// Parameters for configuring model loading (sample extension, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given IPA transcription.
    fn synthesize(
        &mut self,
        ipa: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Waveform, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given IPA transcription and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `Waveform::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        ipa: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.synthesize(ipa, params)?.write_wav(wav_path)?)
    }
}
