use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{SynthesisEngine, Waveform};

use super::model::{append_end, VoicebankError, VoicebankModel};
use super::syllables::{parse_phonemes, ParseError, Utterance};
use super::vocab::DEFAULT_SAMPLE_EXTENSION;

/// Parameters for configuring voicebank loading.
#[derive(Debug, Clone)]
pub struct VoicebankModelParams {
    /// Extension of the sample files, without the dot.
    pub sample_extension: String,
}

impl Default for VoicebankModelParams {
    fn default() -> Self {
        Self {
            sample_extension: DEFAULT_SAMPLE_EXTENSION.to_string(),
        }
    }
}

/// Timing applied when stitching samples together, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default)]
#[serde(default)]
pub struct TimingConfig {
    /// Each syllable cuts the previous one short by this much.
    ///
    /// More of this gives more Animal Crossing energy but makes the result
    /// less intelligible.
    pub clip_syllables_by_ms: u32,
    /// Extra silence between words.
    pub space_words_by_ms: u32,
    /// Extra silence between input lines.
    pub space_lines_by_ms: u32,
    /// Extra silence at the end of the clip; some players cut off the tail.
    pub space_end_by_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clip_syllables_by_ms: 35,
            space_words_by_ms: 0,
            space_lines_by_ms: 100,
            space_end_by_ms: 175,
        }
    }
}

/// Voicebank text-to-speech engine.
///
/// Transliterates IPA into the voicebank syllabary and concatenates the
/// matching samples. Text → IPA is left to a [`Phonemizer`](super::Phonemizer).
///
/// # Quick Start
///
/// ```rust,no_run
/// use ac_voice::{SynthesisEngine, engines::voicebank::VoicebankEngine};
/// use std::path::PathBuf;
///
/// let mut engine = VoicebankEngine::new();
/// engine.load_model(&PathBuf::from("voices/GAL"))?;
/// let result = engine.synthesize("həloʊ", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct VoicebankEngine {
    model: Option<VoicebankModel>,
    model_path: Option<PathBuf>,
}

impl VoicebankEngine {
    /// Create a new engine with no voicebank loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a voicebank, returning the typed error on failure.
    pub fn load(
        &mut self,
        voicebank_dir: &Path,
        params: VoicebankModelParams,
    ) -> Result<(), VoicebankError> {
        let model = VoicebankModel::load(voicebank_dir, &params.sample_extension)?;
        self.model = Some(model);
        self.model_path = Some(voicebank_dir.to_path_buf());
        Ok(())
    }

    /// Directory of the loaded voicebank.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Transliterate an IPA string. Does not need a loaded voicebank.
    pub fn transliterate(&self, ipa: &str) -> Result<Utterance, ParseError> {
        parse_phonemes(ipa)
    }

    /// An empty buffer at the voicebank's sample rate.
    pub fn new_buffer(&self) -> Result<Waveform, VoicebankError> {
        let model = self.model.as_ref().ok_or(VoicebankError::ModelNotLoaded)?;
        Ok(Waveform::empty(model.sample_rate()))
    }

    /// Append the audio for `utterance` to `buffer`.
    pub fn compose(
        &self,
        utterance: &Utterance,
        timing: &TimingConfig,
        buffer: &mut Waveform,
    ) -> Result<(), VoicebankError> {
        let model = self.model.as_ref().ok_or(VoicebankError::ModelNotLoaded)?;
        model.compose(utterance, timing, buffer)
    }

    /// List all loaded syllables (requires a voicebank to be loaded).
    pub fn list_syllables(&self) -> Vec<&str> {
        self.model
            .as_ref()
            .map(|m| m.list_syllables())
            .unwrap_or_default()
    }
}

impl SynthesisEngine for VoicebankEngine {
    type SynthesisParams = TimingConfig;
    type ModelParams = VoicebankModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.load(model_path, params)?)
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    /// Synthesize one complete clip, end padding included.
    fn synthesize(
        &mut self,
        ipa: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Waveform, Box<dyn std::error::Error>> {
        let timing = params.unwrap_or_default();
        let utterance = self.transliterate(ipa).map_err(VoicebankError::from)?;

        let mut buffer = self.new_buffer()?;
        self.compose(&utterance, &timing, &mut buffer)?;
        append_end(&mut buffer, &timing);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::voicebank::voices::tests::{make_voicebank, test_len};

    #[test]
    fn builder_fills_unset_fields_from_defaults() {
        let timing = TimingConfigBuilder::default()
            .space_words_by_ms(20)
            .build()
            .unwrap();
        assert_eq!(
            timing,
            TimingConfig {
                space_words_by_ms: 20,
                ..TimingConfig::default()
            }
        );
    }

    #[test]
    fn timing_deserializes_partially() {
        let timing: TimingConfig =
            serde_json::from_str(r#"{"clip_syllables_by_ms": 50}"#).unwrap();
        assert_eq!(timing.clip_syllables_by_ms, 50);
        assert_eq!(timing.space_end_by_ms, 175);
    }

    #[test]
    fn synthesize_requires_a_voicebank() {
        let mut engine = VoicebankEngine::new();
        let err = engine.synthesize("a", None).unwrap_err();
        assert!(err.to_string().contains("not loaded"));
    }

    #[test]
    fn transliterate_works_without_a_voicebank() {
        let engine = VoicebankEngine::new();
        let utterance = engine.transliterate("ak").unwrap();
        assert_eq!(utterance.tokens(), vec![vec!["a", "ku"]]);
    }

    #[test]
    fn synthesize_pads_the_end() {
        let (_dir, bank) = make_voicebank();
        let mut engine = VoicebankEngine::new();
        engine.load_model(&bank).unwrap();
        assert_eq!(engine.model_path(), Some(bank.as_path()));

        let timing = TimingConfig {
            clip_syllables_by_ms: 0,
            space_words_by_ms: 0,
            space_lines_by_ms: 0,
            space_end_by_ms: 40,
        };
        let wave = engine.synthesize("a", Some(timing)).unwrap();
        assert_eq!(wave.samples.len(), test_len("a") + 40);
    }

    #[test]
    fn synthesize_reports_parse_failures() {
        let (_dir, bank) = make_voicebank();
        let mut engine = VoicebankEngine::new();
        engine.load_model(&bank).unwrap();
        let err = engine.synthesize("ka ʔa", None).unwrap_err();
        assert_eq!(err.to_string(), "unexpected ʔ at index 3");
    }

    #[test]
    fn synthesize_to_file_writes_wav() {
        let (dir, bank) = make_voicebank();
        let mut engine = VoicebankEngine::new();
        engine.load_model(&bank).unwrap();

        let out = dir.path().join("out.wav");
        engine.synthesize_to_file("ja", &out, None).unwrap();
        let reader = hound::WavReader::open(&out).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert!(reader.len() > 0);

        engine.unload_model();
        assert!(engine.list_syllables().is_empty());
    }
}
