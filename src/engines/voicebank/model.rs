use std::path::{Path, PathBuf};

use crate::Waveform;

use super::engine::TimingConfig;
use super::syllables::{ParseError, Utterance};
use super::voices::SampleStore;

#[derive(thiserror::Error, Debug)]
pub enum VoicebankError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("no voicebank at {}", .0.display())]
    VoicebankNotFound(PathBuf),
    #[error("voicebank is missing {} sample(s): {}", .0.len(), display_paths(.0))]
    MissingSamples(Vec<PathBuf>),
    #[error("Unsupported sample: {0}")]
    SampleFormat(String),
    #[error("No sample for syllable '{0}'")]
    UnknownSyllable(String),
    #[error(
        "espeak-ng not found. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download"
    )]
    EspeakNotFound,
    #[error("Phonemization failed: {0}")]
    PhonemizerFailed(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Voicebank not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("Invalid config: {0}")]
    Config(String),
}

impl VoicebankError {
    /// Whether the error only affects the line being processed.
    ///
    /// Once a voicebank is loaded, I/O and WAV errors can only come from
    /// exporting or playing one clip. Everything else is a configuration
    /// problem that would fail the same way on the next line.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VoicebankError::Parse(_)
                | VoicebankError::PhonemizerFailed(_)
                | VoicebankError::Io(_)
                | VoicebankError::Wav(_)
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A loaded voicebank, ready to turn utterances into audio.
pub struct VoicebankModel {
    store: SampleStore,
}

impl VoicebankModel {
    /// Load the voicebank from a directory.
    ///
    /// The directory must contain one `<syllable>.<extension>` file for every
    /// entry of [`SYLLABARY`](super::vocab::SYLLABARY).
    pub fn load(voicebank_dir: &Path, extension: &str) -> Result<Self, VoicebankError> {
        log::info!("Loading voicebank from {}", voicebank_dir.display());
        let store = SampleStore::load(voicebank_dir, extension)?;
        Ok(Self { store })
    }

    pub fn sample_rate(&self) -> u32 {
        self.store.sample_rate()
    }

    /// Append the audio for `utterance` to `buffer`.
    ///
    /// Before each sample the buffer's tail is cut by the clip time so that
    /// syllables run into each other. After each word, silence worth
    /// `clip + space_words` is added; the extra clip is eaten by the next
    /// word's first trim, leaving exactly `space_words` between words.
    pub fn compose(
        &self,
        utterance: &Utterance,
        timing: &TimingConfig,
        buffer: &mut Waveform,
    ) -> Result<(), VoicebankError> {
        for word in &utterance.words {
            for syllable in &word.syllables {
                let sample = self.store.get(syllable.as_str())?;
                buffer.trim_tail_ms(timing.clip_syllables_by_ms);
                buffer.append(sample);
            }
            buffer.append_silence_ms(timing.clip_syllables_by_ms + timing.space_words_by_ms);
        }

        log::debug!(
            "Composed {} syllables in {} words ({:.3}s buffered)",
            utterance.syllable_count(),
            utterance.words.len(),
            buffer.duration_secs()
        );
        Ok(())
    }

    /// List all loaded syllables.
    pub fn list_syllables(&self) -> Vec<&str> {
        self.store.list_syllables()
    }
}

/// Separate two utterances from consecutive input lines.
pub fn append_line_break(buffer: &mut Waveform, timing: &TimingConfig) {
    buffer.append_silence_ms(timing.space_lines_by_ms);
}

/// Pad the end of the final utterance so players don't clip it.
pub fn append_end(buffer: &mut Waveform, timing: &TimingConfig) {
    buffer.append_silence_ms(timing.space_end_by_ms);
}
