//! On-disk configuration for the `ac-voice` front end.
//!
//! Everything is optional; a missing field takes its default. Example:
//!
//! ```json
//! {
//!     "voicebank": "voices/BOY",
//!     "timing": { "clip_syllables_by_ms": 50 },
//!     "supplemental_dict": { "brb": "BRB", "go": "5" },
//!     "phonemizer": { "voice": "en-us" }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engines::voicebank::vocab::DEFAULT_SAMPLE_EXTENSION;
use crate::engines::voicebank::{EspeakConfig, TimingConfig, VoicebankError};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "ac-voice.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Voicebank directory.
    pub voicebank: PathBuf,
    /// Extension of the sample files.
    pub sample_extension: String,
    pub timing: TimingConfig,
    /// Extra words for the phonemizer to recognize before it falls back to
    /// espeak-ng. Values may be IPA or voicebank tokens (`"brb": "BRB"`).
    pub supplemental_dict: HashMap<String, String>,
    pub phonemizer: EspeakConfig,
    pub player: PlayerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voicebank: PathBuf::from("voices/GAL"),
            sample_extension: DEFAULT_SAMPLE_EXTENSION.to_string(),
            timing: TimingConfig::default(),
            supplemental_dict: HashMap::new(),
            phonemizer: EspeakConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

/// External program used to play each line in interactive mode.
/// The output file path is appended to `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-hide_banner".to_string(),
            ],
        }
    }
}

impl Config {
    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self, VoicebankError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| VoicebankError::Config(format!("{}: {e}", path.display())))
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, VoicebankError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    log::info!("Using config from {DEFAULT_CONFIG_FILE}");
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
