use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use super::model::VoicebankError;

/// Turns text into an IPA transcription.
///
/// The engine itself never calls a phonemizer; callers pick one and feed its
/// output to [`VoicebankEngine::transliterate`](super::VoicebankEngine::transliterate).
/// Any `FnMut(&str) -> Result<String, VoicebankError>` is a phonemizer.
pub trait Phonemizer {
    fn phonemize(&mut self, text: &str) -> Result<String, VoicebankError>;
}

impl<F> Phonemizer for F
where
    F: FnMut(&str) -> Result<String, VoicebankError>,
{
    fn phonemize(&mut self, text: &str) -> Result<String, VoicebankError> {
        self(text)
    }
}

/// Where to find espeak-ng and which voice to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EspeakConfig {
    /// espeak-ng binary; `None` looks it up on PATH.
    pub bin_path: Option<PathBuf>,
    /// Directory containing `espeak-ng-data`; `None` uses the built-in path.
    pub data_path: Option<PathBuf>,
    /// espeak-ng voice (language) name.
    pub voice: String,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            bin_path: None,
            data_path: None,
            voice: "en-gb".to_string(),
        }
    }
}

/// Phonemizer backed by the `espeak-ng` command-line tool.
pub struct EspeakPhonemizer {
    config: EspeakConfig,
}

impl EspeakPhonemizer {
    pub fn new(config: EspeakConfig) -> Self {
        Self { config }
    }

    /// Fail with [`VoicebankError::EspeakNotFound`] if the binary can't be run.
    pub fn check_available(&self) -> Result<(), VoicebankError> {
        self.command()
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|_| ())
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VoicebankError::EspeakNotFound
                } else {
                    VoicebankError::Io(e)
                }
            })
    }

    fn command(&self) -> Command {
        let bin = self
            .config
            .bin_path
            .as_deref()
            .map(|p| p.as_os_str())
            .unwrap_or_else(|| OsStr::new("espeak-ng"));
        let mut cmd = Command::new(bin);
        if let Some(data) = &self.config.data_path {
            cmd.arg(format!("--path={}", data.display()));
        }
        cmd
    }

    fn run_espeak(&self, input: &str) -> Result<String, VoicebankError> {
        log::debug!("espeak-ng -v {} <- {input:?}", self.config.voice);
        let mut child = self
            .command()
            .args(["--ipa", "--stdin", "-q", "-v", &self.config.voice])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VoicebankError::EspeakNotFound
                } else {
                    VoicebankError::Io(e)
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // espeak-ng reads stdin line by line; an unterminated last line
            // can lose its final word.
            let stdin_payload = canonicalize_espeak_stdin_payload(input);
            stdin
                .write_all(stdin_payload.as_bytes())
                .map_err(VoicebankError::Io)?;
        }

        let output = child.wait_with_output().map_err(VoicebankError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoicebankError::PhonemizerFailed(format!(
                "espeak-ng exited with code {:?}: {stderr}",
                output.status.code()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Phonemizer for EspeakPhonemizer {
    fn phonemize(&mut self, text: &str) -> Result<String, VoicebankError> {
        let raw = self.run_espeak(text)?;
        Ok(clean_espeak_ipa(&raw))
    }
}

fn canonicalize_espeak_stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

/// espeak-ng symbols with no classifier rule, and what they are read as.
/// An empty replacement drops the symbol.
const ESPEAK_FOLDS: &[(char, &str)] = &[
    ('ˈ', ""),
    ('ˌ', ""),
    ('_', ""),
    ('ʔ', ""),
    ('\u{0303}', ""), // nasalization tilde
    ('ʲ', ""),
    ('ɐ', "ʌ"),
    ('ᵻ', "ɪ"),
    ('ɚ', "əɹ"),
    ('ɝ', "ɜ"),
    ('ɾ', "t"),
    ('ɫ', "l"),
    ('ɬ', "l"),
    ('ʍ', "w"),
    ('x', "k"),
    ('ç', "h"),
];

/// Fold espeak-ng's output onto symbols the classifier knows and join clause
/// lines into one space-separated transcription.
fn clean_espeak_ipa(raw: &str) -> String {
    raw.lines()
        .flat_map(str::split_whitespace)
        .map(|word| {
            let mut cleaned = String::with_capacity(word.len());
            for ch in word.chars() {
                match ESPEAK_FOLDS.iter().find(|(from, _)| *from == ch) {
                    Some((_, to)) => cleaned.push_str(to),
                    None => cleaned.push(ch),
                }
            }
            cleaned
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks a supplemental dictionary before asking another phonemizer.
///
/// Per whitespace-separated word, in order:
/// - a dictionary entry (case-insensitive, surrounding punctuation ignored)
/// - a single lowercase letter becomes its capital, i.e. the letter sample
/// - a run of digits passes through unchanged
///
/// Remaining words are handed to the inner phonemizer in runs, so it still
/// sees as much context as possible.
pub struct DictionaryPhonemizer<P> {
    inner: P,
    dict: HashMap<String, String>,
}

impl<P: Phonemizer> DictionaryPhonemizer<P> {
    pub fn new(inner: P, dict: HashMap<String, String>) -> Self {
        let dict = dict
            .into_iter()
            .map(|(word, ipa)| (word.to_lowercase(), ipa))
            .collect();
        Self { inner, dict }
    }

    fn lookup(&self, word: &str) -> Option<String> {
        let key = word.trim_matches(|ch: char| ch.is_ascii_punctuation());
        if let Some(ipa) = self.dict.get(&key.to_lowercase()) {
            return Some(ipa.clone());
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) if letter.is_ascii_lowercase() => {
                return Some(letter.to_ascii_uppercase().to_string());
            }
            _ => {}
        }

        if !key.is_empty() && key.chars().all(|ch| ch.is_ascii_digit()) {
            return Some(key.to_string());
        }
        None
    }

    fn flush(
        &mut self,
        pending: &mut Vec<&str>,
        out: &mut Vec<String>,
    ) -> Result<(), VoicebankError> {
        if pending.is_empty() {
            return Ok(());
        }
        let ipa = self.inner.phonemize(&pending.join(" "))?;
        let ipa = ipa.trim();
        if !ipa.is_empty() {
            out.push(ipa.to_string());
        }
        pending.clear();
        Ok(())
    }
}

impl<P: Phonemizer> Phonemizer for DictionaryPhonemizer<P> {
    fn phonemize(&mut self, text: &str) -> Result<String, VoicebankError> {
        let mut out = Vec::new();
        let mut pending = Vec::new();

        for word in text.split_whitespace() {
            match self.lookup(word) {
                Some(ipa) => {
                    self.flush(&mut pending, &mut out)?;
                    out.push(ipa);
                }
                None => pending.push(word),
            }
        }
        self.flush(&mut pending, &mut out)?;

        Ok(out.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call and answers with a fixed transcription.
    fn recording(
        calls: &mut Vec<String>,
    ) -> impl FnMut(&str) -> Result<String, VoicebankError> + '_ {
        move |text: &str| {
            calls.push(text.to_string());
            Ok(format!("<{text}>"))
        }
    }

    #[test]
    fn closures_are_phonemizers() {
        let mut p = |text: &str| Ok::<_, VoicebankError>(text.to_uppercase());
        assert_eq!(p.phonemize("abc").unwrap(), "ABC");
    }

    #[test]
    fn dictionary_entries_bypass_the_inner_phonemizer() {
        let mut calls = Vec::new();
        let dict = HashMap::from([
            ("BRB".to_string(), "BRB".to_string()),
            ("pikapi".to_string(), "pikapi".to_string()),
        ]);
        let mut p = DictionaryPhonemizer::new(recording(&mut calls), dict);

        let ipa = p.phonemize("hello there brb, said Pikapi").unwrap();
        assert_eq!(ipa, "<hello there> BRB <said> pikapi");
        drop(p);
        assert_eq!(calls, vec!["hello there", "said"]);
    }

    #[test]
    fn letters_and_digits_use_voicebank_samples() {
        let mut calls = Vec::new();
        let mut p = DictionaryPhonemizer::new(recording(&mut calls), HashMap::new());
        assert_eq!(p.phonemize("b 42 x").unwrap(), "B 42 X");
        drop(p);
        assert!(calls.is_empty());
    }

    #[test]
    fn inner_failures_propagate() {
        let failing = |_: &str| Err::<String, _>(VoicebankError::PhonemizerFailed("nope".into()));
        let mut p = DictionaryPhonemizer::new(failing, HashMap::new());
        let err = p.phonemize("anything").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn empty_text_gives_empty_ipa() {
        let mut calls = Vec::new();
        let mut p = DictionaryPhonemizer::new(recording(&mut calls), HashMap::new());
        assert_eq!(p.phonemize("   ").unwrap(), "");
    }

    #[test]
    fn espeak_markup_is_removed() {
        assert_eq!(
            clean_espeak_ipa(" həlˈəʊ\n wˈɜːld_ ˌɒn\n\n"),
            "hələʊ wɜːld ɒn"
        );
    }

    #[test]
    fn espeak_only_symbols_fold_onto_known_ones() {
        let cleaned = clean_espeak_ipa("ɐbˈaʊt bˈɛɾɚ lˈɪʔl\n");
        assert_eq!(cleaned, "ʌbaʊt bɛtəɹ lɪl");
        let utterance = crate::engines::voicebank::parse_phonemes(&cleaned).unwrap();
        assert_eq!(utterance.to_string(), "abauto beta riru");
    }

    #[test]
    fn appends_trailing_newline_for_espeak_stdin() {
        assert_eq!(canonicalize_espeak_stdin_payload("America"), "America\n");
        assert_eq!(canonicalize_espeak_stdin_payload("America\n"), "America\n");
    }

    #[test]
    fn missing_binary_is_a_configuration_error() {
        let p = EspeakPhonemizer::new(EspeakConfig {
            bin_path: Some(PathBuf::from("/nonexistent/espeak-ng")),
            ..Default::default()
        });
        assert!(matches!(
            p.check_available(),
            Err(VoicebankError::EspeakNotFound)
        ));
    }

    #[test]
    fn espeak_output_parses_into_syllables() {
        // Skip when espeak-ng is unavailable in the execution environment.
        if Command::new("espeak-ng").arg("--version").output().is_err() {
            return;
        }

        let mut p = EspeakPhonemizer::new(EspeakConfig::default());
        let ipa = p.phonemize("hello").expect("espeak should succeed");
        assert!(!ipa.contains('ˈ'), "stress marks should be stripped: {ipa}");
        assert!(!ipa.is_empty());
    }
}
