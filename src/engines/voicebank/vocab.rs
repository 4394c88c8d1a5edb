use std::path::{Path, PathBuf};

/// Every syllable the voicebank must provide, in recording order.
///
/// The order matches the order the samples are recorded in, which is what
/// [`import`](super::import) relies on when naming untitled recordings.
/// `ye`, `yi`, `wi`, `wu` and `we` are not part of the syllabary; `wo` is
/// recorded but never produced by the transliterator.
pub const SYLLABARY: &[&str] = &[
    "a", "i", "u", "e", "o", //
    "ka", "ki", "ku", "ke", "ko", //
    "sa", "si", "su", "se", "so", //
    "ta", "ti", "tu", "te", "to", //
    "na", "ni", "nu", "ne", "no", //
    "ha", "hi", "hu", "he", "ho", //
    "ma", "mi", "mu", "me", "mo", //
    "ya", "yu", "yo", //
    "ra", "ri", "ru", "re", "ro", //
    "wa", "wo", "nn", //
    "ga", "gi", "gu", "ge", "go", //
    "za", "zi", "zu", "ze", "zo", //
    "da", "di", "du", "de", "do", //
    "ba", "bi", "bu", "be", "bo", //
    "pa", "pi", "pu", "pe", "po", //
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", //
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", //
    "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Default file extension for voicebank samples.
pub const DEFAULT_SAMPLE_EXTENSION: &str = "wav";

/// Whether `token` names a voicebank sample.
pub fn is_syllable(token: &str) -> bool {
    SYLLABARY.contains(&token)
}

/// File name of the sample for `token`, e.g. `ka.wav`.
pub fn sample_file_name(token: &str, extension: &str) -> String {
    format!("{token}.{extension}")
}

/// Path of the sample for `token` inside `voicebank_dir`.
pub fn sample_path(voicebank_dir: &Path, token: &str, extension: &str) -> PathBuf {
    voicebank_dir.join(sample_file_name(token, extension))
}

/// List every required sample that is not present as a file in `voicebank_dir`.
///
/// An empty result means the voicebank is complete.
pub fn list_missing_samples(voicebank_dir: &Path, extension: &str) -> Vec<PathBuf> {
    SYLLABARY
        .iter()
        .map(|token| sample_path(voicebank_dir, token, extension))
        .filter(|path| !path.is_file())
        .collect()
}
