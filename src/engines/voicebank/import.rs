//! Build a voicebank from a folder of untitled recordings.
//!
//! Recordings for several banks usually sit in one folder, each file name
//! carrying the bank name (`GAL_001.wav`, `BOY_001.wav`, ...). Sorted by
//! name, a bank's files follow the order of [`SYLLABARY`], so the n-th file
//! becomes the n-th syllable.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::VoicebankError;
use super::vocab::{sample_path, SYLLABARY};

/// Copy the recordings of `bank` in `source` to `dest/<bank>/<syllable>.<extension>`.
///
/// Returns the `(from, to)` pairs in copy order.
pub fn import_voicebank(
    source: &Path,
    bank: &str,
    dest: &Path,
    extension: &str,
) -> Result<Vec<(PathBuf, PathBuf)>, VoicebankError> {
    let mut recordings = Vec::new();
    for entry in fs::read_dir(source)? {
        let path = entry?.path();
        let matches_bank = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(bank));
        if matches_bank && path.is_file() {
            recordings.push(path);
        }
    }
    recordings.sort();

    if recordings.len() < SYLLABARY.len() {
        return Err(VoicebankError::Config(format!(
            "{} has {} recordings for {bank}, need {}",
            source.display(),
            recordings.len(),
            SYLLABARY.len()
        )));
    }
    if recordings.len() > SYLLABARY.len() {
        log::warn!(
            "ignoring {} extra recordings for {bank}",
            recordings.len() - SYLLABARY.len()
        );
    }

    let bank_dir = dest.join(bank);
    fs::create_dir_all(&bank_dir)?;

    let mut copied = Vec::with_capacity(SYLLABARY.len());
    for (from, token) in recordings.into_iter().zip(SYLLABARY) {
        let to = sample_path(&bank_dir, token, extension);
        fs::copy(&from, &to)?;
        log::debug!("{} --> {}", from.display(), to.display());
        copied.push((from, to));
    }

    log::info!("Imported {} samples into {}", copied.len(), bank_dir.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::voicebank::vocab::list_missing_samples;

    fn fill(dir: &Path, bank: &str, count: usize) {
        for i in 0..count {
            fs::write(dir.join(format!("{bank}_{i:03}.wav")), format!("{bank}{i}")).unwrap();
        }
    }

    #[test]
    fn copies_recordings_in_sorted_order() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fill(src.path(), "GAL", SYLLABARY.len());
        fill(src.path(), "BOY", SYLLABARY.len());

        let copied = import_voicebank(src.path(), "GAL", dest.path(), "wav").unwrap();
        assert_eq!(copied.len(), SYLLABARY.len());

        let bank = dest.path().join("GAL");
        assert!(list_missing_samples(&bank, "wav").is_empty());
        assert_eq!(fs::read_to_string(bank.join("a.wav")).unwrap(), "GAL0");
        assert_eq!(fs::read_to_string(bank.join("ka.wav")).unwrap(), "GAL5");
        assert_eq!(
            fs::read_to_string(bank.join("Z.wav")).unwrap(),
            format!("GAL{}", SYLLABARY.len() - 1)
        );
    }

    #[test]
    fn too_few_recordings_is_an_error() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fill(src.path(), "MAN", 10);

        let err = import_voicebank(src.path(), "MAN", dest.path(), "wav").unwrap_err();
        assert!(matches!(err, VoicebankError::Config(_)));
        assert!(!dest.path().join("MAN").exists());
    }
}
