use std::collections::HashMap;
use std::path::Path;

use super::model::VoicebankError;
use super::vocab::{list_missing_samples, sample_path, SYLLABARY};

/// Storage for all loaded syllable samples.
///
/// Every sample is held as mono f32 audio. All samples share one sample
/// rate, which becomes the output rate of the engine.
pub struct SampleStore {
    samples: HashMap<String, Vec<f32>>,
    sample_rate: u32,
}

impl SampleStore {
    /// Load every syllable in the syllabary from `voicebank_dir`.
    ///
    /// Fails before reading anything if the directory or any sample file is
    /// missing, so a partial voicebank is never used.
    pub fn load(voicebank_dir: &Path, extension: &str) -> Result<Self, VoicebankError> {
        if !voicebank_dir.is_dir() {
            return Err(VoicebankError::VoicebankNotFound(
                voicebank_dir.to_path_buf(),
            ));
        }

        let missing = list_missing_samples(voicebank_dir, extension);
        if !missing.is_empty() {
            return Err(VoicebankError::MissingSamples(missing));
        }

        let mut samples = HashMap::with_capacity(SYLLABARY.len());
        let mut sample_rate = None;

        for &token in SYLLABARY {
            let path = sample_path(voicebank_dir, token, extension);
            let (rate, audio) = read_mono(&path)?;

            match sample_rate {
                None => sample_rate = Some(rate),
                Some(expected) if expected != rate => {
                    return Err(VoicebankError::SampleFormat(format!(
                        "{} is {rate} Hz, expected {expected} Hz like the rest of the voicebank",
                        path.display()
                    )));
                }
                Some(_) => {}
            }

            samples.insert(token.to_string(), audio);
        }

        let sample_rate = sample_rate.ok_or_else(|| {
            VoicebankError::SampleFormat("voicebank has no samples".to_string())
        })?;

        log::info!(
            "Loaded {} samples at {} Hz from {}",
            samples.len(),
            sample_rate,
            voicebank_dir.display()
        );
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Get the audio for a syllable.
    pub fn get(&self, syllable: &str) -> Result<&[f32], VoicebankError> {
        self.samples
            .get(syllable)
            .map(Vec::as_slice)
            .ok_or_else(|| VoicebankError::UnknownSyllable(syllable.to_string()))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// List all loaded syllables in sorted order.
    pub fn list_syllables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.samples.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Decode a WAV file to mono f32, averaging channels.
///
/// Integer PCM is scaled by its bit depth into `[-1.0, 1.0]`.
fn read_mono(path: &Path) -> Result<(u32, Vec<f32>), VoicebankError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok((spec.sample_rate, mono))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Sample rate of test voicebanks; 1 frame per ms keeps arithmetic exact.
    pub(crate) const TEST_RATE: u32 = 1000;

    /// Length in frames of each test sample: distinct per token.
    pub(crate) fn test_len(token: &str) -> usize {
        20 + SYLLABARY.iter().position(|t| *t == token).unwrap()
    }

    pub(crate) fn write_wav(path: &Path, rate: u32, channels: u16, frames: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &frame in frames {
            for _ in 0..channels {
                writer.write_sample(frame).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    /// Build a complete voicebank where each sample is a constant tone.
    pub(crate) fn make_voicebank() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let bank = dir.path().join("GAL");
        std::fs::create_dir(&bank).unwrap();
        for token in SYLLABARY {
            let frames = vec![8192i16; test_len(token)];
            write_wav(&sample_path(&bank, token, "wav"), TEST_RATE, 1, &frames);
        }
        (dir, bank)
    }

    #[test]
    fn loads_every_syllable() {
        let (_dir, bank) = make_voicebank();
        let store = SampleStore::load(&bank, "wav").unwrap();
        assert_eq!(store.sample_rate(), TEST_RATE);
        assert_eq!(store.list_syllables().len(), SYLLABARY.len());
        assert_eq!(store.get("ka").unwrap().len(), test_len("ka"));
        assert!((store.get("a").unwrap()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn unknown_syllable_is_an_error() {
        let (_dir, bank) = make_voicebank();
        let store = SampleStore::load(&bank, "wav").unwrap();
        assert!(matches!(
            store.get("yi"),
            Err(VoicebankError::UnknownSyllable(s)) if s == "yi"
        ));
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = SampleStore::load(&dir.path().join("nope"), "wav").err().unwrap();
        assert!(matches!(err, VoicebankError::VoicebankNotFound(_)));
    }

    #[test]
    fn missing_samples_are_all_listed() {
        let (_dir, bank) = make_voicebank();
        std::fs::remove_file(bank.join("nn.wav")).unwrap();
        std::fs::remove_file(bank.join("9.wav")).unwrap();

        match SampleStore::load(&bank, "wav") {
            Err(VoicebankError::MissingSamples(missing)) => {
                assert_eq!(missing, vec![bank.join("nn.wav"), bank.join("9.wav")]);
            }
            other => panic!("expected MissingSamples, got {:?}", other.err()),
        }
    }

    #[test]
    fn mixed_sample_rates_are_rejected() {
        let (_dir, bank) = make_voicebank();
        write_wav(&bank.join("po.wav"), 2000, 1, &[0; 10]);
        let err = SampleStore::load(&bank, "wav").err().unwrap();
        assert!(matches!(err, VoicebankError::SampleFormat(_)));
    }

    #[test]
    fn stereo_samples_are_downmixed() {
        let (_dir, bank) = make_voicebank();
        write_wav(&bank.join("o.wav"), TEST_RATE, 2, &[16384; 6]);
        let store = SampleStore::load(&bank, "wav").unwrap();
        let o = store.get("o").unwrap();
        assert_eq!(o.len(), 6);
        assert!((o[0] - 0.5).abs() < 1e-6);
    }
}
