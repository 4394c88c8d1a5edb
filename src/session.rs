//! Line-by-line driver shared by the command-line front end.
//!
//! Each input line runs to completion (phonemize, transliterate, compose,
//! export, play) before the next one is read. A line that fails on its own
//! (bad IPA, no phonemizer output, a failed export) is reported on the
//! console and skipped. Configuration errors end the session.
//!
//! - [`Mode::Interactive`]: every line is its own clip, exported (and played)
//!   as soon as it is composed.
//! - [`Mode::Batch`]: all lines are accumulated into one clip, separated by
//!   line silence, and exported once by [`Session::finish`].

use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use crate::config::PlayerConfig;
use crate::engines::voicebank::model::{append_end, append_line_break};
use crate::engines::voicebank::{
    Phonemizer, TimingConfig, Utterance, VoicebankEngine, VoicebankError,
};
use crate::Waveform;

/// Prefix marking a line as already-phonemized IPA.
pub const LITERAL_PREFIX: &str = "!lit ";

const LINE_SEPARATOR: &str = "======";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch,
}

pub struct Session<'a, P, W> {
    engine: &'a VoicebankEngine,
    phonemizer: P,
    console: W,
    mode: Mode,
    timing: TimingConfig,
    out: PathBuf,
    player: Option<PlayerConfig>,
    /// Batch accumulator; unused in interactive mode.
    audio: Waveform,
    composed_any: bool,
}

impl<'a, P: Phonemizer, W: Write> Session<'a, P, W> {
    /// `player` is only used in interactive mode; pass `None` to skip playback.
    pub fn new(
        engine: &'a VoicebankEngine,
        phonemizer: P,
        console: W,
        mode: Mode,
        timing: TimingConfig,
        out: PathBuf,
        player: Option<PlayerConfig>,
    ) -> Result<Self, Box<dyn Error>> {
        let audio = engine.new_buffer()?;
        Ok(Self {
            engine,
            phonemizer,
            console,
            mode,
            timing,
            out,
            player,
            audio,
            composed_any: false,
        })
    }

    /// Read lines until end of input, then export the batch clip if any.
    pub fn run<R: BufRead>(mut self, mut input: R) -> Result<(), Box<dyn Error>> {
        let mut first = true;
        let mut line = String::new();

        loop {
            if !first {
                writeln!(self.console, "{LINE_SEPARATOR}")?;
            }
            first = false;

            if self.mode == Mode::Interactive {
                write!(self.console, "? ")?;
                self.console.flush()?;
            }

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            if let Err(e) = self.process_line(line.trim_end_matches(['\r', '\n'])) {
                if !e.is_recoverable() {
                    return Err(e.into());
                }
                log::debug!("line failed: {e:?}");
                writeln!(self.console, "{e}")?;
            }
        }

        self.finish()
    }

    /// Handle one input line. Returns the utterance that was composed, or
    /// `None` for a blank line.
    pub fn process_line(&mut self, line: &str) -> Result<Option<Utterance>, VoicebankError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        if self.mode == Mode::Batch {
            writeln!(self.console, "{line}")?;
        }

        let ipa = match line.strip_prefix(LITERAL_PREFIX) {
            Some(literal) => literal.to_string(),
            None => {
                let ipa = self.phonemizer.phonemize(line)?;
                writeln!(self.console, "{ipa}")?;
                ipa
            }
        };

        let utterance = self.engine.transliterate(&ipa)?;
        writeln!(self.console, "{utterance}")?;

        match self.mode {
            Mode::Interactive => {
                let mut clip = self.engine.new_buffer()?;
                self.engine.compose(&utterance, &self.timing, &mut clip)?;
                append_end(&mut clip, &self.timing);
                clip.write_wav(&self.out)?;
                self.play()?;
            }
            Mode::Batch => {
                if self.composed_any {
                    append_line_break(&mut self.audio, &self.timing);
                }
                self.engine.compose(&utterance, &self.timing, &mut self.audio)?;
                self.composed_any = true;
            }
        }

        Ok(Some(utterance))
    }

    /// Export the accumulated batch clip. Does nothing in interactive mode.
    pub fn finish(mut self) -> Result<(), Box<dyn Error>> {
        if self.mode == Mode::Batch {
            append_end(&mut self.audio, &self.timing);
            self.audio.write_wav(&self.out)?;
            log::info!(
                "Exported {:.2}s of audio to {}",
                self.audio.duration_secs(),
                self.out.display()
            );
        }
        Ok(())
    }

    fn play(&self) -> Result<(), VoicebankError> {
        let Some(player) = &self.player else {
            return Ok(());
        };
        let status = Command::new(&player.program)
            .args(&player.args)
            .arg(&self.out)
            .status()?;
        if !status.success() {
            log::warn!("{} exited with {status}", player.program);
        }
        Ok(())
    }
}
