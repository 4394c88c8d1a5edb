use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ac_voice::config::Config;
use ac_voice::engines::voicebank::{
    import_voicebank, DictionaryPhonemizer, EspeakPhonemizer, VoicebankEngine, VoicebankError,
    VoicebankModelParams,
};
use ac_voice::session::{Mode, Session};

/// Take English text from stdin and emit Animal Crossing voice audio.
#[derive(Parser)]
#[command(name = "ac-voice", version)]
struct Cli {
    /// Store the output in WAV format here
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Don't autoplay in the REPL, just produce the last line's output at --out
    #[arg(long)]
    repl_dont_play: bool,

    /// Config file (defaults to ./ac-voice.json if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the voicebank in this directory instead of the configured one
    #[arg(long, value_name = "DIR")]
    voicebank: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Name a folder of untitled recordings after the syllables they contain
    Import {
        /// Folder holding the recordings of one or more banks
        #[arg(value_name = "DIR")]
        source: PathBuf,
        /// Bank name found in the recording file names, e.g. GAL
        #[arg(long)]
        bank: String,
        /// Where to create the <bank> voicebank directory
        #[arg(long, value_name = "DIR", default_value = "voices")]
        dest: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(voicebank) = cli.voicebank {
        config.voicebank = voicebank;
    }

    if let Some(Commands::Import { source, bank, dest }) = cli.command {
        for (from, to) in import_voicebank(&source, &bank, &dest, &config.sample_extension)? {
            println!("{} --> {}", from.display(), to.display());
        }
        return Ok(());
    }

    let interactive = io::stdin().is_terminal();
    let play = interactive && !cli.repl_dont_play;

    // Keeps a scratch output alive (and deletes it) for the whole session.
    let mut _scratch = None;
    let out = match cli.out {
        Some(out) => out,
        None if play => {
            let path = tempfile::Builder::new()
                .prefix("ac-voice-")
                .suffix(".wav")
                .tempfile()?
                .into_temp_path();
            println!("no --out specified, using {}", path.display());
            let out = path.to_path_buf();
            _scratch = Some(path);
            out
        }
        None => return Err("no --out specified".into()),
    };

    let mut engine = VoicebankEngine::new();
    let params = VoicebankModelParams {
        sample_extension: config.sample_extension.clone(),
    };
    match engine.load(&config.voicebank, params) {
        Ok(()) => {}
        Err(VoicebankError::MissingSamples(missing)) => {
            for path in &missing {
                println!("missing {}", path.display());
            }
            return Err(format!("voicebank at {} is incomplete", config.voicebank.display()).into());
        }
        Err(e) => return Err(e.into()),
    }

    let espeak = EspeakPhonemizer::new(config.phonemizer.clone());
    espeak.check_available()?;
    let phonemizer = DictionaryPhonemizer::new(espeak, config.supplemental_dict.clone());

    let mode = if interactive {
        Mode::Interactive
    } else {
        Mode::Batch
    };
    let player = play.then(|| config.player.clone());

    let session = Session::new(
        &engine,
        phonemizer,
        io::stdout(),
        mode,
        config.timing,
        out,
        player,
    )?;
    session.run(io::stdin().lock())
}
