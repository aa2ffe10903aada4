//! picospeak main entry point
//!
//! Speaks its arguments (or stdin) with the Pico engine, writing the audio
//! to a file, the default output device, or both.

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use picospeak::audio::{create_device, playback_capacity};
use picospeak::speech::{create_engine, supported_languages, Language};
use picospeak::state::config::Config;
use picospeak::state::Session;
use picospeak::{SOURCE_SAMPLE_RATE, UPSAMPLED_RATE};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "picospeak")]
#[command(about = "Speak text with the SVOX Pico engine")]
#[command(version)]
struct Cli {
    /// File to write output to; .wav implies WAVE, .au implies AU, otherwise headerless PCM
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Language to use (en-US, en-GB, de-DE, es-ES, fr-FR, it-IT)
    #[arg(long)]
    lang: Option<Language>,

    /// Directory holding the lingware files
    #[arg(long)]
    lang_dir: Option<PathBuf>,

    /// Play through the audio device as well when writing a file
    #[arg(long)]
    play: bool,

    /// Upsample to 48 kHz for playback
    #[arg(long)]
    upsample: bool,

    /// List supported languages and exit
    #[arg(long)]
    list_languages: bool,

    /// Write debug logging to picospeak.log
    #[arg(short = 'd', long)]
    debug: bool,

    /// Text to speak; each argument is sent separately. Reads stdin if empty
    text: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    if cli.debug {
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("picospeak.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open picospeak.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }
        info!("picospeak version {} starting (debug mode)", picospeak::VERSION);
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    if cli.list_languages {
        for lang in supported_languages() {
            println!("{}", lang);
        }
        return;
    }

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    debug!("Configuration loaded from {:?}", config.path());

    let language = cli.lang.unwrap_or_else(|| config.language());
    let lang_dir = cli.lang_dir.unwrap_or_else(|| config.lang_dir());
    let upsample = cli.upsample || config.upsample();
    let play = cli.play || cli.output.is_none();

    let engine = create_engine(language, &lang_dir)
        .with_context(|| format!("initializing engine for {}", language))?;
    let mut session: Session = Session::new(engine, config.driver_config()?);

    if let Some(output) = &cli.output {
        session
            .set_file_output(output)
            .with_context(|| format!("opening {}", output.display()))?;
    }

    if play {
        let rate = if upsample { UPSAMPLED_RATE } else { SOURCE_SAMPLE_RATE };
        let capacity = playback_capacity(config.buffer_size(), upsample);
        let device = create_device(rate, capacity).context("opening audio device")?;
        session.set_playback(device, capacity)?;
    }

    let texts = if cli.text.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("reading text from stdin")?;
        vec![input]
    } else {
        cli.text
    };

    let spoken = texts.iter().try_for_each(|text| session.send_text(text));

    // Flush, final device write, stop, close; even after a failed send
    let finished = session.finish();
    spoken?;
    finished?;

    info!("Done");
    Ok(())
}
