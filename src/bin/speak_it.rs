//! speak-it - convert text to speech from the terminal
//!
//! Usage:
//!   speak-it voices
//!   speak-it say "Hello world" --voice Dorothy --output hello.mp3
//!   speak-it repl [--voice <NAME>] [--dir <path>]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use speak_it::{
    voice, ConversionClientBuilder, ConverterState, FileAudioStore, MemoryAudioStore, NoticeLevel,
    SpeakConfig, VOICE_CATALOG,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Convert text to speech through a speech endpoint
#[derive(Parser)]
#[command(name = "speak-it")]
#[command(version)]
#[command(about = "Type text, get synthesized speech back", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the server base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available voices
    Voices,

    /// Convert one piece of text and write the audio to a file
    Say {
        /// Text to speak
        text: String,
        /// Voice name or id
        #[arg(short, long)]
        voice: Option<String>,
        /// Output file
        #[arg(short, long, default_value = "speech.mp3")]
        output: PathBuf,
    },

    /// Interactive session: each line is converted, `:help` for commands
    Repl {
        /// Voice name or id
        #[arg(short, long)]
        voice: Option<String>,
        /// Directory for generated audio files
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SpeakConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
        config.validate()?;
    }

    match cli.command {
        Commands::Voices => {
            for v in VOICE_CATALOG {
                println!("{:<10} {}  {}", v.name, v.id, v.description);
            }
            Ok(())
        }
        Commands::Say {
            text,
            voice,
            output,
        } => cmd_say(config, &text, voice.as_deref(), &output).await,
        Commands::Repl { voice, dir } => cmd_repl(config, voice.as_deref(), dir).await,
    }
}

fn new_converter(
    config: &SpeakConfig,
    store: Arc<dyn speak_it::AudioStore>,
    voice_key: Option<&str>,
) -> anyhow::Result<ConverterState> {
    let mut converter = ConverterState::new(store, config.max_length);
    if let Some(key) = voice_key.or(config.default_voice.as_deref()) {
        let v = voice::resolve(key).with_context(|| format!("unknown voice: {key}"))?;
        converter.select_voice(v.id)?;
    }
    Ok(converter)
}

async fn cmd_say(
    config: SpeakConfig,
    text: &str,
    voice_key: Option<&str>,
    output: &Path,
) -> anyhow::Result<()> {
    let client = ConversionClientBuilder::from_config(config.clone()).build()?;
    let mut converter = new_converter(&config, Arc::new(MemoryAudioStore::new()), voice_key)?;
    if !converter.set_text(text) {
        bail!("text is longer than {} characters", config.max_length);
    }

    let notice = converter
        .submit(&client)
        .await
        .cloned()
        .context("conversion did not start")?;
    if notice.level != NoticeLevel::Success {
        bail!("{}", notice.message);
    }

    let audio = converter.active_audio().context("no audio produced")?;
    match audio.data() {
        Some(data) => {
            std::fs::write(output, &data)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{} ({} bytes) -> {}", notice.message, data.len(), output.display());
        }
        None => println!("{} {}", notice.message, audio.uri()),
    }
    converter.teardown();
    Ok(())
}

async fn cmd_repl(
    config: SpeakConfig,
    voice_key: Option<&str>,
    dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(|| std::env::temp_dir().join("speak-it"));
    let store = Arc::new(FileAudioStore::new(&dir)?);
    let client = ConversionClientBuilder::from_config(config.clone()).build()?;
    let mut converter = new_converter(&config, store, voice_key)?;

    println!(
        "voice: {} | max {} chars | audio in {} | :help for commands",
        converter.voice().name,
        converter.max_length(),
        dir.display()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(command) = line.strip_prefix(':') {
            let (name, arg) = command
                .split_once(' ')
                .map(|(n, a)| (n, a.trim()))
                .unwrap_or((command, ""));
            match name {
                "quit" | "q" => break,
                "help" => print_help(),
                "voice" => match voice::resolve(arg) {
                    Some(v) => {
                        converter.select_voice(v.id)?;
                        println!("voice: {}", v.name);
                    }
                    None => println!("unknown voice: {arg}"),
                },
                "save" => match converter.active_audio().and_then(|a| a.data()) {
                    Some(data) if !arg.is_empty() => {
                        std::fs::write(arg, &data).with_context(|| format!("writing {arg}"))?;
                        println!("saved {} bytes to {arg}", data.len());
                    }
                    Some(_) => println!("usage: :save <file>"),
                    None => println!("no local audio to save"),
                },
                "broken" => {
                    if converter.on_playback_error() {
                        print_last(&converter);
                    } else {
                        println!("no audio");
                    }
                }
                "status" => println!(
                    "{:?} | {} | audio: {}",
                    converter.phase(),
                    converter.char_counter(),
                    converter.active_audio().map(|a| a.uri()).unwrap_or("-")
                ),
                other => println!("unknown command: {other}"),
            }
            continue;
        }

        if !converter.set_text(line) {
            println!(
                "text is longer than {} characters, not submitted",
                converter.max_length()
            );
            continue;
        }
        if converter.submit(&client).await.is_some() {
            print_last(&converter);
            if let Some(audio) = converter.active_audio() {
                println!("  {} ({} bytes)", audio.uri(), audio.size());
            }
        }
    }

    converter.teardown();
    Ok(())
}

fn print_last(converter: &ConverterState) {
    if let Some(notice) = converter.last_notice() {
        println!("{}", notice);
    }
}

fn print_help() {
    println!(
        r#"COMMANDS:
    <text>            Convert the line to speech
    :voice <name|id>  Select a voice
    :save <file>      Write the current audio to a file
    :broken           Report that the current audio cannot be played
    :status           Show converter state
    :quit             Exit and release audio"#
    );
}
