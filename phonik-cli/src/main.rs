//! Command-line interface for the phonik G2P engine

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;
use serde::Serialize;

use phonik_core::{Phonemizer, Token};

/// Convert English text to phonemes
#[derive(Parser)]
#[command(name = "phonik", version, about)]
struct Cli {
    /// Text to phonemize; reads stdin when neither text nor --file is given
    text: Option<String>,

    /// Read input from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Use the British English dictionaries and allomorph rules
    #[arg(short, long)]
    british: bool,

    /// Marker emitted for tokens nothing could resolve
    #[arg(long, default_value = phonik_core::DEFAULT_UNK)]
    unk: String,

    /// Skip the inline [surface](override) preprocessing step
    #[arg(long)]
    no_preprocess: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Just the phoneme string
    Text,
    /// Phonemes plus the full token list as JSON
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    phonemes: &'a str,
    tokens: &'a [Token],
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_input(&cli)?;
    debug!("phonemizing {} bytes", input.len());

    let engine = Phonemizer::builder()
        .british(cli.british)
        .unk(cli.unk.clone())
        .build()
        .context("failed to build engine")?;

    let (phonemes, tokens) = engine.phonemize_with(&input, !cli.no_preprocess);

    match cli.format {
        Format::Text => println!("{phonemes}"),
        Format::Json => {
            let out = JsonOutput { phonemes: &phonemes, tokens: &tokens };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
