//! Translate a plain-text document in one shot and print the result.
//!
//! Usage:
//!   cargo run --bin translate-file -- en bs lesson.txt
//!   cat story.txt | cargo run --bin translate-file -- bs en
//!   cargo run --bin translate-file -- en zh notes.md --interactive
//!
//! Documents are chunked in batch mode (5000 chars) unless `--interactive`
//! is given. Ctrl-C stops after the chunk in flight.
//!
//! Optional environment variables: see `Config::from_env`.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bosnian_translate::config::Config;
use bosnian_translate::document::ExtractorRegistry;
use bosnian_translate::{Language, TranslationMode, TranslationPipeline};

struct Args {
    source: Language,
    target: Language,
    path: Option<String>,
    mode: TranslationMode,
}

impl Args {
    fn parse(raw: &[String]) -> Result<Self> {
        let mode = if raw.iter().any(|a| a == "--interactive") {
            TranslationMode::Interactive
        } else {
            TranslationMode::Batch
        };
        let positional: Vec<&String> = raw.iter().filter(|a| !a.starts_with("--")).collect();

        if positional.len() < 2 || positional.len() > 3 {
            bail!("Usage: translate-file <source> <target> [path] [--interactive]");
        }

        Ok(Self {
            source: Language::from_code(positional[0])?,
            target: Language::from_code(positional[1])?,
            path: positional.get(2).map(|p| p.to_string()),
            mode,
        })
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => ExtractorRegistry::default()
            .extract_file(Path::new(path))
            .with_context(|| format!("Failed to load {}", path)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the translation
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bosnian_translate=info".parse()?),
        )
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(&raw)?;
    let config = Config::from_env()?;

    let text = read_input(args.path.as_deref())?;
    info!(
        "Translating {} chars ({} -> {}, {:?} mode)",
        text.chars().count(),
        args.source,
        args.target,
        args.mode
    );

    let pipeline = TranslationPipeline::from_config(&config, config.http_client()?, args.mode);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current chunk");
            on_interrupt.cancel();
        }
    });

    let translated = pipeline
        .translate_text_cancellable(&text, args.source, args.target, &cancel)
        .await?;

    println!("{}", translated);
    Ok(())
}
