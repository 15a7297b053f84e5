//! Autolinker CLI

use anyhow::Context;
use autolinker::prelude::*;
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Autolinker - link bare page-title mentions in note text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Known page title (repeatable)
    #[arg(short, long = "title", value_name = "TITLE")]
    titles: Vec<String>,

    /// File with one page title per line
    #[arg(long)]
    titles_file: Option<PathBuf>,

    /// Note to rewrite (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Render every match as a tag
    #[arg(long, action = clap::ArgAction::SetTrue)]
    tags: bool,

    /// Render single-word matches as tags
    #[arg(long, action = clap::ArgAction::SetTrue)]
    single_word_tags: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the rewritten content
    #[arg(long, action = clap::ArgAction::SetTrue)]
    report: bool,

    /// Enable debug logging
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if args.tags {
        config.options = config.options.with_tags();
    }
    if args.single_word_tags {
        config.options = config.options.with_single_word_tags();
    }

    let mut titles = args.titles;
    if let Some(path) = &args.titles_file {
        titles.extend(
            read_titles_file(path)
                .with_context(|| format!("Failed to read titles from {}", path.display()))?,
        );
    }
    if titles.is_empty() {
        log::warn!("No titles given; content is passed through unchanged");
    }

    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let linker = Linker::from_config(&titles, &config)?;
    let outcome = linker.link(&content);
    log::info!(
        "{} titles indexed, {} matches",
        linker.index().len(),
        outcome.match_count()
    );

    let mut stdout = std::io::stdout().lock();
    if args.report {
        let report = LinkReport::from(outcome);
        writeln!(stdout, "{}", report.to_json()?)?;
    } else {
        stdout.write_all(outcome.content.as_bytes())?;
    }
    stdout.flush()?;

    Ok(())
}
