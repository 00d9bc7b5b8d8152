//! The `snoomark` binary.

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use snoomark::{entity, markdown_to_html, Options, Render, RenderMode};

#[derive(Debug, Parser)]
#[command(about, author, version)]
struct Cli {
    /// Markdown files to render, concatenated; standard input if none
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Which flavor of document to render
    #[arg(short, long, value_enum, default_value_t = Mode::Usertext)]
    mode: Mode,

    /// Add rel="nofollow" to every link
    #[arg(long)]
    nofollow: bool,

    /// Add a target attribute to every link
    #[arg(long, value_name = "TARGET")]
    target: Option<String>,

    /// Prepend a table of contents and give headers ids
    #[arg(long)]
    toc: bool,

    /// Prefix for the ids given to headers with --toc
    #[arg(long, value_name = "PREFIX", requires = "toc")]
    toc_id_prefix: Option<String>,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Usertext,
    Wiki,
    UsertextWithoutLinks,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Usertext => RenderMode::UserText,
            Mode::Wiki => RenderMode::Wiki,
            Mode::UsertextWithoutLinks => RenderMode::UserTextWithoutLinks,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    entity::init()?;

    let options = Options {
        mode: cli.mode.into(),
        render: Render {
            nofollow: cli.nofollow,
            target: cli.target,
            toc: cli.toc,
            toc_id_prefix: cli.toc_id_prefix,
        },
    };

    let mut input = Vec::with_capacity(2048);
    if cli.files.is_empty() {
        io::stdin().read_to_end(&mut input)?;
    } else {
        for path in &cli.files {
            input.extend(fs::read(path)?);
        }
    }

    tracing::debug!(bytes = input.len(), mode = ?options.mode, "rendering");
    let html = markdown_to_html(&String::from_utf8_lossy(&input), &options);

    match cli.output {
        Some(path) => fs::write(path, html)?,
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(html.as_bytes())?;
            lock.flush()?;
        }
    }

    Ok(())
}
