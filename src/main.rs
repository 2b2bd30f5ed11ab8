use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use folio::app::{App, AppEvent};
use folio::config::Config;
use folio::feed::FeedFetcher;
use folio::nav::{Display, History, Navigator};
use folio::theme::ThemeVariant;
use folio::view::html::document_html;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Width used for `--dump text`.
const DUMP_TEXT_WIDTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    /// Standalone HTML page
    Html,
    /// View tree as JSON
    Json,
    /// Plain text as shown in the terminal
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Terminal browser for OPDS book catalogs")]
struct Args {
    /// Catalog path to open, e.g. `opds/author/1` or `#opds/new`
    #[arg(value_name = "PATH")]
    path: Option<String>,

    /// Config file (default: ~/.config/folio/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog origin, overriding the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Catalog prefix, overriding the config file
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Print one rendered page to stdout instead of starting the TUI
    #[arg(long, value_name = "FORMAT")]
    dump: Option<DumpFormat>,

    /// Append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Logs go to `--log-file` when given, to stderr in dump mode, and nowhere
/// otherwise so they cannot corrupt the alternate screen.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Some(path) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.dump.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let path = args.config.clone().or_else(Config::default_path);
    let mut config = match path.as_deref() {
        Some(path) => load_config_file(path)?,
        None => {
            tracing::debug!("No config location available, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.catalog_prefix = prefix.clone();
    }
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config = load_config(&args)?;
    tracing::debug!(config = ?config, "Effective configuration");

    let fetcher = FeedFetcher::new(&config).context("Failed to create HTTP client")?;
    let history = match &args.path {
        Some(path) => History::with_location(path),
        None => History::new(),
    };
    let navigator = Navigator::new(fetcher, Arc::new(config.settings()), history);

    match args.dump {
        Some(format) => dump(navigator, format).await,
        None => {
            let mut app = App::new(navigator, ThemeVariant::from_config(&config.theme));
            let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
            folio::ui::run(&mut app, event_tx, event_rx).await
        }
    }
}

/// Loads the initial location once and prints it.
async fn dump(mut navigator: Navigator, format: DumpFormat) -> Result<()> {
    if let Err(e) = navigator.initial_load().await.map(|_| ()) {
        let notice = e.notice(&navigator.settings().strings).to_string();
        return Err(anyhow::Error::new(e).context(notice));
    }
    let display = navigator
        .display()
        .context("No catalog page was displayed")?;
    println!("{}", format_display(display, format)?);
    Ok(())
}

fn format_display(display: &Display, format: DumpFormat) -> Result<String> {
    Ok(match format {
        DumpFormat::Html => document_html(display),
        DumpFormat::Json => {
            serde_json::to_string_pretty(display).context("Failed to serialize view")?
        }
        DumpFormat::Text => folio::ui::plain_text(display, DUMP_TEXT_WIDTH),
    })
}
