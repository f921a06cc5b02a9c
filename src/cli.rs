use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};
use thiserror::Error;

use crate::backend::{Dispatcher, FALLBACK_MESSAGE};
use crate::config::{Config, ConfigError};
use crate::controller::{update, AppState, Msg, Status};
use crate::effects;
use crate::logging::{self, LogDestination};
use crate::model::{ContentKind, Operation};
use crate::ui::RecastUI;

#[derive(Parser, Clone)]
#[command(name = "recast", author, version, about, long_about = None)]
pub enum RecastCLIArgs {
    /// Interactive terminal interface
    Ui(UiArgs),
    /// Paraphrase text (or an article with --url) and print the result
    Paraphrase(OneShotArgs),
    /// Summarize text (or an article with --url) and print the result
    Summarize(OneShotArgs),
}

#[derive(clap::Args, Clone)]
pub struct BackendArgs {
    /// YAML config file [default: $RECAST_CONFIG]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend address, e.g. http://127.0.0.1:5000
    #[arg(long)]
    base_url: Option<String>,

    /// Transport timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl BackendArgs {
    fn load(&self, log_file: Option<PathBuf>) -> Result<Config, ConfigError> {
        Config::load(self.config.as_deref())?.with_overrides(
            self.base_url.clone(),
            self.timeout_secs,
            log_file,
        )
    }
}

#[derive(clap::Args, Clone)]
pub struct UiArgs {
    /// Prefill the input box
    input: Option<String>,

    /// Start in article URL mode
    #[arg(long)]
    url: bool,

    /// Where the interactive session writes its log [default: recast.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(clap::Args, Clone)]
pub struct OneShotArgs {
    /// Text to process, or the article address with --url
    input: String,

    /// Treat the input as an article URL to be fetched by the backend
    #[arg(long)]
    url: bool,

    /// Log requests to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("nothing to send: the input is empty")]
    EmptyInput,
    #[error("{0}")]
    Failed(String),
}

const fn content_kind(url: bool) -> ContentKind {
    if url {
        ContentKind::ArticleUrl
    } else {
        ContentKind::PlainText
    }
}

#[allow(clippy::missing_errors_doc)]
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = RecastCLIArgs::parse();
    match args {
        RecastCLIArgs::Ui(ui_args) => {
            let config = ui_args.backend.load(ui_args.log_file.clone())?;
            logging::initialize(LogDestination::File(config.log_file.clone()), LevelFilter::Info);
            info!("using backend at {}", config.base_url);
            let dispatcher = Dispatcher::new(&config)?;
            let state = AppState::with_input(
                content_kind(ui_args.url),
                ui_args.input.unwrap_or_default(),
            );
            let mut ui = RecastUI::new(dispatcher, state)?;
            ui.run().await?;
        }
        RecastCLIArgs::Paraphrase(args) => {
            let output = one_shot(args, Operation::Paraphrase).await?;
            write_output(&mut io::stdout().lock(), &output)?;
        }
        RecastCLIArgs::Summarize(args) => {
            let output = one_shot(args, Operation::Summarize).await?;
            write_output(&mut io::stdout().lock(), &output)?;
        }
    }
    Ok(())
}

async fn one_shot(
    args: OneShotArgs,
    operation: Operation,
) -> Result<String, Box<dyn std::error::Error>> {
    let config = args.backend.load(None)?;
    let destination = if args.verbose {
        LogDestination::Stderr
    } else {
        LogDestination::Off
    };
    logging::initialize(destination, LevelFilter::Debug);
    let kind = content_kind(args.url);
    info!("{operation} of {kind} input via {}", config.base_url);
    let dispatcher = Dispatcher::new(&config)?;
    let state = AppState::with_input(kind, args.input);
    Ok(run_once(&dispatcher, state, operation).await?)
}

/// Prints a one-shot result. An empty result writes nothing at all.
pub fn write_output(out: &mut impl Write, output: &str) -> io::Result<()> {
    if output.is_empty() {
        return Ok(());
    }
    writeln!(out, "{output}")
}

/// Drives one dispatch through the controller and returns the displayed output.
pub async fn run_once(
    dispatcher: &Dispatcher,
    state: AppState,
    operation: Operation,
) -> Result<String, CliError> {
    let (mut state, requested) = update(state, Msg::OperationRequested(operation));
    if requested.is_empty() {
        return Err(CliError::EmptyInput);
    }
    for effect in requested {
        let msg = effects::execute(dispatcher, effect).await;
        (state, _) = update(state, msg);
    }
    match state.status() {
        Status::Success(output) => Ok(output.clone()),
        Status::Failure(message) => Err(CliError::Failed(message.clone())),
        Status::Idle | Status::Loading => Err(CliError::Failed(FALLBACK_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{content_kind, write_output, RecastCLIArgs};
    use crate::model::ContentKind;

    #[test]
    fn url_flag_selects_article_mode() {
        assert_eq!(content_kind(true), ContentKind::ArticleUrl);
        assert_eq!(content_kind(false), ContentKind::PlainText);
    }

    #[test]
    fn one_shot_args_parse() {
        let args = RecastCLIArgs::try_parse_from([
            "recast",
            "summarize",
            "https://example.com/a",
            "--url",
            "--base-url",
            "http://backend:5000",
        ])
        .unwrap();
        let RecastCLIArgs::Summarize(args) = args else {
            panic!("expected summarize");
        };
        assert!(args.url);
        assert_eq!(args.input, "https://example.com/a");
        let config = args.backend.load(None).unwrap();
        assert_eq!(config.base_url, "http://backend:5000");
    }

    #[test]
    fn log_file_belongs_to_the_ui_only() {
        let args =
            RecastCLIArgs::try_parse_from(["recast", "ui", "--log-file", "session.log"]).unwrap();
        let RecastCLIArgs::Ui(ui) = args else {
            panic!("expected ui");
        };
        let config = ui.backend.load(ui.log_file.clone()).unwrap();
        assert_eq!(config.log_file, std::path::PathBuf::from("session.log"));

        assert!(RecastCLIArgs::try_parse_from([
            "recast",
            "paraphrase",
            "hello",
            "--log-file",
            "session.log",
        ])
        .is_err());
    }

    #[test]
    fn output_gets_a_trailing_newline() {
        let mut out = Vec::new();
        write_output(&mut out, "Y").unwrap();
        assert_eq!(out, b"Y\n");
    }

    #[test]
    fn ui_input_is_optional() {
        let args = RecastCLIArgs::try_parse_from(["recast", "ui"]).unwrap();
        assert!(matches!(args, RecastCLIArgs::Ui(ui) if ui.input.is_none() && !ui.url));
    }
}
