//! Argument parsing, configuration resolution and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use skein_config::{ClientConfig, ConfigLayer, DaemonLayer, LogFormat, LoggingLayer, RefreshLayer};
use skein_telemetry::{LogTarget, LoggingConfig, init_logging};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{torrents, tui};
use crate::output::OutputFormat;

/// Parses CLI arguments, executes the requested command and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let command = cli.command.clone().unwrap_or(Command::Tui);
    if matches!(command, Command::Version) {
        println!("skein {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = ClientConfig::layered(cli.config.as_deref(), cli.overrides())?;
    install_logging(&config, matches!(command, Command::Tui))?;
    debug!(command = command.label(), daemon = %config.daemon.host, "dispatching");

    let ctx = AppContext::connect(config)?;
    match command {
        Command::Tui => tui::handle_tui(&ctx).await,
        Command::Add(args) => torrents::handle_add(&ctx, args).await,
        Command::Ls => torrents::handle_list(&ctx, cli.output).await,
        Command::Files(args) => torrents::handle_files(&ctx, args, cli.output).await,
        Command::Version => Ok(()),
    }
}

/// The interactive UI owns the terminal, so it only logs to a file.
fn install_logging(config: &ClientConfig, interactive: bool) -> CliResult<()> {
    let target = match (&config.logging.file, interactive) {
        (Some(path), _) => LogTarget::File(path),
        (None, false) => LogTarget::Stderr,
        (None, true) => return Ok(()),
    };
    init_logging(&LoggingConfig {
        level: &config.logging.level,
        format: config.logging.format,
        target,
        build_sha: skein_telemetry::build_sha(),
    })
    .map_err(|err| CliError::validation(format!("logging: {err}")))
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse().map_err(|err: skein_telemetry::TelemetryError| err.to_string())
}

#[derive(Parser)]
#[command(name = "skein", version, about = "Terminal client for a remote torrent daemon")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true, env = "SKEIN_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "SKEIN_HOST")]
    host: Option<String>,
    #[arg(long, global = true, env = "SKEIN_PORT")]
    port: Option<u16>,
    #[arg(long, global = true, env = "SKEIN_RPC_PATH")]
    rpc_path: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, global = true, env = "SKEIN_TIMEOUT_SECS")]
    timeout: Option<u64>,
    /// Seconds between torrent list refreshes.
    #[arg(long, global = true)]
    poll_interval: Option<u64>,
    /// Seconds between peer list refreshes.
    #[arg(long, global = true)]
    peers_interval: Option<u64>,
    #[arg(long, global = true, env = "SKEIN_LOG_LEVEL")]
    log_level: Option<String>,
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[arg(
        long = "output",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            daemon: DaemonLayer {
                host: self.host.clone(),
                port: self.port,
                rpc_path: self.rpc_path.clone(),
                timeout_secs: self.timeout,
            },
            refresh: RefreshLayer {
                poll_interval_secs: self.poll_interval,
                peers_interval_secs: self.peers_interval,
            },
            logging: LoggingLayer {
                level: self.log_level.clone(),
                format: self.log_format,
                file: self.log_file.clone(),
            },
        }
    }
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// Interactive torrent list (the default).
    Tui,
    /// Add a torrent from a magnet link, URL or local .torrent file.
    Add(AddArgs),
    /// Print the torrent list.
    Ls,
    /// Print the file tree of one torrent.
    Files(FilesArgs),
    /// Print the client version.
    Version,
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Tui => "tui",
            Self::Add(_) => "add",
            Self::Ls => "ls",
            Self::Files(_) => "files",
            Self::Version => "version",
        }
    }
}

#[derive(Args, Clone, Debug)]
pub(crate) struct AddArgs {
    /// Magnet link, HTTP(S) URL or path to a .torrent file.
    pub(crate) source: String,
    /// Download directory on the daemon host.
    #[arg(long = "dir")]
    pub(crate) download_dir: Option<String>,
    /// Comma-separated labels.
    #[arg(long, value_delimiter = ',')]
    pub(crate) labels: Vec<String>,
    /// Start downloading immediately instead of adding paused.
    #[arg(long)]
    pub(crate) start: bool,
}

#[derive(Args, Clone, Debug)]
pub(crate) struct FilesArgs {
    /// Torrent id as shown by `ls`.
    pub(crate) id: i64,
}
