use std::{sync::Arc, time::Duration};

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use genrelist::{
    cli, config, error,
    scheduler::{DEFAULT_PLAYLIST_NAME, DEFAULT_QUERIES, DEFAULT_TARGET, Job},
    types::PkceToken,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Collect tracks and print them without writing the playlist
    Preview(JobOptions),

    /// Collect tracks and refresh the playlist once
    Update(JobOptions),

    /// Refresh the playlist on a fixed interval until interrupted
    Daemon(DaemonOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct JobOptions {
    /// Search query; can be repeated (defaults to four EDM related genres)
    #[clap(long = "query", num_args = 1)]
    pub queries: Vec<String>,

    /// Number of tracks to collect
    #[clap(long, default_value_t = DEFAULT_TARGET as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub target: u64,

    /// Name of the playlist to create or refresh
    #[clap(long, default_value = DEFAULT_PLAYLIST_NAME)]
    pub name: String,

    /// Number of collected tracks to print
    #[clap(long, default_value_t = 10)]
    pub show: usize,

    /// Skip tracks matched by more than one query
    #[clap(long)]
    pub unique: bool,
}

impl From<JobOptions> for Job {
    fn from(opt: JobOptions) -> Self {
        let queries = if opt.queries.is_empty() {
            DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
        } else {
            opt.queries
        };

        Job {
            queries,
            target: opt.target as usize,
            playlist_name: opt.name,
            show: opt.show,
            unique: opt.unique,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DaemonOptions {
    #[clap(flatten)]
    job: JobOptions,

    /// Hours to wait between two updates
    #[clap(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..))]
    interval_hours: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Preview(opt) => cli::preview(opt.into()).await,
        Command::Update(opt) => cli::update(opt.into()).await,
        Command::Daemon(opt) => {
            let interval = Duration::from_secs(opt.interval_hours * 60 * 60);
            cli::daemon(opt.job.into(), interval).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
