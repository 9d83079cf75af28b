use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use bpmcli::{cli, config, error, snapshot::SnapshotOptions, types::PkceToken};
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

    /// Build a playlist from tracks matching audio-feature bounds
    Playlist(PlaylistOptions),

    /// List your playlists
    Playlists,

    /// Export saved albums, artists, genres and tags to SQLite
    Snapshot(SnapshotArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Playlist configuration (JSON); defaults are used when omitted
    config: Option<PathBuf>,

    /// Print the selected tracks instead of creating the playlist
    #[clap(long)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SnapshotArgs {
    /// SQLite file to write (default: <data dir>/bpmcli/library.db)
    #[clap(long)]
    database: Option<PathBuf>,

    /// Stop after this many saved albums
    #[clap(long)]
    max_albums: Option<usize>,

    /// Skip MBID and Last.fm tag lookups
    #[clap(long)]
    skip_tags: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn main() {
    if let Err(e) = config::load_env() {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => error!("Cannot start async runtime: {}", e),
            };
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            runtime.block_on(cli::auth(Arc::clone(&oauth_result)));
        }
        Command::Playlist(opt) => cli::playlist(opt.config.as_deref(), opt.dry_run),
        Command::Playlists => cli::list_playlists(),
        Command::Snapshot(opt) => cli::snapshot(
            opt.database,
            SnapshotOptions {
                max_albums: opt.max_albums,
                skip_tags: opt.skip_tags,
            },
        ),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
