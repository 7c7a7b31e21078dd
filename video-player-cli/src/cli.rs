use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use clap::{Parser, Subcommand};
use snafu::prelude::*;
use tokio::sync::broadcast::Receiver;
use video_player_controls::{
    StateReceiver, Status,
    controls::Controls,
    format_time,
    notification::Notification,
    player::Player,
    playlist::Playlist,
    simulated::{SimulatedMedia, SimulatedMediaConfig},
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long, env = "VIDEO_PLAYER_PLAYLIST")]
    /// Playlist JSON file. Defaults to <config dir>/video-player/playlist.json when present,
    /// otherwise the built-in playlist.
    playlist: Option<PathBuf>,

    #[clap(short, long, default_value_t = 0)]
    /// Index of the entry loaded at startup.
    start: usize,

    #[clap(long, default_value_t = 1.0)]
    /// Initial volume, between 0 and 1.
    volume: f64,

    #[clap(long, default_value_t = 30.0)]
    /// Length in seconds of every simulated video.
    duration: f64,

    #[clap(long, default_value_t = 500)]
    /// Interval in milliseconds between playback position updates.
    tick_ms: u64,

    #[clap(long, default_value_t = false)]
    /// Refuse play requests issued right after a video loads, like a browser autoplay policy.
    block_autoplay: bool,

    #[clap(short, long, default_value_t = false)]
    /// Disable the TUI interface and print playback changes instead.
    disable_tui: bool,

    #[clap(short, long)]
    /// Log level
    verbosity: Option<tracing::Level>,

    #[clap(long)]
    /// Write logs to this file. Without it, logs are off while the TUI runs.
    log_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Default)]
enum Commands {
    /// Open the player
    #[default]
    Open,
    /// Print the playlist
    List,
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{error}"))]
    PlayerError { error: String },
    #[snafu(display("{error}"))]
    TerminalError { error: String },
    #[snafu(display("Unable to create log file {}: {source}", path.display()))]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<video_player_controls::error::Error> for Error {
    fn from(error: video_player_controls::error::Error) -> Self {
        Error::PlayerError {
            error: error.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::TerminalError {
            error: error.to_string(),
        }
    }
}

pub async fn run() -> Result<(), Error> {
    let mut cli = Cli::parse();

    init_tracing(cli.verbosity, cli.log_file.as_deref(), !cli.disable_tui)?;

    let playlist = load_playlist(cli.playlist.as_deref())?;

    match cli.command.take().unwrap_or_default() {
        Commands::List => {
            for (index, entry) in playlist.entries().iter().enumerate() {
                println!("{index}\t{}\t{}\t{}", entry.id, entry.title, entry.artist);
            }
            Ok(())
        }
        Commands::Open => open(cli, playlist).await,
    }
}

fn init_tracing(
    verbosity: Option<tracing::Level>,
    log_file: Option<&Path>,
    tui: bool,
) -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(verbosity)
        .with_target(false)
        .compact();

    match log_file {
        Some(path) => {
            let file = File::create(path).context(LogFileSnafu { path })?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if tui => {}
        None => subscriber.init(),
    }

    Ok(())
}

fn load_playlist(path: Option<&Path>) -> Result<Playlist, Error> {
    if let Some(path) = path {
        return Ok(Playlist::load(path)?);
    }

    let default_path = dirs::config_dir()
        .map(|dir| dir.join("video-player").join("playlist.json"))
        .filter(|path| path.exists());

    match default_path {
        Some(path) => Ok(Playlist::load(&path)?),
        None => Ok(Playlist::builtin()),
    }
}

async fn open(cli: Cli, playlist: Playlist) -> Result<(), Error> {
    let media = SimulatedMedia::new(SimulatedMediaConfig {
        default_duration: cli.duration,
        block_autoplay: cli.block_autoplay,
        volume: cli.volume,
        ..Default::default()
    });

    let tick_interval = Duration::from_millis(cli.tick_ms.max(1));
    let mut player = Player::new(playlist.clone(), cli.start)?.with_tick_interval(tick_interval);
    player.bind(media);

    let controls = player.controls();
    let state = player.state_receiver();
    let notifications = player.broadcast().subscribe();

    let player_handle = tokio::spawn(async move { player.player_loop().await });

    if cli.disable_tui {
        headless(playlist, controls, state, notifications, tick_interval).await;
    } else {
        video_player_tui::init(playlist, controls, state, notifications).await?;
    }

    match player_handle.await {
        Ok(result) => Ok(result?),
        Err(err) => Err(Error::PlayerError {
            error: err.to_string(),
        }),
    }
}

async fn headless(
    playlist: Playlist,
    controls: Controls,
    mut state: StateReceiver,
    notifications: Receiver<Notification>,
    tick_interval: Duration,
) {
    if state.wait_for(|s| s.status == Status::Ready).await.is_err() {
        return;
    }
    tokio::time::sleep(tick_interval).await;
    controls.play_pause();

    print_changes(playlist, state, notifications, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await;

    controls.quit();
}

/// Prints entry, status and notification changes until `shutdown` completes.
async fn print_changes(
    playlist: Playlist,
    mut state: StateReceiver,
    mut notifications: Receiver<Notification>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let mut last = state.borrow().clone();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Ok(_) = state.changed() => {
                let current = state.borrow_and_update().clone();

                if current.current_index != last.current_index
                    && let Some(entry) = playlist.get(current.current_index)
                {
                    println!("{} - {}", entry.title, entry.artist);
                }

                if current.status != last.status {
                    println!(
                        "{:?} {} / {}",
                        current.status,
                        format_time(current.current_time),
                        format_time(current.duration)
                    );
                }

                last = current;
            },
            Ok(notification) = notifications.recv() => {
                let (Notification::Warning(message) | Notification::Info(message)) = notification;
                println!("{message}");
            },
        }
    }
}
