use error::Error;
use playback::PlaybackState;
use tokio::sync::watch;

mod clock;
pub mod controls;
pub mod error;
pub mod models;
pub mod notification;
pub mod playback;
pub mod player;
pub mod playlist;
pub mod primitive;
pub mod simulated;
pub mod time;

pub use playback::Status;
pub use time::format_time;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type StateReceiver = watch::Receiver<PlaybackState>;
