use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Playlist has no entries"))]
    EmptyPlaylist,
    #[snafu(display("Playlist contains entry id {id} more than once"))]
    DuplicateEntry { id: u32 },
    #[snafu(display("Index {index} is outside the playlist (length {len})"))]
    InvalidIndex { index: usize, len: usize },
    #[snafu(display("Unable to read playlist {}: {source}", path.display()))]
    PlaylistRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Unable to parse playlist: {source}"))]
    PlaylistParse { source: serde_json::Error },
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::PlaylistParse { source }
    }
}
