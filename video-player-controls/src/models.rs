use serde::{Deserialize, Serialize};

/// A single playable item in the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub src: String,
    pub thumbnail: String,
}

impl MediaEntry {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        artist: impl Into<String>,
        src: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            src: src.into(),
            thumbnail: thumbnail.into(),
        }
    }
}
