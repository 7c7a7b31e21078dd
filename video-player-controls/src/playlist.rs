use std::{collections::HashSet, path::Path};

use serde::Deserialize;
use snafu::prelude::*;
use tracing::{debug, instrument};

use crate::{
    Result,
    error::{DuplicateEntrySnafu, EmptyPlaylistSnafu, PlaylistReadSnafu},
    models::MediaEntry,
};

const BUILTIN_ARTIST: &str = "Música Relaxante";

/// Fixed, ordered list of entries. Never empty and never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    entries: Vec<MediaEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlaylistFile {
    Entries(Vec<MediaEntry>),
    Wrapped { entries: Vec<MediaEntry> },
}

impl Playlist {
    pub fn new(entries: Vec<MediaEntry>) -> Result<Self> {
        ensure!(!entries.is_empty(), EmptyPlaylistSnafu);

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            ensure!(seen.insert(entry.id), DuplicateEntrySnafu { id: entry.id });
        }

        Ok(Self { entries })
    }

    /// The playlist shipped with the player.
    pub fn builtin() -> Self {
        let entries = (0..3)
            .map(|n| {
                let suffix = if n == 0 { String::new() } else { n.to_string() };
                MediaEntry::new(
                    n + 1,
                    format!("Video {n}"),
                    BUILTIN_ARTIST,
                    format!("/assets/video{suffix}.mp4"),
                    format!("/assets/video{suffix}_cover.png"),
                )
            })
            .collect();

        Self { entries }
    }

    /// Accepts either a bare array of entries or `{ "entries": [...] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries = match serde_json::from_str(json)? {
            PlaylistFile::Entries(entries) => entries,
            PlaylistFile::Wrapped { entries } => entries,
        };

        Self::new(entries)
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).context(PlaylistReadSnafu { path })?;
        let playlist = Self::from_json(&json)?;
        debug!("loaded {} entries", playlist.len());
        Ok(playlist)
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaEntry> {
        self.entries.get(index)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.entries.len()
    }

    /// Index after `index`, wrapping to the first entry past the last one.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }

    /// Index before `index`, wrapping to the last entry before the first one.
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.entries.len();
        (index % len + len - 1) % len
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::builtin()
    }
}
