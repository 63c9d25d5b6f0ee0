//! ID3 tag writing for downloaded episodes
//!
//! Every episode file gets the same five fields rewritten on every run:
//! title, artist, album, genre and year. Files without an existing tag get
//! a fresh one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike};
use id3::{ErrorKind, Tag, TagLike, Version};
use tracing::{debug, warn};

use crate::errors::{TagError, TagResult};

/// Values written into an episode's tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeTags {
    /// Display title, e.g. `[12] Something Great`
    pub title: String,
    /// Episode author
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Publish year, `None` when the feed timestamp did not parse
    pub year: Option<i32>,
}

impl EpisodeTags {
    /// Extract the four-digit year from an RFC 1123Z publish timestamp
    pub fn year_from_published(published: &str) -> Option<i32> {
        match DateTime::parse_from_rfc2822(published.trim()) {
            Ok(timestamp) => Some(timestamp.year()),
            Err(e) => {
                warn!("Unparseable publish timestamp '{}': {}", published, e);
                None
            }
        }
    }
}

/// ID3v2 revision written back to disk
const TAG_VERSION: Version = Version::Id3v23;

/// Writes episode tags into local media files
#[derive(Debug, Clone, Copy, Default)]
pub struct TagWriter;

impl TagWriter {
    pub fn new() -> Self {
        Self
    }

    /// Open the file's tag, overwrite the episode fields and persist it
    ///
    /// # Errors
    ///
    /// Returns `TagError` if the file cannot be opened, its tag cannot be
    /// read, or the updated tag cannot be written back.
    pub fn write(&self, path: &Path, tags: &EpisodeTags) -> TagResult<()> {
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => {
                debug!("No existing tag in {}, starting a new one", path.display());
                Tag::new()
            }
            Err(source) => {
                return Err(TagError::Id3 {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        tag.set_title(tags.title.as_str());
        tag.set_artist(tags.artist.as_str());
        tag.set_album(tags.album.as_str());
        tag.set_genre(tags.genre.as_str());
        if let Some(year) = tags.year {
            tag.set_year(year);
        }

        tag.write_to_path(path, TAG_VERSION)
            .map_err(|source| TagError::Id3 {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Wrote tags to {}", path.display());
        Ok(())
    }

    /// Run [`TagWriter::write`] on the blocking thread pool
    pub async fn write_async(&self, path: PathBuf, tags: EpisodeTags) -> TagResult<()> {
        let writer = *self;
        tokio::task::spawn_blocking(move || writer.write(&path, &tags))
            .await
            .map_err(|e| TagError::TaskFailed {
                reason: e.to_string(),
            })?
    }
}
