//! Download operations and the helpers shared by their implementations

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{kind} {id} is not available for download")]
    Unavailable { kind: &'static str, id: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audio playback of {id} failed: {reason}")]
    Audio { id: String, reason: String },

    #[error("{failed} of {total} items of {kind} {id} failed")]
    Incomplete {
        kind: &'static str,
        id: String,
        failed: usize,
        total: usize,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Downloads catalog objects to disk.
///
/// `folder` is a path relative to the download root, ending in `/`.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download_track(&self, track_id: &str, folder: Option<&str>) -> Result<(), DownloadError>;

    /// Downloads every track of an album
    async fn download_album(&self, album_id: &str) -> Result<(), DownloadError>;

    /// Downloads every album released by an artist
    async fn download_artist_albums(&self, artist_id: &str) -> Result<(), DownloadError>;

    async fn download_episode(&self, episode_id: &str) -> Result<(), DownloadError>;
}

/// Characters that are not allowed in file names on at least one supported platform
const FORBIDDEN_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Makes a catalog name safe to use as a single path component.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();
    // trailing dots and spaces are stripped by Windows
    cleaned.trim().trim_end_matches('.').trim_end().to_string()
}

/// `Ok` when every member of a collection downloaded, otherwise how many of them failed
pub fn collection_result(kind: &'static str, id: &str, failed: usize, total: usize) -> Result<(), DownloadError> {
    match failed {
        0 => Ok(()),
        failed => Err(DownloadError::Incomplete {
            kind,
            id: id.to_string(),
            failed,
            total,
        }),
    }
}

/// Folder for tracks of a playlist, relative to the download root
pub fn playlist_folder(name: &str) -> String {
    format!("{}/", sanitize(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_forbidden_characters() {
        assert_eq!(sanitize(r#"AC/DC: Back <In> "Black"?"#), "ACDC Back In Black");
        assert_eq!(sanitize("a\\b*c|d"), "abcd");
        assert_eq!(sanitize("  padded  "), "padded");
        assert_eq!(sanitize("ends with dots..."), "ends with dots");
        assert_eq!(sanitize("tab\there"), "tabhere");
    }

    #[test]
    fn sanitize_keeps_unicode() {
        assert_eq!(sanitize("Björk – Homogenic"), "Björk – Homogenic");
        assert_eq!(sanitize("東京"), "東京");
    }

    #[test]
    fn collection_result_counts_failures() {
        assert!(collection_result("album", "a1", 0, 5).is_ok());
        let err = collection_result("album", "a1", 2, 5).unwrap_err();
        assert_eq!(err.to_string(), "2 of 5 items of album a1 failed");
    }

    #[test]
    fn playlist_folder_has_trailing_separator() {
        assert_eq!(playlist_folder("Chill / Vibes"), "Chill  Vibes/");
    }
}
