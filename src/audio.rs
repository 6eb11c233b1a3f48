//! Audio capture through librespot
//!
//! Each item is played by its own librespot player whose sink writes PCM to the target
//! file, or pipes it into an encoder command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use librespot::core::config::SessionConfig;
use librespot::core::session::Session;
use librespot::core::spotify_uri::SpotifyUri;
use librespot::playback::audio_backend;
use librespot::playback::config::{AudioFormat, Bitrate, PlayerConfig};
use librespot::playback::mixer::NoOpVolume;
use librespot::playback::player::{Player, PlayerEvent};

use crate::auth::AuthResult;
use crate::config::Config;
use crate::download::{collection_result, sanitize, DownloadError, Downloader};
use crate::model::{AccountTier, AlbumInfo, Catalog, EpisodeInfo, ResourceRef, TrackInfo};
use crate::view::AppView;

const DEVICE_NAME: &str = "Spotify-DL";

/// Free accounts cannot stream above 160 kbps
pub fn bitrate_for(tier: AccountTier) -> Bitrate {
    match tier {
        AccountTier::Premium => Bitrate::Bitrate320,
        AccountTier::Free => Bitrate::Bitrate160,
    }
}

/// Where downloaded files are written and how they are named
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub podcast_root: PathBuf,
    pub extension: String,
    pub skip_existing: bool,
}

impl OutputLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.root_path.clone(),
            podcast_root: config.podcast_root_path.clone(),
            extension: config.audio_extension().to_string(),
            skip_existing: config.skip_existing,
        }
    }

    /// `<root>/<folder>/<artists> - <name>.<ext>`
    pub fn track_path(&self, folder: Option<&str>, track: &TrackInfo) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(folder) = folder {
            path.push(folder.trim_end_matches('/'));
        }
        let stem = file_stem(&format!("{} - {}", track.artists.join(", "), track.name), &track.id);
        path.push(format!("{stem}.{}", self.extension));
        path
    }

    /// `<podcast root>/<show>/<name>.<ext>`
    pub fn episode_path(&self, episode: &EpisodeInfo) -> PathBuf {
        let mut path = self.podcast_root.clone();
        path.push(file_stem(&episode.show, "Unknown Show"));
        path.push(format!("{}.{}", file_stem(&episode.name, &episode.id), self.extension));
        path
    }

    /// Whether `path` is already downloaded and should be left alone
    pub fn should_skip(&self, path: &Path) -> bool {
        self.skip_existing && path.exists()
    }
}

/// Folder for the tracks of an album, relative to the download root
pub fn album_folder(album: &AlbumInfo) -> String {
    format!(
        "{}/{}/",
        file_stem(&album.artist, "Unknown Artist"),
        file_stem(&album.name, &album.id)
    )
}

fn file_stem(name: &str, fallback: &str) -> String {
    let cleaned = sanitize(name);
    if cleaned.is_empty() {
        sanitize(fallback)
    } else {
        cleaned
    }
}

/// Substitutes the quoted output path for `{}` in an encoder command
pub fn encoder_invocation(command: &str, path: &Path) -> String {
    let quoted = format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"));
    if command.contains("{}") {
        command.replace("{}", &quoted)
    } else {
        format!("{command} {quoted}")
    }
}

pub struct LibrespotDownloader<C> {
    session: Session,
    catalog: C,
    bitrate: Bitrate,
    layout: OutputLayout,
    encoder_command: Option<String>,
}

impl<C: Catalog> LibrespotDownloader<C> {
    /// Opens a librespot session with the cached credentials
    pub async fn connect(auth: AuthResult, catalog: C, config: &Config, tier: AccountTier) -> Result<Self> {
        tracing::info!(?tier, "Connecting librespot session");

        let session_config = SessionConfig {
            device_id: Self::get_device_id(),
            ..Default::default()
        };
        let session = Session::new(session_config, Some(auth.cache));
        session.connect(auth.librespot_credentials, true).await?;

        tracing::info!(username = %session.username(), "Librespot session connected");

        Ok(Self {
            session,
            catalog,
            bitrate: bitrate_for(tier),
            layout: OutputLayout::from_config(config),
            encoder_command: config.encoder_command.clone(),
        })
    }

    fn get_device_id() -> String {
        // Generate a consistent device ID based on machine
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        format!("{}-{}", DEVICE_NAME, hostname)
    }

    /// Creates the parent folder of `path`. Returns false when the file should be skipped.
    fn prepare(&self, path: &Path) -> Result<bool, DownloadError> {
        if self.layout.should_skip(path) {
            tracing::info!(path = %path.display(), "File exists, skipping");
            AppView::notice(&format!("Skipping (already downloaded): {}", path.display()));
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(true)
    }

    /// Plays `reference` into `path` and waits for the end of the item
    async fn capture(&self, reference: &ResourceRef, path: &Path) -> Result<(), DownloadError> {
        let audio_error = |reason: String| DownloadError::Audio {
            id: reference.id().to_string(),
            reason,
        };

        let (backend, device) = match &self.encoder_command {
            Some(command) => ("subprocess", encoder_invocation(command, path)),
            None => {
                // the pipe sink expects its output file to exist
                std::fs::File::create(path).map_err(|source| DownloadError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                ("pipe", path.to_string_lossy().into_owned())
            }
        };

        let sink_builder = audio_backend::find(Some(backend.to_string()))
            .ok_or_else(|| audio_error(format!("audio backend {backend} is not available")))?;
        let uri = SpotifyUri::from_uri(&reference.to_string()).map_err(|e| audio_error(e.to_string()))?;

        let player_config = PlayerConfig {
            bitrate: self.bitrate,
            ..Default::default()
        };
        let player = Player::new(
            player_config,
            self.session.clone(),
            Box::new(NoOpVolume),
            move || sink_builder(Some(device), AudioFormat::default()),
        );
        let mut events = player.get_player_event_channel();

        tracing::debug!(%reference, path = %path.display(), backend, "Capturing audio");
        player.load(uri, true, 0);

        let outcome = loop {
            match events.recv().await {
                Some(PlayerEvent::EndOfTrack { .. }) => break Ok(()),
                Some(PlayerEvent::Unavailable { .. }) => {
                    break Err(DownloadError::Unavailable {
                        kind: reference.kind(),
                        id: reference.id().to_string(),
                    });
                }
                Some(_) => {}
                None => break Err(audio_error("player stopped unexpectedly".to_string())),
            }
        };

        player.stop();
        drop(player);

        if outcome.is_err() {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::debug!(path = %path.display(), error = %e, "No partial file to remove");
            }
        }
        outcome
    }
}

#[async_trait]
impl<C: Catalog> Downloader for LibrespotDownloader<C> {
    async fn download_track(&self, track_id: &str, folder: Option<&str>) -> Result<(), DownloadError> {
        let track = self.catalog.track(track_id).await?;
        if !track.playable {
            return Err(DownloadError::Unavailable {
                kind: "track",
                id: track_id.to_string(),
            });
        }

        let path = self.layout.track_path(folder, &track);
        tracing::debug!(track_id, album = %track.album, path = %path.display(), "Resolved track");
        if !self.prepare(&path)? {
            return Ok(());
        }

        AppView::notice(&format!("Downloading: {} - {}", track.artists.join(", "), track.name));
        self.capture(&ResourceRef::Track(track.id), &path).await
    }

    async fn download_album(&self, album_id: &str) -> Result<(), DownloadError> {
        let album = self.catalog.album(album_id).await?;
        let folder = album_folder(&album);
        tracing::info!(album_id, name = %album.name, tracks = album.track_ids.len(), "Downloading album");

        let mut failed = 0;
        for track_id in &album.track_ids {
            if let Err(e) = self.download_track(track_id, Some(&folder)).await {
                tracing::warn!(album_id, track_id, error = %e, "Album track failed");
                AppView::error(&format!("spotify:track:{track_id}: {e}"));
                failed += 1;
            }
        }

        collection_result("album", album_id, failed, album.track_ids.len())
    }

    async fn download_artist_albums(&self, artist_id: &str) -> Result<(), DownloadError> {
        let album_ids = self.catalog.artist_albums(artist_id).await?;
        tracing::info!(artist_id, albums = album_ids.len(), "Downloading artist albums");

        let mut failed = 0;
        for album_id in &album_ids {
            if let Err(e) = self.download_album(album_id).await {
                tracing::warn!(artist_id, album_id, error = %e, "Artist album failed");
                failed += 1;
            }
        }

        collection_result("artist", artist_id, failed, album_ids.len())
    }

    async fn download_episode(&self, episode_id: &str) -> Result<(), DownloadError> {
        let episode = self.catalog.episode(episode_id).await?;
        let path = self.layout.episode_path(&episode);
        if !self.prepare(&path)? {
            return Ok(());
        }

        AppView::notice(&format!("Downloading episode: {} - {}", episode.show, episode.name));
        self.capture(&ResourceRef::Episode(episode.id), &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &Path) -> OutputLayout {
        OutputLayout {
            root: root.join("music"),
            podcast_root: root.join("podcasts"),
            extension: "ogg".into(),
            skip_existing: true,
        }
    }

    fn track() -> TrackInfo {
        TrackInfo {
            id: "t1".into(),
            name: "Harder, Better?".into(),
            artists: vec!["Daft Punk".into(), "Guest".into()],
            album: "Discovery".into(),
            playable: true,
        }
    }

    #[test]
    fn track_paths_use_artists_and_name() {
        let layout = layout(Path::new("/dl"));
        assert_eq!(
            layout.track_path(None, &track()),
            PathBuf::from("/dl/music/Daft Punk, Guest - Harder, Better.ogg")
        );
        assert_eq!(
            layout.track_path(Some("Liked Songs/"), &track()),
            PathBuf::from("/dl/music/Liked Songs/Daft Punk, Guest - Harder, Better.ogg")
        );
    }

    #[test]
    fn album_tracks_nest_under_artist_and_album() {
        let album = AlbumInfo {
            id: "a1".into(),
            name: "Random Access Memories".into(),
            artist: "Daft Punk".into(),
            track_ids: vec![],
        };
        let folder = album_folder(&album);
        assert_eq!(folder, "Daft Punk/Random Access Memories/");

        let path = layout(Path::new("/dl")).track_path(Some(&folder), &track());
        assert!(path.starts_with("/dl/music/Daft Punk/Random Access Memories"));
    }

    #[test]
    fn empty_names_fall_back() {
        let album = AlbumInfo {
            id: "a1".into(),
            name: "???".into(),
            artist: String::new(),
            track_ids: vec![],
        };
        assert_eq!(album_folder(&album), "Unknown Artist/a1/");
    }

    #[test]
    fn episodes_go_under_their_show() {
        let episode = EpisodeInfo {
            id: "e1".into(),
            name: "Episode 1: Pilot".into(),
            show: "The Show".into(),
        };
        assert_eq!(
            layout(Path::new("/dl")).episode_path(&episode),
            PathBuf::from("/dl/podcasts/The Show/Episode 1 Pilot.ogg")
        );
    }

    #[test]
    fn existing_files_are_skipped_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.ogg");
        std::fs::write(&file, b"pcm").unwrap();

        let mut layout = layout(dir.path());
        assert!(layout.should_skip(&file));
        assert!(!layout.should_skip(&dir.path().join("other.ogg")));

        layout.skip_existing = false;
        assert!(!layout.should_skip(&file));
    }

    #[test]
    fn encoder_path_is_quoted() {
        let path = Path::new("/dl/It's Fine.ogg");
        assert_eq!(
            encoder_invocation("oggenc -r -o {} -", path),
            r"oggenc -r -o '/dl/It'\''s Fine.ogg' -"
        );
        assert_eq!(encoder_invocation("enc", Path::new("/a b")), "enc '/a b'");
    }

    #[test]
    fn bitrate_follows_account_tier() {
        assert!(matches!(bitrate_for(AccountTier::Premium), Bitrate::Bitrate320));
        assert!(matches!(bitrate_for(AccountTier::Free), Bitrate::Bitrate160));
    }
}
