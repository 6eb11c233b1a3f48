//! The user's own library: playlists and liked songs

use anyhow::Result;

use crate::dispatch::Dispatcher;
use crate::download::Downloader;
use crate::model::{Catalog, ResourceRef, SavedTrack};
use crate::selection::pick;
use crate::view::AppView;
use super::{AppController, Prompt};

pub const LIKED_SONGS_FOLDER: &str = "Liked Songs/";

const MISSING_SONG: &str = "###   SKIPPING:  SONG DOES NOT EXIST ON SPOTIFY ANYMORE   ###";

impl<C, D, P> AppController<C, D, P>
where
    C: Catalog,
    D: Downloader,
    P: Prompt,
{
    /// Lists the user's playlists and downloads the chosen ones
    pub async fn download_user_playlists(&mut self) -> Result<()> {
        let playlists = match self.catalog.user_playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load user playlists");
                AppView::error(&Self::format_error(&e));
                return Ok(());
            }
        };

        if playlists.is_empty() {
            AppView::notice("You have no playlists.");
            return Ok(());
        }

        AppView::playlists(&playlists);

        let Some(chosen) = self
            .read_selection(|ordinals| {
                pick(&playlists, ordinals)
                    .map(|picked| picked.into_iter().map(|p| p.id.clone()).collect::<Vec<_>>())
            })
            .await?
        else {
            return Ok(());
        };

        for playlist_id in chosen {
            let reference = ResourceRef::Playlist(playlist_id);
            let result = Dispatcher::new(&self.catalog, &self.downloader)
                .download_playlist(reference.id())
                .await;
            crate::log_download_result!(reference, result);

            if let Err(e) = result {
                AppView::error(&Self::format_download_error(&reference, &e));
            }
        }
        Ok(())
    }

    /// Downloads every liked song into its own folder.
    ///
    /// Songs that no longer exist on Spotify are skipped with a notice.
    pub async fn download_liked_songs(&mut self) -> Result<()> {
        let saved = match self.catalog.saved_tracks().await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load liked songs");
                AppView::error(&Self::format_error(&e));
                return Ok(());
            }
        };

        tracing::info!(count = saved.len(), "Downloading liked songs");

        for song in saved {
            let Some(track_id) = liked_track_id(song) else {
                AppView::notice(MISSING_SONG);
                continue;
            };

            let reference = ResourceRef::Track(track_id);
            let result = self
                .downloader
                .download_track(reference.id(), Some(LIKED_SONGS_FOLDER))
                .await;
            crate::log_download_result!(reference, result);

            if let Err(e) = result {
                AppView::error(&Self::format_download_error(&reference, &e));
            }
        }
        Ok(())
    }
}

/// Id of a liked song that still exists in the catalog
fn liked_track_id(song: SavedTrack) -> Option<String> {
    match song.id {
        Some(id) if !song.name.is_empty() => Some(id),
        _ => {
            tracing::warn!(name = %song.name, "Skipping liked song missing from the catalog");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliMode;
    use crate::dispatch::tests::RecordingDownloader;
    use crate::model::PlaylistInfo;
    use crate::search::tests::FakeCatalog;
    use super::super::tests::controller;

    fn playlist(id: &str, name: &str, tracks: &[&str]) -> (PlaylistInfo, Vec<String>) {
        (
            PlaylistInfo {
                id: id.into(),
                name: name.into(),
                owner: "me".into(),
                total_tracks: tracks.len() as u32,
            },
            tracks.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn saved(id: Option<&str>, name: &str) -> SavedTrack {
        SavedTrack {
            id: id.map(str::to_string),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn liked_songs_skip_removed_tracks() {
        let catalog = FakeCatalog {
            saved: vec![
                saved(Some("t1"), "One"),
                saved(None, "Gone"),
                saved(Some("t3"), ""),
                saved(Some("t4"), "Four"),
            ],
            ..FakeCatalog::default()
        };
        let mut app = controller(catalog, RecordingDownloader::default(), &[]);
        app.run(CliMode::LikedSongs).await.unwrap();

        assert_eq!(
            app.downloader.calls(),
            vec!["track t1 -> Liked Songs/", "track t4 -> Liked Songs/"]
        );
    }

    #[tokio::test]
    async fn liked_song_failure_continues_with_the_rest() {
        let catalog = FakeCatalog {
            saved: vec![saved(Some("t1"), "One"), saved(Some("t2"), "Two")],
            ..FakeCatalog::default()
        };
        let mut app = controller(catalog, RecordingDownloader::failing_on(&["t1"]), &[]);
        app.run(CliMode::LikedSongs).await.unwrap();
        assert_eq!(app.downloader.calls().len(), 2);
    }

    #[tokio::test]
    async fn chosen_playlists_download_into_their_folders() {
        let catalog = FakeCatalog {
            playlists: vec![
                playlist("pl1", "Chill", &["a"]),
                playlist("pl2", "Gym / Run", &["b", "c"]),
                playlist("pl3", "Unpicked", &["d"]),
            ],
            ..FakeCatalog::default()
        };
        let mut app = controller(catalog, RecordingDownloader::default(), &["9", "2 1"]);
        app.run(CliMode::UserPlaylists).await.unwrap();

        assert_eq!(
            app.downloader.calls(),
            vec!["track b -> Gym  Run/", "track c -> Gym  Run/", "track a -> Chill/"]
        );
        assert_eq!(app.prompt.prompts.len(), 2);
    }

    #[tokio::test]
    async fn no_playlists_means_no_prompt() {
        let mut app = controller(FakeCatalog::default(), RecordingDownloader::default(), &["1"]);
        app.run(CliMode::UserPlaylists).await.unwrap();

        assert_eq!(app.catalog.calls(), vec!["user_playlists"]);
        assert!(app.prompt.prompts.is_empty());
    }
}
