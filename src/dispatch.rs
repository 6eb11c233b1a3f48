//! Routes a resource reference to the matching download operation.

use crate::download::{collection_result, playlist_folder, DownloadError, Downloader};
use crate::model::{Catalog, ResourceRef};
use crate::view::AppView;

pub struct Dispatcher<'a, C: ?Sized, D: ?Sized> {
    catalog: &'a C,
    downloader: &'a D,
}

impl<'a, C, D> Dispatcher<'a, C, D>
where
    C: Catalog + ?Sized,
    D: Downloader + ?Sized,
{
    pub fn new(catalog: &'a C, downloader: &'a D) -> Self {
        Self { catalog, downloader }
    }

    /// Downloads whatever `reference` names.
    ///
    /// Errors of a single track, album, artist or episode are returned as they are. Playlists
    /// and shows keep going past failed members and end with [`DownloadError::Incomplete`].
    pub async fn dispatch(&self, reference: &ResourceRef) -> Result<(), DownloadError> {
        tracing::info!(%reference, "Dispatching download");

        match reference {
            ResourceRef::Track(id) => self.downloader.download_track(id, None).await,
            ResourceRef::Album(id) => self.downloader.download_album(id).await,
            ResourceRef::Artist(id) => self.downloader.download_artist_albums(id).await,
            ResourceRef::Playlist(id) => self.download_playlist(id).await,
            ResourceRef::Episode(id) => self.downloader.download_episode(id).await,
            ResourceRef::Show(id) => {
                let episode_ids = self.catalog.show_episodes(id).await?;
                let mut failed = 0;
                for episode_id in &episode_ids {
                    if let Err(e) = self.downloader.download_episode(episode_id).await {
                        report_child_failure("episode", episode_id, &e);
                        failed += 1;
                    }
                }
                collection_result("show", id, failed, episode_ids.len())
            }
        }
    }

    /// Downloads every track of a playlist into a folder named after it
    pub async fn download_playlist(&self, playlist_id: &str) -> Result<(), DownloadError> {
        let track_ids = self.catalog.playlist_tracks(playlist_id).await?;
        let info = self.catalog.playlist_info(playlist_id).await?;
        let folder = playlist_folder(&info.name);

        tracing::debug!(playlist_id, name = %info.name, tracks = track_ids.len(), "Downloading playlist");

        let mut failed = 0;
        for track_id in &track_ids {
            if let Err(e) = self.downloader.download_track(track_id, Some(&folder)).await {
                report_child_failure("track", track_id, &e);
                failed += 1;
            }
        }
        collection_result("playlist", playlist_id, failed, track_ids.len())
    }
}

fn report_child_failure(kind: &str, id: &str, error: &DownloadError) {
    tracing::warn!(kind, id, error = %error, "Collection member failed");
    AppView::error(&format!("spotify:{kind}:{id}: {error}"));
}
