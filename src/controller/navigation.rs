//! Handling of typed input: direct references, or search then selection

use anyhow::Result;

use crate::classifier::classify;
use crate::download::Downloader;
use crate::model::{Catalog, ResourceRef};
use crate::search::{search, SearchError};
use crate::selection::resolve;
use crate::view::{AppView, NO_RESULTS};
use super::{AppController, Prompt};

impl<C, D, P> AppController<C, D, P>
where
    C: Catalog,
    D: Downloader,
    P: Prompt,
{
    /// Downloads what `input` refers to.
    ///
    /// A recognized URL or URI is downloaded directly. Anything else is searched for, and
    /// the user picks results by serial number.
    pub async fn handle_input(&mut self, input: &str) -> Result<()> {
        if let Some(reference) = classify(input) {
            tracing::debug!(%reference, "Input is a direct reference");
            self.download_reported(&reference).await;
            return Ok(());
        }

        for reference in self.search_and_select(input).await? {
            self.download_reported(&reference).await;
        }
        Ok(())
    }

    /// Searches for `term` and asks which results to download.
    ///
    /// Search failures are reported and yield no references.
    async fn search_and_select(&mut self, term: &str) -> Result<Vec<ResourceRef>> {
        let results = match search(&self.catalog, term, self.search_limit).await {
            Ok(results) => results,
            Err(SearchError::Catalog(e)) => {
                AppView::error(&Self::format_error(&e));
                return Ok(Vec::new());
            }
            Err(e) => {
                AppView::error(&e.to_string());
                return Ok(Vec::new());
            }
        };

        if results.is_empty() {
            AppView::notice(NO_RESULTS);
            return Ok(Vec::new());
        }

        AppView::search_results(&results);

        let chosen = self
            .read_selection(|ordinals| {
                resolve(&results, ordinals).map(|items| {
                    items
                        .iter()
                        .map(|item| {
                            tracing::debug!(ordinal = item.ordinal, section = ?item.section, "Selected");
                            item.reference()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .await?;

        Ok(chosen.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::CliMode;
    use crate::dispatch::tests::RecordingDownloader;
    use crate::model::PlaylistInfo;
    use crate::search::tests::FakeCatalog;
    use super::super::tests::controller;

    fn catalog_3_2_0_1() -> FakeCatalog {
        let mut catalog = FakeCatalog::with_results(3, 2, 0, 1);
        catalog.playlists.push((
            PlaylistInfo {
                id: "playlist0".into(),
                name: "Mix".into(),
                owner: "someone".into(),
                total_tracks: 2,
            },
            vec!["p1".into(), "p2".into()],
        ));
        catalog
    }

    #[tokio::test]
    async fn selection_maps_flattened_numbers_to_categories() {
        let mut app = controller(catalog_3_2_0_1(), RecordingDownloader::default(), &["4, 6"]);
        app.run(CliMode::Direct("daft punk".into())).await.unwrap();

        assert_eq!(app.catalog.calls()[0], "search daft punk 10 0");
        assert_eq!(
            app.downloader.calls(),
            vec!["album album0", "track p1 -> Mix/", "track p2 -> Mix/"]
        );
    }

    #[tokio::test]
    async fn downloads_follow_selection_order() {
        let mut app = controller(catalog_3_2_0_1(), RecordingDownloader::default(), &["3 1-2"]);
        app.run(CliMode::Direct("query".into())).await.unwrap();
        assert_eq!(
            app.downloader.calls(),
            vec!["track track2", "track track0", "track track1"]
        );
    }

    #[tokio::test]
    async fn invalid_selection_prompts_again() {
        let mut app = controller(
            catalog_3_2_0_1(),
            RecordingDownloader::default(),
            &["7", "abc", "0", "5"],
        );
        app.run(CliMode::Direct("query".into())).await.unwrap();

        assert_eq!(app.downloader.calls(), vec!["album album1"]);
        assert_eq!(app.prompt.prompts.len(), 4);
        assert!(app.prompt.prompts.iter().all(|p| p == "SELECT ITEM(S) BY S.NO: "));
    }

    #[tokio::test]
    async fn failed_item_does_not_stop_its_siblings() {
        let mut app = controller(
            catalog_3_2_0_1(),
            RecordingDownloader::failing_on(&["track0"]),
            &["1,2"],
        );
        app.run(CliMode::Direct("query".into())).await.unwrap();
        assert_eq!(app.downloader.calls(), vec!["track track0", "track track1"]);
    }

    #[tokio::test]
    async fn no_results_skips_the_selection_prompt() {
        let mut app = controller(FakeCatalog::with_results(0, 0, 0, 0), RecordingDownloader::default(), &["1"]);
        app.run(CliMode::Direct("nothing".into())).await.unwrap();

        assert!(app.prompt.prompts.is_empty());
        assert!(app.downloader.calls().is_empty());
    }

    #[tokio::test]
    async fn search_failure_returns_to_the_input_loop() {
        let catalog = FakeCatalog {
            fail_search: true,
            ..FakeCatalog::default()
        };
        let mut app = controller(catalog, RecordingDownloader::default(), &["query", "spotify:track:t9"]);
        app.run(CliMode::Interactive).await.unwrap();

        assert_eq!(app.downloader.calls(), vec!["track t9"]);
        assert!(!app.prompt.prompts.iter().any(|p| p.starts_with("SELECT")));
    }

    #[tokio::test]
    async fn end_of_input_during_selection_downloads_nothing() {
        let mut app = controller(catalog_3_2_0_1(), RecordingDownloader::default(), &[]);
        app.run(CliMode::Direct("query".into())).await.unwrap();
        assert!(app.downloader.calls().is_empty());
    }
}
