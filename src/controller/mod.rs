//! Controller module - Application flow
//!
//! This module drives the program: it reads what the user types, hands URLs to the
//! dispatcher and search text to the search aggregator, and reports outcomes through
//! the view. It is organized into submodules by responsibility:
//!
//! - `input`: Line prompts and selection re-prompting
//! - `navigation`: Search, selection and dispatch of typed input
//! - `library`: The user's own playlists and liked songs

mod input;
mod navigation;
mod library;

pub use input::{Prompt, StdinPrompt};

use anyhow::Result;

use crate::cli::CliMode;
use crate::dispatch::Dispatcher;
use crate::download::{DownloadError, Downloader};
use crate::model::{Catalog, ResourceRef};
use crate::view::AppView;

pub struct AppController<C, D, P> {
    pub(crate) catalog: C,
    pub(crate) downloader: D,
    pub(crate) prompt: P,
    search_limit: u32,
}

impl<C, D, P> AppController<C, D, P>
where
    C: Catalog,
    D: Downloader,
    P: Prompt,
{
    pub fn new(catalog: C, downloader: D, prompt: P, search_limit: u32) -> Self {
        Self {
            catalog,
            downloader,
            prompt,
            search_limit,
        }
    }

    /// Runs `mode` to completion. Flag and direct modes handle one request and return.
    pub async fn run(&mut self, mode: CliMode) -> Result<()> {
        tracing::info!(?mode, "Starting");

        match mode {
            CliMode::Interactive => self.run_interactive().await,
            CliMode::Direct(input) => self.handle_input(&input).await,
            CliMode::UserPlaylists => self.download_user_playlists().await,
            CliMode::LikedSongs => self.download_liked_songs().await,
            CliMode::Help => Ok(()),
        }
    }

    async fn run_interactive(&mut self) -> Result<()> {
        loop {
            if let Err(e) = self.catalog.refresh_session().await {
                AppView::error(&Self::format_error(&e));
            }

            let Some(input) = self.read_non_empty("Enter search or URL: ").await? else {
                tracing::info!("Input closed, exiting");
                return Ok(());
            };

            self.handle_input(&input).await?;
            AppView::separator();
        }
    }

    /// Downloads `reference`, reporting a failure instead of returning it
    pub(crate) async fn download_reported(&self, reference: &ResourceRef) {
        let result = Dispatcher::new(&self.catalog, &self.downloader)
            .dispatch(reference)
            .await;
        crate::log_download_result!(reference, result);

        if let Err(e) = result {
            AppView::error(&Self::format_download_error(reference, &e));
        }
    }

    pub(crate) fn format_download_error(reference: &ResourceRef, error: &DownloadError) -> String {
        match error {
            DownloadError::Other(e) => format!("{reference}: {}", Self::format_error(e)),
            other => format!("{reference}: {other}"),
        }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = error.to_string();

        // Handle common Spotify API errors
        if error_str.contains("404") {
            "Not found on Spotify.".to_string()
        } else if error_str.contains("403") {
            "Action forbidden. Check your Spotify account status.".to_string()
        } else if error_str.contains("401") {
            "Authentication expired. Please restart the app.".to_string()
        } else if error_str.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
