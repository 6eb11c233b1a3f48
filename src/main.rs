mod audio;
mod auth;
mod classifier;
mod cli;
mod config;
mod controller;
mod dispatch;
mod download;
mod logging;
mod model;
mod search;
mod selection;
mod view;

use anyhow::Result;
use rspotify::{AuthCodeSpotify, Config as RspotifyConfig, Token};

use audio::LibrespotDownloader;
use cli::{CliMode, USAGE};
use config::Config;
use controller::{AppController, StdinPrompt};
use model::{AccountTier, Catalog, SpotifyClient};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let mode = CliMode::from_args(std::env::args().skip(1));
    if mode == CliMode::Help {
        print!("{USAGE}");
        return Ok(());
    }

    let config = Config::load()?;

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(?mode, "=== Spotify-DL Starting ===");
    AppView::splash();

    // Step 1: Get credentials
    let auth_result = auth::perform_oauth_flow(&config.cache_dir).await?;

    // Step 2: Authenticate with rspotify
    let rspotify_client = setup_rspotify(auth_result.rspotify_token.clone()).await?;
    let token_expires_at = auth_result.rspotify_token.expires_at;
    let spotify_client = SpotifyClient::new(
        rspotify_client,
        auth_result.refresh_token.clone(),
        token_expires_at,
    );

    let tier = match spotify_client.account_tier().await {
        Ok(tier) => tier,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read account tier, assuming free");
            AccountTier::Free
        }
    };
    AppView::account_tier(tier);

    // Step 3: Open the librespot session used for audio
    let downloader = LibrespotDownloader::connect(auth_result, spotify_client.clone(), &config, tier).await?;

    let mut controller = AppController::new(spotify_client, downloader, StdinPrompt::new(), config.search_limit);
    let res = controller.run(mode).await;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Spotify-DL shutting down");
    res
}

async fn setup_rspotify(access_token: Token) -> Result<AuthCodeSpotify> {
    let spotify = AuthCodeSpotify::with_config(
        Default::default(),
        Default::default(),
        RspotifyConfig {
            token_cached: false,
            token_refreshing: false,
            ..Default::default()
        },
    );

    tracing::debug!("rspotify client initialized");

    *spotify
        .token
        .lock()
        .await
        .map_err(|_| anyhow::anyhow!("rspotify token lock poisoned"))? = Some(access_token);
    tracing::debug!("rspotify token set");
    Ok(spotify)
}
