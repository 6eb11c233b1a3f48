use std::fs;
use std::path::Path;
use chrono::{DateTime, Utc};
use anyhow::Result;
use std::collections::HashSet;

use rspotify::Token;
use librespot::core::{authentication::Credentials, cache::Cache};

const SPOTIFY_CLIENT_ID: &str = "492e1e45ea814fa3ac555fe1576aaf5b";
const SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:8898/login";
pub const SCOPES: &str =
    "streaming user-read-private user-read-email playlist-read-private playlist-read-collaborative user-library-read";

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authentication Successful!</h1><script>window.close();</script></body>
</html>
"#;
const REFRESH_TOKEN_FILE: &str = "refresh_token";

/// Access tokens are issued for one hour
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Clone)]
pub struct AuthResult {
    pub librespot_credentials: Credentials,
    pub rspotify_token: Token,
    pub refresh_token: String,
    pub cache: Cache,
}

/// A freshly refreshed access token
pub struct RefreshedToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

fn oauth_client_builder() -> librespot_oauth::OAuthClientBuilder {
    librespot_oauth::OAuthClientBuilder::new(
        SPOTIFY_CLIENT_ID,
        SPOTIFY_REDIRECT_URI,
        SCOPES.split_whitespace().collect(),
    )
}

fn store_refresh_token(cache_dir: &Path, refresh_token: &str) {
    match fs::write(cache_dir.join(REFRESH_TOKEN_FILE), refresh_token) {
        Ok(()) => tracing::debug!("Saved refresh token to disk"),
        Err(e) => tracing::warn!(error = %e, "Could not save refresh token"),
    }
}

async fn perform_browser_auth(cache_dir: &Path) -> Result<(Credentials, String, String)> {
    tracing::info!("Starting browser-based OAuth flow");
    let client = oauth_client_builder()
        .open_in_browser()
        .with_custom_message(RESPONSE)
        .build()?;

    let token = client.get_access_token_async().await?;

    store_refresh_token(cache_dir, &token.refresh_token);

    let credentials = Credentials::with_access_token(token.access_token.clone());
    tracing::info!("Browser authentication completed successfully");
    Ok((credentials, token.access_token, token.refresh_token))
}

/// Authenticates with cached credentials when possible, falling back to the browser flow.
pub async fn perform_oauth_flow(cache_dir: &Path) -> Result<AuthResult> {
    let cache = Cache::new(Some(cache_dir.to_path_buf()), None, None, None)?;

    let stored_refresh_token = fs::read_to_string(cache_dir.join(REFRESH_TOKEN_FILE)).ok();

    let (credentials, access_token, refresh_token) =
        if let (Some(creds), Some(refresh_token)) = (cache.credentials(), stored_refresh_token) {
            tracing::info!("Found cached Librespot credentials and refresh token");

            let oauth_client = oauth_client_builder().build()?;

            match oauth_client.refresh_token_async(refresh_token.trim()).await {
                Ok(new_token) => {
                    store_refresh_token(cache_dir, &new_token.refresh_token);
                    tracing::debug!("Token refreshed successfully");

                    (creds, new_token.access_token, new_token.refresh_token)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Cached refresh token failed, re-authenticating");
                    perform_browser_auth(cache_dir).await?
                }
            }
        } else {
            tracing::info!("No cached credentials found, starting browser authentication");
            perform_browser_auth(cache_dir).await?
        };

    let expires_at = Utc::now() + chrono::Duration::seconds(TOKEN_LIFETIME_SECS);

    Ok(AuthResult {
        librespot_credentials: credentials,
        rspotify_token: rspotify_token(access_token, expires_at),
        refresh_token,
        cache,
    })
}

/// Exchanges a refresh token for a new access token
pub async fn refresh_access_token(refresh_token: &str) -> Result<RefreshedToken> {
    let oauth_client = oauth_client_builder().build()?;
    let token = oauth_client.refresh_token_async(refresh_token).await?;

    Ok(RefreshedToken {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: Utc::now() + chrono::Duration::seconds(TOKEN_LIFETIME_SECS),
    })
}

pub fn rspotify_token(access_token: String, expires_at: DateTime<Utc>) -> Token {
    Token {
        access_token,
        expires_in: chrono::Duration::seconds(TOKEN_LIFETIME_SECS),
        expires_at: Some(expires_at),
        scopes: SCOPES
            .split_whitespace()
            .map(|s| s.to_string())
            .collect::<HashSet<String>>(),
        refresh_token: None,
    }
}
