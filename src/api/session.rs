//! Password sign-in and token refresh against the backend's auth endpoint.
//!
//! The session is stored in `.secrets/session.json` with permissions restricted to the current
//! user. Access tokens are refreshed when they are within a minute of expiring.

use crate::api::User;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

const REFRESH_MARGIN_SECONDS: i64 = 60;

/// The contents of `session.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SessionFile {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
    user: User,
}

impl SessionFile {
    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now < Duration::seconds(REFRESH_MARGIN_SECONDS)
    }
}

/// The body returned by both grant types of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: User,
}

impl From<TokenResponse> for SessionFile {
    fn from(r: TokenResponse) -> Self {
        Self {
            access_token: r.access_token,
            refresh_token: r.refresh_token,
            expires_at: Utc::now() + Duration::seconds(r.expires_in),
            user: r.user,
        }
    }
}

/// Hands out access tokens for the signed-in user, refreshing and persisting them as needed.
#[derive(Debug)]
pub(crate) struct SessionProvider {
    path: PathBuf,
    token_url: Url,
    anon_key: String,
    http: reqwest::Client,
    data: SessionFile,
}

impl SessionProvider {
    /// Signs in with `email` and `password` and saves the resulting session.
    pub(crate) async fn sign_in(config: &Config, email: &str, password: &str) -> Result<Self> {
        let token_url = token_url(config.backend_url())?;
        let http = reqwest::Client::new();
        info!("Signing in as {email}");
        let body = serde_json::json!({ "email": email, "password": password });
        let data = request_token(&http, &token_url, config.anon_key(), "password", &body).await?;
        let provider = Self {
            path: config.session_path(),
            token_url,
            anon_key: config.anon_key().to_string(),
            http,
            data,
        };
        provider.save().await?;
        Ok(provider)
    }

    /// Loads the saved session. Fails when nobody has signed in yet.
    pub(crate) async fn load(config: &Config) -> Result<Self> {
        let path = config.session_path();
        let data: SessionFile = utils::deserialize(&path).await?;
        Ok(Self {
            path,
            token_url: token_url(config.backend_url())?,
            anon_key: config.anon_key().to_string(),
            http: reqwest::Client::new(),
            data,
        })
    }

    pub(crate) fn user(&self) -> &User {
        &self.data.user
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn expires_at(&self) -> DateTime<Utc> {
        self.data.expires_at
    }

    /// Returns an access token, refreshing the session first if it is about to expire.
    pub(crate) async fn token(&mut self) -> Result<String> {
        if self.data.needs_refresh(Utc::now()) {
            self.refresh().await?;
        }
        Ok(self.data.access_token.clone())
    }

    /// Exchanges the refresh token for a new session and saves it.
    pub(crate) async fn refresh(&mut self) -> Result<()> {
        debug!("Refreshing the session, it expires at {}", self.data.expires_at);
        let body = serde_json::json!({ "refresh_token": self.data.refresh_token });
        self.data = request_token(
            &self.http,
            &self.token_url,
            &self.anon_key,
            "refresh_token",
            &body,
        )
        .await
        .context("Unable to refresh the session, you may need to sign in again")?;
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        utils::serialize(&self.path, &self.data, true).await?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}

fn token_url(backend_url: &Url) -> Result<Url> {
    backend_url
        .join("auth/v1/token")
        .with_context(|| format!("Unable to build the auth URL from {backend_url}"))
}

async fn request_token(
    http: &reqwest::Client,
    token_url: &Url,
    anon_key: &str,
    grant_type: &str,
    body: &serde_json::Value,
) -> Result<SessionFile> {
    let mut url = token_url.clone();
    url.query_pairs_mut().append_pair("grant_type", grant_type);
    let response = http
        .post(url)
        .header("apikey", anon_key)
        .json(body)
        .send()
        .await
        .context("Unable to reach the auth endpoint")?;
    let status = response.status();
    let text = response
        .text()
        .await
        .context("Unable to read the auth response")?;
    if !status.is_success() {
        bail!("Authentication failed with status {status}: {text}");
    }
    let token: TokenResponse =
        serde_json::from_str(&text).context("Unable to parse the auth response")?;
    Ok(token.into())
}
