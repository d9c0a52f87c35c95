//! OAuth credential lifecycle backed by a token file.
//!
//! The token file uses Google's "authorized user" JSON layout, so a token written by other
//! Google tooling can be picked up as-is. It is created on the first successful authorization,
//! rewritten on every refresh, and deleted when the credentials are invalidated. There is no
//! cross-process locking: one process is expected to own the file at a time.

use crate::oauth::{ClientSecrets, InstalledAppFlow, OAuthRefresher};
use crate::retry::{ErrorClass, RetryPolicy};
use async_trait::async_trait;
use eyre::Context;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Access tokens are treated as expired this long before their actual expiry.
const EXPIRY_SKEW: SignedDuration = SignedDuration::from_mins(5);

/// Failures of the credential flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The refresh token could not be exchanged for a new access token.
    #[error("failed to refresh OAuth token: {0}")]
    Refresh(String),
    #[error("client secret file {} is unusable: {reason}", path.display())]
    ClientSecrets { path: PathBuf, reason: String },
    #[error("authorization flow failed: {0}")]
    Authorization(String),
    #[error("token file {} is unreadable: {reason}", path.display())]
    TokenFile { path: PathBuf, reason: String },
}

/// OAuth credentials for the YouTube Data API, as stored in the token file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Timestamp>,
}

fn default_token_uri() -> String {
    crate::oauth::TOKEN_URL.to_string()
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl Credentials {
    /// The instant after which the access token should no longer be sent.
    pub fn usable_until(&self) -> Option<Timestamp> {
        self.expiry
            .map(|expiry| expiry.checked_sub(EXPIRY_SKEW).unwrap_or(expiry))
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.usable_until().is_some_and(|until| now >= until)
    }

    pub fn is_valid(&self, now: Timestamp) -> bool {
        !self.access_token.is_empty() && !self.is_expired(now)
    }

    /// Whether these credentials were granted every scope in `scopes`.
    ///
    /// Credentials that do not record their scopes are assumed to cover anything.
    pub fn covers(&self, scopes: &[&str]) -> bool {
        self.scopes.is_empty()
            || scopes
                .iter()
                .all(|wanted| self.scopes.iter().any(|granted| granted == wanted))
    }
}

/// Obtains brand new credentials, typically by asking the user.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(
        &self,
        secrets: &ClientSecrets,
        scopes: &[&str],
    ) -> eyre::Result<Credentials>;
}

/// Exchanges expired credentials for fresh ones.
///
/// Implementations report failure with [`AuthError::Refresh`] so callers can tell a rejected
/// refresh apart from other problems.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, credentials: &Credentials) -> eyre::Result<Credentials>;
}

/// The token file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }

    /// Loads the stored credentials, or `None` if there is no token file.
    pub async fn load(&self) -> Result<Option<Credentials>, AuthError> {
        let unreadable = |reason: String| AuthError::TokenFile {
            path: self.path.clone(),
            reason,
        };
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unreadable(e.to_string())),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| unreadable(e.to_string()))
    }

    pub async fn save(&self, credentials: &Credentials) -> eyre::Result<()> {
        tracing::info!(path = %self.path.display(), "saving token");
        let json = serde_json::to_string(credentials).context("serialize credentials")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("write token file {}", self.path.display()))
    }

    /// Deletes the token file, returning whether there was one to delete.
    pub async fn invalidate(&self) -> eyre::Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "removed token file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("remove token file {}", self.path.display()))
            }
        }
    }
}

/// A [`TokenRefresher`] that keeps the token file in step with every refresh.
///
/// The stale file is removed before the inner refresh runs and the new credentials are written
/// once it succeeds, so a failed refresh never leaves credentials on disk that are known to be
/// bad.
#[derive(Clone)]
pub struct PersistingRefresher {
    inner: Arc<dyn TokenRefresher>,
    store: TokenStore,
}

impl PersistingRefresher {
    pub fn new(inner: Arc<dyn TokenRefresher>, store: TokenStore) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl TokenRefresher for PersistingRefresher {
    async fn refresh(&self, credentials: &Credentials) -> eyre::Result<Credentials> {
        self.store.invalidate().await?;
        let refreshed = self.inner.refresh(credentials).await?;
        self.store.save(&refreshed).await?;
        Ok(refreshed)
    }
}

/// Produces valid OAuth credentials from a client-secret file and a token file.
pub struct CredentialsManager {
    creds_file: PathBuf,
    store: TokenStore,
    token_file_modified: Option<SystemTime>,
    authorizer: Arc<dyn Authorizer>,
    refresher: PersistingRefresher,
    retry: RetryPolicy,
}

impl std::fmt::Debug for CredentialsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsManager")
            .field("creds_file", &self.creds_file)
            .field("token_file", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl CredentialsManager {
    /// Uses the browser-based installed-app flow and Google's token endpoint.
    pub fn new(creds_file: impl Into<PathBuf>, token_file: impl Into<PathBuf>) -> Self {
        Self::with_flows(
            creds_file,
            token_file,
            Arc::new(InstalledAppFlow),
            Arc::new(OAuthRefresher),
        )
    }

    pub fn with_flows(
        creds_file: impl Into<PathBuf>,
        token_file: impl Into<PathBuf>,
        authorizer: Arc<dyn Authorizer>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Self {
        let store = TokenStore::new(token_file);
        Self {
            creds_file: creds_file.into(),
            token_file_modified: store.modified(),
            refresher: PersistingRefresher::new(refresher, store.clone()),
            store,
            authorizer,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn creds_file(&self) -> &Path {
        &self.creds_file
    }

    pub fn token_file(&self) -> &Path {
        self.store.path()
    }

    /// Deletes the token file so that the next credential request re-authorizes.
    ///
    /// Returns whether a file was deleted; a missing file is not an error.
    pub async fn invalidate_token(&self) -> eyre::Result<bool> {
        self.store.invalidate().await
    }

    /// Whether the token file has been written or removed since this manager was created.
    pub fn is_token_changed(&self) -> bool {
        self.store.modified() != self.token_file_modified
    }

    /// Returns credentials that are valid right now for `scopes`.
    ///
    /// Stored credentials are used if still valid and refreshed if expired. Without usable
    /// stored credentials the interactive authorization flow runs against the client-secret
    /// file. Only failed refreshes are retried.
    pub async fn create_oauth_credentials(&self, scopes: &[&str]) -> eyre::Result<Credentials> {
        let mut backoff = self.retry.backoff();
        loop {
            let error = match self.try_create_oauth_credentials(scopes).await {
                Ok(credentials) => return Ok(credentials),
                Err(e) => e,
            };
            if ErrorClass::of(&error) != ErrorClass::RetryableAuth {
                return Err(error);
            }
            let Some(delay) = backoff.next_delay() else {
                return Err(error).wrap_err(format!(
                    "giving up on credentials after {} attempts",
                    backoff.failures()
                ));
            };
            tracing::warn!(error = %error, ?delay, "credential refresh failed, retrying");
            tokio::time::sleep(delay).await;
        }
    }

    async fn try_create_oauth_credentials(&self, scopes: &[&str]) -> eyre::Result<Credentials> {
        let stored = match self.store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable token file");
                None
            }
        };

        if let Some(credentials) = stored {
            tracing::info!(path = %self.store.path().display(), "authenticating");
            if !credentials.covers(scopes) {
                tracing::info!(granted = ?credentials.scopes, "stored token lacks requested scopes");
            } else if credentials.is_valid(Timestamp::now()) {
                return Ok(credentials);
            } else if credentials.refresh_token.is_some() {
                tracing::info!("refreshing credentials");
                return self.refresher.refresh(&credentials).await;
            }
        }

        let secrets = ClientSecrets::load(&self.creds_file).await?;
        let credentials = self
            .authorizer
            .authorize(&secrets, scopes)
            .await
            .context("authorize user to YouTube")?;
        self.store.save(&credentials).await?;
        Ok(credentials)
    }
}
