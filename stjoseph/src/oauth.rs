//! OAuth 2.0 flows for YouTube API authentication.
//!
//! [`InstalledAppFlow`] runs the interactive "installed application" authorization against the
//! client-secret file downloaded from the Google Cloud console, and [`OAuthRefresher`] exchanges
//! a refresh token for a new access token. Neither touches the token file; that is the job of
//! [`crate::credentials::CredentialsManager`].

use crate::credentials::{AuthError, Authorizer, Credentials, TokenRefresher};
use async_trait::async_trait;
use eyre::Context;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response, body};
use jiff::{SignedDuration, Timestamp};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl, reqwest,
};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;

/// Google's OAuth 2.0 authorization endpoint.
pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's OAuth 2.0 token endpoint, used for code exchange and refresh.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const OAUTH_DONE_HTML: &str = "<!DOCTYPE html>
<html>
<head><title>Authorization complete</title></head>
<body><p>The authentication flow has completed. You may close this window.</p></body>
</html>
";

/// An OAuth client registration as downloaded from the Google Cloud console.
///
/// The file wraps the registration in either an `installed` or a `web` object.
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    TOKEN_URL.to_string()
}

impl std::fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: ClientSecretsFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" client section".to_string())
    }

    /// Reads the client-secret file, failing with [`AuthError::ClientSecrets`] if it is missing
    /// or malformed.
    pub async fn load(path: &Path) -> Result<Self, AuthError> {
        let invalid = |reason: String| AuthError::ClientSecrets {
            path: path.to_path_buf(),
            reason,
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| invalid(e.to_string()))?;
        Self::from_json(&json).map_err(invalid)
    }
}

/// When a token with the given lifetime, issued now, stops being usable.
fn expiry_after(expires_in: Option<std::time::Duration>) -> Option<Timestamp> {
    let expires_in = SignedDuration::try_from(expires_in?).ok()?;
    Timestamp::now().checked_add(expires_in).ok()
}

fn scopes_of(token: &BasicTokenResponse) -> Option<Vec<String>> {
    token
        .scopes()
        .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
}

/// Builds the HTTP client used for token endpoint calls.
fn token_http_client() -> eyre::Result<reqwest::Client> {
    reqwest::ClientBuilder::new()
        // SSRF no thank you.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("build OAuth HTTP client")
}

/// Interactive authorization through the user's browser and a loopback redirect server.
#[derive(Debug, Clone, Default)]
pub struct InstalledAppFlow;

#[async_trait]
impl Authorizer for InstalledAppFlow {
    async fn authorize(
        &self,
        secrets: &ClientSecrets,
        scopes: &[&str],
    ) -> eyre::Result<Credentials> {
        let csrf = CsrfToken::new_random();
        let (redirect_url, eventually_authorization_code) = setup_redirect(csrf.clone())
            .await
            .context("set up redirect endpoint")?;

        let client = BasicClient::new(ClientId::new(secrets.client_id.clone()))
            .set_client_secret(ClientSecret::new(secrets.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(secrets.auth_uri.clone()).context("parse auth_uri")?)
            .set_token_uri(TokenUrl::new(secrets.token_uri.clone()).context("parse token_uri")?)
            .set_redirect_uri(redirect_url);

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, _csrf_token) = client
            // We never re-use the CSRF since we only go through the flow exactly once.
            .authorize_url(move || csrf.clone())
            .add_scopes(scopes.iter().map(|s| Scope::new(s.to_string())))
            // Without these Google does not hand out a refresh token.
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        tracing::info!(url = %auth_url, "asking user to follow OAuth flow");
        if let Err(e) = webbrowser::open(auth_url.as_ref()) {
            tracing::warn!(error = %e, "could not open a browser, visit the URL above manually");
        }
        let authorization_code = eventually_authorization_code
            .await
            .map_err(|e| AuthError::Authorization(format!("{e:#}")))?;

        let token = client
            .exchange_code(authorization_code)
            .set_pkce_verifier(pkce_verifier)
            .request_async(&token_http_client()?)
            .await
            .map_err(|e| AuthError::Authorization(format!("exchange authorization code: {e}")))?;

        Ok(Credentials {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
            token_uri: secrets.token_uri.clone(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            scopes: scopes_of(&token)
                .unwrap_or_else(|| scopes.iter().map(|s| s.to_string()).collect()),
            expiry: expiry_after(token.expires_in()),
        })
    }
}

/// Exchanges refresh tokens at the token endpoint recorded in the credentials.
#[derive(Debug, Clone, Default)]
pub struct OAuthRefresher;

#[async_trait]
impl TokenRefresher for OAuthRefresher {
    async fn refresh(&self, credentials: &Credentials) -> eyre::Result<Credentials> {
        let Some(refresh_token) = credentials.refresh_token.as_deref() else {
            return Err(AuthError::Refresh("no refresh token available".to_string()).into());
        };

        tracing::debug!("attempting to refresh OAuth token");
        let token_url = TokenUrl::new(credentials.token_uri.clone()).context("parse token_uri")?;
        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_client_secret(ClientSecret::new(credentials.client_secret.clone()))
            .set_token_uri(token_url);

        let token = match client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&token_http_client()?)
            .await
        {
            Ok(token) => token,
            Err(ref e @ oauth2::RequestTokenError::ServerResponse(ref sr))
                if matches!(
                    sr.error(),
                    oauth2::basic::BasicErrorResponseType::InvalidGrant
                ) =>
            {
                tracing::warn!("OAuth refresh token considered invalid grant: {}", e);
                return Err(AuthError::Refresh(format!("invalid grant: {e}")).into());
            }
            Err(e) => return Err(AuthError::Refresh(e.to_string()).into()),
        };
        tracing::debug!("successfully refreshed OAuth token");

        let mut refreshed = credentials.clone();
        refreshed.access_token = token.access_token().secret().clone();
        // Google usually omits the refresh token on refresh; keep the one we have.
        if let Some(new_refresh) = token.refresh_token() {
            refreshed.refresh_token = Some(new_refresh.secret().clone());
        }
        if let Some(scopes) = scopes_of(&token) {
            refreshed.scopes = scopes;
        }
        refreshed.expiry = expiry_after(token.expires_in());
        Ok(refreshed)
    }
}

/// Sets up a local HTTP server to receive the OAuth authorization callback.
///
/// Returns the redirect URL to register with the authorization request, and a future that
/// resolves to the authorization code once the browser has been redirected back with a matching
/// `state`.
async fn setup_redirect(
    csrf: CsrfToken,
) -> eyre::Result<(
    RedirectUrl,
    impl Future<Output = eyre::Result<AuthorizationCode>>,
)> {
    let socket = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind to localhost")?;
    let addr = socket.local_addr().context("get local address")?;
    let url = RedirectUrl::new(format!("http://{}:{}", addr.ip(), addr.port()))
        .context("construct redirect url")?;
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let r = async move {
            let (conn, _) = socket.accept().await.context("accept")?;
            let conn = hyper_util::rt::TokioIo::new(conn);
            let (got, mut gotten) = tokio::sync::mpsc::channel(1);
            let service = service_fn(move |req: Request<body::Incoming>| {
                let csrf = csrf.clone();
                let got = got.clone();
                async move {
                    let mut presented_state = None;
                    let mut presented_code = None;
                    let mut presented_error = None;
                    for (k, v) in form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
                    {
                        match &*k {
                            "state" => presented_state = Some(v),
                            "code" => presented_code = Some(v),
                            "error" => presented_error = Some(v),
                            _ => {}
                        }
                    }
                    if presented_state.as_deref() != Some(csrf.secret().as_str()) {
                        return Err("invalid csrf token");
                    }
                    let code = match (presented_code, presented_error) {
                        (Some(code), _) => Ok(AuthorizationCode::new(code.into_owned())),
                        (None, Some(error)) => Err(error.into_owned()),
                        (None, None) => return Err("no authorization code found"),
                    };
                    if got.send(code).await.is_err() {
                        return Err("redirect listener went away");
                    }
                    Ok(Response::new(Full::<Bytes>::from(OAUTH_DONE_HTML)))
                }
            });
            let mut serve = std::pin::pin!(
                hyper::server::conn::http1::Builder::new().serve_connection(conn, service)
            );

            tokio::select! {
                exit = &mut serve => {
                    if let Err(e) = exit {
                        Err(e).context("redirect server got bad request")
                    } else {
                        eyre::bail!("redirect server exit prematurely");
                    }
                }
                code = gotten.recv() => {
                    serve.as_mut().graceful_shutdown();
                    // Let the browser receive the completion page.
                    let _ = serve.await;
                    match code {
                        Some(Ok(code)) => Ok(code),
                        Some(Err(error)) => eyre::bail!("authorization was denied: {error}"),
                        None => eyre::bail!("redirect service stopped without a code"),
                    }
                }
            }
        };
        let _ = tx.send(r.await);
    });
    Ok((url, async move {
        rx.await.context("redirect future dropped prematurely")?
    }))
}
