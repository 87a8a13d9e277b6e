//! Google OAuth 2.0 sign-in for read-only access to the YouTube Data API.
//!
//! The dashboard acts as its own redirect target: `/auth/login` sends the
//! browser to the consent screen and `/oauth/callback` finishes the exchange.
//! [`Session`] keeps the resulting token fresh and persisted.

use crate::credentials::CredentialStore;
use oauth2::basic::{BasicClient, BasicErrorResponseType, BasicTokenResponse};
use oauth2::url::Url;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RequestTokenError, Scope, TokenResponse,
    TokenUrl, reqwest,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the provider's stated expiry.
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not signed in to YouTube")]
    NotAuthenticated,
    #[error("OAuth client secrets file {0} not found")]
    MissingClientSecrets(PathBuf),
    #[error("OAuth client secrets are invalid: {0}")]
    InvalidClientSecrets(String),
    #[error("stored credential is unreadable: {0}")]
    CorruptCredential(String),
    #[error("no sign-in is in progress")]
    NoPendingLogin,
    #[error("sign-in state does not match")]
    CsrfMismatch,
    #[error("sign-in was denied: {0}")]
    Denied(String),
    #[error("authorization code exchange failed: {0}")]
    Exchange(String),
    #[error("token refresh failed: {0}")]
    Refresh(String),
    #[error("credential i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not build the token endpoint client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The `installed` or `web` section of a Google client secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecrets {
    pub fn parse(bytes: &[u8]) -> Result<Self, AuthError> {
        let file: ClientSecretsFile = serde_json::from_slice(bytes)
            .map_err(|err| AuthError::InvalidClientSecrets(err.to_string()))?;
        file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidClientSecrets("expected an `installed` or `web` section".to_string())
        })
    }

    pub async fn from_file(path: &Path) -> Result<Self, AuthError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Self::parse(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(AuthError::MissingClientSecrets(path.to_path_buf()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// State that must survive between the redirect to Google and the callback.
#[derive(Debug)]
pub struct PendingAuthorization {
    csrf: CsrfToken,
    pkce_verifier: PkceCodeVerifier,
}

/// Builds consent URLs and talks to the token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthManager {
    secrets: ClientSecrets,
    redirect_url: String,
    http: reqwest::Client,
}

impl OAuthManager {
    pub fn new(secrets: ClientSecrets, redirect_url: impl Into<String>) -> Result<Self, AuthError> {
        let http = reqwest::ClientBuilder::new()
            // token endpoints must not redirect
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            secrets,
            redirect_url: redirect_url.into(),
            http,
        })
    }

    fn client(&self) -> Result<ConfiguredClient, AuthError> {
        let invalid = |err: oauth2::url::ParseError| AuthError::InvalidClientSecrets(err.to_string());
        Ok(BasicClient::new(ClientId::new(self.secrets.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.secrets.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.secrets.auth_uri.clone()).map_err(invalid)?)
            .set_token_uri(TokenUrl::new(self.secrets.token_uri.clone()).map_err(invalid)?)
            .set_redirect_uri(RedirectUrl::new(self.redirect_url.clone()).map_err(invalid)?))
    }

    /// Returns the consent screen URL and the state needed to finish the flow.
    pub fn authorize_url(&self) -> Result<(Url, PendingAuthorization), AuthError> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, csrf) = self
            .client()?
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(YOUTUBE_READONLY_SCOPE.to_string()))
            // Without offline access Google issues no refresh token.
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok((
            url,
            PendingAuthorization {
                csrf,
                pkce_verifier,
            },
        ))
    }

    pub async fn exchange(
        &self,
        code: String,
        pending: PendingAuthorization,
    ) -> Result<BasicTokenResponse, AuthError> {
        self.client()?
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pending.pkce_verifier)
            .request_async(&self.http)
            .await
            .map_err(|err| AuthError::Exchange(err.to_string()))
    }

    /// Trades the refresh token for a new access token.
    ///
    /// `Ok(None)` means the grant is gone (no refresh token, or revoked) and
    /// the user has to sign in again.
    pub async fn refresh(
        &self,
        token: &BasicTokenResponse,
    ) -> Result<Option<BasicTokenResponse>, AuthError> {
        let Some(refresh_token) = token.refresh_token() else {
            warn!("no refresh token available, cannot refresh");
            return Ok(None);
        };

        match self
            .client()?
            .exchange_refresh_token(refresh_token)
            .request_async(&self.http)
            .await
        {
            Ok(new_token) => Ok(Some(new_token)),
            Err(RequestTokenError::ServerResponse(ref response))
                if matches!(response.error(), BasicErrorResponseType::InvalidGrant) =>
            {
                warn!("refresh token rejected as invalid grant");
                Ok(None)
            }
            Err(err) => Err(AuthError::Refresh(err.to_string())),
        }
    }
}

/// A token together with the moment it should be treated as expired.
#[derive(Debug, Clone)]
pub struct TimeBoundAccessToken {
    token: BasicTokenResponse,
    expires_at: SystemTime,
}

impl TimeBoundAccessToken {
    /// For tokens read back from disk, whose age is unknown.
    pub fn expired(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: SystemTime::UNIX_EPOCH,
            token,
        }
    }

    pub fn new(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: expiry_of(&token),
            token,
        }
    }

    pub fn raw_token(&self) -> &BasicTokenResponse {
        &self.token
    }

    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }

    /// Swaps in a refreshed token, keeping the old refresh token if the new
    /// response carries none.
    pub fn replace(&mut self, new_token: BasicTokenResponse) {
        let old = std::mem::replace(&mut self.token, new_token);
        if self.token.refresh_token().is_none() {
            self.token.set_refresh_token(old.refresh_token().cloned());
        }
        self.expires_at = expiry_of(&self.token);
    }
}

fn expiry_of(token: &BasicTokenResponse) -> SystemTime {
    let lifetime = token
        .expires_in()
        .unwrap_or(Duration::from_secs(3600))
        .saturating_sub(EXPIRY_BUFFER);
    SystemTime::now() + lifetime
}

/// The signed-in account, shared by every request.
#[derive(Debug)]
pub struct Session {
    store: CredentialStore,
    oauth: Option<OAuthManager>,
    token: Mutex<Option<TimeBoundAccessToken>>,
    pending: Mutex<Option<PendingAuthorization>>,
    secrets_path: PathBuf,
}

impl Session {
    pub fn new(store: CredentialStore, oauth: Option<OAuthManager>, secrets_path: PathBuf) -> Self {
        Self {
            store,
            oauth,
            token: Mutex::new(None),
            pending: Mutex::new(None),
            secrets_path,
        }
    }

    fn oauth(&self) -> Result<&OAuthManager, AuthError> {
        self.oauth
            .as_ref()
            .ok_or_else(|| AuthError::MissingClientSecrets(self.secrets_path.clone()))
    }

    /// A bearer token that is valid for at least a few more minutes.
    #[instrument(skip(self), err(level = tracing::Level::DEBUG))]
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut guard = self.token.lock().await;

        if guard.is_some() && !self.store.exists().await {
            info!("credential file removed, dropping cached token");
            *guard = None;
        }
        if guard.is_none() {
            *guard = self.store.load().await?.map(TimeBoundAccessToken::expired);
        }
        let Some(token) = guard.as_mut() else {
            return Err(AuthError::NotAuthenticated);
        };

        if token.is_expired() {
            debug!("access token expired, refreshing");
            match self.oauth()?.refresh(token.raw_token()).await? {
                Some(new_token) => {
                    token.replace(new_token);
                    self.store.save(token.raw_token()).await?;
                    debug!("access token refreshed");
                }
                None => {
                    *guard = None;
                    self.store.clear().await?;
                    return Err(AuthError::NotAuthenticated);
                }
            }
        }

        Ok(token.raw_token().access_token().secret().clone())
    }

    /// Starts a sign-in and returns where to send the browser.
    pub async fn begin_login(&self) -> Result<Url, AuthError> {
        let (url, pending) = self.oauth()?.authorize_url()?;
        *self.pending.lock().await = Some(pending);
        info!("starting OAuth sign-in");
        Ok(url)
    }

    /// Finishes the sign-in started by [`Self::begin_login`].
    pub async fn complete_login(&self, code: String, state: &str) -> Result<(), AuthError> {
        let pending = self
            .pending
            .lock()
            .await
            .take()
            .ok_or(AuthError::NoPendingLogin)?;
        if pending.csrf.secret() != state {
            return Err(AuthError::CsrfMismatch);
        }

        let token = self.oauth()?.exchange(code, pending).await?;
        self.store.save(&token).await?;
        *self.token.lock().await = Some(TimeBoundAccessToken::new(token));
        info!(path = %self.store.path().display(), "signed in, credential saved");
        Ok(())
    }

    /// Forgets the account so the next request has to sign in again.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        *self.token.lock().await = None;
        let removed = self.store.clear().await?;
        info!(removed, "credential cleared");
        Ok(())
    }
}
