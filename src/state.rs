use crate::auth::{ClientSecrets, OAuthManager, Session};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::dashboard::DashboardSettings;
use crate::insights::{GeminiClient, InsightGenerator};
use crate::storage::HistoryLog;
use crate::youtube::{ChannelApi, YouTubeClient};
use std::sync::Arc;
use tracing::warn;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<HistoryLog>,
    pub session: Arc<Session>,
    pub channel_api: Arc<dyn ChannelApi>,
    pub insights: Arc<dyn InsightGenerator>,
    pub settings: DashboardSettings,
    pub refresh_interval_secs: u64,
}

impl AppState {
    pub fn new(
        history: HistoryLog,
        session: Arc<Session>,
        channel_api: Arc<dyn ChannelApi>,
        insights: Arc<dyn InsightGenerator>,
        settings: DashboardSettings,
        refresh_interval_secs: u64,
    ) -> Self {
        Self {
            history: Arc::new(history),
            session,
            channel_api,
            insights,
            settings,
            refresh_interval_secs,
        }
    }

    /// Wires the production clients from configuration.
    ///
    /// Missing client secrets are not fatal, but without them there is no
    /// sign-in and no refresh. A saved credential is loaded as expired, so
    /// API requests then fail until the secrets file is provided.
    pub async fn from_config(config: &Config) -> Self {
        let oauth = match ClientSecrets::from_file(&config.client_secrets_path)
            .await
            .and_then(|secrets| OAuthManager::new(secrets, config.redirect_url.clone()))
        {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!("sign-in unavailable: {err}");
                None
            }
        };

        let session = Arc::new(Session::new(
            CredentialStore::new(&config.token_path),
            oauth,
            config.client_secrets_path.clone(),
        ));
        let http = reqwest::Client::new();
        let channel_api = YouTubeClient::new(
            Arc::clone(&session),
            http.clone(),
            config.youtube_api_base.clone(),
        );
        let insights = GeminiClient::new(
            http,
            config.gemini_api_base.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        );

        Self::new(
            HistoryLog::new(&config.history_path),
            session,
            Arc::new(channel_api),
            Arc::new(insights),
            DashboardSettings {
                top_pool_size: config.top_pool_size,
                ..DashboardSettings::default()
            },
            config.refresh_interval_secs,
        )
    }
}
