use super::types::{
    ChannelListResponse, PlaylistItemListResponse, SearchListResponse, VideoListResponse, count,
};
use super::{ChannelApi, YouTubeError};
use crate::auth::Session;
use crate::models::{ChannelOverview, LatestVideo, VideoStats};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// HTTP client for the YouTube Data API, authenticated through a [`Session`].
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    session: Arc<Session>,
    http: reqwest::Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(session: Arc<Session>, http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            session,
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GETs `{base}/{endpoint}` with a fresh bearer token and decodes the body.
    #[instrument(skip(self, query), level = tracing::Level::TRACE)]
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let access_token = self.session.access_token().await?;
        let url = format!("{}/{endpoint}", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(YouTubeError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChannelApi for YouTubeClient {
    async fn my_channel(&self) -> Result<ChannelOverview, YouTubeError> {
        let response: ChannelListResponse = self
            .get(
                "channels",
                &[("part", "snippet,statistics,contentDetails"), ("mine", "true")],
            )
            .await?;

        let channel = response
            .items
            .into_iter()
            .next()
            .ok_or(YouTubeError::NoChannel)?;
        let counts = channel
            .statistics
            .as_ref()
            .and_then(|stats| stats.counts())
            .ok_or(YouTubeError::MissingStatistics)?;
        let overview = ChannelOverview {
            counts,
            uploads_playlist: channel
                .content_details
                .and_then(|details| details.related_playlists.uploads),
            id: channel.id,
            title: channel.snippet.title,
        };

        debug!(channel_id = %overview.id, "fetched channel");
        Ok(overview)
    }

    async fn recent_upload_ids(
        &self,
        playlist_id: &str,
        max: u32,
    ) -> Result<Vec<String>, YouTubeError> {
        let max_results = max.to_string();
        let response: PlaylistItemListResponse = self
            .get(
                "playlistItems",
                &[
                    ("part", "contentDetails"),
                    ("playlistId", playlist_id),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let ids: Vec<String> = response
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect();
        debug!(playlist_id, returned_items = ids.len(), "fetched uploads");
        Ok(ids)
    }

    async fn video_stats(&self, ids: &[String]) -> Result<Vec<VideoStats>, YouTubeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let response: VideoListResponse = self
            .get("videos", &[("part", "snippet,statistics"), ("id", joined.as_str())])
            .await?;

        let videos: Vec<VideoStats> = response
            .items
            .into_iter()
            .map(|video| VideoStats {
                views: count(video.statistics.view_count.as_ref()),
                likes: count(video.statistics.like_count.as_ref()),
                comments: count(video.statistics.comment_count.as_ref()),
                id: video.id,
                title: video.snippet.title,
            })
            .collect();
        debug!(requested = ids.len(), returned_items = videos.len(), "fetched video statistics");
        Ok(videos)
    }

    async fn latest_videos(&self, max: u32) -> Result<Vec<LatestVideo>, YouTubeError> {
        let max_results = max.to_string();
        let response: SearchListResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("forMine", "true"),
                    ("type", "video"),
                    ("order", "date"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let videos: Vec<LatestVideo> = response
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| LatestVideo {
                position: index + 1,
                id: item.id.video_id.unwrap_or_default(),
                title: item.snippet.title,
                published_at: item.snippet.published_at,
            })
            .collect();
        debug!(returned_items = videos.len(), "fetched latest videos");
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ClientSecrets, OAuthManager};
    use crate::credentials::CredentialStore;
    use crate::dashboard::{DashboardSettings, build_dashboard};
    use crate::storage::HistoryLog;
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use oauth2::basic::{BasicTokenResponse, BasicTokenType};
    use oauth2::{AccessToken, EmptyExtraTokenFields, RefreshToken};
    use serde_json::json;
    use std::path::PathBuf;

    fn scratch_path(name: &str, ext: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "channel_dashboard_yt_{name}_{}_{nanos}.{ext}",
            std::process::id()
        ));
        path
    }

    /// A client whose saved credential refreshes to the bearer token `tok`
    /// against the same mock server.
    async fn signed_in_client(server: &MockServer, name: &str) -> (YouTubeClient, PathBuf) {
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).json_body(json!({
                    "access_token": "tok",
                    "token_type": "bearer",
                    "expires_in": 3600
                }));
            })
            .await;

        let token_path = scratch_path(name, "json");
        let mut saved = BasicTokenResponse::new(
            AccessToken::new("stale".to_string()),
            BasicTokenType::Bearer,
            EmptyExtraTokenFields {},
        );
        saved.set_refresh_token(Some(RefreshToken::new("r".to_string())));
        let store = CredentialStore::new(&token_path);
        store.save(&saved).await.unwrap();

        let secrets = ClientSecrets {
            client_id: "cid".to_string(),
            client_secret: "shh".to_string(),
            auth_uri: server.url("/auth"),
            token_uri: server.url("/token"),
        };
        let manager = OAuthManager::new(secrets, "http://localhost:8080/oauth/callback").unwrap();
        let session = Arc::new(Session::new(
            store,
            Some(manager),
            PathBuf::from("client_secret.json"),
        ));
        let client = YouTubeClient::new(session, reqwest::Client::new(), server.base_url());
        (client, token_path)
    }

    #[tokio::test]
    async fn my_channel_sends_bearer_and_expected_query() {
        let server = MockServer::start_async().await;
        let (client, token_path) = signed_in_client(&server, "channel").await;
        let channels = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/channels")
                    .query_param("part", "snippet,statistics,contentDetails")
                    .query_param("mine", "true")
                    .header("authorization", "Bearer tok");
                then.status(200).json_body(json!({
                    "items": [{
                        "id": "UC1",
                        "snippet": {"title": "Test Kitchen"},
                        "statistics": {"subscriberCount": "100", "viewCount": "5000", "videoCount": "10"},
                        "contentDetails": {"relatedPlaylists": {"uploads": "UU1"}}
                    }]
                }));
            })
            .await;

        let channel = client.my_channel().await.unwrap();
        channels.assert_async().await;
        assert_eq!(channel.title, "Test Kitchen");
        assert_eq!(channel.counts.views, 5000);
        assert_eq!(channel.uploads_playlist.as_deref(), Some("UU1"));
        let _ = std::fs::remove_file(&token_path);
    }

    #[tokio::test]
    async fn uploads_and_statistics_queries() {
        let server = MockServer::start_async().await;
        let (client, token_path) = signed_in_client(&server, "uploads").await;
        let playlist = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/playlistItems")
                    .query_param("part", "contentDetails")
                    .query_param("playlistId", "UU1")
                    .query_param("maxResults", "20");
                then.status(200).json_body(json!({
                    "items": [
                        {"contentDetails": {"videoId": "a"}},
                        {"contentDetails": {"videoId": "b"}}
                    ]
                }));
            })
            .await;
        let videos = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/videos")
                    .query_param("part", "snippet,statistics")
                    .query_param("id", "a,b");
                then.status(200).json_body(json!({
                    "items": [
                        {"id": "b", "snippet": {"title": "Second"}, "statistics": {"viewCount": "7"}},
                        {"id": "a", "snippet": {"title": "First"}, "statistics": {"viewCount": "3", "likeCount": "1", "commentCount": "2"}}
                    ]
                }));
            })
            .await;

        let ids = client.recent_upload_ids("UU1", 20).await.unwrap();
        assert_eq!(ids, ["a", "b"]);
        let stats = client.video_stats(&ids).await.unwrap();
        playlist.assert_async().await;
        videos.assert_async().await;

        let order: Vec<&str> = stats.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(order, ["b", "a"]);
        assert_eq!((stats[0].likes, stats[0].comments), (0, 0));
        assert_eq!((stats[1].likes, stats[1].comments), (1, 2));
        let _ = std::fs::remove_file(&token_path);
    }

    #[tokio::test]
    async fn no_ids_means_no_request() {
        let server = MockServer::start_async().await;
        let session = Arc::new(Session::new(
            CredentialStore::new(scratch_path("no_ids", "json")),
            None,
            PathBuf::from("client_secret.json"),
        ));
        let client = YouTubeClient::new(session, reqwest::Client::new(), server.base_url());

        // signed out, so any request would fail
        assert!(client.video_stats(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_videos_are_numbered_from_one() {
        let server = MockServer::start_async().await;
        let (client, token_path) = signed_in_client(&server, "latest").await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("forMine", "true")
                    .query_param("type", "video")
                    .query_param("order", "date")
                    .query_param("maxResults", "10");
                then.status(200).json_body(json!({
                    "items": [
                        {"id": {"videoId": "n1"}, "snippet": {"title": "Newest", "publishedAt": "2024-02-02T10:00:00Z"}},
                        {"id": {"videoId": "n2"}, "snippet": {"title": "Older", "publishedAt": "2024-02-01T10:00:00Z"}}
                    ]
                }));
            })
            .await;

        let latest = client.latest_videos(10).await.unwrap();
        let positions: Vec<usize> = latest.iter().map(|v| v.position).collect();
        assert_eq!(positions, [1, 2]);
        assert_eq!(latest[0].title, "Newest");
        let _ = std::fs::remove_file(&token_path);
    }

    #[tokio::test]
    async fn error_status_carries_the_body() {
        let server = MockServer::start_async().await;
        let (client, token_path) = signed_in_client(&server, "quota").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(403).body(r#"{"error":{"errors":[{"reason":"quotaExceeded"}]}}"#);
            })
            .await;

        match client.latest_videos(10).await {
            Err(YouTubeError::Status {
                endpoint,
                status,
                body,
            }) => {
                assert_eq!(endpoint, "search");
                assert_eq!(status, 403);
                assert!(body.contains("quotaExceeded"));
            }
            other => panic!("expected a status error, got {other:?}"),
        }
        let _ = std::fs::remove_file(&token_path);
    }

    #[tokio::test]
    async fn channel_without_statistics_records_nothing() {
        let server = MockServer::start_async().await;
        let (client, token_path) = signed_in_client(&server, "no_stats").await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/channels");
                then.status(200).json_body(json!({
                    "items": [{"id": "UC1", "snippet": {"title": "T"}}]
                }));
            })
            .await;

        assert!(matches!(
            client.my_channel().await,
            Err(YouTubeError::MissingStatistics)
        ));

        let history_path = scratch_path("no_stats_history", "csv");
        let log = HistoryLog::new(&history_path);
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = build_dashboard(&client, &log, day, DashboardSettings::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(!history_path.exists());
        let _ = std::fs::remove_file(&token_path);
    }
}
