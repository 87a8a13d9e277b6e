//! Read-only YouTube Data API v3 access for the signed-in channel.
//!
//! Every call is a single authenticated GET with no retry and no paging.
//! [`ChannelApi`] is the seam the dashboard talks to; [`YouTubeClient`] is
//! the HTTP implementation.

pub mod client;
pub mod types;

pub use client::YouTubeClient;

use crate::auth::AuthError;
use crate::models::{ChannelOverview, LatestVideo, VideoStats};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("no channel found for this account")]
    NoChannel,
    #[error("channel statistics are missing or unreadable")]
    MissingStatistics,
}

#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Title, counts and uploads playlist of the signed-in channel.
    async fn my_channel(&self) -> Result<ChannelOverview, YouTubeError>;

    /// Up to `max` video ids from a playlist, newest first.
    async fn recent_upload_ids(
        &self,
        playlist_id: &str,
        max: u32,
    ) -> Result<Vec<String>, YouTubeError>;

    /// Statistics for the given ids, in the order the API returns them.
    async fn video_stats(&self, ids: &[String]) -> Result<Vec<VideoStats>, YouTubeError>;

    /// The channel's `max` most recently published videos.
    async fn latest_videos(&self, max: u32) -> Result<Vec<LatestVideo>, YouTubeError>;
}
