//! Wire types for the parts of the YouTube Data API v3 the dashboard reads.
//!
//! Counts arrive as decimal strings. Video likes and comments may be absent
//! and [`count`] treats that as zero; channel totals must be present, see
//! [`ChannelStatistics::counts`].

use crate::models::ChannelCounts;
use serde::Deserialize;

/// Response of `channels.list`.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    pub id: String,
    pub snippet: ChannelSnippet,
    pub statistics: Option<ChannelStatistics>,
    #[serde(rename = "contentDetails")]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "subscriberCount")]
    pub subscriber_count: Option<String>,
    #[serde(rename = "hiddenSubscriberCount", default)]
    pub hidden_subscriber_count: bool,
    #[serde(rename = "videoCount")]
    pub video_count: Option<String>,
}

impl ChannelStatistics {
    /// The channel totals, or `None` if any of them is missing or not a
    /// whole number. A hidden subscriber count reads as zero.
    pub fn counts(&self) -> Option<ChannelCounts> {
        let subscribers = match (&self.subscriber_count, self.hidden_subscriber_count) {
            (Some(value), _) => exact(value)?,
            (None, true) => 0,
            (None, false) => return None,
        };
        Some(ChannelCounts {
            subscribers,
            views: exact(self.view_count.as_deref()?)?,
            videos: exact(self.video_count.as_deref()?)?,
        })
    }
}

fn exact(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}

#[derive(Debug, Deserialize)]
pub struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

/// Response of `playlistItems.list`.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
#[derive(Debug, Deserialize)]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    #[serde(rename = "contentDetails")]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

/// Response of `videos.list`.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub struct Video {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

/// Response of `search.list`.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: SearchResultSnippet,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultSnippet {
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

pub fn count(value: Option<&String>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}
