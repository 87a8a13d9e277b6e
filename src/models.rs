use serde::{Deserialize, Serialize};

/// One row of the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatsRecord {
    pub date: String,
    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelCounts {
    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOverview {
    pub id: String,
    pub title: String,
    pub counts: ChannelCounts,
    pub uploads_playlist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStats {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestVideo {
    pub position: usize,
    pub id: String,
    pub title: String,
    pub published_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub title: String,
    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,
    pub subscriber_change: Option<i64>,
    pub view_change: Option<i64>,
    pub video_change: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendResponse {
    pub points: Vec<TrendPoint>,
    pub latest: Option<TrendPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub recorded_today: bool,
    pub channel: ChannelSummary,
    pub trend: TrendResponse,
    pub top_pool_size: u32,
    pub top_videos: Vec<VideoStats>,
    pub latest_videos: Vec<LatestVideo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: String,
    pub video_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
