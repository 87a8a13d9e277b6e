use crate::errors::AppError;
use crate::insights::{InsightGenerator, build_prompt};
use crate::models::{ChannelSummary, DashboardResponse, InsightsResponse, VideoStats};
use crate::stats::{TOP_VIDEO_COUNT, build_trend, top_by_views};
use crate::storage::{HistoryLog, date_key};
use crate::youtube::{ChannelApi, YouTubeError};
use chrono::NaiveDate;
use tracing::info;

pub const LATEST_VIDEO_COUNT: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    /// How many recent uploads the top-by-views ranking looks at.
    pub top_pool_size: u32,
    pub top_count: usize,
    pub latest_count: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_pool_size: 20,
            top_count: TOP_VIDEO_COUNT,
            latest_count: LATEST_VIDEO_COUNT,
        }
    }
}

/// Fetches the channel, records today's counts and assembles the page data.
///
/// Any API failure aborts the whole build; nothing is returned half-filled.
pub async fn build_dashboard(
    api: &dyn ChannelApi,
    history: &HistoryLog,
    today: NaiveDate,
    settings: DashboardSettings,
) -> Result<DashboardResponse, AppError> {
    let channel = api.my_channel().await?;
    let recorded_today = history.record(today, channel.counts).await?;
    let trend = build_trend(&history.load().await?);

    let pool = recent_video_stats(api, channel.uploads_playlist.as_deref(), settings).await?;
    let top_videos = top_by_views(&pool, settings.top_count);
    let latest_videos = api.latest_videos(settings.latest_count).await?;

    info!(
        channel = %channel.title,
        recorded_today,
        history_days = trend.points.len(),
        "dashboard built"
    );

    Ok(DashboardResponse {
        date: date_key(today),
        recorded_today,
        channel: ChannelSummary {
            title: channel.title,
            subscribers: channel.counts.subscribers,
            views: channel.counts.views,
            videos: channel.counts.videos,
        },
        trend,
        top_pool_size: settings.top_pool_size,
        top_videos,
        latest_videos,
    })
}

/// Asks the language model about the same videos the top ranking draws from.
pub async fn generate_insights(
    api: &dyn ChannelApi,
    generator: &dyn InsightGenerator,
    settings: DashboardSettings,
) -> Result<InsightsResponse, AppError> {
    let channel = api.my_channel().await?;
    let videos = recent_video_stats(api, channel.uploads_playlist.as_deref(), settings).await?;
    let insights = generator.generate(&build_prompt(&videos)).await?;
    info!(video_count = videos.len(), "insights generated");
    Ok(InsightsResponse {
        insights,
        video_count: videos.len(),
    })
}

async fn recent_video_stats(
    api: &dyn ChannelApi,
    uploads_playlist: Option<&str>,
    settings: DashboardSettings,
) -> Result<Vec<VideoStats>, YouTubeError> {
    let Some(playlist) = uploads_playlist else {
        return Ok(Vec::new());
    };
    let ids = api.recent_upload_ids(playlist, settings.top_pool_size).await?;
    api.video_stats(&ids).await
}
