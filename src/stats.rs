use crate::models::{DailyStatsRecord, TrendPoint, TrendResponse, VideoStats};

pub const TOP_VIDEO_COUNT: usize = 10;

/// Orders the history by date and attaches day-over-day changes.
pub fn build_trend(records: &[DailyStatsRecord]) -> TrendResponse {
    let mut ordered: Vec<&DailyStatsRecord> = records.iter().collect();
    // YYYY-MM-DD sorts chronologically as text.
    ordered.sort_by(|a, b| a.date.cmp(&b.date));

    let mut points = Vec::with_capacity(ordered.len());
    let mut previous: Option<&DailyStatsRecord> = None;
    for record in ordered {
        points.push(TrendPoint {
            date: record.date.clone(),
            subscribers: record.subscribers,
            views: record.views,
            videos: record.videos,
            subscriber_change: previous.map(|p| change(p.subscribers, record.subscribers)),
            view_change: previous.map(|p| change(p.views, record.views)),
            video_change: previous.map(|p| change(p.videos, record.videos)),
        });
        previous = Some(record);
    }

    TrendResponse {
        latest: points.last().cloned(),
        points,
    }
}

/// The `count` most viewed videos, highest first. Equal view counts keep
/// their input order.
pub fn top_by_views(videos: &[VideoStats], count: usize) -> Vec<VideoStats> {
    let mut ranked = videos.to_vec();
    ranked.sort_by(|a, b| b.views.cmp(&a.views));
    ranked.truncate(count);
    ranked
}

/// Signed difference, clamped to the `i64` range.
fn change(before: u64, after: u64) -> i64 {
    let diff = i128::from(after) - i128::from(before);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}
