use crate::models::{ChannelCounts, DailyStatsRecord};
use chrono::NaiveDate;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

pub const HISTORY_HEADER: [&str; 4] = ["date", "subscribers", "views", "videos"];

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history log i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history log is malformed: {0}")]
    Csv(#[from] csv::Error),
    #[error("history log has unexpected header `{0}`")]
    Header(String),
}

/// The on-disk daily stats log.
///
/// Appends are serialized through `guard`; nothing protects the file from
/// other processes.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    guard: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in file order. A missing file is an empty log.
    pub async fn load(&self) -> Result<Vec<DailyStatsRecord>, HistoryError> {
        match fs::read(&self.path).await {
            Ok(bytes) => parse_history(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// The log exactly as stored, for download.
    pub async fn raw_csv(&self) -> Result<Option<Vec<u8>>, HistoryError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Makes sure the log holds a row for `today`.
    ///
    /// Returns `true` when a row was appended. An existing row for the day is
    /// left as it is, whatever counts are passed in.
    pub async fn record(
        &self,
        today: NaiveDate,
        counts: ChannelCounts,
    ) -> Result<bool, HistoryError> {
        let _held = self.guard.lock().await;
        let date = date_key(today);

        let mut records = self.load().await?;
        if !append_if_absent(&mut records, &date, counts) {
            debug!(%date, "daily stats already recorded");
            return Ok(false);
        }

        let payload = encode_history(&records)?;
        write_atomic(&self.path, &payload).await?;
        info!(
            %date,
            subscribers = counts.subscribers,
            views = counts.views,
            videos = counts.videos,
            "recorded daily stats"
        );
        Ok(true)
    }
}

/// Pushes a record for `date` unless one is already present.
pub fn append_if_absent(
    records: &mut Vec<DailyStatsRecord>,
    date: &str,
    counts: ChannelCounts,
) -> bool {
    if records.iter().any(|record| record.date == date) {
        return false;
    }

    records.push(DailyStatsRecord {
        date: date.to_string(),
        subscribers: counts.subscribers,
        views: counts.views,
        videos: counts.videos,
    });
    true
}

pub fn parse_history(bytes: &[u8]) -> Result<Vec<DailyStatsRecord>, HistoryError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();
    if headers.iter().ne(HISTORY_HEADER) {
        return Err(HistoryError::Header(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    reader
        .deserialize()
        .map(|row| row.map_err(HistoryError::from))
        .collect()
}

pub fn encode_history(records: &[DailyStatsRecord]) -> Result<Vec<u8>, HistoryError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HISTORY_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|err| HistoryError::Io(err.into_error()))
}

/// Writes `payload` next to `path` and renames it into place.
pub async fn write_atomic(path: &Path, payload: &[u8]) -> Result<(), std::io::Error> {
    let mut staging = OsString::from(path.as_os_str());
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "channel_dashboard_{name}_{}_{nanos}.csv",
            std::process::id()
        ));
        path
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn counts(subscribers: u64, views: u64, videos: u64) -> ChannelCounts {
        ChannelCounts {
            subscribers,
            views,
            videos,
        }
    }

    #[tokio::test]
    async fn first_record_writes_header_and_row() {
        let path = scratch_path("first");
        let log = HistoryLog::new(&path);

        let appended = log.record(day(2024, 1, 1), counts(100, 5000, 10)).await.unwrap();
        assert!(appended);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "date,subscribers,views,videos\n2024-01-01,100,5000,10\n");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn same_day_calls_keep_original_row() {
        let path = scratch_path("same_day");
        let log = HistoryLog::new(&path);
        let today = day(2024, 1, 1);

        assert!(log.record(today, counts(100, 5000, 10)).await.unwrap());
        assert!(!log.record(today, counts(101, 5100, 11)).await.unwrap());
        assert!(!log.record(today, counts(100, 5000, 10)).await.unwrap());

        let records = log.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subscribers, 100);
        assert_eq!(records[0].views, 5000);
        assert_eq!(records[0].videos, 10);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn each_new_day_adds_one_row() {
        let path = scratch_path("two_days");
        let log = HistoryLog::new(&path);

        log.record(day(2024, 1, 1), counts(100, 5000, 10)).await.unwrap();
        let before = log.load().await.unwrap();
        log.record(day(2024, 1, 2), counts(120, 5600, 11)).await.unwrap();
        log.record(day(2024, 1, 2), counts(999, 9999, 99)).await.unwrap();

        let after = log.load().await.unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1].date, "2024-01-02");
        assert_eq!(after[1].subscribers, 120);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_log_is_an_error_and_left_alone() {
        let path = scratch_path("malformed");
        let original = "date,subscribers,views,videos\n2024-01-01,lots,5000,10\n";
        std::fs::write(&path, original).unwrap();
        let log = HistoryLog::new(&path);

        let result = log.record(day(2024, 1, 2), counts(1, 2, 3)).await;
        assert!(matches!(result, Err(HistoryError::Csv(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unexpected_header_is_rejected() {
        let err = parse_history(b"day,subs\n2024-01-01,1\n").unwrap_err();
        assert!(matches!(err, HistoryError::Header(ref h) if h == "day,subs"));
    }

    #[tokio::test]
    async fn missing_log_loads_empty_and_has_no_download() {
        let log = HistoryLog::new(scratch_path("missing"));
        assert!(log.load().await.unwrap().is_empty());
        assert!(log.raw_csv().await.unwrap().is_none());
    }

    #[test]
    fn append_if_absent_matches_on_date_only() {
        let mut records = Vec::new();
        assert!(append_if_absent(&mut records, "2024-01-01", counts(1, 1, 1)));
        assert!(!append_if_absent(&mut records, "2024-01-01", counts(2, 2, 2)));
        assert!(append_if_absent(&mut records, "2024-01-02", counts(2, 2, 2)));
        assert_eq!(records.len(), 2);
    }
}
