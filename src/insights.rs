use crate::models::VideoStats;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("language model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("language model returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("language model returned no text ({0})")]
    Empty(String),
}

#[async_trait]
pub trait InsightGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, InsightError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = self
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(InsightError::Empty(reason));
        }
        Ok(text)
    }
}

#[async_trait]
impl InsightGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.json::<GenerateResponse>().await?.into_text()?;
        debug!(response_len = text.len(), "generated insights");
        Ok(text)
    }
}

const PROMPT_INSTRUCTIONS: &str = "\
Analyze the following YouTube video performance data and provide:
1. Key insights about which content works best.
2. Suggested improvements for titles/thumbnails/engagement.
3. A future content strategy for growth.";

pub fn build_prompt(videos: &[VideoStats]) -> String {
    format!("{PROMPT_INSTRUCTIONS}\n\nData:\n{}", format_table(videos))
}

/// Renders the videos as space-aligned columns: text left, numbers right.
pub fn format_table(videos: &[VideoStats]) -> String {
    let rows: Vec<[String; 4]> = videos
        .iter()
        .map(|video| {
            [
                video.title.clone(),
                video.views.to_string(),
                video.likes.to_string(),
                video.comments.to_string(),
            ]
        })
        .collect();
    let header = ["title", "views", "likes", "comments"];

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 4]| {
        let mut line = format!("{:<w$}", cells[0], w = widths[0]);
        for (cell, width) in cells[1..].iter().zip(widths[1..].iter().copied()) {
            line.push_str(&format!(" {cell:>width$}"));
        }
        line.trim_end().to_string()
    };

    let mut lines = vec![render(header)];
    for row in &rows {
        lines.push(render([&row[0], &row[1], &row[2], &row[3]]));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn video(title: &str, views: u64, likes: u64, comments: u64) -> VideoStats {
        VideoStats {
            id: title.to_lowercase(),
            title: title.to_string(),
            views,
            likes,
            comments,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let table = format_table(&[video("Pasta", 1200, 30, 4), video("Ramen night", 15, 2, 0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "title       views likes comments");
        assert_eq!(lines[1], "Pasta        1200    30        4");
        assert_eq!(lines[2], "Ramen night    15     2        0");
    }

    #[test]
    fn prompt_has_instructions_and_every_title() {
        let prompt = build_prompt(&[video("Pasta", 1, 1, 1), video("Tacos", 2, 2, 2)]);
        assert!(prompt.starts_with("Analyze the following YouTube video performance data"));
        assert!(prompt.contains("3. A future content strategy for growth."));
        assert!(prompt.contains("Data:\ntitle"));
        assert!(prompt.contains("Pasta"));
        assert!(prompt.contains("Tacos"));
    }

    #[test]
    fn response_text_parts_are_joined() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Shorts do well. "},{"text":"Post weekly."}],"role":"model"}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "Shorts do well. Post weekly.");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        let err = response.into_text().unwrap_err();
        assert_eq!(err.to_string(), "language model returned no text (SAFETY)");
    }

    #[test]
    fn request_body_matches_api_shape() {
        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[tokio::test]
    async fn gemini_is_called_with_model_path_and_key() {
        let server = MockServer::start_async().await;
        let generate = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-test:generateContent")
                    .header("x-goog-api-key", "secret");
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "Film more recipes."}]}}]
                }));
            })
            .await;

        let client = GeminiClient::new(
            reqwest::Client::new(),
            format!("{}/", server.base_url()),
            "gemini-test",
            "secret",
        );
        let text = client.generate("prompt").await.unwrap();
        generate.assert_async().await;
        assert_eq!(text, "Film more recipes.");
    }

    #[tokio::test]
    async fn gemini_error_status_carries_the_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-test:generateContent");
                then.status(429).body("RESOURCE_EXHAUSTED");
            })
            .await;

        let client = GeminiClient::new(
            reqwest::Client::new(),
            server.base_url(),
            "gemini-test",
            "secret",
        );
        match client.generate("prompt").await {
            Err(InsightError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "RESOURCE_EXHAUSTED");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }
}
