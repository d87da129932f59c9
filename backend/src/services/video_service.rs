//! Client for the external video-intelligence API.
//!
//! Every call is a single authenticated request; nothing is retried or cached.

use std::fmt;

use chrono::Utc;
use log::{debug, info, warn};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use crate::error::{Operation, VideoApiError};
use crate::models::{QaAnswer, SearchResult, Video, ANSWER_CONFIDENCE_PLACEHOLDER};
use crate::services::dto::{
    self, ChatBody, ChatMessage, ChatResponseDto, DeleteVideosBody, SearchBody, UploadResponseDto,
};

pub const API_KEY_HEADER: &str = "X-Api-Key";

const LIST_VIDEOS_PATH: &str = "videos/get";
const UPLOAD_VIDEO_PATH: &str = "videos/upload";
const DELETE_VIDEOS_PATH: &str = "videos/delete";
const SEARCH_PATH: &str = "search/hybrid";
const CHAT_PATH: &str = "qa/chat";

const SEARCH_MAX_RESULTS: u32 = 3;
const SEARCH_THRESHOLD: f64 = 0.5;

const UNKNOWN_VENDOR_ERROR: &str = "Unknown error";

#[derive(Clone)]
pub struct VideoApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for VideoApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl VideoApiClient {
    /// Fails when the key is blank or `base_url` is not an absolute URL.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, VideoApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VideoApiError::Configuration(
                "video API key is empty".to_string(),
            ));
        }

        let mut base_url = Url::parse(base_url).map_err(|e| {
            VideoApiError::Configuration(format!("invalid video API URL {base_url:?}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(VideoApiError::Configuration(format!(
                "video API URL {base_url} cannot carry paths"
            )));
        }
        // Relative joins would otherwise replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().build().map_err(|e| {
            VideoApiError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>, VideoApiError> {
        let operation = Operation::ListVideos;
        let request = self
            .client
            .post(self.endpoint(LIST_VIDEOS_PATH)?)
            .json(&json!({}));

        let body = self.send_for_json(operation, request).await?;
        let videos = dto::videos_from_listing(body);
        debug!("Video API listed {} videos", videos.len());
        Ok(videos)
    }

    pub async fn upload_video(
        &self,
        video_url: &str,
        video_name: &str,
    ) -> Result<Video, VideoApiError> {
        let operation = Operation::UploadVideo;
        let form = Form::new()
            .text("video_url", video_url.to_string())
            .text("video_name", video_name.to_string())
            .text("index", "true");
        let request = self
            .client
            .post(self.endpoint(UPLOAD_VIDEO_PATH)?)
            .multipart(form);

        let body = self.send_for_json(operation, request).await?;
        let response: UploadResponseDto =
            serde_json::from_value(body).map_err(|e| VideoApiError::parse(operation, e))?;
        let video = response
            .into_video(video_url)
            .map_err(|reason| VideoApiError::parse(operation, reason))?;

        info!(
            "Uploaded video '{video_name}' as {} ({:?})",
            video.id, video.status
        );
        Ok(video)
    }

    /// Success is decided by the HTTP status alone.
    pub async fn delete_videos(&self, video_ids: &[Uuid]) -> Result<(), VideoApiError> {
        let operation = Operation::DeleteVideos;
        let body = DeleteVideosBody {
            video_ids: video_ids.iter().map(Uuid::to_string).collect(),
        };
        let request = self
            .client
            .delete(self.endpoint(DELETE_VIDEOS_PATH)?)
            .json(&body);

        self.send(operation, request).await?;
        info!("Deleted {} videos", video_ids.len());
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, VideoApiError> {
        let operation = Operation::Search;
        let body = SearchBody {
            query,
            max_results: SEARCH_MAX_RESULTS,
            threshold: SEARCH_THRESHOLD,
        };
        let request = self.client.post(self.endpoint(SEARCH_PATH)?).json(&body);

        let body = self.send_for_json(operation, request).await?;
        let results = dto::search_results_from(body)
            .map_err(|reason| VideoApiError::parse(operation, reason))?;
        debug!("Search for {query:?} matched {} chunks", results.len());
        Ok(results)
    }

    pub async fn ask_question(
        &self,
        video_id: Uuid,
        question: &str,
    ) -> Result<QaAnswer, VideoApiError> {
        let operation = Operation::AskQuestion;
        let body = ChatBody {
            video_id: video_id.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: question,
            }],
        };
        let request = self.client.post(self.endpoint(CHAT_PATH)?).json(&body);

        let body = self.send_for_json(operation, request).await?;
        let response: ChatResponseDto =
            serde_json::from_value(body).map_err(|e| VideoApiError::parse(operation, e))?;

        if !response.is_success() {
            let message = response
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_VENDOR_ERROR.to_string());
            warn!("Video API refused question about {video_id}: {message}");
            return Err(VideoApiError::Vendor { operation, message });
        }

        let answer = response
            .chat_response
            .ok_or_else(|| VideoApiError::parse(operation, "missing chat_response"))?;

        Ok(QaAnswer {
            answer,
            confidence: ANSWER_CONFIDENCE_PLACEHOLDER,
            video_id,
            question: question.to_string(),
            created_at: Utc::now(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, VideoApiError> {
        self.base_url.join(path).map_err(|e| {
            VideoApiError::Configuration(format!("invalid video API endpoint {path}: {e}"))
        })
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, VideoApiError> {
        debug!("Calling video API to {operation}");
        let response = request
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|source| VideoApiError::Http { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Could not read video API error body for {operation}: {e}");
                String::new()
            });
            warn!("Video API failed to {operation} with status {status}: {body}");
            return Err(VideoApiError::UnexpectedStatus {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_for_json(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Value, VideoApiError> {
        let response = self.send(operation, request).await?;
        let text = response
            .text()
            .await
            .map_err(|source| VideoApiError::Http { operation, source })?;

        serde_json::from_str(&text).map_err(|e| VideoApiError::parse(operation, e))
    }
}
