use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use serde_json::{Map, Value};
use std::io::Cursor;
use uuid::Uuid;

use crate::error::VideoApiError;

/// Confidence reported with every answer; the video API does not score answers.
pub const ANSWER_CONFIDENCE_PLACEHOLDER: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    Indexing,
    Indexed,
    Failed,
}

impl VideoStatus {
    /// Maps the video API's status vocabulary onto [`VideoStatus`].
    /// Unknown or missing values are treated as pending.
    pub fn from_vendor(status: Option<&str>) -> Self {
        let status = status.unwrap_or_default().trim().to_ascii_lowercase();
        match status.as_str() {
            "pending" | "download_initiated" => VideoStatus::Pending,
            "processing" | "indexing" => VideoStatus::Indexing,
            "completed" | "indexed" => VideoStatus::Indexed,
            "failed" => VideoStatus::Failed,
            _ => VideoStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub source_url: String,
    pub status: VideoStatus,
    pub metadata: Option<Map<String, Value>>,
    pub indexing_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: Uuid,
    pub video_id: Uuid,
    pub score: f64,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    pub presigned_url: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaAnswer {
    pub answer: String,
    pub confidence: f64,
    pub video_id: Uuid,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadVideoRequest {
    pub video_url: String,
    pub video_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteVideosRequest {
    pub video_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: Status,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse {
            status: Status::BadRequest,
            error: "invalid_request".to_string(),
            message: message.into(),
        }
    }
}

impl From<VideoApiError> for ErrorResponse {
    fn from(err: VideoApiError) -> Self {
        let status = match err {
            VideoApiError::Configuration(_) => Status::InternalServerError,
            _ => Status::BadGateway,
        };
        ErrorResponse {
            status,
            error: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;

    #[test]
    fn test_status_normalization() {
        let cases = [
            ("pending", VideoStatus::Pending),
            ("download_initiated", VideoStatus::Pending),
            ("processing", VideoStatus::Indexing),
            ("indexing", VideoStatus::Indexing),
            ("completed", VideoStatus::Indexed),
            ("indexed", VideoStatus::Indexed),
            ("failed", VideoStatus::Failed),
        ];
        for (raw, expected) in cases {
            assert_eq!(VideoStatus::from_vendor(Some(raw)), expected, "{raw}");
        }
    }

    #[test]
    fn test_status_normalization_ignores_case() {
        assert_eq!(
            VideoStatus::from_vendor(Some("COMPLETED")),
            VideoStatus::Indexed
        );
        assert_eq!(
            VideoStatus::from_vendor(Some("Download_Initiated")),
            VideoStatus::Pending
        );
        assert_eq!(
            VideoStatus::from_vendor(Some(" Failed ")),
            VideoStatus::Failed
        );
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(VideoStatus::from_vendor(None), VideoStatus::Pending);
        assert_eq!(VideoStatus::from_vendor(Some("")), VideoStatus::Pending);
        assert_eq!(
            VideoStatus::from_vendor(Some("archived")),
            VideoStatus::Pending
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&VideoStatus::Indexing).unwrap();
        assert_eq!(json, "\"indexing\"");
    }

    #[test]
    fn test_error_response_status_mapping() {
        let config = ErrorResponse::from(VideoApiError::Configuration("no key".into()));
        assert_eq!(config.status, Status::InternalServerError);

        let vendor = ErrorResponse::from(VideoApiError::Vendor {
            operation: Operation::AskQuestion,
            message: "quota exceeded".into(),
        });
        assert_eq!(vendor.status, Status::BadGateway);
        assert_eq!(vendor.error, "vendor_error");
        assert!(vendor.message.contains("quota exceeded"));
    }
}
