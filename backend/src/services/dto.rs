//! Wire types of the video API and their conversion into domain models.
//!
//! Response DTOs keep every field optional; the conversion functions decide
//! what a malformed payload means.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{SearchResult, Video, VideoStatus};

#[derive(Debug, Serialize)]
pub struct DeleteVideosBody {
    pub video_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchBody<'a> {
    pub query: &'a str,
    pub max_results: u32,
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub video_id: String,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoDto {
    #[serde(default)]
    pub video_id: Option<Value>,
    #[serde(default)]
    pub video_url: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub indexing_type: Option<Value>,
}

impl From<VideoDto> for Video {
    fn from(dto: VideoDto) -> Self {
        let id = dto.video_id.as_ref().and_then(parse_id).unwrap_or_else(|| {
            let minted = Uuid::new_v4();
            warn!(
                "Video entry has no usable video_id ({:?}), using {minted}",
                dto.video_id
            );
            minted
        });

        Video {
            id,
            source_url: text_of(dto.video_url.as_ref()).unwrap_or_default().to_string(),
            status: VideoStatus::from_vendor(text_of(dto.status.as_ref())),
            metadata: match dto.metadata {
                Some(Value::Object(map)) => Some(map),
                _ => None,
            },
            indexing_type: text_of(dto.indexing_type.as_ref()).map(str::to_string),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadResponseDto {
    #[serde(default)]
    pub video_id: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

impl UploadResponseDto {
    /// Builds the uploaded [`Video`]; the response does not echo the source
    /// URL, so the one that was submitted is used.
    pub fn into_video(self, source_url: &str) -> Result<Video, String> {
        let id = match self.video_id.as_ref() {
            None | Some(Value::Null) => return Err("response has no video_id".to_string()),
            Some(raw) => parse_id(raw).ok_or_else(|| format!("unparsable video_id {raw}"))?,
        };

        Ok(Video {
            id,
            source_url: source_url.to_string(),
            status: VideoStatus::from_vendor(text_of(self.status.as_ref())),
            metadata: None,
            indexing_type: None,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResultDto {
    #[serde(default)]
    pub video_chunk_id: Option<Value>,
    #[serde(default)]
    pub video_id: Option<Value>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
    #[serde(default)]
    pub presigned_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl TryFrom<SearchResultDto> for SearchResult {
    type Error = String;

    fn try_from(dto: SearchResultDto) -> Result<Self, Self::Error> {
        let chunk_id = require_id(dto.video_chunk_id.as_ref(), "video_chunk_id")?;
        let video_id = require_id(dto.video_id.as_ref(), "video_id")?;

        let start_time = dto.start_time.unwrap_or_default();
        let end_time = dto.end_time.unwrap_or(start_time);
        if start_time > end_time {
            return Err(format!(
                "chunk {chunk_id} starts at {start_time} after it ends at {end_time}"
            ));
        }

        Ok(SearchResult {
            chunk_id,
            video_id,
            score: dto.score.unwrap_or_default(),
            start_time,
            end_time,
            presigned_url: dto.presigned_url.unwrap_or_default(),
            caption: dto.caption.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponseDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub chat_response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatResponseDto {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Maps a `/videos/get` body to videos. Anything but an object carrying a
/// `results` array yields no videos; entries of the wrong shape are skipped.
pub fn videos_from_listing(body: Value) -> Vec<Video> {
    let Value::Object(mut body) = body else {
        warn!("Video listing is not a JSON object, treating as empty");
        return Vec::new();
    };
    let Some(Value::Array(results)) = body.remove("results") else {
        return Vec::new();
    };

    results
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<VideoDto>(entry) {
            Ok(dto) => Some(Video::from(dto)),
            Err(e) => {
                warn!("Skipping malformed video entry: {e}");
                None
            }
        })
        .collect()
}

/// Maps a `/search/hybrid` body to results. A non-array body yields no
/// results; any malformed element fails the whole batch.
pub fn search_results_from(body: Value) -> Result<Vec<SearchResult>, String> {
    let Value::Array(items) = body else {
        warn!("Search response is not a JSON array, treating as empty");
        return Ok(Vec::new());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let dto: SearchResultDto = serde_json::from_value(item)
                .map_err(|e| format!("search result {index}: {e}"))?;
            SearchResult::try_from(dto).map_err(|e| format!("search result {index}: {e}"))
        })
        .collect()
}

/// Non-string values read as absent.
fn text_of(raw: Option<&Value>) -> Option<&str> {
    raw.and_then(Value::as_str)
}

fn parse_id(raw: &Value) -> Option<Uuid> {
    raw.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok())
}

fn require_id(raw: Option<&Value>, field: &str) -> Result<Uuid, String> {
    match raw {
        None | Some(Value::Null) => Err(format!("missing {field}")),
        Some(raw) => parse_id(raw).ok_or_else(|| format!("unparsable {field} {raw}")),
    }
}
