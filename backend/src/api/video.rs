use crate::models::{
    AskQuestionRequest, DeleteVideosRequest, ErrorResponse, QaAnswer, UploadVideoRequest, Video,
};
use crate::api::json_body;
use crate::AppState;
use log::{error, info};
use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, State};
use url::Url;
use uuid::Uuid;

const UNTITLED_VIDEO: &str = "untitled";

#[get("/")]
pub async fn list_videos(state: &State<AppState>) -> Result<Json<Vec<Video>>, ErrorResponse> {
    match state.video_api.list_videos().await {
        Ok(videos) => {
            info!("Found {} registered videos.", videos.len());
            Ok(Json(videos))
        }
        Err(e) => {
            error!("Failed to list videos: {e:?}");
            Err(e.into())
        }
    }
}

#[post("/", data = "<upload>")]
pub async fn upload_video(
    upload: Result<Json<UploadVideoRequest>, json::Error<'_>>,
    state: &State<AppState>,
) -> Result<(Status, Json<Video>), ErrorResponse> {
    let upload = json_body(upload)?;
    let source = parse_source_url(&upload.video_url)?;
    let name = video_name(upload.video_name.as_deref(), &source);

    match state.video_api.upload_video(source.as_str(), &name).await {
        Ok(video) => Ok((Status::Created, Json(video))),
        Err(e) => {
            error!("Failed to upload video {}: {e:?}", upload.video_url);
            Err(e.into())
        }
    }
}

#[delete("/", data = "<request>")]
pub async fn delete_videos(
    request: Result<Json<DeleteVideosRequest>, json::Error<'_>>,
    state: &State<AppState>,
) -> Result<Status, ErrorResponse> {
    let request = json_body(request)?;
    if request.video_ids.is_empty() {
        return Err(ErrorResponse::bad_request("No video ids given"));
    }

    match state.video_api.delete_videos(&request.video_ids).await {
        Ok(()) => Ok(Status::NoContent),
        Err(e) => {
            error!("Failed to delete videos: {e:?}");
            Err(e.into())
        }
    }
}

#[post("/<video_id>/questions", data = "<ask>")]
pub async fn ask_question(
    video_id: &str,
    ask: Result<Json<AskQuestionRequest>, json::Error<'_>>,
    state: &State<AppState>,
) -> Result<Json<QaAnswer>, ErrorResponse> {
    let video_id = Uuid::parse_str(video_id)
        .map_err(|_| ErrorResponse::bad_request(format!("Invalid video id: {video_id}")))?;
    let ask = json_body(ask)?;
    let question = ask.question.trim();
    if question.is_empty() {
        return Err(ErrorResponse::bad_request("Question must not be empty"));
    }

    match state.video_api.ask_question(video_id, question).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e) => {
            error!("Failed to answer question about {video_id}: {e:?}");
            Err(e.into())
        }
    }
}

fn parse_source_url(raw: &str) -> Result<Url, ErrorResponse> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ErrorResponse::bad_request(format!("Invalid video URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ErrorResponse::bad_request(format!(
            "Unsupported video URL scheme: {scheme}"
        ))),
    }
}

/// Blank names fall back to the last path segment of the source URL.
fn video_name(requested: Option<&str>, source: &Url) -> String {
    if let Some(name) = requested.map(str::trim).filter(|name| !name.is_empty()) {
        return name.to_string();
    }

    source
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .unwrap_or_else(|| UNTITLED_VIDEO.to_string())
}
