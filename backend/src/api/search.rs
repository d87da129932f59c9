use crate::models::{ErrorResponse, SearchResult};
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/?<query>")]
pub async fn search_videos(
    query: Option<String>,
    state: &State<AppState>,
) -> Result<Json<Vec<SearchResult>>, ErrorResponse> {
    let query = query.as_deref().unwrap_or_default().trim();
    if query.is_empty() {
        return Err(ErrorResponse::bad_request("Search query must not be empty"));
    }

    match state.video_api.search(query).await {
        Ok(results) => {
            info!("Search for {query:?} returned {} results.", results.len());
            Ok(Json(results))
        }
        Err(e) => {
            error!("Search failed: {e:?}");
            Err(e.into())
        }
    }
}
