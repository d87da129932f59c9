pub mod search;
pub mod video;

pub use search::*;
pub use video::*;

use crate::models::ErrorResponse;
use log::debug;
use rocket::serde::json::{self, Json};

/// Unwraps a JSON request body, turning malformed input into a 400.
pub(crate) fn json_body<T>(body: Result<Json<T>, json::Error<'_>>) -> Result<T, ErrorResponse> {
    body.map(Json::into_inner).map_err(|e| {
        debug!("Rejected request body: {e}");
        ErrorResponse::bad_request(format!("Malformed request body: {e}"))
    })
}
