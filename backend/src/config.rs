use crate::error::VideoApiError;
use crate::services::video_service::VideoApiClient;
use crate::AppState;
use anyhow::Result;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use rocket::figment::Figment;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;

/// Environment variable holding the video API key.
pub const API_KEY_ENV: &str = "VIDEO_API_KEY";
/// Rocket configuration key consulted when [`API_KEY_ENV`] is unset.
pub const API_KEY_CONFIG_KEY: &str = "video_api_key";

lazy_static! {
    pub static ref VIDEO_API_URL: String =
        env::var("VIDEO_API_URL").unwrap_or_else(|_| "http://localhost:9000".to_string());
    pub static ref FRONTEND_ORIGIN: String =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting Rocket backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Picks the API key from the environment first, then from Rocket's
/// configuration. Blank values count as missing.
pub fn resolve_api_key(
    env_value: Option<String>,
    figment: &Figment,
) -> Result<String, VideoApiError> {
    env_value
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            figment
                .extract_inner::<String>(API_KEY_CONFIG_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty())
        })
        .ok_or_else(|| {
            VideoApiError::Configuration(format!(
                "missing video API key: set {API_KEY_ENV} or `{API_KEY_CONFIG_KEY}` in Rocket.toml"
            ))
        })
}

pub fn create_video_api_client(figment: &Figment) -> Result<VideoApiClient, VideoApiError> {
    let api_key = resolve_api_key(env::var(API_KEY_ENV).ok(), figment)?;
    let video_api_url = &*VIDEO_API_URL;
    info!("Using video API at: {video_api_url}");

    VideoApiClient::new(video_api_url, api_key)
}

pub fn create_app_state(figment: &Figment) -> Result<AppState> {
    let video_api = create_video_api_client(figment)?;
    Ok(AppState { video_api })
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[FRONTEND_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Delete, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(true)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
