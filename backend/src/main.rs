#[macro_use]
extern crate rocket;

mod api;
mod config;
mod error;
mod models;
mod services;

use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_cors::Cors;
use services::video_service::VideoApiClient;

pub struct AppState {
    pub video_api: VideoApiClient,
}

#[get("/health")]
fn health() -> &'static str {
    "OK"
}

pub fn build_rocket(figment: Figment, state: AppState, cors: Cors) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .attach(cors)
        .mount("/", routes![health])
        .mount(
            "/api/videos",
            routes![
                api::list_videos,
                api::upload_video,
                api::delete_videos,
                api::ask_question
            ],
        )
        .mount("/api/search", routes![api::search_videos])
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    config::load_environment();
    config::init_logger();

    let figment = rocket::Config::figment();
    let state = config::create_app_state(&figment)?;
    let cors = config::create_cors()?;

    build_rocket(figment, state, cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod test_support {
    use super::*;
    use mockito::ServerGuard;
    use rocket::local::asynchronous::Client;

    pub const API_KEY: &str = "test-key";
    pub const VIDEO_ID: &str = "6f1c2a8e-4b7d-4f39-9a51-0c2e8d7b3a10";

    /// Rocket client whose video API points at the given mock server.
    pub async fn local_client(server: &ServerGuard) -> Client {
        let video_api = VideoApiClient::new(&server.url(), API_KEY).unwrap();
        let rocket = build_rocket(
            rocket::Config::figment(),
            AppState { video_api },
            config::create_cors().unwrap(),
        );
        Client::tracked(rocket).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::local_client;
    use mockito::Server;
    use rocket::http::Status;

    #[rocket::async_test]
    async fn test_health() {
        let server = Server::new_async().await;
        let client = local_client(&server).await;

        let response = client.get("/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.as_deref(), Some("OK"));
    }
}
