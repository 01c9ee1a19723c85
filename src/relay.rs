//! Local input relay
//!
//! A single `POST /save-input` route that lets a browser front-end drop a
//! string (typically the traveler's budget line) into the hand-off file.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::PlannerError;

pub const SAVED_MESSAGE: &str = "Data saved successfully!";

#[derive(Debug, Deserialize)]
pub struct SaveInputRequest {
    #[serde(default)]
    pub data: String,
}

/// Create the relay router writing to `target`
pub fn create_router(target: PathBuf) -> Router {
    Router::new()
        .route("/save-input", post(save_input))
        .with_state(Arc::new(target))
        // Front-end is served from another origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// POST /save-input - overwrite the hand-off file with `data`
async fn save_input(
    State(target): State<Arc<PathBuf>>,
    Json(request): Json<SaveInputRequest>,
) -> impl IntoResponse {
    match tokio::fs::write(target.as_path(), request.data.as_bytes()).await {
        Ok(()) => {
            info!(path = %target.display(), bytes = request.data.len(), "Saved relay input");
            (StatusCode::OK, SAVED_MESSAGE.to_string())
        }
        Err(e) => {
            error!(path = %target.display(), error = %e, "Failed to save relay input");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to save data: {}", e))
        }
    }
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, target: PathBuf) -> Result<(), PlannerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, path = %target.display(), "Input relay listening");
    axum::serve(listener, create_router(target)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vacation-planner-relay-{}-{}", std::process::id(), name))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/save-input")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_input_overwrites_file() {
        let path = temp_path("input.txt");
        std::fs::write(&path, "Budget: $99999 from a much longer previous submission").unwrap();

        let response = create_router(path.clone())
            .oneshot(post_json(r#"{"data":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], SAVED_MESSAGE.as_bytes());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_save_input_without_data_writes_empty() {
        let path = temp_path("empty.txt");
        std::fs::write(&path, "stale").unwrap();

        let response = create_router(path.clone())
            .oneshot(post_json("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_save_input_unwritable_target() {
        let dir = temp_path("missing-dir");
        let response = create_router(dir.join("input.txt"))
            .oneshot(post_json(r#"{"data":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_is_rejected() {
        let response = create_router(temp_path("unused.txt"))
            .oneshot(Request::builder().uri("/save-input").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
