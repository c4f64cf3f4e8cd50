use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::{error::GameError, services::room_service, state::AppState, utils::websocket};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl http://localhost:8080/api/room/health
        .route("/health", get(health))
        // curl http://localhost:8080/api/room/rooms
        .route("/rooms", get(get_rooms))
        // websocat ws://localhost:8080/api/room/ws
        .route("/ws", get(websocket::handler))
        // curl http://localhost:8080/api/room/{code}
        .route("/:code", get(get_room_info))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json("ok"))
}

async fn get_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = room_service::get_rooms(&state).await;
    (StatusCode::OK, Json(rooms))
}

async fn get_room_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let room = room_service::get_room_info(&state, &code).await?;
    Ok((StatusCode::OK, Json(room)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::room::Room;
    use crate::utils::test_setup::test_state;
    use axum::{body::to_bytes, body::Body, http::Request};
    use std::collections::HashMap;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_get_rooms() {
        let (state, _) = test_state();
        let app = routes(state.clone());
        let room = room_service::create_room(&state, "host", Some("Host".to_string()))
            .await
            .unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/rooms")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let rooms: HashMap<String, Room> =
            serde_json::from_slice(&body).expect("Failed to parse response body");
        assert!(rooms.contains_key(&room.code));
        assert_eq!(rooms[&room.code].host, "host");
    }

    #[tokio::test]
    async fn test_get_unknown_room_is_not_found() {
        let (state, _) = test_state();
        let app = routes(state);

        let request = Request::builder()
            .method("GET")
            .uri("/NOPE42")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "notFound");
    }
}
