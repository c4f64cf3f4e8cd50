use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("only the host can do that")]
    PermissionDenied,
    #[error("need at least {required} players, have {present}")]
    InsufficientPlayers { present: usize, required: usize },
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("a game is already running in this room")]
    GameInProgress,
}

impl GameError {
    pub fn room(code: &str) -> Self {
        GameError::NotFound(format!("room {}", code))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameError::NotFound(_) => "notFound",
            GameError::PermissionDenied => "permissionDenied",
            GameError::InsufficientPlayers { .. } => "insufficientPlayers",
            GameError::InvalidTarget(_) => "invalidTarget",
            GameError::GameInProgress => "gameInProgress",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::PermissionDenied => StatusCode::FORBIDDEN,
            GameError::InsufficientPlayers { .. } | GameError::InvalidTarget(_) => {
                StatusCode::BAD_REQUEST
            }
            GameError::GameInProgress => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "kind": self.kind(), "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
