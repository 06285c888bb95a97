use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::game::InvalidMoveError;

/// Errors surfaced to clients, over WebSocket or HTTP
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid auth token")]
    Authentication,

    #[error("game not found")]
    NotFound,

    #[error("{0}")]
    IllegalMove(String),

    #[error("{0}")]
    Authorization(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{0} is already taken")]
    AlreadyTaken(String),

    #[error("connection closed: {0}")]
    Transport(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<InvalidMoveError> for ServerError {
    fn from(err: InvalidMoveError) -> Self {
        ServerError::IllegalMove(err.to_string())
    }
}

impl ServerError {
    /// Text carried by an ERROR message
    pub fn client_message(&self) -> String {
        format!("Error: {}", self)
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication => StatusCode::UNAUTHORIZED,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::IllegalMove(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Authorization(_) | ServerError::AlreadyTaken(_) => StatusCode::FORBIDDEN,
            ServerError::Transport(_)
            | ServerError::Storage(_)
            | ServerError::Serialization(_)
            | ServerError::InvalidConfig { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": format!("error: {}", self) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Color, Position};

    #[test]
    fn client_messages() {
        assert_eq!(
            ServerError::Authentication.client_message(),
            "Error: invalid auth token"
        );
        assert_eq!(ServerError::NotFound.client_message(), "Error: game not found");
        assert_eq!(
            ServerError::Authorization("cannot resign as observer".into()).client_message(),
            "Error: cannot resign as observer"
        );
    }

    #[test]
    fn engine_errors_become_illegal_moves() {
        let err: ServerError = InvalidMoveError::WrongTurn(Color::Black).into();
        assert!(matches!(err, ServerError::IllegalMove(ref m) if m == "it is BLACK's turn"));

        let pos = Position::new(3, 3).unwrap();
        let err: ServerError = InvalidMoveError::NoPiece(pos).into();
        assert_eq!(err.to_string(), "no piece at c3");
    }

    #[test]
    fn http_status_codes() {
        assert_eq!(ServerError::Authentication.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServerError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServerError::AlreadyTaken("WHITE".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::BadRequest("missing gameName".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServerError>();
    }
}
