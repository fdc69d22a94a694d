use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use uk_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Responds with the bare status text. Error details stay in the logs.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        status_text(self.status())
    }
}

/// A plain-text response whose body is the status's canonical reason.
pub fn status_text(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("");
    (status, reason.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uk_store::KeyId;

    #[test]
    fn not_found_maps_to_404() {
        let e = ServerError::from(StoreError::NotFound("/data/x".into()));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn corrupt_and_io_map_to_500() {
        let corrupt = ServerError::from(StoreError::CorruptRecord {
            id: KeyId::from_hash([0; 32]),
            reason: "bad magic".into(),
        });
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let io = ServerError::from(StoreError::Io(std::io::Error::other("disk full")));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_maps_to_400() {
        assert_eq!(ServerError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn response_hides_details() {
        let e = ServerError::from(StoreError::Io(std::io::Error::other("/var/lib/secret")));
        let response = e.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }
}
