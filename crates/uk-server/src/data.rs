//! Key/value routes.
//!
//! The store key is the literal request path, `/data/` prefix included, with
//! no decoding or normalization. Store calls are blocking and run on tokio's
//! blocking pool.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::error;
use uk_store::{StoreError, StoreResult};

use crate::error::{status_text, ServerError, ServerResult};
use crate::state::AppState;

pub async fn data_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let key = uri.path().to_string();
    let result = match method {
        Method::PUT => put(&state, key.clone(), &headers, body).await,
        Method::GET => get(&state, key.clone()).await,
        Method::DELETE => delete(&state, key.clone()).await,
        _ => return status_text(StatusCode::METHOD_NOT_ALLOWED),
    };

    result.unwrap_or_else(|e| {
        if !matches!(e, ServerError::Store(StoreError::NotFound(_))) {
            error!(%method, key = %key, error = %e, "data request failed");
        }
        e.into_response()
    })
}

async fn put(
    state: &AppState,
    key: String,
    headers: &HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();
    let store = state.store.clone();
    blocking(move || store.put(&key, &content_type, body.to_vec())).await?;
    Ok(status_text(StatusCode::CREATED))
}

async fn get(state: &AppState, key: String) -> ServerResult<Response> {
    let store = state.store.clone();
    let record = blocking(move || store.get(&key)).await?;

    let mut response = record.value.into_response();
    let headers = response.headers_mut();
    headers.remove(CONTENT_TYPE);
    if !record.content_type.is_empty() {
        if let Ok(v) = HeaderValue::from_bytes(record.content_type.as_bytes()) {
            headers.insert(CONTENT_TYPE, v);
        }
    }
    Ok(response)
}

async fn delete(state: &AppState, key: String) -> ServerResult<Response> {
    let store = state.store.clone();
    blocking(move || store.delete(&key)).await?;
    Ok(status_text(StatusCode::ACCEPTED))
}

async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}
