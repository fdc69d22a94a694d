use askama::Template;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Json, Response};
use tracing::{error, info};

use crate::error::{status_text, ServerError};
use crate::info::ServerInfo;
use crate::state::AppState;
use crate::SERVICE_NAME;

/// Index page. Also answers any path no other route claims.
pub async fn root_handler(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::GET {
        return status_text(StatusCode::METHOD_NOT_ALLOWED);
    }
    match ServerInfo::now(&state.host).page().render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "index page rendering failed");
            status_text(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Server data as JSON.
pub async fn json_handler(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::GET {
        return status_text(StatusCode::METHOD_NOT_ALLOWED);
    }
    Json(ServerInfo::now(&state.host)).into_response()
}

/// Reply with a dump of the request: request line, headers, blank line, body.
pub async fn echo_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ServerError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let mut dump = format!("{} {} {:?}\r\n", parts.method, parts.uri, parts.version).into_bytes();
    for (name, value) in &parts.headers {
        dump.extend_from_slice(name.as_str().as_bytes());
        dump.extend_from_slice(b": ");
        dump.extend_from_slice(value.as_bytes());
        dump.extend_from_slice(b"\r\n");
    }
    dump.extend_from_slice(b"\r\n");
    dump.extend_from_slice(&body);

    info!("{}", String::from_utf8_lossy(&dump));
    Ok((
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        Body::from(dump),
    )
        .into_response())
}

/// Stamp every response with the serving host's identity.
pub async fn identity_headers(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&state.host.hostname) {
        headers.insert("x-hostname", v);
    }
    if let Ok(v) = HeaderValue::from_str(&state.host.ip) {
        headers.insert("x-ip", v);
    }
    headers.insert("x-served-by", HeaderValue::from_static(SERVICE_NAME));
    response
}
