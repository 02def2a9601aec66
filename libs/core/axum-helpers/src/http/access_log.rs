use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use super::request_id::REQUEST_ID_HEADER;
use crate::errors::error_response;

macro_rules! log_at {
    ($status:expr, $($field:tt)+) => {
        if $status.is_server_error() {
            tracing::error!($($field)+)
        } else if $status.is_client_error() {
            tracing::warn!($($field)+)
        } else {
            tracing::info!($($field)+)
        }
    };
}

/// Logs one event per request once the response is complete.
///
/// The response body is buffered so its length can be recorded; it must sit
/// inside the request-id layers to see the resolved id.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().to_string();
    let headers = request.headers();
    let host = header_str(headers.get(header::HOST));
    let referer = header_str(headers.get(header::REFERER));
    let user_agent = header_str(headers.get(header::USER_AGENT));
    let request_id = header_str(headers.get(REQUEST_ID_HEADER));

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(%method, %uri, %request_id, error = %e, "Failed to read response body");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let status = parts.status;
    log_at!(
        status,
        %method,
        %uri,
        %host,
        %referer,
        %user_agent,
        status = status.as_u16(),
        bytes = bytes.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        %request_id,
        "request completed"
    );

    Response::from_parts(parts, Body::from(bytes)).into_response()
}

fn header_str(value: Option<&header::HeaderValue>) -> String {
    value
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_access_log_preserves_response() {
        let app = Router::new()
            .route("/", get(|| async { (StatusCode::CREATED, "made") }))
            .layer(middleware::from_fn(access_log));

        let response = app
            .oneshot(
                axum::http::Request::get("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"made");
    }

    #[test]
    fn test_header_str_defaults_to_empty() {
        assert_eq!(header_str(None), "");
    }
}
