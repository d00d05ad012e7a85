// src/logging/mod.rs

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

// span とレスポンスヘッダーに使うリクエスト情報
#[derive(Debug)]
struct RequestContext {
    request_id: String,
    path: String,
    method: String,
}

impl RequestContext {
    fn from_request(req: &Request<Body>) -> Self {
        // 上流のプロキシが付けたIDがあれば引き継ぐ
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            path: req.uri().path().to_string(),
            method: req.method().to_string(),
        }
    }
}

/// リクエストごとに request_id 付きの span を張り、開始・完了をログに出すミドルウェア
pub async fn request_logging_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let context = RequestContext::from_request(&req);

    let span = tracing::info_span!(
        "request",
        request_id = %context.request_id,
        method = %context.method,
        path = %context.path,
    );

    async move {
        tracing::debug!("Request started");

        let mut response = next.run(req).await;
        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_millis();

        if status >= 500 {
            tracing::error!(status, duration_ms, "Request completed");
        } else if status >= 400 {
            tracing::warn!(status, duration_ms, "Request completed");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&context.request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}
