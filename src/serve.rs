//! Passthrough middleware serving stored objects over HTTP / 对象回源中间件
//!
//! Mount it on the platform router with
//! `axum::middleware::from_fn_with_state(store, serve_stored)` where
//! `store` is a `SharedStore`. Requests whose path maps to an object in
//! the backend are answered with the stored headers and a streamed body;
//! everything else falls through to the inner service with status 404, so
//! the platform's own not-found page is what the client sees.
//!
//! A failed fetch is always a 404, whatever actually went wrong: missing
//! key, denied access and an unreachable backend are indistinguishable on
//! this path.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::storage::{SharedStore, StoredObject};

/// Object key for an inbound request path: one leading `/` stripped.
pub fn object_key(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Serve one request from the store, falling through on any failure.
pub async fn serve_stored(
    State(store): State<SharedStore>,
    req: Request,
    next: Next,
) -> Response {
    let key = object_key(req.uri().path()).to_string();

    match store.open(&key).await {
        Ok(object) => object.into_response(),
        Err(err) => {
            tracing::debug!("serve miss for {}: {}", key, err);
            let mut response = next.run(req).await;
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

impl IntoResponse for StoredObject {
    fn into_response(self) -> Response {
        // Headers verbatim, body piped as it arrives from the backend.
        // Dropping the response mid-stream (client disconnect) drops the
        // backend stream with it.
        let mut response = Response::new(Body::from_stream(self.body));
        *response.headers_mut() = self.headers;
        response
    }
}
