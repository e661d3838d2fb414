//! Document endpoint.

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use document::DocumentFormat;
use resolver::RequestContext;
use std::sync::Arc;

/// Serve the document of instance `instance` in `format`.
///
/// Answers 204 when the access policy refuses, 404 when there is no
/// document to serve and 500 when resolution fails. The resolver may scan,
/// so it runs on the blocking pool.
pub async fn serve_document(
    state: Arc<ServerState>,
    instance: usize,
    format: DocumentFormat,
    headers: HeaderMap,
    query: Vec<(String, String)>,
) -> ServerResult<Response> {
    let resolver = state
        .resolvers
        .get(instance)
        .cloned()
        .ok_or(ServerError::NotFound)?;

    let instance_name = resolver.instance_name();
    if !state.access.allows(&headers, &instance_name) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let pretty = resolver.config().pretty_print;
    let request = request_context(&headers, query);
    let resolved = tokio::task::spawn_blocking(move || resolver.resolve(&request)).await??;

    let Some(doc) = resolved else {
        return Err(ServerError::NotFound);
    };

    let body = document::render(&doc, format, pretty)?;
    tracing::debug!(instance = %instance_name, format = %format, bytes = body.len(), "document served");
    Ok(([(CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Collect what the filter chain may inspect from the HTTP request.
pub fn request_context(headers: &HeaderMap, query: Vec<(String, String)>) -> RequestContext {
    let mut ctx = RequestContext::default();

    for (name, value) in query {
        ctx.query.entry(name).or_default().push(value);
    }

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            ctx.headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                ctx.cookies.insert(name.to_string(), value.to_string());
            }
        }
    }

    ctx
}
