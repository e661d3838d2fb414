//! Login endpoint.

use crate::auth::LoginContext;
use crate::error::{ServerError, ServerResult};
use crate::middleware::RequestId;
use crate::state::ServerState;
use axum::extract::{Request, State};
use std::sync::Arc;

/// Exchange the `username` and `password` headers for a token.
///
/// The token is returned as the plain-text body. Missing credentials or a
/// refused login answer 401.
pub async fn login(State(state): State<Arc<ServerState>>, request: Request) -> ServerResult<String> {
    let Some(authenticator) = state.authenticator.clone() else {
        return Err(ServerError::NotFound);
    };

    let (parts, _body) = request.into_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let username = header("username");
    let password = header("password");

    let ctx = LoginContext {
        request_id: parts.extensions.get::<RequestId>().map(|id| id.0.clone()),
        headers: parts.headers.clone(),
    };

    match authenticator.login(&username, &password, &ctx) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ServerError::Unauthorized("Not Authorized".to_string())),
    }
}
