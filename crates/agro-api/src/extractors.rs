//! # Request Extractors
//!
//! JSON and path extraction helpers that map axum rejections to
//! [`AppError::BadRequest`], and the [`Caller`] extractor that builds the
//! audit [`RequestContext`] from request headers.

use std::convert::Infallible;

use agro_domain::RequestContext;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract path parameters, mapping malformed identifiers to
/// [`AppError::BadRequest`].
pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result
        .map(|Path(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Audit attribution for the current request.
///
/// `x-user-id` names the user, the first `x-forwarded-for` hop is the
/// client address, `user-agent` is passed through.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let ip = header(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|hop| hop.trim().to_string()))
            .filter(|v| !v.is_empty());
        Ok(Caller(RequestContext {
            user_id: header(headers, "x-user-id"),
            ip,
            user_agent: header(headers, "user-agent"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn caller_from(request: Request<()>) -> RequestContext {
        let (mut parts, _) = request.into_parts();
        let Caller(ctx) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn caller_reads_headers() {
        let ctx = caller_from(
            Request::builder()
                .header("x-user-id", "user-7")
                .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
                .header("user-agent", "curl/8.0")
                .body(())
                .unwrap(),
        )
        .await;
        assert_eq!(ctx.user_id.as_deref(), Some("user-7"));
        assert_eq!(ctx.ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn caller_without_headers_is_anonymous() {
        let ctx = caller_from(Request::builder().body(()).unwrap()).await;
        assert_eq!(ctx.actor(), "anonymous");
        assert!(ctx.ip.is_none());
    }
}
