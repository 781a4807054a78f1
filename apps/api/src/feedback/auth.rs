//! Study-token authentication.
//!
//! The survey platform sends the shared secret as an `x-study-token` header.
//! Some of its web-service blocks cannot set headers, so a query parameter of
//! the same name (any ASCII case) is accepted as a fallback.
//!
//! `StudyToken` is a parts-only extractor: handlers list it before the body
//! extractor so unauthenticated requests are rejected before the body is read.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap},
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-study-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Query,
}

/// Proof that the request carried the configured study token.
#[derive(Debug, Clone, Copy)]
pub struct StudyToken(pub TokenSource);

#[async_trait]
impl FromRequestParts<AppState> for StudyToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A malformed query string is treated as carrying no token.
        let query = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        authorize(&parts.headers, &query, &state.config.study_token)
            .map(StudyToken)
            .map_err(|e| {
                warn!(path = %parts.uri.path(), "Rejected request: missing or invalid study token");
                e
            })
    }
}

/// Finds the presented token. The header wins over the query; among query
/// pairs the first matching key in query-string order wins. Empty values
/// count as absent. Values are not trimmed.
pub fn extract_token<'a>(
    headers: &'a HeaderMap,
    query: &'a [(String, String)],
) -> Option<(&'a str, TokenSource)> {
    let from_header = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| (v, TokenSource::Header));

    from_header.or_else(|| {
        query
            .iter()
            .find(|(k, v)| k.eq_ignore_ascii_case(TOKEN_HEADER) && !v.is_empty())
            .map(|(_, v)| (v.as_str(), TokenSource::Query))
    })
}

/// Checks the presented token against the configured secret.
pub fn authorize(
    headers: &HeaderMap,
    query: &[(String, String)],
    secret: &str,
) -> Result<TokenSource, AppError> {
    match extract_token(headers, query) {
        Some((token, source)) if constant_time_eq(token.as_bytes(), secret.as_bytes()) => {
            Ok(source)
        }
        _ => Err(AppError::Unauthorized),
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_header_token_accepted() {
        let source = authorize(&headers_with("T"), &[], "T").unwrap();
        assert_eq!(source, TokenSource::Header);
    }

    #[test]
    fn test_query_token_accepted_in_any_case() {
        for key in ["x-study-token", "X-Study-Token", "X-STUDY-TOKEN"] {
            let source = authorize(&HeaderMap::new(), &query(&[(key, "T")]), "T").unwrap();
            assert_eq!(source, TokenSource::Query);
        }
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let result = authorize(&headers_with("wrong"), &query(&[("x-study-token", "T")]), "T");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_empty_header_falls_back_to_query() {
        let source = authorize(&headers_with(""), &query(&[("X-Study-Token", "T")]), "T").unwrap();
        assert_eq!(source, TokenSource::Query);
    }

    #[test]
    fn test_first_query_match_wins() {
        let bad_first = query(&[("x-study-token", "bad"), ("X-Study-Token", "T")]);
        let good_first = query(&[("X-Study-Token", "T"), ("x-study-token", "bad")]);
        for _ in 0..20 {
            assert!(authorize(&HeaderMap::new(), &bad_first, "T").is_err());
            assert!(authorize(&HeaderMap::new(), &good_first, "T").is_ok());
        }
    }

    #[test]
    fn test_empty_query_value_is_skipped() {
        let pairs = query(&[("x-study-token", ""), ("X-STUDY-TOKEN", "T")]);
        assert!(authorize(&HeaderMap::new(), &pairs, "T").is_ok());
    }

    #[test]
    fn test_token_is_not_trimmed() {
        assert!(authorize(&HeaderMap::new(), &query(&[("x-study-token", " T")]), "T").is_err());
        assert!(authorize(&HeaderMap::new(), &query(&[("x-study-token", "T ")]), "T").is_err());
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(matches!(
            authorize(&HeaderMap::new(), &[], "T"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_mismatched_token_rejected() {
        assert!(authorize(&headers_with("T2"), &[], "T").is_err());
        assert!(authorize(&headers_with("t"), &[], "T").is_err());
    }

    #[test]
    fn test_unrelated_query_key_ignored() {
        assert!(authorize(&HeaderMap::new(), &query(&[("token", "T")]), "T").is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secrets"));
    }
}
