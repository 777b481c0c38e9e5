//! Anonymous browser sessions.
//!
//! Every page request leaves with exactly one `session` cookie: the current
//! token when it still verifies, a freshly signed one otherwise. Tokens are
//! HS256 JWTs whose `exp` is fixed at issue time; only the cookie expiry
//! slides. Nothing is stored server-side.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_TTL_DAYS: i64 = 7;

/// Path prefixes served without touching the session
const SKIPPED_PREFIXES: &[&str] = &["/api", "/_next/static", "/_next/image", "/favicon.ico", "/public"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub iat: i64,
    pub exp: i64,
}

/// The token a request ended up with, available to handlers as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub token: String,
    pub cookie_expires: DateTime<Utc>,
    /// False when the incoming token was kept
    pub issued: bool,
}

pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    secure: bool,
}

impl SessionSigner {
    pub fn new(secret: &str, secure: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            secure,
        }
    }

    /// Sign a new session that expires [`SESSION_TTL_DAYS`] after `now`
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<(String, SessionClaims), jsonwebtoken::errors::Error> {
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);
        let claims = SessionClaims {
            session_id: Uuid::new_v4(),
            expires_at,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok((token, claims))
    }

    /// Check signature, algorithm and expiry
    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }

    /// Keep a verifying token, replace anything else
    pub fn resolve(
        &self,
        incoming: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ResolvedSession, jsonwebtoken::errors::Error> {
        let cookie_expires = now + Duration::days(SESSION_TTL_DAYS);

        if let Some(token) = incoming {
            match self.verify(token) {
                Ok(_) => {
                    return Ok(ResolvedSession {
                        token: token.to_string(),
                        cookie_expires,
                        issued: false,
                    })
                }
                Err(e) => warn!("Discarding session token: {}", e),
            }
        }

        let (token, claims) = self.issue_at(now)?;
        debug!("Issued session {}", claims.session_id);
        Ok(ResolvedSession {
            token,
            cookie_expires,
            issued: true,
        })
    }

    pub fn set_cookie(&self, token: &str, expires: DateTime<Utc>) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Expires={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            token,
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Whether the middleware handles `path`
pub fn applies_to(path: &str) -> bool {
    !SKIPPED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Value of the `session` cookie, across all `Cookie` headers
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

pub async fn session_middleware(
    State(signer): State<Arc<SessionSigner>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !applies_to(request.uri().path()) {
        return next.run(request).await;
    }

    let incoming = session_cookie(request.headers());
    let (token, cookie) = match session_header(&signer, incoming.as_deref(), Utc::now()) {
        Ok(pair) => pair,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(token);
    let mut response = next.run(request).await;
    response.headers_mut().append(SET_COOKIE, cookie);
    response
}

/// The token for this request and its `Set-Cookie` value, both ready before
/// the handler runs so that no response leaves without the cookie.
pub fn session_header(
    signer: &SessionSigner,
    incoming: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(SessionToken, HeaderValue), AppError> {
    let session = signer.resolve(incoming, now).map_err(|e| {
        warn!("Failed to sign session token: {}", e);
        AppError::Session
    })?;
    let cookie = HeaderValue::from_str(&signer.set_cookie(&session.token, session.cookie_expires))
        .map_err(|e| {
            warn!("Session cookie is not a valid header: {}", e);
            AppError::Session
        })?;
    Ok((SessionToken(session.token), cookie))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new("test-secret", false)
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer();
        let now = Utc::now();
        let (token, claims) = signer.issue_at(now).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), claims);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (token, _) = signer().issue_at(Utc::now()).unwrap();
        assert!(SessionSigner::new("other", false).verify(&token).is_err());
        assert!(signer().verify("not.a.token").is_err());
    }

    #[test]
    fn test_expired_token_is_replaced() {
        let signer = signer();
        let now = Utc::now();
        let (old, old_claims) = signer.issue_at(now - Duration::days(8)).unwrap();

        let resolved = signer.resolve(Some(&old), now).unwrap();
        assert!(resolved.issued);
        assert_ne!(resolved.token, old);
        let claims = signer.verify(&resolved.token).unwrap();
        assert_ne!(claims.session_id, old_claims.session_id);
    }

    #[test]
    fn test_valid_token_is_kept() {
        let signer = signer();
        let now = Utc::now();
        let (token, _) = signer.issue_at(now - Duration::days(1)).unwrap();
        let resolved = signer.resolve(Some(&token), now).unwrap();
        assert!(!resolved.issued);
        assert_eq!(resolved.token, token);
        assert_eq!(resolved.cookie_expires, now + Duration::days(7));
    }

    #[test]
    fn test_cookie_attributes() {
        let expires = DateTime::parse_from_rfc3339("2026-01-08T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            signer().set_cookie("abc", expires),
            "session=abc; Path=/; Expires=Thu, 08 Jan 2026 10:00:00 GMT; HttpOnly; SameSite=Lax"
        );
        assert!(SessionSigner::new("s", true)
            .set_cookie("abc", expires)
            .ends_with("; Secure"));
    }

    #[test]
    fn test_applies_to() {
        assert!(applies_to("/"));
        assert!(applies_to("/forms/esmfold/new"));
        assert!(!applies_to("/api/flask/dashboard/user_jobs"));
        assert!(!applies_to("/_next/static/chunk.js"));
        assert!(!applies_to("/favicon.ico"));
    }

    #[test]
    fn test_session_cookie_lookup() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; session=abc.def"));
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc.def"));

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("sessionid=x"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_session_header_carries_the_token() {
        let signer = signer();
        let now = Utc::now();
        let (token, cookie) = session_header(&signer, None, now).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("session={};", token.0)));
        assert!(signer.verify(&token.0).is_ok());
    }

    #[test]
    fn test_session_failure_is_a_server_error() {
        let response = AppError::Session.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }
}
