use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::JwtConfig, error::ApiError, state::AppState};

/// Request header carrying the token. Bare token, no `Bearer` prefix; existing
/// clients send it this way.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Identity embedded in the token payload, wire shape `{"user":{"id":...}}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 signing and verification keys, built once from config.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_secs } = state.config.jwt.clone();
        Self::new(&secret, ttl_secs)
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl_secs);
        let claims = Claims {
            user: TokenUser { id: user_id },
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        // A token is rejected from its expiry instant on, no leeway.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.user.id, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the token, yielding the authenticated user id.
/// Runs before any handler logic on every protected route.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized("No token, authorization denied"))?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.user.id)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::Unauthorized("Token is not valid"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::new("test-secret", 360_000)
    }

    #[test]
    fn sign_and_verify_yields_same_identity() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user.id, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn payload_embeds_user_object() {
        let user_id = Uuid::new_v4();
        let claims = Claims {
            user: TokenUser { id: user_id },
            iat: 0,
            exp: 1,
        };
        let value = serde_json::to_value(&claims).expect("serialize claims");
        assert_eq!(value["user"]["id"], serde_json::json!(user_id.to_string()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("test-secret", -10);
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = make_keys();
        let other = JwtKeys::new("other-secret", 360_000);
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(make_keys().verify("not-a-jwt").is_err());
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn protected_app() -> Router {
        let state = AppState::fake();
        Router::new()
            .route(
                "/protected",
                get(|AuthUser(id): AuthUser| async move { id.to_string() }),
            )
            .with_state(state)
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn missing_header_is_denied() {
        let resp = protected_app()
            .oneshot(Request::get("/protected").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_string(resp).await,
            r#"{"msg":"No token, authorization denied"}"#
        );
    }

    #[tokio::test]
    async fn garbage_token_is_denied() {
        let resp = protected_app()
            .oneshot(
                Request::get("/protected")
                    .header(TOKEN_HEADER, "garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, r#"{"msg":"Token is not valid"}"#);
    }

    #[tokio::test]
    async fn expired_token_is_denied() {
        let token = JwtKeys::new("test-secret", -10)
            .sign(Uuid::new_v4())
            .expect("sign");
        let resp = protected_app()
            .oneshot(
                Request::get("/protected")
                    .header(TOKEN_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, r#"{"msg":"Token is not valid"}"#);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let user_id = Uuid::new_v4();
        // Same secret the fake state carries.
        let token = JwtKeys::new("test-secret", 360_000)
            .sign(user_id)
            .expect("sign");
        let resp = protected_app()
            .oneshot(
                Request::get("/protected")
                    .header(TOKEN_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        assert_eq!(body_string(resp).await, user_id.to_string());
    }
}
