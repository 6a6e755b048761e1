use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-boundary error. Every handler failure is converted into one of
/// these and rendered as the JSON body + status the API contract fixes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 with the field-level `errors` array.
    #[error("validation failed")]
    Validation(Vec<&'static str>),
    /// 401 `{"msg": ...}`: missing/invalid token or a failed ownership check.
    #[error("{0}")]
    Unauthorized(&'static str),
    /// 400 `{"msg": ...}`: well-formed request against missing state
    /// (no profile yet, post not liked, ...).
    #[error("{0}")]
    BadRequest(&'static str),
    /// 404 `{"msg": ...}`.
    #[error("{0}")]
    NotFound(&'static str),
    /// 500. Detail is logged, never exposed; the body is the literal
    /// `Server Error` text.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msgs) => {
                let errors: Vec<_> = msgs.into_iter().map(|m| json!({ "msg": m })).collect();
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn validation_renders_errors_array() {
        let resp = ApiError::Validation(vec!["Name is required", "Please include a valid email"])
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_string(resp).await;
        assert_eq!(
            body,
            r#"{"errors":[{"msg":"Name is required"},{"msg":"Please include a valid email"}]}"#
        );
    }

    #[tokio::test]
    async fn unauthorized_renders_msg_body() {
        let resp = ApiError::Unauthorized("Not Authorized").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, r#"{"msg":"Not Authorized"}"#);
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let resp = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Server Error");
    }

    #[tokio::test]
    async fn login_failures_are_byte_identical() {
        // Unknown email and wrong password must be indistinguishable on the wire.
        let unknown = ApiError::Validation(vec!["Invalid Credentials"]).into_response();
        let wrong = ApiError::Validation(vec!["Invalid Credentials"]).into_response();
        assert_eq!(unknown.status(), wrong.status());
        assert_eq!(body_string(unknown).await, body_string(wrong).await);
    }
}
