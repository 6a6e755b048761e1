use serde::{Deserialize, Serialize};

/// Request body for login. Fields are optional so that a missing field lands
/// in the validation errors array instead of a body-parse rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Success body for both registration and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
