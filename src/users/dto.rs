use serde::Deserialize;

/// Request body for registration; optional fields so every missing value
/// shows up in the validation errors array.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
