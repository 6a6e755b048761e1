use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds. The historical default is 360000 (100 hours),
    /// kept configurable rather than hard-coded.
    pub ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Optional token for the GitHub repos proxy; unauthenticated requests
    /// work but hit GitHub's anonymous rate limit.
    pub github_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(360_000),
        };
        let github_token = std::env::var("GITHUB_TOKEN").ok();
        Ok(Self {
            database_url,
            jwt,
            github_token,
        })
    }
}
