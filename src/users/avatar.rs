use sha2::{Digest, Sha256};

/// Deterministic Gravatar URL for an email: 200px, PG-rated, mystery-man
/// fallback. Snapshotted onto posts and comments at write time.
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_email_same_url() {
        assert_eq!(gravatar_url("a@x.com"), gravatar_url("a@x.com"));
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(gravatar_url(" A@X.com "), gravatar_url("a@x.com"));
    }

    #[test]
    fn different_emails_differ() {
        assert_ne!(gravatar_url("a@x.com"), gravatar_url("b@x.com"));
    }

    #[test]
    fn carries_size_and_rating() {
        let url = gravatar_url("a@x.com");
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
    }
}
