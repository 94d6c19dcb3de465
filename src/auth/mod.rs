use bcrypt::BcryptError;
use uuid::Uuid;

/// Fresh opaque bearer token: 32 lowercase hex characters
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// bcrypt hash of `password` at the given work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// A malformed stored hash never verifies
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match bcrypt::verify(password, hashed) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts `Bearer <token>` and `Token token=<token>`.
pub fn parse_authorization(value: &str) -> Result<&str, &'static str> {
    let token = if let Some(rest) = value.strip_prefix("Bearer ") {
        rest
    } else if let Some(rest) = value.strip_prefix("Token ") {
        rest.trim_start()
            .strip_prefix("token=")
            .ok_or("Token authorization must use token=<token> format")?
    } else {
        return Err("Authorization header must use Bearer token format");
    };

    let token = token.trim().trim_matches('"');
    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn password_round_trip() {
        let hashed = hash_password("12345", crate::config::BCRYPT_MIN_COST).unwrap();
        assert!(hashed.starts_with("$2"));
        assert!(!hashed.contains("12345"));
        assert!(verify_password("12345", &hashed));
        assert!(!verify_password("123456", &hashed));
    }

    #[test]
    fn hash_embeds_work_factor() {
        let hashed = hash_password("12345", 5).unwrap();
        assert_eq!(&hashed[4..6], "05");
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("12345", crate::config::BCRYPT_MIN_COST).unwrap();
        let b = hash_password("12345", crate::config::BCRYPT_MIN_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("12345", "no-separator"));
        assert!(!verify_password("12345", ""));
    }

    #[test]
    fn out_of_range_cost_is_an_error() {
        assert!(hash_password("12345", 99).is_err());
    }

    #[test]
    fn parses_bearer_and_token_schemes() {
        assert_eq!(parse_authorization("Bearer abc123"), Ok("abc123"));
        assert_eq!(parse_authorization("Token token=abc123"), Ok("abc123"));
        assert_eq!(parse_authorization("Token token=\"abc123\""), Ok("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert!(parse_authorization("Basic dXNlcjpwYXNz").is_err());
        assert!(parse_authorization("Bearer ").is_err());
        assert!(parse_authorization("Bearer    ").is_err());
        assert!(parse_authorization("Token abc123").is_err());
        assert!(parse_authorization("").is_err());
    }
}
