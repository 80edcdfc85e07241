use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_logged_in: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(id: Uuid, username: String, email: String) -> Self {
        Self {
            id,
            username,
            email,
            is_logged_in: false,
        }
    }
}

/// Usernames are 3 to 20 characters long, counted in chars rather than bytes.
pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.chars().count())
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$")
                .expect("email pattern is valid")
        })
        .is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(!is_valid_username("ab"));
        assert!(is_valid_username("abc"));
        assert!(is_valid_username(&"a".repeat(20)));
        assert!(!is_valid_username(&"a".repeat(21)));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn username_counts_chars() {
        // 3 chars, 6 bytes
        assert!(is_valid_username("äöü"));
        assert!(!is_valid_username(&"é".repeat(21)));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("noatsign.com"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b.co trailing"));
    }

    #[test]
    fn user_without_flag_defaults_to_logged_out() {
        let json = r#"{"id":"6f1c1b8e-3f43-4f4d-9a3c-1d1b0c2f3a4b","username":"admin","email":"admin@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(!user.is_logged_in);
    }
}
