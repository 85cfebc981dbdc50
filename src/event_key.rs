//! Content-addressed event identity.
//!
//! `sha256(trim(title) | start | end | trim(description))`, hex encoded.
//! Years are hashed in signed form (BC negative) so 44 BC and AD 44 differ.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const EVENT_KEY_LEN: usize = 64;

fn normalize(field: &str) -> &str {
    field.trim()
}

/// Deterministic identity for an event. An empty-after-trim description is
/// the same as no description.
pub fn compute_event_key(
    title: &str,
    start_year: i64,
    end_year: i64,
    description: Option<&str>,
) -> String {
    let description = description.map(normalize).unwrap_or_default();
    let material = format!(
        "{}|{}|{}|{}",
        normalize(title),
        start_year,
        end_year,
        description
    );
    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    hex::encode(hasher.finalize())
}

/// `true` iff `key` is exactly 64 hexadecimal characters (any case).
pub fn validate_key(key: &str) -> bool {
    key.len() == EVENT_KEY_LEN && key.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic_and_valid() {
        let a = compute_event_key("Founding of Rome", -753, -753, Some("Romulus"));
        let b = compute_event_key("Founding of Rome", -753, -753, Some("Romulus"));
        assert_eq!(a, b);
        assert!(validate_key(&a));
    }

    #[test]
    fn test_whitespace_normalization() {
        let t = "Battle of Actium";
        assert_eq!(
            compute_event_key(t, -31, -31, Some(" text ")),
            compute_event_key(t, -31, -31, Some("text"))
        );
        assert_eq!(
            compute_event_key(t, -31, -31, Some("")),
            compute_event_key(t, -31, -31, None)
        );
        assert_eq!(
            compute_event_key(&format!("  {t}\n"), -31, -31, Some("   ")),
            compute_event_key(t, -31, -31, None)
        );
    }

    #[test]
    fn test_era_changes_key() {
        assert_ne!(
            compute_event_key("x", -44, -44, None),
            compute_event_key("x", 44, 44, None)
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key(&"a".repeat(64)));
        assert!(validate_key(&"ABCDEF0123456789".repeat(4)));
        assert!(!validate_key(&"a".repeat(63)));
        assert!(!validate_key(&"g".repeat(64)));
        assert!(!validate_key(""));
    }
}
