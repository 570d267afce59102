//! Domain Services
//!
//! Pure domain logic for answer encoding.

/// Encode an answer as a lowercase-hex SHA-1 digest of its UTF-8 bytes
///
/// Deterministic and unsalted: the level stores `encode_answer(correct)` and a
/// submission is accepted when `encode_answer(attempt)` matches it. This is
/// obfuscation at rest, not a security control against a reader of the level
/// table.
pub fn encode_answer(attempt: &str) -> String {
    platform::crypto::sha1_hex(attempt.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_answer_known_values() {
        assert_eq!(encode_answer(""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(
            encode_answer("hello"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[test]
    fn test_encode_answer_deterministic() {
        assert_eq!(encode_answer("flag{x}"), encode_answer("flag{x}"));
        assert_ne!(encode_answer("flag{x}"), encode_answer("flag{y}"));
    }

    #[test]
    fn test_encode_answer_utf8() {
        // Digest is over UTF-8 bytes, multi-byte input is fine
        let digest = encode_answer("旗を取れ");
        assert_eq!(digest.len(), 40);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
