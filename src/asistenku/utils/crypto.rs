// src/asistenku/utils/crypto.rs
use sha2::{Digest, Sha256};

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn calculate_sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Short, stable identifier derived from the given parts.
pub fn short_id(prefix: &str, parts: &[&str], len: usize) -> String {
    let joined = parts.join("\u{1f}");
    let digest = calculate_sha256_hex(joined.as_bytes());
    let len = len.min(digest.len());
    format!("{}-{}", prefix, digest[..len].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            calculate_sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn short_id_is_deterministic() {
        let a = short_id("CS", &["subject", "1"], 8);
        assert_eq!(a, short_id("CS", &["subject", "1"], 8));
        assert_ne!(a, short_id("CS", &["subject", "2"], 8));
        assert_eq!(a.len(), "CS-".len() + 8);
    }
}
