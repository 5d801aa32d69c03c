//! Cache entry key generation.

use sha2::{Digest, Sha256};

/// Compute the key of a cache entry from the request method and URL.
///
/// The URL must already be fragment-free (see `Request::cache_url`).
pub fn compute_entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = compute_entry_key("GET", "https://example.com/about");
        let key2 = compute_entry_key("GET", "https://example.com/about");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_method_case_insensitive() {
        assert_eq!(
            compute_entry_key("get", "https://example.com/"),
            compute_entry_key("GET", "https://example.com/")
        );
    }

    #[test]
    fn test_key_different_url() {
        let about = compute_entry_key("GET", "https://example.com/about");
        let contact = compute_entry_key("GET", "https://example.com/contact");
        assert_ne!(about, contact);
    }

    #[test]
    fn test_key_format() {
        let key = compute_entry_key("GET", "https://example.com/");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
