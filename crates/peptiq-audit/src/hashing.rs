//! Payload hashing
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact payload bytes
pub fn hash_payload(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_payload(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_payload("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_stable() {
        let payload = r#"{"batch_id":"B-1","purity_percent":99}"#;
        assert_eq!(hash_payload(payload), hash_payload(payload));
    }

    #[test]
    fn test_distinct_payloads_distinct_hashes() {
        let hashes: HashSet<String> = (0..2000)
            .map(|i| hash_payload(&format!(r#"{{"batch_id":"B-{}","purity_percent":{}}}"#, i, 90 + i % 10)))
            .collect();
        assert_eq!(hashes.len(), 2000);
    }

    #[test]
    fn test_single_byte_changes_hash() {
        assert_ne!(hash_payload(r#"{"purity":99.1}"#), hash_payload(r#"{"purity":99.2}"#));
        assert_ne!(hash_payload("payload"), hash_payload("payload "));
    }
}
