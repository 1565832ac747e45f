use serde::{Deserialize, Serialize};

/// Base58check-encoded hash with a type prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedHash {
    pub hash: String,
}

impl EncodedHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::EncodedHash;

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let hash = EncodedHash::new("bh$deadbeef");
        let rendered = serde_json::to_string(&hash).expect("serializes");
        let decoded: EncodedHash = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, hash);
    }

    #[test]
    fn missing_required_hash_names_the_field() {
        let error = serde_json::from_str::<EncodedHash>("{}").expect_err("hash is required");
        assert!(error.to_string().contains("`hash`"), "got: {error}");
    }
}
