use serde::{Deserialize, Serialize};

/// Public key address of the node operator's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    pub pub_key: String,
}

impl PubKey {
    pub fn new(pub_key: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PubKey;

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let key = PubKey::new("ak$2qpb");
        let rendered = serde_json::to_string(&key).expect("serializes");
        let decoded: PubKey = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, key);
    }

    #[test]
    fn missing_required_pub_key_names_the_field() {
        let error = serde_json::from_str::<PubKey>("{}").expect_err("pub_key is required");
        assert!(error.to_string().contains("`pub_key`"), "got: {error}");
    }
}
