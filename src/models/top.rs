use serde::{Deserialize, Serialize};

/// Summary of the current top block of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Top {
    pub height: u64,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txs_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    /// Block timestamp in milliseconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl Top {
    pub fn new(height: u64, hash: impl Into<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
            prev_hash: None,
            state_hash: None,
            txs_hash: None,
            target: None,
            time: None,
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Top;

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let mut top = Top::new(7, "bh$abc");
        top.prev_hash = Some("bh$parent".to_owned());
        top.target = Some(553_713_663);
        let rendered = serde_json::to_string(&top).expect("serializes");
        let decoded: Top = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, top);
    }

    #[test]
    fn missing_required_hash_names_the_field() {
        let error = serde_json::from_str::<Top>(r#"{"height":7}"#).expect_err("hash is required");
        assert!(error.to_string().contains("`hash`"), "got: {error}");
    }

    #[test]
    fn unset_optional_fields_are_omitted_from_output() {
        let rendered = serde_json::to_string(&Top::new(7, "bh$abc")).expect("serializes");
        assert_eq!(rendered, r#"{"height":7,"hash":"bh$abc"}"#);
    }
}
