use serde::{Deserialize, Serialize};

/// Decoded transaction in generic form: the concrete transaction kind is
/// carried in `type_` (wire key `type`) rather than in the Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTxObject {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsn: Option<u32>,
}

impl GenericTxObject {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            vsn: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenericTxObject;

    #[test]
    fn serializes_with_renamed_type_key() {
        let tx = GenericTxObject {
            type_: "SpendTx".to_owned(),
            vsn: Some(1),
        };
        let rendered = serde_json::to_string(&tx).expect("serializes");
        assert_eq!(rendered, r#"{"type":"SpendTx","vsn":1}"#);
    }

    #[test]
    fn omits_unset_optional_version() {
        let tx = GenericTxObject::new("CoinbaseTx");
        let rendered = serde_json::to_string(&tx).expect("serializes");
        assert_eq!(rendered, r#"{"type":"CoinbaseTx"}"#);
    }

    #[test]
    fn missing_required_type_names_the_field() {
        let error = serde_json::from_str::<GenericTxObject>(r#"{"vsn":1}"#)
            .expect_err("type is required");
        assert!(error.to_string().contains("`type`"), "got: {error}");
    }

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let tx = GenericTxObject {
            type_: "SpendTx".to_owned(),
            vsn: Some(1),
        };
        let rendered = serde_json::to_string(&tx).expect("serializes");
        let decoded: GenericTxObject = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, tx);
    }
}
