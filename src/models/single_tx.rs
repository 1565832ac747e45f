use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::GenericTxObject;

/// Known values of the `data_schema` discriminator on single-transaction
/// responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxDataSchema {
    SingleTxHash,
    SingleTxObject,
}

impl TxDataSchema {
    /// Resolves a wire discriminator value, ignoring ASCII case.
    ///
    /// Returns `None` for unrecognized values; whether that is fatal is the
    /// caller's call.
    pub fn from_wire_value(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("SingleTxHash") {
            Some(Self::SingleTxHash)
        } else if value.eq_ignore_ascii_case("SingleTxObject") {
            Some(Self::SingleTxObject)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleTxHash => "SingleTxHash",
            Self::SingleTxObject => "SingleTxObject",
        }
    }
}

/// Reads the `data_schema` discriminator out of raw wire data.
///
/// Returns `None` when the field is absent, not a string, or names no known
/// subtype.
pub fn resolve_data_schema(raw: &Value) -> Option<TxDataSchema> {
    raw.get("data_schema")?
        .as_str()
        .and_then(TxDataSchema::from_wire_value)
}

/// Transaction referenced by hash only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleTxHash {
    pub data_schema: String,
    pub tx: String,
}

impl SingleTxHash {
    pub fn new(tx: impl Into<String>) -> Self {
        Self {
            data_schema: TxDataSchema::SingleTxHash.as_str().to_owned(),
            tx: tx.into(),
        }
    }
}

/// Transaction returned in decoded object form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleTxObject {
    pub data_schema: String,
    pub tx: GenericTxObject,
}

impl SingleTxObject {
    pub fn new(tx: GenericTxObject) -> Self {
        Self {
            data_schema: TxDataSchema::SingleTxObject.as_str().to_owned(),
            tx,
        }
    }
}

/// Polymorphic single-transaction response.
///
/// The node returns either an encoded hash or a decoded object depending on
/// the requested `tx_encoding`; the `data_schema` field discriminates.
/// Serialization delegates to the concrete variant, which carries its own
/// `data_schema` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SingleTxHashOrObject {
    Hash(SingleTxHash),
    Object(SingleTxObject),
}

impl<'de> Deserialize<'de> for SingleTxHashOrObject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        match resolve_data_schema(&raw) {
            Some(TxDataSchema::SingleTxHash) => serde_json::from_value(raw)
                .map(Self::Hash)
                .map_err(D::Error::custom),
            Some(TxDataSchema::SingleTxObject) => serde_json::from_value(raw)
                .map(Self::Object)
                .map_err(D::Error::custom),
            None => Err(D::Error::custom(
                "unrecognized or missing 'data_schema' discriminator",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SingleTxHash, SingleTxHashOrObject, TxDataSchema, resolve_data_schema};
    use crate::models::GenericTxObject;

    #[test]
    fn resolves_known_discriminator_value() {
        let raw = json!({"data_schema": "SingleTxHash"});
        assert_eq!(resolve_data_schema(&raw), Some(TxDataSchema::SingleTxHash));
    }

    #[test]
    fn resolves_case_insensitively() {
        let raw = json!({"data_schema": "singletxobject"});
        assert_eq!(
            resolve_data_schema(&raw),
            Some(TxDataSchema::SingleTxObject)
        );
    }

    #[test]
    fn unrecognized_discriminator_resolves_to_none() {
        let raw = json!({"data_schema": "SingleBlock"});
        assert_eq!(resolve_data_schema(&raw), None);
        assert_eq!(resolve_data_schema(&json!({})), None);
    }

    #[test]
    fn decodes_hash_variant() {
        let raw = json!({"data_schema": "SingleTxHash", "tx": "th$abc"});
        let decoded: SingleTxHashOrObject = serde_json::from_value(raw).expect("decodes");
        assert_eq!(decoded, SingleTxHashOrObject::Hash(SingleTxHash::new("th$abc")));
    }

    #[test]
    fn decodes_object_variant_with_nested_tx() {
        let raw = json!({
            "data_schema": "SingleTxObject",
            "tx": {"type": "SpendTx", "vsn": 1}
        });
        let decoded: SingleTxHashOrObject = serde_json::from_value(raw).expect("decodes");
        let SingleTxHashOrObject::Object(object) = decoded else {
            panic!("expected object variant");
        };
        assert_eq!(object.tx.type_, "SpendTx");
        assert_eq!(object.tx.vsn, Some(1));
    }

    #[test]
    fn unknown_discriminator_is_a_decode_error() {
        let raw = json!({"data_schema": "SingleBlock", "tx": "th$abc"});
        let error = serde_json::from_value::<SingleTxHashOrObject>(raw)
            .expect_err("unknown subtype");
        assert!(error.to_string().contains("data_schema"), "got: {error}");
    }

    #[test]
    fn serialization_round_trips_through_the_discriminator() {
        let original = SingleTxHashOrObject::Object(super::SingleTxObject::new(
            GenericTxObject::new("SpendTx"),
        ));
        let rendered = serde_json::to_string(&original).expect("serializes");
        let decoded: SingleTxHashOrObject = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, original);
    }
}
