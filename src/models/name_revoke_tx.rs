use serde::{Deserialize, Serialize};

use crate::models::EncodedHash;

/// Naming-system revoke transaction submitted via `/name-revoke-tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRevokeTx {
    pub name_hash: String,
    pub fee: u64,
    /// Owning account, when the node should not default to its own key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<EncodedHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl NameRevokeTx {
    pub fn new(name_hash: impl Into<String>, fee: u64) -> Self {
        Self {
            name_hash: name_hash.into(),
            fee,
            account: None,
            nonce: None,
        }
    }
}
