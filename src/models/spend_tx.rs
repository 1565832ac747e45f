use serde::{Deserialize, Serialize};

/// Coin transfer transaction submitted via `/spend-tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTx {
    pub recipient_pubkey: String,
    pub amount: u64,
    pub fee: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl SpendTx {
    pub fn new(recipient_pubkey: impl Into<String>, amount: u64, fee: u64) -> Self {
        Self {
            recipient_pubkey: recipient_pubkey.into(),
            amount,
            fee,
            nonce: None,
            payload: None,
        }
    }
}
