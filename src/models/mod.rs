//! Data models for the Epoch node API.
//!
//! One struct per schema-defined record. Required fields are plain values,
//! optional fields are `Option` and are omitted from serialized output when
//! unset. Wire keys that differ from field names carry `#[serde(rename)]`.
//! Every model implements `Display` as deterministic pretty-printed JSON of
//! its wire form.

mod balance;
mod block_time_summary;
mod encoded_hash;
mod generic_tx_object;
mod name_revoke_tx;
mod ping;
mod pub_key;
mod single_tx;
mod spend_tx;
mod top;

pub use balance::Balance;
pub use block_time_summary::BlockTimeSummary;
pub use encoded_hash::EncodedHash;
pub use generic_tx_object::GenericTxObject;
pub use name_revoke_tx::NameRevokeTx;
pub use ping::Ping;
pub use pub_key::PubKey;
pub use single_tx::{SingleTxHash, SingleTxHashOrObject, SingleTxObject, TxDataSchema,
    resolve_data_schema};
pub use spend_tx::SpendTx;
pub use top::Top;

/// Implements `Display` as pretty-printed JSON of the serialized form.
///
/// Output is deterministic: struct fields serialize in declaration order.
macro_rules! impl_display_as_json {
    ($($model:ty),+ $(,)?) => {
        $(impl core::fmt::Display for $model {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match serde_json::to_string_pretty(self) {
                    Ok(rendered) => f.write_str(&rendered),
                    Err(_) => Err(core::fmt::Error),
                }
            }
        })+
    };
}

impl_display_as_json!(
    Balance,
    BlockTimeSummary,
    EncodedHash,
    GenericTxObject,
    NameRevokeTx,
    Ping,
    PubKey,
    SingleTxHash,
    SingleTxHashOrObject,
    SingleTxObject,
    SpendTx,
    Top,
);
