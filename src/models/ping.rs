use serde::{Deserialize, Serialize};

/// Peer handshake payload exchanged on `/ping`.
///
/// `source` identifies the sending peer; the remaining fields describe the
/// sender's view of the chain and are echoed back by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genesis_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    /// Number of peers the responder should share back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<Vec<String>>,
}

impl Ping {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            genesis_hash: None,
            best_hash: None,
            difficulty: None,
            share: None,
            peers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Ping;

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let mut ping = Ping::new("http://peer.example:3013/v2");
        ping.share = Some(32);
        ping.peers = Some(vec!["http://other.example:3013/v2".to_owned()]);
        let rendered = serde_json::to_string(&ping).expect("serializes");
        let decoded: Ping = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, ping);
    }

    #[test]
    fn missing_required_source_names_the_field() {
        let error =
            serde_json::from_str::<Ping>(r#"{"share":32}"#).expect_err("source is required");
        assert!(error.to_string().contains("`source`"), "got: {error}");
    }
}
