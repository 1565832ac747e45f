use serde::{Deserialize, Serialize};

/// Account balance in the smallest coin unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: u64,
}

impl Balance {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }
}

#[cfg(test)]
mod tests {
    use super::Balance;

    #[test]
    fn round_trip_reconstructs_equal_value() {
        let balance = Balance::new(1_000_000);
        let rendered = serde_json::to_string(&balance).expect("serializes");
        let decoded: Balance = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(decoded, balance);
    }

    #[test]
    fn missing_required_balance_names_the_field() {
        let error = serde_json::from_str::<Balance>("{}").expect_err("balance is required");
        assert!(error.to_string().contains("`balance`"), "got: {error}");
    }
}
