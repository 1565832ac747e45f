use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ApiResponse;
use crate::models::{
    Balance, BlockTimeSummary, EncodedHash, NameRevokeTx, Ping, PubKey, SingleTxHashOrObject,
    SpendTx, Top,
};
use crate::operations::{
    CollectionFormat, OPERATIONS, OperationDefinition, find_operation, render_path,
    select_header_accept, validate_query,
};
use crate::{ApiClient, BlockingApiClient, ClientError};

/// Transaction encoding requested from transaction-returning endpoints.
///
/// `Json` yields decoded objects, `MessagePack` yields encoded hashes; the
/// response's `data_schema` discriminator reflects the choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxEncoding {
    Json,
    MessagePack,
}

impl TxEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::MessagePack => "message_pack",
        }
    }
}

/// Optional filters for `getAccountTransactions`.
#[derive(Clone, Debug, Default)]
pub struct AccountTxsParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub tx_encoding: Option<TxEncoding>,
    /// Transaction type names to include; encoded per the operation's
    /// declared collection format.
    pub tx_types: Vec<String>,
    pub exclude_tx_types: Vec<String>,
}

/// Async client for the Epoch node API, one typed method per operation.
///
/// Every operation comes in two forms: the plain method returns the decoded
/// payload, `*_with_info` also returns response status and headers. The
/// returned future is the handle the caller awaits (or drops to cancel); use
/// [`BlockingEpochClient`] for synchronous calls.
#[derive(Clone, Debug)]
pub struct EpochClient {
    inner: ApiClient,
}

impl EpochClient {
    /// Creates a client with an explicit node base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Ok(Self {
            inner: ApiClient::new(base_url)?,
        })
    }

    /// Returns a new client with a raw access token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_authorization_token(token);
        self
    }

    /// Returns a new client with a per-request timeout applied to every call.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.with_request_timeout(timeout);
        self
    }

    /// Returns all operations in the catalog.
    pub fn operations() -> &'static [OperationDefinition] {
        OPERATIONS
    }

    /// Share chain state with the node and read back its view.
    pub async fn ping(&self, ping: &Ping) -> Result<Ping, ClientError> {
        self.ping_with_info(ping).await.map(|response| response.body)
    }

    pub async fn ping_with_info(&self, ping: &Ping) -> Result<ApiResponse<Ping>, ClientError> {
        self.execute("ping", &[], Vec::new(), Some(to_body(ping)?))
            .await
    }

    /// Get the current top block of the chain.
    pub async fn get_top(&self) -> Result<Top, ClientError> {
        self.get_top_with_info().await.map(|response| response.body)
    }

    pub async fn get_top_with_info(&self) -> Result<ApiResponse<Top>, ClientError> {
        self.execute("getTop", &[], Vec::new(), None).await
    }

    /// Get the balance of an account.
    pub async fn get_account_balance(&self, pub_key: &str) -> Result<Balance, ClientError> {
        self.get_account_balance_with_info(pub_key)
            .await
            .map(|response| response.body)
    }

    pub async fn get_account_balance_with_info(
        &self,
        pub_key: &str,
    ) -> Result<ApiResponse<Balance>, ClientError> {
        let query = vec![("pub_key".to_owned(), pub_key.to_owned())];
        self.execute("getAccountBalance", &[], query, None).await
    }

    /// List transactions affecting an account, newest first.
    pub async fn get_account_transactions(
        &self,
        account_pubkey: &str,
        params: &AccountTxsParams,
    ) -> Result<Vec<SingleTxHashOrObject>, ClientError> {
        self.get_account_transactions_with_info(account_pubkey, params)
            .await
            .map(|response| response.body)
    }

    pub async fn get_account_transactions_with_info(
        &self,
        account_pubkey: &str,
        params: &AccountTxsParams,
    ) -> Result<ApiResponse<Vec<SingleTxHashOrObject>>, ClientError> {
        let operation = find_operation("getAccountTransactions")?;
        let query = account_txs_query(operation, params);
        self.execute(
            "getAccountTransactions",
            &[("account_pubkey", account_pubkey)],
            query,
            None,
        )
        .await
    }

    /// Get a single transaction by hash.
    pub async fn get_tx(
        &self,
        tx_hash: &str,
        tx_encoding: Option<TxEncoding>,
    ) -> Result<SingleTxHashOrObject, ClientError> {
        self.get_tx_with_info(tx_hash, tx_encoding)
            .await
            .map(|response| response.body)
    }

    pub async fn get_tx_with_info(
        &self,
        tx_hash: &str,
        tx_encoding: Option<TxEncoding>,
    ) -> Result<ApiResponse<SingleTxHashOrObject>, ClientError> {
        self.execute(
            "getTx",
            &[("tx_hash", tx_hash)],
            tx_encoding_query(tx_encoding),
            None,
        )
        .await
    }

    /// Submit a spend transaction. The node responds with no content.
    pub async fn post_spend_tx(&self, tx: &SpendTx) -> Result<(), ClientError> {
        self.post_spend_tx_with_info(tx)
            .await
            .map(|response| response.body)
    }

    pub async fn post_spend_tx_with_info(
        &self,
        tx: &SpendTx,
    ) -> Result<ApiResponse<()>, ClientError> {
        self.execute("postSpendTx", &[], Vec::new(), Some(to_body(tx)?))
            .await
    }

    /// Get the node operator's public key address.
    pub async fn get_pub_key(&self) -> Result<PubKey, ClientError> {
        self.get_pub_key_with_info()
            .await
            .map(|response| response.body)
    }

    pub async fn get_pub_key_with_info(&self) -> Result<ApiResponse<PubKey>, ClientError> {
        self.execute("getPubKey", &[], Vec::new(), None).await
    }

    /// Submit a name revoke transaction; returns the transaction hash.
    pub async fn post_name_revoke_tx(
        &self,
        tx: &NameRevokeTx,
    ) -> Result<EncodedHash, ClientError> {
        self.post_name_revoke_tx_with_info(tx)
            .await
            .map(|response| response.body)
    }

    pub async fn post_name_revoke_tx_with_info(
        &self,
        tx: &NameRevokeTx,
    ) -> Result<ApiResponse<EncodedHash>, ClientError> {
        self.execute("postNameRevokeTx", &[], Vec::new(), Some(to_body(tx)?))
            .await
    }

    /// Get timing summaries for the most recent `n` blocks.
    pub async fn get_block_time_summary(
        &self,
        n: Option<u64>,
    ) -> Result<Vec<BlockTimeSummary>, ClientError> {
        self.get_block_time_summary_with_info(n)
            .await
            .map(|response| response.body)
    }

    pub async fn get_block_time_summary_with_info(
        &self,
        n: Option<u64>,
    ) -> Result<ApiResponse<Vec<BlockTimeSummary>>, ClientError> {
        self.execute("getBlockTimeSummary", &[], count_query(n), None)
            .await
    }

    /// Calls an operation by id with untyped parameters.
    ///
    /// Parameter names are checked against the catalog before any network
    /// activity; undeclared names return
    /// [`ClientError::UnexpectedParameter`]. The `Accept` header is
    /// negotiated from the operation's declared response content types, as
    /// on the typed path.
    pub async fn call_operation(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let operation = find_operation(operation_id)?;
        let rendered_path = render_path(operation, path_params)?;
        validate_query(operation, query)?;
        let method = parse_method(operation)?;
        let accept = select_header_accept(operation.accepts);
        let owned: Vec<(String, String)> = query
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        self.inner
            .request_model(
                method,
                &rendered_path,
                &owned,
                accept.as_deref(),
                body.as_ref(),
            )
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let operation = find_operation(operation_id)?;
        let rendered_path = render_path(operation, path_params)?;
        let method = parse_method(operation)?;
        let accept = select_header_accept(operation.accepts);
        self.inner
            .request_model_with_info(
                method,
                &rendered_path,
                &query,
                accept.as_deref(),
                body.as_ref(),
            )
            .await
    }
}

/// Blocking client for the Epoch node API.
///
/// This is the synchronous counterpart of [`EpochClient`]; each method blocks
/// until the node responds.
#[derive(Debug)]
pub struct BlockingEpochClient {
    inner: BlockingApiClient,
}

impl BlockingEpochClient {
    /// Creates a client with an explicit node base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Ok(Self {
            inner: BlockingApiClient::new(base_url)?,
        })
    }

    /// Returns a new client with a raw access token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_authorization_token(token);
        self
    }

    /// Returns a new client with a per-request timeout applied to every call.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.inner = self.inner.with_request_timeout(timeout);
        self
    }

    /// Returns all operations in the catalog.
    pub fn operations() -> &'static [OperationDefinition] {
        OPERATIONS
    }

    /// Share chain state with the node and read back its view.
    pub fn ping(&self, ping: &Ping) -> Result<Ping, ClientError> {
        self.ping_with_info(ping).map(|response| response.body)
    }

    pub fn ping_with_info(&self, ping: &Ping) -> Result<ApiResponse<Ping>, ClientError> {
        self.execute("ping", &[], Vec::new(), Some(to_body(ping)?))
    }

    /// Get the current top block of the chain.
    pub fn get_top(&self) -> Result<Top, ClientError> {
        self.get_top_with_info().map(|response| response.body)
    }

    pub fn get_top_with_info(&self) -> Result<ApiResponse<Top>, ClientError> {
        self.execute("getTop", &[], Vec::new(), None)
    }

    /// Get the balance of an account.
    pub fn get_account_balance(&self, pub_key: &str) -> Result<Balance, ClientError> {
        self.get_account_balance_with_info(pub_key)
            .map(|response| response.body)
    }

    pub fn get_account_balance_with_info(
        &self,
        pub_key: &str,
    ) -> Result<ApiResponse<Balance>, ClientError> {
        let query = vec![("pub_key".to_owned(), pub_key.to_owned())];
        self.execute("getAccountBalance", &[], query, None)
    }

    /// List transactions affecting an account, newest first.
    pub fn get_account_transactions(
        &self,
        account_pubkey: &str,
        params: &AccountTxsParams,
    ) -> Result<Vec<SingleTxHashOrObject>, ClientError> {
        self.get_account_transactions_with_info(account_pubkey, params)
            .map(|response| response.body)
    }

    pub fn get_account_transactions_with_info(
        &self,
        account_pubkey: &str,
        params: &AccountTxsParams,
    ) -> Result<ApiResponse<Vec<SingleTxHashOrObject>>, ClientError> {
        let operation = find_operation("getAccountTransactions")?;
        let query = account_txs_query(operation, params);
        self.execute(
            "getAccountTransactions",
            &[("account_pubkey", account_pubkey)],
            query,
            None,
        )
    }

    /// Get a single transaction by hash.
    pub fn get_tx(
        &self,
        tx_hash: &str,
        tx_encoding: Option<TxEncoding>,
    ) -> Result<SingleTxHashOrObject, ClientError> {
        self.get_tx_with_info(tx_hash, tx_encoding)
            .map(|response| response.body)
    }

    pub fn get_tx_with_info(
        &self,
        tx_hash: &str,
        tx_encoding: Option<TxEncoding>,
    ) -> Result<ApiResponse<SingleTxHashOrObject>, ClientError> {
        self.execute(
            "getTx",
            &[("tx_hash", tx_hash)],
            tx_encoding_query(tx_encoding),
            None,
        )
    }

    /// Submit a spend transaction. The node responds with no content.
    pub fn post_spend_tx(&self, tx: &SpendTx) -> Result<(), ClientError> {
        self.post_spend_tx_with_info(tx).map(|response| response.body)
    }

    pub fn post_spend_tx_with_info(&self, tx: &SpendTx) -> Result<ApiResponse<()>, ClientError> {
        self.execute("postSpendTx", &[], Vec::new(), Some(to_body(tx)?))
    }

    /// Get the node operator's public key address.
    pub fn get_pub_key(&self) -> Result<PubKey, ClientError> {
        self.get_pub_key_with_info().map(|response| response.body)
    }

    pub fn get_pub_key_with_info(&self) -> Result<ApiResponse<PubKey>, ClientError> {
        self.execute("getPubKey", &[], Vec::new(), None)
    }

    /// Submit a name revoke transaction; returns the transaction hash.
    pub fn post_name_revoke_tx(&self, tx: &NameRevokeTx) -> Result<EncodedHash, ClientError> {
        self.post_name_revoke_tx_with_info(tx)
            .map(|response| response.body)
    }

    pub fn post_name_revoke_tx_with_info(
        &self,
        tx: &NameRevokeTx,
    ) -> Result<ApiResponse<EncodedHash>, ClientError> {
        self.execute("postNameRevokeTx", &[], Vec::new(), Some(to_body(tx)?))
    }

    /// Get timing summaries for the most recent `n` blocks.
    pub fn get_block_time_summary(
        &self,
        n: Option<u64>,
    ) -> Result<Vec<BlockTimeSummary>, ClientError> {
        self.get_block_time_summary_with_info(n)
            .map(|response| response.body)
    }

    pub fn get_block_time_summary_with_info(
        &self,
        n: Option<u64>,
    ) -> Result<ApiResponse<Vec<BlockTimeSummary>>, ClientError> {
        self.execute("getBlockTimeSummary", &[], count_query(n), None)
    }

    /// Calls an operation by id with untyped parameters.
    ///
    /// Parameter names are checked against the catalog before any network
    /// activity; undeclared names return
    /// [`ClientError::UnexpectedParameter`]. The `Accept` header is
    /// negotiated from the operation's declared response content types, as
    /// on the typed path.
    pub fn call_operation(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let operation = find_operation(operation_id)?;
        let rendered_path = render_path(operation, path_params)?;
        validate_query(operation, query)?;
        let method = parse_method(operation)?;
        let accept = select_header_accept(operation.accepts);
        let owned: Vec<(String, String)> = query
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        self.inner.request_model(
            method,
            &rendered_path,
            &owned,
            accept.as_deref(),
            body.as_ref(),
        )
    }

    fn execute<T: DeserializeOwned>(
        &self,
        operation_id: &str,
        path_params: &[(&str, &str)],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let operation = find_operation(operation_id)?;
        let rendered_path = render_path(operation, path_params)?;
        let method = parse_method(operation)?;
        let accept = select_header_accept(operation.accepts);
        self.inner.request_model_with_info(
            method,
            &rendered_path,
            &query,
            accept.as_deref(),
            body.as_ref(),
        )
    }
}

fn to_body<T: Serialize>(model: &T) -> Result<Value, ClientError> {
    Ok(serde_json::to_value(model)?)
}

fn parse_method(operation: &OperationDefinition) -> Result<Method, ClientError> {
    Method::from_bytes(operation.method.as_bytes()).map_err(|_| ClientError::InvalidMethod {
        operation_id: operation.operation_id.to_owned(),
        method: operation.method.to_owned(),
    })
}

fn tx_encoding_query(tx_encoding: Option<TxEncoding>) -> Vec<(String, String)> {
    tx_encoding
        .map(|encoding| vec![("tx_encoding".to_owned(), encoding.as_str().to_owned())])
        .unwrap_or_default()
}

fn count_query(n: Option<u64>) -> Vec<(String, String)> {
    n.map(|count| vec![("n".to_owned(), count.to_string())])
        .unwrap_or_default()
}

fn account_txs_query(
    operation: &OperationDefinition,
    params: &AccountTxsParams,
) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(limit) = params.limit {
        query.push(("limit".to_owned(), limit.to_string()));
    }
    if let Some(offset) = params.offset {
        query.push(("offset".to_owned(), offset.to_string()));
    }
    if let Some(encoding) = params.tx_encoding {
        query.push(("tx_encoding".to_owned(), encoding.as_str().to_owned()));
    }
    encode_declared_collection(operation, "tx_types", &params.tx_types, &mut query);
    encode_declared_collection(
        operation,
        "exclude_tx_types",
        &params.exclude_tx_types,
        &mut query,
    );
    query
}

fn encode_declared_collection(
    operation: &OperationDefinition,
    name: &str,
    values: &[String],
    out: &mut Vec<(String, String)>,
) {
    let format = operation
        .query_params
        .iter()
        .find(|param| param.name == name)
        .map_or(CollectionFormat::Csv, |param| param.collection_format);
    let borrowed: Vec<&str> = values.iter().map(String::as_str).collect();
    format.encode(name, &borrowed, out);
}

#[cfg(test)]
mod tests {
    use super::{
        AccountTxsParams, BlockingEpochClient, EpochClient, TxEncoding, account_txs_query,
        parse_method,
    };
    use crate::ClientError;
    use crate::operations::{OperationDefinition, find_operation, select_header_accept};

    #[test]
    fn operation_catalog_is_exposed() {
        assert!(!EpochClient::operations().is_empty());
        assert_eq!(
            EpochClient::operations().len(),
            BlockingEpochClient::operations().len()
        );
    }

    #[test]
    fn account_txs_query_encodes_type_filters_as_declared() {
        let operation = find_operation("getAccountTransactions").expect("operation exists");
        let params = AccountTxsParams {
            limit: Some(20),
            tx_encoding: Some(TxEncoding::Json),
            tx_types: vec!["spend_tx".to_owned(), "coinbase_tx".to_owned()],
            ..AccountTxsParams::default()
        };
        let query = account_txs_query(operation, &params);
        assert!(query.contains(&("limit".to_owned(), "20".to_owned())));
        assert!(query.contains(&("tx_encoding".to_owned(), "json".to_owned())));
        assert!(query.contains(&("tx_types".to_owned(), "spend_tx,coinbase_tx".to_owned())));
        assert!(!query.iter().any(|(name, _)| name == "offset"));
    }

    #[tokio::test]
    async fn unexpected_query_parameter_fails_before_any_request() {
        let client = EpochClient::new("http://node.invalid").expect("valid url");
        let error = client
            .call_operation("getAccountBalance", &[], &[("pubkey", "ak$abc")], None)
            .await
            .expect_err("undeclared parameter");
        match error {
            ClientError::UnexpectedParameter {
                operation_id,
                parameter,
            } => {
                assert_eq!(operation_id, "getAccountBalance");
                assert_eq!(parameter, "pubkey");
            }
            other => panic!("expected local validation error, got: {other}"),
        }
    }

    #[test]
    fn blocking_client_validates_path_parameters_locally() {
        let client = BlockingEpochClient::new("http://node.invalid").expect("valid url");
        let error = client
            .call_operation("getTx", &[], &[], None)
            .expect_err("missing path parameter");
        match error {
            ClientError::MissingPathParameter { parameter, .. } => {
                assert_eq!(parameter, "tx_hash");
            }
            other => panic!("expected local validation error, got: {other}"),
        }
    }

    #[test]
    fn every_catalog_operation_negotiates_an_accept_value() {
        // The dynamic call path sends the same negotiated Accept header as
        // the typed path; every catalog entry must resolve to one.
        for operation in EpochClient::operations() {
            assert_eq!(
                select_header_accept(operation.accepts).as_deref(),
                Some("application/json"),
                "operation {}",
                operation.operation_id
            );
        }
    }

    #[test]
    fn malformed_catalog_method_is_reported_truthfully() {
        let bogus = OperationDefinition {
            operation_id: "badOp",
            method: "GE T",
            path_template: "/bad",
            path_params: &[],
            query_params: &[],
            accepts: &["application/json"],
            auth: &[],
        };
        let error = parse_method(&bogus).expect_err("malformed method");
        match error {
            ClientError::InvalidMethod {
                operation_id,
                method,
            } => {
                assert_eq!(operation_id, "badOp");
                assert_eq!(method, "GE T");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tx_encoding_renders_wire_values() {
        assert_eq!(TxEncoding::Json.as_str(), "json");
        assert_eq!(TxEncoding::MessagePack.as_str(), "message_pack");
    }
}
