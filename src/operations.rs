use url::form_urlencoded::byte_serialize;

use crate::ClientError;

/// How a collection-valued query parameter is encoded on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionFormat {
    /// Comma-joined. Identity for single values; the default.
    Csv,
    /// Space-joined.
    Ssv,
    /// Tab-joined.
    Tsv,
    /// Pipe-joined.
    Pipes,
    /// One `name=value` pair per element.
    Multi,
}

impl CollectionFormat {
    /// Appends `values` for parameter `name` to `out` in this format.
    ///
    /// Empty `values` appends nothing.
    pub fn encode(self, name: &str, values: &[&str], out: &mut Vec<(String, String)>) {
        if values.is_empty() {
            return;
        }
        match self {
            Self::Multi => {
                for value in values {
                    out.push((name.to_owned(), (*value).to_owned()));
                }
            }
            Self::Csv => out.push((name.to_owned(), values.join(","))),
            Self::Ssv => out.push((name.to_owned(), values.join(" "))),
            Self::Tsv => out.push((name.to_owned(), values.join("\t"))),
            Self::Pipes => out.push((name.to_owned(), values.join("|"))),
        }
    }
}

/// Declared query parameter of one operation.
#[derive(Clone, Copy, Debug)]
pub struct QueryParamDef {
    pub name: &'static str,
    pub collection_format: CollectionFormat,
}

const fn query_param(name: &'static str) -> QueryParamDef {
    QueryParamDef {
        name,
        collection_format: CollectionFormat::Csv,
    }
}

/// Metadata for one Epoch API operation.
///
/// One entry per documented HTTP endpoint of the node.
#[derive(Clone, Copy, Debug)]
pub struct OperationDefinition {
    /// Stable operation identifier.
    pub operation_id: &'static str,
    /// Uppercase HTTP method (for example `GET`, `POST`).
    pub method: &'static str,
    /// Path template, potentially containing `{param}` placeholders.
    pub path_template: &'static str,
    /// Required path parameter names extracted from `path_template`.
    pub path_params: &'static [&'static str],
    /// Query parameters the operation accepts.
    pub query_params: &'static [QueryParamDef],
    /// Response content types the operation declares, in preference order.
    pub accepts: &'static [&'static str],
    /// Opaque authentication requirement names, delegated to the transport.
    /// Epoch endpoints currently declare none.
    pub auth: &'static [&'static str],
}

/// Catalog of Epoch node operations.
pub const OPERATIONS: &[OperationDefinition] = &[
    OperationDefinition {
        operation_id: "ping",
        method: "POST",
        path_template: "/ping",
        path_params: &[],
        query_params: &[],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getTop",
        method: "GET",
        path_template: "/top",
        path_params: &[],
        query_params: &[],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getAccountBalance",
        method: "GET",
        path_template: "/account/balance",
        path_params: &[],
        query_params: &[query_param("pub_key")],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getAccountTransactions",
        method: "GET",
        path_template: "/account/txs/{account_pubkey}",
        path_params: &["account_pubkey"],
        query_params: &[
            query_param("limit"),
            query_param("offset"),
            query_param("tx_encoding"),
            QueryParamDef {
                name: "tx_types",
                collection_format: CollectionFormat::Csv,
            },
            QueryParamDef {
                name: "exclude_tx_types",
                collection_format: CollectionFormat::Csv,
            },
        ],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getTx",
        method: "GET",
        path_template: "/tx/{tx_hash}",
        path_params: &["tx_hash"],
        query_params: &[query_param("tx_encoding")],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "postSpendTx",
        method: "POST",
        path_template: "/spend-tx",
        path_params: &[],
        query_params: &[],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getPubKey",
        method: "GET",
        path_template: "/account/pub-key",
        path_params: &[],
        query_params: &[],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "postNameRevokeTx",
        method: "POST",
        path_template: "/name-revoke-tx",
        path_params: &[],
        query_params: &[],
        accepts: &["application/json"],
        auth: &[],
    },
    OperationDefinition {
        operation_id: "getBlockTimeSummary",
        method: "GET",
        path_template: "/block/time/summary",
        path_params: &[],
        query_params: &[query_param("n")],
        accepts: &["application/json"],
        auth: &[],
    },
];

/// Looks up an operation by id in the catalog.
pub fn find_operation(operation_id: &str) -> Result<&'static OperationDefinition, ClientError> {
    OPERATIONS
        .iter()
        .find(|op| op.operation_id == operation_id)
        .ok_or_else(|| ClientError::UnknownOperation(operation_id.to_owned()))
}

/// Renders an operation's path template with the given parameter values.
///
/// Values are percent-encoded. Missing required parameters return
/// [`ClientError::MissingPathParameter`]; names the operation does not
/// declare return [`ClientError::UnexpectedParameter`].
pub fn render_path(
    operation: &OperationDefinition,
    path_params: &[(&str, &str)],
) -> Result<String, ClientError> {
    for (name, _) in path_params {
        if !operation.path_params.contains(name) {
            return Err(ClientError::UnexpectedParameter {
                operation_id: operation.operation_id.to_owned(),
                parameter: (*name).to_owned(),
            });
        }
    }

    let mut rendered = operation.path_template.to_owned();

    for required_param in operation.path_params {
        let value = path_params
            .iter()
            .find(|(name, _)| name == required_param)
            .map(|(_, value)| *value)
            .ok_or_else(|| ClientError::MissingPathParameter {
                operation_id: operation.operation_id.to_owned(),
                parameter: (*required_param).to_owned(),
            })?;

        let placeholder = format!("{{{required_param}}}");
        rendered = rendered.replace(&placeholder, &encode_path_segment(value));
    }

    Ok(rendered)
}

/// Checks that every supplied query parameter name is declared by the
/// operation.
///
/// Runs before any network activity; undeclared names return
/// [`ClientError::UnexpectedParameter`].
pub fn validate_query(
    operation: &OperationDefinition,
    query: &[(&str, &str)],
) -> Result<(), ClientError> {
    for (name, _) in query {
        if !operation.query_params.iter().any(|param| param.name == *name) {
            return Err(ClientError::UnexpectedParameter {
                operation_id: operation.operation_id.to_owned(),
                parameter: (*name).to_owned(),
            });
        }
    }
    Ok(())
}

/// Picks the `Accept` header value from an operation's declared response
/// content types.
///
/// Prefers a JSON type when one is declared, otherwise joins all declared
/// types. Returns `None` when the operation declares none.
pub fn select_header_accept(accepts: &[&str]) -> Option<String> {
    if accepts.is_empty() {
        return None;
    }
    accepts
        .iter()
        .find(|content_type| content_type.to_ascii_lowercase().contains("json"))
        .map_or_else(|| Some(accepts.join(", ")), |json| Some((*json).to_owned()))
}

fn encode_path_segment(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        CollectionFormat, OPERATIONS, find_operation, render_path, select_header_accept,
        validate_query,
    };
    use crate::ClientError;

    #[test]
    fn operation_catalog_is_non_empty() {
        assert!(!OPERATIONS.is_empty());
    }

    #[test]
    fn render_path_replaces_required_path_params() {
        let op = find_operation("getTx").expect("operation exists");
        let path = render_path(op, &[("tx_hash", "th$abc")]).expect("path renders");
        assert_eq!(path, "/tx/th%24abc");
    }

    #[test]
    fn render_path_reports_missing_parameter() {
        let op = find_operation("getTx").expect("operation exists");
        let error = render_path(op, &[]).expect_err("missing parameter should error");
        match error {
            ClientError::MissingPathParameter {
                operation_id,
                parameter,
            } => {
                assert_eq!(operation_id, "getTx");
                assert_eq!(parameter, "tx_hash");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn render_path_rejects_undeclared_parameter() {
        let op = find_operation("getTop").expect("operation exists");
        let error = render_path(op, &[("height", "7")]).expect_err("undeclared name");
        match error {
            ClientError::UnexpectedParameter { parameter, .. } => {
                assert_eq!(parameter, "height");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_query_rejects_undeclared_parameter() {
        let op = find_operation("getAccountBalance").expect("operation exists");
        assert!(validate_query(op, &[("pub_key", "ak$abc")]).is_ok());

        let error =
            validate_query(op, &[("pubkey", "ak$abc")]).expect_err("undeclared name");
        match error {
            ClientError::UnexpectedParameter {
                operation_id,
                parameter,
            } => {
                assert_eq!(operation_id, "getAccountBalance");
                assert_eq!(parameter, "pubkey");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_operation_id_is_reported() {
        let error = find_operation("mineBlock").expect_err("not in catalog");
        match error {
            ClientError::UnknownOperation(id) => assert_eq!(id, "mineBlock"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collection_formats_join_as_declared() {
        let values = ["spend_tx", "coinbase_tx"];
        let mut csv = Vec::new();
        CollectionFormat::Csv.encode("tx_types", &values, &mut csv);
        assert_eq!(csv, [("tx_types".to_owned(), "spend_tx,coinbase_tx".to_owned())]);

        let mut ssv = Vec::new();
        CollectionFormat::Ssv.encode("tx_types", &values, &mut ssv);
        assert_eq!(ssv[0].1, "spend_tx coinbase_tx");

        let mut tsv = Vec::new();
        CollectionFormat::Tsv.encode("tx_types", &values, &mut tsv);
        assert_eq!(tsv[0].1, "spend_tx\tcoinbase_tx");

        let mut pipes = Vec::new();
        CollectionFormat::Pipes.encode("tx_types", &values, &mut pipes);
        assert_eq!(pipes[0].1, "spend_tx|coinbase_tx");

        let mut multi = Vec::new();
        CollectionFormat::Multi.encode("tx_types", &values, &mut multi);
        assert_eq!(multi.len(), 2);
        assert_eq!(multi[1], ("tx_types".to_owned(), "coinbase_tx".to_owned()));
    }

    #[test]
    fn empty_collection_encodes_to_nothing() {
        let mut out = Vec::new();
        CollectionFormat::Csv.encode("tx_types", &[], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn accept_negotiation_prefers_json() {
        assert_eq!(
            select_header_accept(&["application/xml", "application/json"]).as_deref(),
            Some("application/json")
        );
        assert_eq!(
            select_header_accept(&["text/plain", "application/xml"]).as_deref(),
            Some("text/plain, application/xml")
        );
        assert_eq!(select_header_accept(&[]), None);
    }
}
