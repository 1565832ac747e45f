use thiserror::Error;

/// Errors returned by Epoch client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL is not a valid absolute URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Endpoint path could not be joined to the base URL.
    #[error("invalid endpoint path '{0}'")]
    InvalidPath(String),

    /// The requested operation id is not present in the catalog.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// A required path template parameter was not provided.
    #[error("missing required path parameter '{parameter}' for operation '{operation_id}'")]
    MissingPathParameter {
        operation_id: String,
        parameter: String,
    },

    /// The catalog entry for an operation declares a malformed HTTP method.
    #[error("invalid HTTP method '{method}' declared by operation '{operation_id}'")]
    InvalidMethod {
        operation_id: String,
        method: String,
    },

    /// A parameter name not declared by the operation was supplied.
    ///
    /// Raised before any network activity.
    #[error("unexpected parameter '{parameter}' for operation '{operation_id}'")]
    UnexpectedParameter {
        operation_id: String,
        parameter: String,
    },

    /// HTTP transport-layer request failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body could not be parsed as JSON or did not match the
    /// operation's declared response model.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP status with response payload.
    #[error("node returned status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}
