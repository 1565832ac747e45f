use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ClientError;

/// Full response metadata for callers that need more than the decoded body.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: T,
}

/// Generic async JSON REST client.
///
/// This client is transport-focused and does not know about the Epoch
/// operation catalog. For typed per-operation calls, use
/// [`crate::EpochClient`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    authorization_token: Option<String>,
    request_timeout: Option<Duration>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a new client with the given base URL.
    ///
    /// The URL is normalized to include a trailing slash, so relative endpoint
    /// paths join correctly.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url.as_ref())
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.as_ref().to_owned()))?;

        Ok(Self {
            base_url: ensure_trailing_slash(parsed),
            authorization_token: None,
            request_timeout: None,
            http: reqwest::Client::new(),
        })
    }

    /// Returns a new client with a raw access token attached to all requests.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.authorization_token = Some(token.into());
        self
    }

    /// Returns a new client with a per-request timeout applied to every call.
    ///
    /// No timeout is enforced otherwise.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sends a `GET` request and parses the response as JSON.
    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        self.request_json(Method::GET, path, None).await
    }

    /// Sends a `POST` request with a JSON body and parses the response as JSON.
    pub async fn post_json(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// Sends a request and parses the response as JSON.
    ///
    /// Use [`Self::request_json_with_query`] when query parameters are needed.
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.request_json_with_query(method, path, &[], body).await
    }

    /// Sends a request with query parameters and parses the response as JSON.
    ///
    /// Returns [`Value::Null`] for successful responses with an empty body.
    pub async fn request_json_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let owned: Vec<(String, String)> = query
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let response = self
            .send(method, path, &owned, None, body.as_ref())
            .await?;
        decode_payload(&response.body)
    }

    /// Sends a request and decodes the response body as `T`.
    ///
    /// An empty successful body decodes as JSON `null`, so no-content
    /// operations can use `T = ()`.
    pub async fn request_model<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        accept: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        self.request_model_with_info(method, path, query, accept, body)
            .await
            .map(|response| response.body)
    }

    /// Sends a request and decodes the response body as `T`, keeping response
    /// status and headers.
    pub async fn request_model_with_info<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        accept: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let response = self.send(method, path, query, accept, body).await?;
        let decoded = decode_model(&response.body)?;
        Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            body: decoded,
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        accept: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse<String>, ClientError> {
        let url = self.build_url(path)?;
        let mut request = self.http.request(method, url).header(
            reqwest::header::ACCEPT,
            accept.unwrap_or("application/json"),
        );

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        if let Some(token) = &self.authorization_token {
            request = request.bearer_auth(token);
        }

        if let Some(json_body) = body {
            request = request.json(json_body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status,
                body: payload,
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body: payload,
        })
    }

    fn build_url(&self, path: &str) -> Result<Url, ClientError> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|_| ClientError::InvalidPath(path.to_owned()))
    }
}

pub(crate) fn decode_payload(payload: &str) -> Result<Value, ClientError> {
    if payload.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(payload)?)
    }
}

pub(crate) fn decode_model<T: DeserializeOwned>(payload: &str) -> Result<T, ClientError> {
    if payload.trim().is_empty() {
        Ok(serde_json::from_str("null")?)
    } else {
        Ok(serde_json::from_str(payload)?)
    }
}

pub(crate) fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_owned();
        path.push('/');
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, decode_model, decode_payload};
    use crate::models::Top;

    #[test]
    fn joins_paths_from_base_with_nested_prefix() {
        let client = ApiClient::new("https://example.com/v2").expect("valid url");
        let resolved = client.build_url("top").expect("valid path");
        assert_eq!(resolved.as_str(), "https://example.com/v2/top");
    }

    #[test]
    fn empty_payload_decodes_to_null_and_unit() {
        assert!(decode_payload("  ").expect("decodes").is_null());
        decode_model::<()>("").expect("unit decodes from empty body");
    }

    #[test]
    fn typed_payload_decodes_declared_model() {
        let top: Top =
            decode_model(r#"{"height":7,"hash":"bh$abc"}"#).expect("decodes");
        assert_eq!(top.height, 7);
        assert_eq!(top.hash, "bh$abc");
        assert_eq!(top.prev_hash, None);
    }
}
