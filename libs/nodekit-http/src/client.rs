use crate::error::{RestClientError, UnexpectedStatusError};
use bytes::Bytes;
use http::{Method, Request, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Plain-HTTP client bound to one base URL.
///
/// `RestClient` is `Clone + Send + Sync`; clones share the connection pool,
/// so derived views (for example a membership view over the coordination
/// store) should be built by cloning an existing client rather than by
/// constructing a new one.
#[derive(Clone)]
pub struct RestClient {
    base_url: Url,
    inner: Client<HttpConnector, Full<Bytes>>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for `base_url` (must be `http://host[:port]`).
    ///
    /// No connection is opened here.
    ///
    /// # Errors
    /// Returns [`RestClientError::InvalidUrl`] if the URL does not parse, is
    /// not `http`, or has no host.
    pub fn new(base_url: &str) -> Result<Self, RestClientError> {
        let invalid = |reason: String| RestClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.scheme() != "http" {
            return Err(invalid(format!(
                "scheme '{}' not supported, expected http",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_owned()));
        }

        let inner = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            base_url: parsed,
            inner,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url_for(&self, path: &str) -> Result<Url, RestClientError> {
        self.base_url
            .join(path)
            .map_err(|e| RestClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Send a request and return the raw response body.
    ///
    /// `body`, when present, is sent as `application/json`.
    ///
    /// # Errors
    /// - [`RestClientError::UnexpectedStatus`] if the status differs from `expected`
    /// - [`RestClientError::Transport`] on connection or body read failures
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        expected: StatusCode,
    ) -> Result<Bytes, RestClientError> {
        let url = self.url_for(path)?;

        let mut builder = Request::builder().method(method.clone()).uri(url.as_str());
        let body = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Full::new(bytes)
            }
            None => Full::new(Bytes::new()),
        };
        let request = builder.body(body)?;

        tracing::debug!(%method, %url, "sending request");
        let response = self.inner.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        if status != expected {
            tracing::debug!(
                %method,
                %url,
                expected = expected.as_u16(),
                actual = status.as_u16(),
                "unexpected response status"
            );
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(UnexpectedStatusError::new(expected.as_u16(), status.as_u16(), body).into());
        }

        Ok(bytes)
    }

    /// `GET path` and decode the JSON response.
    ///
    /// # Errors
    /// See [`RestClient::send`]; additionally [`RestClientError::Json`] if the
    /// body is not valid JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        expected: StatusCode,
    ) -> Result<T, RestClientError> {
        let bytes = self.send(Method::GET, path, None, expected).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `POST path` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    /// See [`RestClient::get_json`].
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T, RestClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let bytes = self.send(Method::POST, path, Some(payload), expected).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `DELETE path`, discarding the response body.
    ///
    /// # Errors
    /// See [`RestClient::send`].
    pub async fn delete(&self, path: &str, expected: StatusCode) -> Result<(), RestClientError> {
        self.send(Method::DELETE, path, None, expected).await?;
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_empty_host() {
        let err = RestClient::new("http://:2379").unwrap_err();
        assert!(matches!(err, RestClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_new_rejects_garbage_and_https() {
        assert!(matches!(
            RestClient::new("not a url"),
            Err(RestClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            RestClient::new("https://10.0.0.1:2379"),
            Err(RestClientError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_json_expected_status() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/version");
            then.status(200).json_body(json!({"api_version": 1}));
        });

        let client = RestClient::new(&server.base_url()).unwrap();
        let v: serde_json::Value = client.get_json("/version", StatusCode::OK).await.unwrap();

        assert_eq!(v["api_version"], 1);
        m.assert();
    }

    #[tokio::test]
    async fn test_status_mismatch_returns_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/peers/abc");
            then.status(404).body("not found");
        });

        let client = RestClient::new(&server.base_url()).unwrap();
        let err = client
            .get_json::<serde_json::Value>("/peers/abc", StatusCode::OK)
            .await
            .unwrap_err();

        let status = err.as_unexpected_status().unwrap();
        assert_eq!(status.expected(), 200);
        assert_eq!(status.actual(), 404);
        assert_eq!(err.to_string(), "not found (expected=200 actual=404)");
    }

    #[tokio::test]
    async fn test_status_mismatch_is_not_retried() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(DELETE).path("/peers/abc");
            then.status(503).body("busy");
        });

        let client = RestClient::new(&server.base_url()).unwrap();
        let result = client.delete("/peers/abc", StatusCode::NO_CONTENT).await;

        assert!(result.is_err());
        m.assert_hits(1);
    }

    #[tokio::test]
    async fn test_post_json_sends_content_type() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/peers")
                .header("content-type", "application/json")
                .json_body(json!({"addresses": ["10.0.0.2"]}));
            then.status(201).json_body(json!({"id": "p1"}));
        });

        let client = RestClient::new(&server.base_url()).unwrap();
        let created: serde_json::Value = client
            .post_json(
                "/peers",
                &json!({"addresses": ["10.0.0.2"]}),
                StatusCode::CREATED,
            )
            .await
            .unwrap();

        assert_eq!(created["id"], "p1");
        m.assert();
    }

    #[tokio::test]
    async fn test_transport_error_on_closed_port() {
        // Port 9 (discard) is almost never listening on loopback
        let client = RestClient::new("http://127.0.0.1:9").unwrap();
        let err = client.delete("/x", StatusCode::OK).await.unwrap_err();
        assert!(matches!(err, RestClientError::Transport(_)));
    }
}
