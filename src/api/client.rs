//! Authenticated HTTP client for the mail/calendar/contacts APIs
//!
//! Every request carries the bearer token plus instrumentation headers so a
//! request can be correlated with the provider's logs.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::{query::QuerySpec, ApiSurface};
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Patch)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// 2xx response with its parsed JSON body (`Null` when the body is empty)
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Unwrap the `value` array of an OData collection envelope.
    pub fn into_collection<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let status = self.status;
        let malformed = |reason: String, body: &Value| Error::MalformedResponse {
            status,
            reason,
            body: body.to_string(),
        };

        let value = match self.body.get("value") {
            Some(value) => value.clone(),
            None => return Err(malformed("response missing 'value'".into(), &self.body)),
        };

        serde_json::from_value(value)
            .map_err(|e| malformed(format!("unexpected item in 'value': {e}"), &self.body))
    }

    /// Deserialize the whole body as a single entity.
    pub fn into_entity<T: DeserializeOwned>(self) -> Result<T> {
        let status = self.status;
        serde_json::from_value(self.body.clone()).map_err(|e| Error::MalformedResponse {
            status,
            reason: e.to_string(),
            body: self.body.to_string(),
        })
    }
}

/// Client for one REST surface
pub struct ApiClient {
    http: reqwest::Client,
    surface: ApiSurface,
    base_url: String,
}

impl ApiClient {
    pub fn new(surface: ApiSurface) -> Self {
        Self::with_base_url(surface, surface.base_url())
    }

    /// Point the client at a different host, keeping the surface's spelling.
    pub fn with_base_url(surface: ApiSurface, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            surface,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn surface(&self) -> ApiSurface {
        self.surface
    }

    /// Absolute URL for a resource path such as `/me/events`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request. POST and PATCH always declare a JSON body; GET and
    /// DELETE never send one.
    pub async fn call(
        &self,
        method: HttpMethod,
        url: &str,
        access_token: &str,
        anchor_mailbox: Option<&str>,
        payload: Option<&Value>,
        query: Option<&QuerySpec>,
    ) -> Result<ApiResponse> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!("{:?} {} (client-request-id {})", method, url, request_id);

        let mut req = self
            .http
            .request(method.into(), url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .header("client-request-id", &request_id)
            .header("return-client-request-id", "true");

        if let Some(mailbox) = anchor_mailbox {
            req = req.header("X-AnchorMailbox", mailbox);
        }

        if let Some(query) = query {
            req = req.query(&query.to_params(self.surface));
        }

        if method.has_body() {
            req = req.header("Content-Type", "application/json");
            if let Some(payload) = payload {
                req = req.body(payload.to_string());
            }
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::debug!("{:?} {} failed with HTTP {}", method, url, status.as_u16());
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
                status: status.as_u16(),
                reason: format!("response is not valid JSON: {e}"),
                body: text.clone(),
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// GET a collection and unwrap its `value` array.
    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        anchor_mailbox: Option<&str>,
        query: &QuerySpec,
    ) -> Result<Vec<T>> {
        self.call(
            HttpMethod::Get,
            &self.url(path),
            access_token,
            anchor_mailbox,
            None,
            Some(query),
        )
        .await?
        .into_collection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_sends_standard_headers_and_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events"))
            .and(header("authorization", "Bearer tok"))
            .and(header("accept", "application/json"))
            .and(header("return-client-request-id", "true"))
            .and(header_exists("client-request-id"))
            .and(header("x-anchormailbox", "user@example.com"))
            .and(query_param("$top", "10"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(ApiSurface::Graph, server.uri());
        let query = QuerySpec::new().top(10);
        let resp = client
            .call(
                HttpMethod::Get,
                &client.url("/me/events"),
                "tok",
                Some("user@example.com"),
                Some(&serde_json::json!({"ignored": true})),
                Some(&query),
            )
            .await
            .unwrap();
        assert_eq!(resp.status, 200);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty());
        assert!(requests[0].headers.get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_post_sets_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/sendmail"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(202))
            .expect(2)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(ApiSurface::Graph, server.uri());
        let payload = serde_json::json!({"message": {"subject": "hi"}});
        let url = client.url("/me/sendmail");

        let resp = client
            .call(HttpMethod::Post, &url, "tok", None, Some(&payload), None)
            .await
            .unwrap();
        assert_eq!(resp.status, 202);
        assert_eq!(resp.body, Value::Null);

        // Content-Type is declared even without a payload
        client
            .call(HttpMethod::Post, &url, "tok", None, None, None)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent, payload);
        assert!(requests[0].headers.get("x-anchormailbox").is_none());
    }

    #[tokio::test]
    async fn test_client_request_id_is_fresh_per_call() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(ApiSurface::Graph, server.uri());
        let url = client.url("/me/messages/1");
        for _ in 0..2 {
            client
                .call(HttpMethod::Delete, &url, "tok", None, None, None)
                .await
                .unwrap();
        }

        let requests = server.received_requests().await.unwrap();
        let id = |i: usize| {
            requests[i]
                .headers
                .get("client-request-id")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string()
        };
        assert!(Uuid::parse_str(&id(0)).is_ok());
        assert_ne!(id(0), id(1));
    }

    #[tokio::test]
    async fn test_non_success_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(ApiSurface::Graph, server.uri());
        let err = client
            .call(
                HttpMethod::Patch,
                &client.url("/me/messages/1"),
                "tok",
                None,
                Some(&serde_json::json!({"isRead": true})),
                None,
            )
            .await
            .unwrap_err();

        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_collection_requires_value() {
        let resp = ApiResponse {
            status: 200,
            body: serde_json::json!({"items": []}),
        };
        let err = resp.into_collection::<Value>().unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { status: 200, .. }));
    }
}
