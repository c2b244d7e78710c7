use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub type Headers = Vec<(&'static str, String)>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two request shapes the bookmark service needs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &Value,
    ) -> Result<HttpResponse, TransportError>;

    async fn post_form(
        &self,
        url: &str,
        headers: &Headers,
        fields: &[(&'static str, String)],
    ) -> Result<HttpResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse, TransportError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

fn apply_headers(mut request: reqwest::RequestBuilder, headers: &Headers) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, value);
    }
    request
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, headers, body).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &Headers,
        fields: &[(&'static str, String)],
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, headers, fields).await
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        let request = apply_headers(self.client.post(url), headers).json(body);
        self.send(request).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &Headers,
        fields: &[(&'static str, String)],
    ) -> Result<HttpResponse, TransportError> {
        let request = apply_headers(self.client.post(url), headers).form(fields);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn requests_time_out_after_ten_seconds() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn post_json_sends_headers_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/fetch-metadata")
            .match_header("cookie", "session=abc")
            .match_body(Matcher::Json(serde_json::json!({"url": "https://foo.com"})))
            .with_status(200)
            .with_body(r#"{"metadata":{}}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_json(
                &format!("{}/api/fetch-metadata", server.url()),
                &vec![("Cookie", "session=abc".to_string())],
                &serde_json::json!({"url": "https://foo.com"}),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"metadata":{}}"#);
    }

    #[tokio::test]
    async fn post_form_url_encodes_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/form")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("title".into(), "A & B".into()),
                Matcher::UrlEncoded("note".into(), "".into()),
            ]))
            .with_status(500)
            .create_async()
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_form(
                &format!("{}/form", server.url()),
                &Vec::new(),
                &[("title", "A & B".to_string()), ("note", String::new())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 500);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let transport = ReqwestTransport::with_timeout(Duration::from_millis(500)).unwrap();
        let err = transport
            .post_json("http://127.0.0.1:9/", &Vec::new(), &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Network(_) | TransportError::Timeout
        ));
    }
}
