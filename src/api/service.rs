use serde::Deserialize;
use serde_json::Value;

use crate::api::transport::{Headers, HttpTransport, TransportError};
use crate::domain::bookmark::{BookmarkForm, Metadata, WorkItem};
use crate::infra::config::Config;

const FETCH_METADATA_PATH: &str = "/api/fetch-metadata";
const ADD_BOOKMARK_PATH: &str = "/?/addNewBookmark";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
    #[error("bookmark rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Fetch,
    Bookmark,
}

#[derive(Deserialize)]
struct FetchMetadataResponse {
    metadata: Metadata,
}

/// Client for the two endpoints of the bookmarking service.
pub struct ServiceClient<T> {
    transport: T,
    base_url: String,
    auth_cookie: String,
    default_image: String,
}

impl<T: HttpTransport> ServiceClient<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            auth_cookie: config.auth_cookie.clone(),
            default_image: config.default_image.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn headers(&self, kind: RequestKind) -> Headers {
        let mut headers = vec![
            ("Origin", self.base_url.clone()),
            ("Referer", format!("{}/", self.base_url)),
            ("User-Agent", USER_AGENT.to_string()),
            ("Cookie", self.auth_cookie.clone()),
        ];

        match kind {
            RequestKind::Fetch => {
                headers.push(("Accept", "*/*".to_string()));
                headers.push(("Content-Type", "application/json".to_string()));
            }
            RequestKind::Bookmark => {
                headers.push((
                    "Content-Type",
                    "application/x-www-form-urlencoded".to_string(),
                ));
                headers.push(("x-sveltekit-action", "true".to_string()));
                headers.push(("Accept", "application/json".to_string()));
            }
        }

        headers
    }

    pub async fn fetch_metadata(&self, item: &WorkItem) -> Result<Metadata, ServiceError> {
        let url = format!("{}{FETCH_METADATA_PATH}", self.base_url);
        let body = serde_json::json!({ "url": item.target_url() });

        let response = self
            .transport
            .post_json(&url, &self.headers(RequestKind::Fetch), &body)
            .await?;

        if !response.is_success() {
            return Err(ServiceError::Status(response.status));
        }

        let metadata = serde_json::from_str::<FetchMetadataResponse>(&response.body)
            .map(|parsed| parsed.metadata)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        if metadata.is_empty() {
            return Err(ServiceError::InvalidResponse("empty metadata".to_string()));
        }

        Ok(metadata)
    }

    pub async fn add_bookmark(&self, metadata: &Metadata) -> Result<(), ServiceError> {
        let url = format!("{}{ADD_BOOKMARK_PATH}", self.base_url);
        let form = BookmarkForm::from_metadata(metadata, &self.default_image);

        let response = self
            .transport
            .post_form(&url, &self.headers(RequestKind::Bookmark), &form.fields())
            .await?;

        if response.status != 200 {
            return Err(ServiceError::Status(response.status));
        }

        check_action_result(&response.body)
    }
}

/// Form actions can answer 200 and still report a failure in the envelope,
/// so a 200 alone is not enough: `type` of `failure` or `error` is rejected.
/// Bodies that are not JSON, or carry no `type`, fall back to the status.
fn check_action_result(body: &str) -> Result<(), ServiceError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };

    match value.get("type").and_then(Value::as_str) {
        Some(kind @ ("failure" | "error")) => {
            let detail = value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .or_else(|| {
                    value
                        .get("status")
                        .and_then(Value::as_u64)
                        .map(|status| format!("{kind} (status {status})"))
                })
                .unwrap_or_else(|| kind.to_string());
            Err(ServiceError::Rejected(detail))
        }
        _ => Ok(()),
    }
}
