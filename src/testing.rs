//! Scripted transport for exercising the pipeline without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::transport::{Headers, HttpResponse, HttpTransport, TransportError};

#[derive(Debug, Clone)]
pub enum Recorded {
    Json {
        url: String,
        headers: Headers,
        body: Value,
    },
    Form {
        url: String,
        headers: Headers,
        fields: Vec<(&'static str, String)>,
    },
}

impl Recorded {
    pub fn url(&self) -> &str {
        match self {
            Recorded::Json { url, .. } | Recorded::Form { url, .. } => url,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Recorded::Form { .. })
    }
}

/// Replies in FIFO order; an exhausted script answers with a network error.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.script.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, err: TransportError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self) -> Result<HttpResponse, TransportError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(Recorded::Json {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.clone(),
        });
        self.next()
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &Headers,
        fields: &[(&'static str, String)],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(Recorded::Form {
            url: url.to_string(),
            headers: headers.clone(),
            fields: fields.to_vec(),
        });
        self.next()
    }
}
