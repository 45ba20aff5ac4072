//! Summarization service client
//!
//! Builds the multipart upload and decodes the JSON reply. Application
//! errors (non-2xx with an `error` field) come back as a normal
//! `ServerReply`; only failures to get or decode a reply are errors.

use super::error::TransportError;
use super::types::{SelectedFile, ServerReply, ServiceResponse, SummaryLength};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use uuid::Uuid;

/// Form field repeated once per uploaded document
pub const FILES_FIELD: &str = "files";
/// Scalar form field carrying the summary length
pub const LENGTH_FIELD: &str = "length";
/// Optional free-text guidance for the summarizer
pub const INSTRUCTIONS_FIELD: &str = "instructions";

/// One upload to the service
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub request_id: Uuid,
    pub files: Vec<SelectedFile>,
    pub length: SummaryLength,
    pub instructions: Option<String>,
}

#[async_trait]
pub trait SummarizeTransport: Send + Sync {
    async fn send(&self, request: &SummarizeRequest) -> Result<ServerReply, TransportError>;
}

/// reqwest-backed transport posting to a fixed endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(crate::http_client::summarizer_client().clone(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build the multipart body: every file under the shared field, then the scalars
fn build_form(request: &SummarizeRequest) -> Result<Form, TransportError> {
    let mut form = Form::new();

    for file in &request.files {
        let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        form = form.part(FILES_FIELD, part);
    }

    form = form.text(LENGTH_FIELD, request.length.as_str());

    if let Some(instructions) = request
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        form = form.text(INSTRUCTIONS_FIELD, instructions.to_string());
    }

    Ok(form)
}

#[async_trait]
impl SummarizeTransport for HttpTransport {
    async fn send(&self, request: &SummarizeRequest) -> Result<ServerReply, TransportError> {
        let form = build_form(request)?;

        tracing::info!(
            request_id = %request.request_id,
            files = request.files.len(),
            length = request.length.as_str(),
            "[Client] Uploading documents"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::Unreachable)?;

        let status = response.status().as_u16();

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedBody(e.to_string()))?;

        let body = ServiceResponse::from_json(&value);

        tracing::debug!(
            request_id = %request.request_id,
            status,
            "[Client] Response decoded"
        );

        Ok(ServerReply { status, body })
    }
}
