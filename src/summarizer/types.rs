//! Shared types for the summarization client

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Extensions the summarization service knows how to read.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// A locally chosen document
///
/// Content is shared, so snapshotting a selection for a request
/// never copies file bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    name: String,
    content: Arc<Vec<u8>>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: Arc::new(content),
        }
    }

    /// Read a document from disk, keeping only its file name
    pub async fn load(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Size in KiB with one decimal, e.g. "12.5 KB"
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size() as f64 / 1024.0)
    }

    pub fn is_supported_document(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// Requested summary length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Label shown in the length picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Medium => "Medium",
            Self::Long => "Detailed",
        }
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" | "detailed" => Ok(Self::Long),
            other => Err(format!(
                "Unknown summary length '{}' (expected short, medium or long)",
                other
            )),
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata the service attaches to a per-file result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub filetype: Option<String>,
    pub pages: Option<u32>,
    pub paragraphs: Option<u32>,
}

impl DocumentMetadata {
    /// `None` unless `value` is an object; counts may arrive as numbers or numeric strings
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            filetype: non_empty_string(object.get("filetype")),
            pages: count_field(object.get("pages")),
            paragraphs: count_field(object.get("paragraphs")),
        })
    }

    /// Short description such as "pdf, 12 pages"
    pub fn label(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(filetype) = &self.filetype {
            parts.push(filetype.clone());
        }
        if let Some(pages) = self.pages {
            parts.push(format!("{} pages", pages));
        }
        if let Some(paragraphs) = self.paragraphs {
            parts.push(format!("{} paragraphs", paragraphs));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Result for one submitted file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryItem {
    pub filename: String,
    pub summary: Option<String>,
    pub error: Option<String>,
    pub metadata: Option<DocumentMetadata>,
}

impl SummaryItem {
    /// Read one `summaries` entry field by field
    ///
    /// A mistyped field only loses that field. Non-object entries yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            filename: object
                .get("filename")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            summary: object
                .get("summary")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            error: non_empty_string(object.get("error")),
            metadata: object.get("metadata").and_then(DocumentMetadata::from_json),
        })
    }

    pub fn success(filename: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    /// Synthetic item standing in for a whole failed request
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text offered to copy/download. Errored and empty items have none.
    pub fn exportable_text(&self) -> Option<&str> {
        if self.is_error() {
            return None;
        }
        self.summary.as_deref().filter(|s| !s.is_empty())
    }

    /// Name shown for the item, falling back to "File {n}" (1-based)
    pub fn display_name(&self, index: usize) -> String {
        if self.filename.is_empty() {
            format!("File {}", index + 1)
        } else {
            self.filename.clone()
        }
    }
}

/// Integrated summary spanning every submitted document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedSummary(String);

impl CombinedSummary {
    /// Returns `None` for blank text
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle of the single outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
}

/// Decoded JSON body of a service response
///
/// Each recognized field is picked independently; fields of an
/// unexpected JSON type are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceResponse {
    pub summaries: Option<Vec<SummaryItem>>,
    pub summary: Option<String>,
    pub combined_summary: Option<String>,
    pub error: Option<String>,
}

impl ServiceResponse {
    pub fn from_json(value: &Value) -> Self {
        let summaries = match value.get("summaries") {
            Some(Value::Array(entries)) => Some(
                entries
                    .iter()
                    .filter_map(|entry| {
                        let item = SummaryItem::from_json(entry);
                        if item.is_none() {
                            tracing::warn!(entry = %entry, "[Client] Skipping non-object summary entry");
                        }
                        item
                    })
                    .collect(),
            ),
            _ => None,
        };

        Self {
            summaries,
            summary: non_empty_string(value.get("summary")),
            combined_summary: value
                .get("combined_summary")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            error: non_empty_string(value.get("error")),
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn count_field(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// HTTP status plus decoded body
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub status: u16,
    pub body: ServiceResponse,
}

impl ServerReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalized outcome of one completed request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciledOutcome {
    pub items: Vec<SummaryItem>,
    pub combined: Option<CombinedSummary>,
}

impl ReconciledOutcome {
    /// Single synthetic error item, no combined summary
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            items: vec![SummaryItem::failure(message)],
            combined: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.combined.is_none()
    }
}
