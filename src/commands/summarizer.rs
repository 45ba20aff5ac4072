//! Summarizer Commands
//!
//! Front-end entry points for the summarization session. Every command
//! returns `Result<T, String>` so the caller can show the message as-is.

use crate::summarizer::{
    SelectedFile, SessionView, SummarizeStatus, SummarizerSession, SummaryLength,
    SAMPLE_SUMMARY,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handle to the session
#[derive(Clone)]
pub struct SummarizerState(pub Arc<SummarizerSession>);

impl SummarizerState {
    pub fn new(session: SummarizerSession) -> Self {
        Self(Arc::new(session))
    }
}

/// Read files from disk and replace the current selection with them
pub async fn summarizer_select_files(
    paths: Vec<PathBuf>,
    state: &SummarizerState,
) -> Result<Vec<String>, String> {
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let file = SelectedFile::load(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        if !file.is_supported_document() {
            tracing::warn!(file = file.name(), "[Summarizer] Unsupported file type selected");
        }
        files.push(file);
    }

    state.0.select_files(files).map_err(|e| e.to_string())?;

    let names: Vec<String> = state
        .0
        .selected_files()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    tracing::info!(count = names.len(), "[Summarizer] Selection updated");
    Ok(names)
}

/// Remove the file at a 0-based position
pub fn summarizer_remove_file(index: usize, state: &SummarizerState) -> Result<String, String> {
    let removed = state.0.remove_file(index).map_err(|e| e.to_string())?;
    Ok(removed.name().to_string())
}

pub fn summarizer_clear_files(state: &SummarizerState) -> Result<(), String> {
    state.0.clear_files();
    Ok(())
}

pub fn summarizer_set_length(
    length: String,
    state: &SummarizerState,
) -> Result<SummaryLength, String> {
    let length: SummaryLength = length.parse()?;
    state.0.set_summary_length(length);
    Ok(length)
}

pub fn summarizer_set_instructions(
    instructions: Option<String>,
    state: &SummarizerState,
) -> Result<(), String> {
    state.0.set_instructions(instructions);
    Ok(())
}

/// Submit the selection; failures of the request itself land in the results
pub async fn summarizer_summarize(state: &SummarizerState) -> Result<SummarizeStatus, String> {
    state.0.summarize().await.map_err(|e| e.to_string())
}

/// Copy a per-file summary (0-based position)
pub fn summarizer_copy(index: usize, state: &SummarizerState) -> Result<(), String> {
    state.0.copy_item(index).map_err(|e| e.to_string())
}

pub fn summarizer_copy_combined(state: &SummarizerState) -> Result<(), String> {
    state.0.copy_combined().map_err(|e| e.to_string())
}

/// Save a per-file summary and return where it was written
pub fn summarizer_download(index: usize, state: &SummarizerState) -> Result<String, String> {
    state
        .0
        .download_item(index)
        .map(|p| p.to_string_lossy().to_string())
        .map_err(|e| e.to_string())
}

pub fn summarizer_download_combined(state: &SummarizerState) -> Result<String, String> {
    state
        .0
        .download_combined()
        .map(|p| p.to_string_lossy().to_string())
        .map_err(|e| e.to_string())
}

pub fn summarizer_view(state: &SummarizerState) -> Result<SessionView, String> {
    Ok(state.0.view())
}

/// The view model as JSON, camelCase like the rendered DTOs
pub fn summarizer_view_json(state: &SummarizerState) -> Result<String, String> {
    serde_json::to_string_pretty(&state.0.view())
        .map_err(|e| format!("Failed to serialize view: {}", e))
}

/// Static preview text; never touches the session
pub fn summarizer_example() -> &'static str {
    SAMPLE_SUMMARY
}
