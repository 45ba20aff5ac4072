//! Summarizer session
//!
//! One explicit state object per session, owned by `SummarizerSession`
//! and shared with the components through their method arguments. The
//! state lock is never held across the network call.

use super::acknowledgment::{AckSlot, AcknowledgmentTimers};
use super::client::SummarizeTransport;
use super::error::{ExportError, SelectionError, SubmitError};
use super::export::{suggested_base_name, ClipboardPort, ExportService};
use super::orchestrator::SummarizationOrchestrator;
use super::selection::{FileSelectionManager, SelectionPolicy};
use super::types::{
    CombinedSummary, ReconciledOutcome, RequestState, SelectedFile, SummaryItem, SummaryLength,
};
use super::view::{CombinedBlock, FileRow, ItemBlock, SessionView};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// What to do with a response whose selection changed while it was in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Drop the outcome; the (already cleared) result slot stays empty
    #[default]
    Discard,
    /// Show the outcome anyway
    Apply,
}

/// How a summarize call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizeStatus {
    Applied { items: usize, combined: bool },
    DiscardedStale,
}

/// Results of the most recent completed request
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub items: Vec<SummaryItem>,
    pub combined: Option<CombinedSummary>,
    pub completed_at: Option<DateTime<Local>>,
}

impl ResultSet {
    fn from_outcome(outcome: ReconciledOutcome) -> Self {
        Self {
            items: outcome.items,
            combined: outcome.combined,
            completed_at: Some(Local::now()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.combined.is_none()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    selection: FileSelectionManager,
    summary_length: SummaryLength,
    instructions: Option<String>,
    results: ResultSet,
}

/// Wiring for a new session
pub struct SessionOptions {
    pub selection_policy: SelectionPolicy,
    pub summary_length: SummaryLength,
    pub stale_policy: StalePolicy,
    pub ack_window: Duration,
    pub output_dir: PathBuf,
}

pub struct SummarizerSession {
    state: Mutex<SessionState>,
    orchestrator: SummarizationOrchestrator,
    export: ExportService,
    acks: AcknowledgmentTimers,
    stale_policy: StalePolicy,
}

impl SummarizerSession {
    pub fn new(
        options: SessionOptions,
        transport: Arc<dyn SummarizeTransport>,
        clipboard: Arc<dyn ClipboardPort>,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState {
                selection: FileSelectionManager::new(options.selection_policy),
                summary_length: options.summary_length,
                instructions: None,
                results: ResultSet::default(),
            }),
            orchestrator: SummarizationOrchestrator::new(transport),
            export: ExportService::new(clipboard, options.output_dir),
            acks: AcknowledgmentTimers::new(options.ack_window),
            stale_policy: options.stale_policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("[Session] State mutex was poisoned, recovering...");
            poisoned.into_inner()
        })
    }

    /// Results refer to a selection that no longer exists
    fn invalidate(&self, state: &mut SessionState) {
        state.results = ResultSet::default();
        self.acks.clear_all();
    }

    // ---- selection -------------------------------------------------------

    pub fn select_files(&self, files: Vec<SelectedFile>) -> Result<usize, SelectionError> {
        let mut state = self.lock();
        let result = state.selection.select(files);
        self.invalidate(&mut state);
        result
    }

    pub fn remove_file(&self, index: usize) -> Result<SelectedFile, SelectionError> {
        let mut state = self.lock();
        let removed = state.selection.remove(index)?;
        self.invalidate(&mut state);
        Ok(removed)
    }

    pub fn clear_files(&self) {
        let mut state = self.lock();
        state.selection.clear();
        self.invalidate(&mut state);
    }

    pub fn selected_files(&self) -> Vec<SelectedFile> {
        self.lock().selection.files().to_vec()
    }

    // ---- preferences -----------------------------------------------------

    pub fn set_summary_length(&self, length: SummaryLength) {
        self.lock().summary_length = length;
    }

    pub fn summary_length(&self) -> SummaryLength {
        self.lock().summary_length
    }

    pub fn set_instructions(&self, instructions: Option<String>) {
        self.lock().instructions = instructions.filter(|s| !s.trim().is_empty());
    }

    // ---- requests --------------------------------------------------------

    pub fn request_state(&self) -> RequestState {
        self.orchestrator.request_state()
    }

    /// Whether the submit trigger is enabled
    pub fn can_submit(&self) -> bool {
        !self.lock().selection.is_empty() && self.request_state() == RequestState::Idle
    }

    /// Submit the current selection and apply the outcome
    pub async fn summarize(&self) -> Result<SummarizeStatus, SubmitError> {
        let (ticket, snapshot, length, instructions) = {
            let mut state = self.lock();
            if state.selection.is_empty() {
                return Err(SubmitError::EmptySelection);
            }
            let ticket = self.orchestrator.begin()?;
            // Starting a request discards the previous results
            self.invalidate(&mut state);
            (
                ticket,
                state.selection.snapshot(),
                state.summary_length,
                state.instructions.clone(),
            )
        };

        tracing::info!(
            request_id = %ticket.request_id(),
            files = snapshot.files.len(),
            length = length.as_str(),
            "[Session] Summarizing selection"
        );

        let outcome = self
            .orchestrator
            .dispatch(ticket, &snapshot.files, length, instructions.as_deref())
            .await?;

        let mut state = self.lock();
        if state.selection.generation() != snapshot.generation {
            match self.stale_policy {
                StalePolicy::Discard => {
                    tracing::info!(
                        "[Session] Selection changed while summarizing, discarding response"
                    );
                    return Ok(SummarizeStatus::DiscardedStale);
                }
                StalePolicy::Apply => {
                    tracing::warn!("[Session] Applying response to a changed selection");
                }
            }
        }

        let status = SummarizeStatus::Applied {
            items: outcome.items.len(),
            combined: outcome.combined.is_some(),
        };
        state.results = ResultSet::from_outcome(outcome);
        Ok(status)
    }

    pub fn results(&self) -> ResultSet {
        self.lock().results.clone()
    }

    // ---- export ----------------------------------------------------------

    fn item_text(state: &SessionState, index: usize) -> Result<(String, String), ExportError> {
        let item = state
            .results
            .items
            .get(index)
            .ok_or(ExportError::NothingToExport)?;
        let text = item
            .exportable_text()
            .ok_or(ExportError::NothingToExport)?
            .to_string();
        Ok((item.filename.clone(), text))
    }

    fn combined_text(state: &SessionState) -> Result<String, ExportError> {
        state
            .results
            .combined
            .as_ref()
            .map(|c| c.as_str().to_string())
            .ok_or(ExportError::NothingToExport)
    }

    // The acknowledgment is raised under the state guard so an invalidation
    // cannot land between reading the text and flagging the slot.
    pub fn copy_item(&self, index: usize) -> Result<(), ExportError> {
        let state = self.lock();
        let (_, text) = Self::item_text(&state, index)?;
        self.export.copy(&text)?;
        self.acks.acknowledge(AckSlot::Item(index));
        Ok(())
    }

    pub fn copy_combined(&self) -> Result<(), ExportError> {
        let state = self.lock();
        let text = Self::combined_text(&state)?;
        self.export.copy(&text)?;
        self.acks.acknowledge(AckSlot::Combined);
        Ok(())
    }

    pub fn download_item(&self, index: usize) -> Result<PathBuf, ExportError> {
        let (filename, text) = Self::item_text(&self.lock(), index)?;
        self.export
            .download(&text, &suggested_base_name(&filename, index))
    }

    pub fn download_combined(&self) -> Result<PathBuf, ExportError> {
        let text = Self::combined_text(&self.lock())?;
        self.export.download_combined(&text)
    }

    pub fn is_copied(&self, slot: AckSlot) -> bool {
        self.acks.is_acknowledged(slot)
    }

    // ---- presentation ----------------------------------------------------

    /// Snapshot of everything the front end renders
    pub fn view(&self) -> SessionView {
        let loading = self.request_state() == RequestState::InFlight;
        let state = self.lock();

        let files = state
            .selection
            .files()
            .iter()
            .map(|f| FileRow {
                name: f.name().to_string(),
                size_label: f.size_label(),
                supported: f.is_supported_document(),
            })
            .collect();

        let items = state
            .results
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemBlock {
                title: item.display_name(index),
                summary: item.exportable_text().map(|s| s.to_string()),
                error: item.error.clone(),
                metadata: item.metadata.as_ref().and_then(|m| m.label()),
                copied: self.acks.is_acknowledged(AckSlot::Item(index)),
            })
            .collect();

        let combined = state.results.combined.as_ref().map(|c| CombinedBlock {
            text: c.as_str().to_string(),
            copied: self.acks.is_acknowledged(AckSlot::Combined),
        });

        SessionView {
            files,
            summary_length: state.summary_length,
            instructions: state.instructions.clone(),
            loading,
            can_submit: !loading && !state.selection.is_empty(),
            combined,
            items,
            completed_at: state.results.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::export::tests::MemoryClipboard;
    use crate::summarizer::orchestrator::tests::FakeTransport;
    use crate::summarizer::types::ServiceResponse;
    use tokio::sync::Notify;

    fn options(dir: &std::path::Path, stale_policy: StalePolicy) -> SessionOptions {
        SessionOptions {
            selection_policy: SelectionPolicy::default(),
            summary_length: SummaryLength::Medium,
            stale_policy,
            ack_window: Duration::from_secs(2),
            output_dir: dir.to_path_buf(),
        }
    }

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, name.as_bytes().to_vec())
    }

    fn paper_reply() -> ServiceResponse {
        ServiceResponse {
            summaries: Some(vec![SummaryItem::success("paper.pdf", "X")]),
            combined_summary: Some("Y".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_length_survives_selection_changes() {
        let dir = tempfile::tempdir().unwrap();
        let session = SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            Arc::new(FakeTransport::new(vec![])),
            Arc::new(MemoryClipboard::default()),
        );
        session.set_summary_length(SummaryLength::Long);
        session.select_files(vec![file("a.pdf")]).unwrap();
        session.clear_files();
        assert_eq!(session.summary_length(), SummaryLength::Long);
    }

    #[tokio::test]
    async fn test_request_carries_length_and_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::new(vec![FakeTransport::ok(paper_reply())]));
        let session = SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            transport.clone(),
            Arc::new(MemoryClipboard::default()),
        );
        session.select_files(vec![file("paper.pdf")]).unwrap();
        session.set_summary_length(SummaryLength::Short);
        session.set_instructions(Some("Focus on methods".to_string()));

        session.summarize().await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].length, SummaryLength::Short);
        assert_eq!(seen[0].instructions.as_deref(), Some("Focus on methods"));
    }

    #[tokio::test]
    async fn test_summarize_empty_selection_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let session = SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            Arc::new(FakeTransport::new(vec![])),
            Arc::new(MemoryClipboard::default()),
        );
        assert!(!session.can_submit());
        assert_eq!(session.summarize().await, Err(SubmitError::EmptySelection));
    }

    #[tokio::test]
    async fn test_copy_errored_item_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let clipboard = Arc::new(MemoryClipboard::default());
        let session = SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            Arc::new(FakeTransport::new(vec![FakeTransport::status(
                400,
                ServiceResponse::default(),
            )])),
            clipboard.clone(),
        );
        session.select_files(vec![file("paper.pdf")]).unwrap();
        session.summarize().await.unwrap();

        assert!(matches!(
            session.copy_item(0),
            Err(ExportError::NothingToExport)
        ));
        assert!(matches!(
            session.download_item(0),
            Err(ExportError::NothingToExport)
        ));
        assert!(clipboard.contents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_request_discards_previous_results_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(FakeTransport::gated(
            vec![
                FakeTransport::ok(paper_reply()),
                FakeTransport::ok(paper_reply()),
            ],
            gate.clone(),
        ));
        let session = Arc::new(SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            transport.clone(),
            Arc::new(MemoryClipboard::default()),
        ));
        session.select_files(vec![file("paper.pdf")]).unwrap();

        // Stored permit lets the first request straight through
        gate.notify_one();
        session.summarize().await.unwrap();
        session.copy_combined().unwrap();
        assert!(session.is_copied(AckSlot::Combined));

        let running = {
            let session = session.clone();
            tokio::spawn(async move { session.summarize().await })
        };
        while transport.seen.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }

        assert!(session.results().is_empty());
        assert!(!session.is_copied(AckSlot::Combined));
        let view = session.view();
        assert!(view.loading);
        assert!(view.render().contains("Generating summaries..."));

        gate.notify_one();
        running.await.unwrap().unwrap();
        assert!(!session.results().is_empty());
    }

    #[tokio::test]
    async fn test_copy_during_request_raises_no_flag() {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let clipboard = Arc::new(MemoryClipboard::default());
        let transport = Arc::new(FakeTransport::gated(
            vec![
                FakeTransport::ok(paper_reply()),
                FakeTransport::ok(paper_reply()),
            ],
            gate.clone(),
        ));
        let session = Arc::new(SummarizerSession::new(
            options(dir.path(), StalePolicy::Discard),
            transport.clone(),
            clipboard.clone(),
        ));
        session.select_files(vec![file("paper.pdf")]).unwrap();
        gate.notify_one();
        session.summarize().await.unwrap();

        let running = {
            let session = session.clone();
            tokio::spawn(async move { session.summarize().await })
        };
        while transport.seen.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            session.copy_combined(),
            Err(ExportError::NothingToExport)
        ));
        assert!(matches!(
            session.copy_item(0),
            Err(ExportError::NothingToExport)
        ));
        assert!(!session.is_copied(AckSlot::Combined));
        assert!(!session.is_copied(AckSlot::Item(0)));
        assert!(clipboard.contents.lock().unwrap().is_empty());

        gate.notify_one();
        running.await.unwrap().unwrap();
    }

    async fn run_with_mid_flight_change(policy: StalePolicy) -> (SummarizeStatus, ResultSet) {
        let dir = tempfile::tempdir().unwrap();
        let gate = Arc::new(Notify::new());
        let session = Arc::new(SummarizerSession::new(
            options(dir.path(), policy),
            Arc::new(FakeTransport::gated(
                vec![FakeTransport::ok(paper_reply())],
                gate.clone(),
            )),
            Arc::new(MemoryClipboard::default()),
        ));
        session.select_files(vec![file("paper.pdf")]).unwrap();

        let running = {
            let session = session.clone();
            tokio::spawn(async move { session.summarize().await })
        };
        while session.request_state() != RequestState::InFlight {
            tokio::task::yield_now().await;
        }
        assert!(!session.can_submit());

        session.select_files(vec![file("other.pdf")]).unwrap();
        gate.notify_one();

        let status = running.await.unwrap().unwrap();
        (status, session.results())
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded_by_default() {
        let (status, results) = run_with_mid_flight_change(StalePolicy::Discard).await;
        assert_eq!(status, SummarizeStatus::DiscardedStale);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_applied_when_configured() {
        let (status, results) = run_with_mid_flight_change(StalePolicy::Apply).await;
        assert_eq!(
            status,
            SummarizeStatus::Applied {
                items: 1,
                combined: true
            }
        );
        assert_eq!(results.items.len(), 1);
    }
}
