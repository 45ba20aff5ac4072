//! Result reconciliation
//!
//! Maps a successful service response onto the per-file list and the
//! optional combined summary. Pure: no I/O, no state.

use super::types::{CombinedSummary, ReconciledOutcome, SelectedFile, ServiceResponse, SummaryItem};

/// Name used for a legacy single summary when nothing was submitted
const FALLBACK_DOCUMENT_NAME: &str = "Document";

/// Reconcile a response against the files it was requested for
///
/// The per-file list comes from `summaries` verbatim, else from a legacy
/// scalar `summary`, else is empty. The combined summary is evaluated
/// independently and kept only when non-blank.
pub fn reconcile(response: &ServiceResponse, submitted: &[SelectedFile]) -> ReconciledOutcome {
    let items = if let Some(summaries) = &response.summaries {
        summaries.clone()
    } else if let Some(summary) = &response.summary {
        let filename = submitted
            .first()
            .map(|f| f.name())
            .unwrap_or(FALLBACK_DOCUMENT_NAME);
        vec![SummaryItem::success(filename, summary.clone())]
    } else {
        Vec::new()
    };

    let combined = response
        .combined_summary
        .as_deref()
        .and_then(|text| CombinedSummary::new(text));

    tracing::debug!(
        items = items.len(),
        combined = combined.is_some(),
        "[Reconciler] Reconciled response"
    );

    ReconciledOutcome { items, combined }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted() -> Vec<SelectedFile> {
        vec![
            SelectedFile::new("first.pdf", vec![1]),
            SelectedFile::new("second.docx", vec![2]),
        ]
    }

    fn summaries() -> Vec<SummaryItem> {
        vec![
            SummaryItem::success("first.pdf", "A"),
            SummaryItem {
                filename: "second.docx".to_string(),
                error: Some("File type not allowed".to_string()),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_summaries_only() {
        let response = ServiceResponse {
            summaries: Some(summaries()),
            ..Default::default()
        };
        let outcome = reconcile(&response, &submitted());
        assert_eq!(outcome.items, summaries());
        assert!(outcome.combined.is_none());
    }

    #[test]
    fn test_legacy_summary_uses_first_submitted_name() {
        let response = ServiceResponse {
            summary: Some("Legacy".to_string()),
            ..Default::default()
        };
        let outcome = reconcile(&response, &submitted());
        assert_eq!(outcome.items, vec![SummaryItem::success("first.pdf", "Legacy")]);
        assert!(outcome.combined.is_none());
    }

    #[test]
    fn test_legacy_summary_without_files_uses_fallback_name() {
        let response = ServiceResponse {
            summary: Some("Legacy".to_string()),
            ..Default::default()
        };
        let outcome = reconcile(&response, &[]);
        assert_eq!(outcome.items[0].filename, "Document");
    }

    #[test]
    fn test_combined_only() {
        let response = ServiceResponse {
            combined_summary: Some("Y".to_string()),
            ..Default::default()
        };
        let outcome = reconcile(&response, &submitted());
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.combined.unwrap().as_str(), "Y");
    }

    #[test]
    fn test_all_three_prefers_summaries_list() {
        let response = ServiceResponse {
            summaries: Some(summaries()),
            summary: Some("Legacy".to_string()),
            combined_summary: Some("Y".to_string()),
            error: None,
        };
        let outcome = reconcile(&response, &submitted());
        assert_eq!(outcome.items, summaries());
        assert_eq!(outcome.combined.unwrap().as_str(), "Y");
    }

    #[test]
    fn test_none_is_empty_state() {
        let outcome = reconcile(&ServiceResponse::default(), &submitted());
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_blank_combined_summary_is_absent() {
        let response = ServiceResponse {
            summaries: Some(Vec::new()),
            combined_summary: Some("  ".to_string()),
            ..Default::default()
        };
        let outcome = reconcile(&response, &submitted());
        assert!(outcome.is_empty());
    }
}
