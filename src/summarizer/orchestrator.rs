//! Summarization request orchestration
//!
//! Runs at most one request at a time. Transport failures and
//! server-reported failures are folded into a single synthetic error item,
//! so a completed `submit` always yields something to render.

use super::client::{SummarizeRequest, SummarizeTransport};
use super::error::SubmitError;
use super::reconciler::reconcile;
use super::types::{ReconciledOutcome, RequestState, SelectedFile, SummaryLength};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Shown when no usable response came back
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error: Could not reach the summarization server.";
/// Shown when the service failed without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to summarize files.";

/// Holds the in-flight slot; dropping it returns the orchestrator to idle
pub struct RequestTicket<'a> {
    in_flight: &'a AtomicBool,
    request_id: Uuid,
}

impl RequestTicket<'_> {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Drop for RequestTicket<'_> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

pub struct SummarizationOrchestrator {
    transport: Arc<dyn SummarizeTransport>,
    in_flight: AtomicBool,
}

impl SummarizationOrchestrator {
    pub fn new(transport: Arc<dyn SummarizeTransport>) -> Self {
        Self {
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn request_state(&self) -> RequestState {
        if self.in_flight.load(Ordering::SeqCst) {
            RequestState::InFlight
        } else {
            RequestState::Idle
        }
    }

    /// Claim the in-flight slot without sending anything yet
    pub fn begin(&self) -> Result<RequestTicket<'_>, SubmitError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SubmitError::AlreadyInFlight)?;

        Ok(RequestTicket {
            in_flight: &self.in_flight,
            request_id: Uuid::new_v4(),
        })
    }

    /// Claim the slot and run a request
    pub async fn submit(
        &self,
        selection: &[SelectedFile],
        length: SummaryLength,
        instructions: Option<&str>,
    ) -> Result<ReconciledOutcome, SubmitError> {
        if selection.is_empty() {
            return Err(SubmitError::EmptySelection);
        }
        let ticket = self.begin()?;
        self.dispatch(ticket, selection, length, instructions).await
    }

    /// Run a request on an already claimed slot
    ///
    /// The ticket is consumed, so the slot is released when this returns.
    pub async fn dispatch(
        &self,
        ticket: RequestTicket<'_>,
        selection: &[SelectedFile],
        length: SummaryLength,
        instructions: Option<&str>,
    ) -> Result<ReconciledOutcome, SubmitError> {
        if selection.is_empty() {
            return Err(SubmitError::EmptySelection);
        }

        let request = SummarizeRequest {
            request_id: ticket.request_id(),
            files: selection.to_vec(),
            length,
            instructions: instructions.map(|s| s.to_string()),
        };

        let outcome = match self.transport.send(&request).await {
            Err(e) => {
                tracing::warn!(
                    request_id = %request.request_id,
                    error = %e,
                    "[Orchestrator] Transport failure"
                );
                ReconciledOutcome::failure(TRANSPORT_FAILURE_MESSAGE)
            }
            Ok(reply) if !reply.is_success() => {
                tracing::warn!(
                    request_id = %request.request_id,
                    status = reply.status,
                    error = reply.body.error.as_deref().unwrap_or(""),
                    "[Orchestrator] Service reported failure"
                );
                ReconciledOutcome::failure(
                    reply
                        .body
                        .error
                        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                )
            }
            Ok(reply) => reconcile(&reply.body, selection),
        };

        tracing::info!(
            request_id = %request.request_id,
            items = outcome.items.len(),
            combined = outcome.combined.is_some(),
            "[Orchestrator] Request completed"
        );

        drop(ticket);
        Ok(outcome)
    }
}
