//! Multi-Document Summarization Client
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  1. SELECT: FileSelectionManager (cap, replace, remove, clear)  │
//! │  2. SUBMIT: SummarizationOrchestrator → multipart upload        │
//! │  3. RECONCILE: summaries / summary / combined_summary → items   │
//! │  4. EXPORT: clipboard copy + {base}_summary.txt downloads       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any selection change clears the result set (back-edge 1 → 3).

pub mod acknowledgment;
pub mod client;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod reconciler;
pub mod selection;
pub mod session;
pub mod types;
pub mod view;


pub use acknowledgment::{AckSlot, ACK_WINDOW};
pub use client::{HttpTransport, SummarizeTransport};
pub use error::{ConfigError, ExportError, SelectionError, SubmitError, TransportError};
pub use export::{ClipboardPort, SystemClipboard};
pub use selection::SelectionPolicy;
pub use session::{SessionOptions, StalePolicy, SummarizeStatus, SummarizerSession};
pub use types::{SelectedFile, SummaryItem, SummaryLength};
pub use view::{SessionView, SAMPLE_SUMMARY};
