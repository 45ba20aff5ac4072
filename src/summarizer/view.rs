//! Render model for the front end

use super::types::SummaryLength;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Preview shown under "See an example"
pub const SAMPLE_SUMMARY: &str = "Artificial intelligence (AI) is transforming how we conduct and consume research.
This demo shows the kind of structured, concise summaries your papers can get.
Upload one or more PDFs, DOCX, or TXT files and the AI will extract key ideas,
methods, and conclusions so you can review complex material in minutes instead of hours.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRow {
    pub name: String,
    pub size_label: String,
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBlock {
    pub title: String,
    pub summary: Option<String>,
    pub error: Option<String>,
    pub metadata: Option<String>,
    pub copied: bool,
}

impl ItemBlock {
    /// Copy/download are offered only for successful items
    pub fn exportable(&self) -> bool {
        self.error.is_none() && self.summary.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedBlock {
    pub text: String,
    pub copied: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub files: Vec<FileRow>,
    pub summary_length: SummaryLength,
    pub instructions: Option<String>,
    pub loading: bool,
    pub can_submit: bool,
    pub combined: Option<CombinedBlock>,
    pub items: Vec<ItemBlock>,
    pub completed_at: Option<DateTime<Local>>,
}

impl SessionView {
    /// Neither per-file items nor a combined summary, and nothing running
    pub fn is_placeholder(&self) -> bool {
        !self.loading && self.items.is_empty() && self.combined.is_none()
    }

    /// Plain-text rendering for a terminal
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Upload papers\n");
        if self.files.is_empty() {
            out.push_str("  (no files) PDF, DOC, DOCX, or TXT, up to the file limit\n");
        } else {
            for (i, file) in self.files.iter().enumerate() {
                let warning = if file.supported { "" } else { "  [unsupported type]" };
                out.push_str(&format!(
                    "  {}. {} ({}){}\n",
                    i + 1,
                    file.name,
                    file.size_label,
                    warning
                ));
            }
        }

        out.push_str(&format!("Length: {}", self.summary_length.label()));
        if let Some(instructions) = &self.instructions {
            out.push_str(&format!("  |  Instructions: {}", instructions));
        }
        out.push_str(if self.can_submit {
            "  |  [Summarize]\n"
        } else {
            "  |  [Summarize disabled]\n"
        });

        out.push_str("\nSummaries\n");

        if self.loading {
            out.push_str("  Generating summaries...\n");
            return out;
        }

        if self.is_placeholder() {
            out.push_str("  No summary yet\n");
            out.push_str(
                "  Add one or more papers and run summarize to see per-paper and combined summaries here.\n",
            );
            return out;
        }

        if let Some(combined) = &self.combined {
            out.push_str(&format!(
                "  == Combined Summary (All Papers){}\n",
                if combined.copied { "  [copied]" } else { "" }
            ));
            for line in combined.text.lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }

        for (i, item) in self.items.iter().enumerate() {
            let mut header = format!("  -- {}. {}", i + 1, item.title);
            if let Some(metadata) = &item.metadata {
                header.push_str(&format!(" ({})", metadata));
            }
            if item.copied {
                header.push_str("  [copied]");
            }
            out.push_str(&header);
            out.push('\n');

            match (&item.error, &item.summary) {
                (Some(error), _) => out.push_str(&format!("  ! {}\n", error)),
                (None, Some(summary)) => {
                    for line in summary.lines() {
                        out.push_str(&format!("  {}\n", line));
                    }
                }
                (None, None) => {}
            }
        }

        if let Some(completed_at) = self.completed_at {
            out.push_str(&format!(
                "  (generated {})\n",
                completed_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        out
    }
}
