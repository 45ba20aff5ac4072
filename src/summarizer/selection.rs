//! File selection
//!
//! Owns the list of chosen documents and nothing else. Every change
//! bumps a generation counter so a request can be matched against the
//! selection it was built from.

use super::error::SelectionError;
use super::types::SelectedFile;

/// Default cap on files per selection
pub const DEFAULT_MAX_FILES: usize = 2;

/// How a new batch of files is admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Whole batch replaces the selection; batches over `max_files` are rejected
    Capped { max_files: usize },
    /// Legacy picker: only the last file of a batch is kept, nothing is rejected
    SingleFile,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::Capped {
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Frozen copy of the selection handed to a request
#[derive(Debug, Clone)]
pub struct SelectionSnapshot {
    pub generation: u64,
    pub files: Vec<SelectedFile>,
}

#[derive(Debug, Default)]
pub struct FileSelectionManager {
    policy: SelectionPolicy,
    files: Vec<SelectedFile>,
    generation: u64,
}

impl FileSelectionManager {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
            generation: 0,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Replace the selection with `files`
    ///
    /// An over-cap batch leaves the selection empty and returns
    /// `TooManyFiles`; the selection still counts as changed.
    pub fn select(&mut self, files: Vec<SelectedFile>) -> Result<usize, SelectionError> {
        self.generation += 1;

        match self.policy {
            SelectionPolicy::Capped { max_files } => {
                if files.len() > max_files {
                    tracing::warn!(
                        attempted = files.len(),
                        max = max_files,
                        "[Selection] Rejected batch over the file cap"
                    );
                    self.files = Vec::new();
                    return Err(SelectionError::TooManyFiles {
                        attempted: files.len(),
                        max: max_files,
                    });
                }
                self.files = files;
            }
            SelectionPolicy::SingleFile => {
                self.files = files.into_iter().last().into_iter().collect();
            }
        }

        tracing::debug!(count = self.files.len(), "[Selection] Selection replaced");
        Ok(self.files.len())
    }

    /// Remove the file at `index`; out-of-range indices change nothing
    pub fn remove(&mut self, index: usize) -> Result<SelectedFile, SelectionError> {
        if index >= self.files.len() {
            return Err(SelectionError::IndexOutOfRange {
                index,
                count: self.files.len(),
            });
        }

        let mut files = self.files.clone();
        let removed = files.remove(index);
        self.files = files;
        self.generation += 1;

        tracing::debug!(file = removed.name(), "[Selection] Removed file");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.files = Vec::new();
        self.generation += 1;
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            generation: self.generation,
            files: self.files.clone(),
        }
    }
}
