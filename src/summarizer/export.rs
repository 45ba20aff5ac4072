//! Clipboard and download export
//!
//! Reads result text, never writes orchestration state.

use super::error::ExportError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File name used for the combined summary download
pub const COMBINED_FILE_NAME: &str = "combined_summary.txt";

/// Platform clipboard seam
pub trait ClipboardPort: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ExportError>;
}

/// System clipboard via arboard
///
/// The handle is kept open for the session; on X11 the clipboard
/// contents vanish once the owning handle is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl ClipboardPort for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ExportError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ExportError::Clipboard("clipboard lock poisoned".to_string()))?;

        if guard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
            *guard = Some(clipboard);
        }

        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ExportError::Clipboard(e.to_string())),
            None => Err(ExportError::Clipboard("no clipboard handle".to_string())),
        }
    }
}

/// Base name for a per-file download
///
/// Everything before the first `.` of `filename`, or `paper_{n}`
/// (1-based) when there is no usable name. Path separators and other
/// characters invalid in file names are replaced.
pub fn suggested_base_name(filename: &str, index: usize) -> String {
    let stem = filename.split('.').next().unwrap_or("");
    let sanitized: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim();

    if sanitized.is_empty() {
        format!("paper_{}", index + 1)
    } else {
        sanitized.to_string()
    }
}

pub struct ExportService {
    clipboard: Arc<dyn ClipboardPort>,
    output_dir: PathBuf,
}

impl ExportService {
    pub fn new(clipboard: Arc<dyn ClipboardPort>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            clipboard,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn copy(&self, text: &str) -> Result<(), ExportError> {
        self.clipboard.write_text(text)?;
        tracing::debug!(chars = text.len(), "[Export] Copied to clipboard");
        Ok(())
    }

    /// Write `text` as `{base_name}_summary.txt`
    pub fn download(&self, text: &str, base_name: &str) -> Result<PathBuf, ExportError> {
        self.write_file(&format!("{}_summary.txt", base_name), text)
    }

    pub fn download_combined(&self, text: &str) -> Result<PathBuf, ExportError> {
        self.write_file(COMBINED_FILE_NAME, text)
    }

    fn write_file(&self, file_name: &str, text: &str) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(file_name);
        std::fs::create_dir_all(&self.output_dir)
            .and_then(|_| std::fs::write(&path, text))
            .map_err(|source| ExportError::Write {
                path: path.to_string_lossy().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), "[Export] Summary saved");
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory clipboard
    #[derive(Default)]
    pub(crate) struct MemoryClipboard {
        pub(crate) contents: Mutex<Vec<String>>,
    }

    impl ClipboardPort for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<(), ExportError> {
            self.contents.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_suggested_base_name_strips_first_extension() {
        assert_eq!(suggested_base_name("paper.pdf", 0), "paper");
        assert_eq!(suggested_base_name("report.final.docx", 0), "report");
    }

    #[test]
    fn test_suggested_base_name_placeholder() {
        assert_eq!(suggested_base_name("", 0), "paper_1");
        assert_eq!(suggested_base_name(".hidden", 2), "paper_3");
    }

    #[test]
    fn test_suggested_base_name_strips_separators() {
        assert_eq!(suggested_base_name("../etc/passwd", 0), "paper_1");
        assert_eq!(suggested_base_name("a/b.pdf", 0), "a_b");
    }

    #[test]
    fn test_copy_writes_clipboard() {
        let clipboard = Arc::new(MemoryClipboard::default());
        let export = ExportService::new(clipboard.clone(), ".");
        export.copy("X").unwrap();
        export.copy("X").unwrap();
        assert_eq!(*clipboard.contents.lock().unwrap(), vec!["X", "X"]);
    }

    #[test]
    fn test_download_names() {
        let dir = tempfile::tempdir().unwrap();
        let export = ExportService::new(Arc::new(MemoryClipboard::default()), dir.path());

        let path = export.download("X", "paper").unwrap();
        assert_eq!(path, dir.path().join("paper_summary.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "X");

        let combined = export.download_combined("Y").unwrap();
        assert_eq!(combined, dir.path().join("combined_summary.txt"));
        assert_eq!(std::fs::read_to_string(&combined).unwrap(), "Y");
    }

    #[test]
    fn test_download_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports");
        let export = ExportService::new(Arc::new(MemoryClipboard::default()), &nested);
        export.download("X", "paper").unwrap();
        assert!(nested.join("paper_summary.txt").exists());
    }
}
