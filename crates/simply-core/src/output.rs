//! Per-session output directory holding the preview document and transcript.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SimplyError};

const PREVIEW_FILE: &str = "index.html";
const TRANSCRIPT_FILE: &str = "transcript.html";

#[derive(Debug, Clone)]
pub struct SessionOutput {
    dir: PathBuf,
}

impl SessionOutput {
    /// Output lives under `<base_dir>/<session_id>/`. Nothing is created until first write.
    pub fn new(base_dir: &Path, session_id: &str) -> Self {
        Self {
            dir: base_dir.join(session_id),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn preview_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_FILE)
    }

    pub fn transcript_path(&self) -> PathBuf {
        self.dir.join(TRANSCRIPT_FILE)
    }

    pub fn write_preview(&self, document: &str) -> Result<PathBuf> {
        self.write(PREVIEW_FILE, document)
    }

    pub fn write_transcript(&self, document: &str) -> Result<PathBuf> {
        self.write(TRANSCRIPT_FILE, document)
            .map_err(|e| SimplyError::Transcript(format!("Failed to write transcript: {e}")))
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote session output");
        Ok(path)
    }
}
