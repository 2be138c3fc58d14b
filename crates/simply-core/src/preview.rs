//! Live preview: generated markup plus a broken-image fallback, written out
//! as a standalone document.
//!
//! The document is only ever handed to an external browser. This process
//! never parses or evaluates it.

use std::path::PathBuf;

use tracing::info;

use crate::error::{Result, SimplyError};
use crate::output::SessionOutput;

/// Appended to every preview document. Once the DOM is ready, each `<img>`
/// gets a one-shot error handler that swaps in an inline placeholder graphic
/// and dims the image. The handler clears itself first so a failing
/// placeholder cannot loop.
pub const FALLBACK_SCRIPT: &str = r#"
<script>
    document.addEventListener('DOMContentLoaded', function() {
        document.querySelectorAll('img').forEach(function(img) {
            img.onerror = function() {
                this.onerror = null;
                this.src = 'data:image/svg+xml,' + encodeURIComponent(
                    '<svg xmlns="http://www.w3.org/2000/svg" width="200" height="150" viewBox="0 0 200 150">' +
                    '<rect fill="%23222" width="200" height="150" rx="8"/>' +
                    '<text fill="%23666" x="100" y="75" text-anchor="middle" font-family="sans-serif" font-size="14">Image placeholder</text>' +
                    '</svg>'
                );
                this.alt = 'Image placeholder';
                this.style.opacity = '0.5';
            };
        });
    });
</script>
"#;

/// Generated markup followed by [`FALLBACK_SCRIPT`].
pub fn compose_document(markup: &str) -> String {
    let mut document = String::with_capacity(markup.len() + FALLBACK_SCRIPT.len());
    document.push_str(markup);
    document.push_str(FALLBACK_SCRIPT);
    document
}

/// State of the preview surface for one session.
#[derive(Debug)]
pub struct PreviewEngine {
    output: SessionOutput,
    surface_visible: bool,
    document: Option<String>,
}

impl PreviewEngine {
    pub fn new(output: SessionOutput) -> Self {
        Self {
            output,
            surface_visible: false,
            document: None,
        }
    }

    /// Whether the "no preview yet" placeholder is showing.
    pub fn placeholder_visible(&self) -> bool {
        !self.surface_visible
    }

    pub fn surface_visible(&self) -> bool {
        self.surface_visible
    }

    /// The currently loaded document, exactly as written to disk.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn document_path(&self) -> PathBuf {
        self.output.preview_path()
    }

    /// Show the surface, hide the placeholder, and load `markup` into it.
    ///
    /// The surface state flips even if the write fails; the error is returned
    /// so the caller can report it.
    pub fn render(&mut self, markup: &str) -> Result<PathBuf> {
        self.surface_visible = true;
        let document = compose_document(markup);
        let written = self
            .output
            .write_preview(&document)
            .map_err(|e| SimplyError::Preview(format!("Failed to write preview: {e}")));
        self.document = Some(document);
        let path = written?;
        info!(path = %path.display(), "Preview updated");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_is_markup_then_fallback() {
        let doc = compose_document("<h1>Hi</h1>");
        assert!(doc.starts_with("<h1>Hi</h1>"));
        assert_eq!(&doc["<h1>Hi</h1>".len()..], FALLBACK_SCRIPT);
    }

    #[test]
    fn fallback_handler_is_one_shot() {
        assert!(FALLBACK_SCRIPT.contains("this.onerror = null;"));
        assert!(FALLBACK_SCRIPT.contains("DOMContentLoaded"));
        assert!(FALLBACK_SCRIPT.contains("this.style.opacity = '0.5';"));
    }

    #[test]
    fn render_flips_surface_and_writes_document() {
        let base = tempfile::tempdir().unwrap();
        let mut engine = PreviewEngine::new(SessionOutput::new(base.path(), "sess"));
        assert!(engine.placeholder_visible());
        assert_eq!(engine.document(), None);

        let path = engine.render("<h1>Hi</h1>").unwrap();

        assert!(engine.surface_visible());
        assert!(!engine.placeholder_visible());
        let expected = format!("<h1>Hi</h1>{FALLBACK_SCRIPT}");
        assert_eq!(engine.document(), Some(expected.as_str()));
        assert_eq!(std::fs::read_to_string(path).unwrap(), expected);
    }

    #[test]
    fn render_replaces_previous_document() {
        let base = tempfile::tempdir().unwrap();
        let mut engine = PreviewEngine::new(SessionOutput::new(base.path(), "sess"));
        engine.render("<p>one</p>").unwrap();
        engine.render("<p>two</p>").unwrap();
        let on_disk = std::fs::read_to_string(engine.document_path()).unwrap();
        assert_eq!(on_disk, compose_document("<p>two</p>"));
        assert_eq!(engine.document(), Some(on_disk.as_str()));
    }

    #[test]
    fn write_failure_still_updates_surface() {
        let base = tempfile::tempdir().unwrap();
        // A file where the session directory should be makes create_dir_all fail.
        std::fs::write(base.path().join("sess"), "blocker").unwrap();
        let mut engine = PreviewEngine::new(SessionOutput::new(base.path(), "sess"));

        let err = engine.render("<p>x</p>").unwrap_err();
        assert!(matches!(err, SimplyError::Preview(_)));
        assert!(engine.surface_visible());
        assert!(engine.document().is_some());
    }
}
