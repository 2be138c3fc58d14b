//! Preview pane: drives the [`PreviewEngine`] and shows where the live
//! document is and what it contains.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::warn;

use simply_core::outcome::ApiResult;
use simply_core::preview::PreviewEngine;
use simply_core::session::Target;

use crate::action::Action;
use crate::components::text_input::wrap_chars;
use crate::components::Component;
use crate::theme::Theme;

pub struct PreviewPaneComponent {
    engine: Option<PreviewEngine>,
    target: Target,
}

impl PreviewPaneComponent {
    pub fn new() -> Self {
        Self {
            engine: None,
            target: Target::default(),
        }
    }

    /// Bind the pane to a freshly started session.
    pub fn attach(&mut self, engine: PreviewEngine, target: Target) {
        self.engine = Some(engine);
        self.target = target;
    }

    pub fn engine(&self) -> Option<&PreviewEngine> {
        self.engine.as_ref()
    }

    fn render_markup(&mut self, markup: &str) -> Option<Action> {
        let engine = self.engine.as_mut()?;
        match engine.render(markup) {
            Ok(_) => Some(Action::SetStatus("Preview updated".to_string())),
            Err(e) => {
                warn!("Preview not written: {}", e);
                Some(Action::SetStatus(e.to_string()))
            }
        }
    }
}

impl Default for PreviewPaneComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PreviewPaneComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ChatCompleted(ApiResult::Success(reply)) if self.target.has_live_preview() => {
                let markup = reply.code.as_deref().filter(|c| !c.is_empty())?;
                self.render_markup(markup)
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Preview ", Theme::header()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let engine = match &self.engine {
            Some(engine) if engine.surface_visible() => engine,
            _ => {
                let text = if self.target.has_live_preview() {
                    "No preview yet. Generated HTML/CSS appears here."
                } else {
                    "Live preview is available for HTML/CSS only."
                };
                let chunks = Layout::vertical([
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(inner);
                frame.render_widget(
                    Paragraph::new(Span::styled(text, Theme::muted())).centered(),
                    chunks[1],
                );
                return;
            }
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Path
            Constraint::Length(1), // Hint
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Source
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Live: ", Theme::label(Theme::success())),
                Span::styled(engine.document_path().display().to_string(), Theme::link()),
            ])),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("[Ctrl+O]", Theme::key_hint()),
                Span::styled(" open in browser", Theme::dim()),
            ])),
            chunks[1],
        );

        let source = engine.document().unwrap_or_default();
        let lines: Vec<Line> = wrap_chars(source, chunks[3].width as usize)
            .into_iter()
            .take(chunks[3].height as usize)
            .map(|row| Line::styled(row, Theme::code()))
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use simply_core::outcome::{Failure, GenerationData};
    use simply_core::output::SessionOutput;
    use simply_core::preview::compose_document;

    fn attached(target: Target) -> (PreviewPaneComponent, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut pane = PreviewPaneComponent::new();
        pane.attach(
            PreviewEngine::new(SessionOutput::new(dir.path(), "abc123")),
            target,
        );
        (pane, dir)
    }

    fn reply(code: &str) -> Action {
        Action::ChatCompleted(ApiResult::Success(GenerationData {
            code: Some(code.into()),
            ..Default::default()
        }))
    }

    #[test]
    fn html_reply_loads_preview() {
        let (mut pane, dir) = attached(Target::HtmlCss);
        let action = pane.handle_action(&reply("<h1>Hi</h1>"));
        assert!(matches!(action, Some(Action::SetStatus(_))));

        let engine = pane.engine().unwrap();
        assert!(engine.surface_visible());
        assert!(!engine.placeholder_visible());
        let written =
            std::fs::read_to_string(dir.path().join("abc123").join("index.html")).unwrap();
        assert_eq!(written, compose_document("<h1>Hi</h1>"));
    }

    #[test]
    fn other_targets_never_render() {
        let (mut pane, _dir) = attached(Target::React);
        assert!(pane.handle_action(&reply("<App />")).is_none());
        assert!(pane.engine().unwrap().placeholder_visible());
    }

    #[test]
    fn failures_and_empty_code_leave_placeholder() {
        let (mut pane, _dir) = attached(Target::HtmlCss);
        pane.handle_action(&Action::ChatCompleted(ApiResult::Failure(Failure::unknown())));
        pane.handle_action(&reply(""));
        assert!(pane.engine().unwrap().placeholder_visible());
    }

    #[test]
    fn renders_placeholder_then_path() {
        let (mut pane, _dir) = attached(Target::HtmlCss);
        let mut term = TestTerminal::new();
        term.draw_with(|frame| pane.render(frame, frame.area()));
        assert!(term.buffer_contains("No preview yet."));

        pane.handle_action(&reply("<h1>Hi</h1>"));
        term.draw_with(|frame| pane.render(frame, frame.area()));
        assert!(term.buffer_contains("[Ctrl+O]"));
        assert!(term.buffer_contains("<h1>Hi</h1>"));
    }
}
