//! Deploy dialog: overlay asking for a domain before publishing.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use tracing::debug;

use simply_core::render::Popup;
use simply_core::validate::validate_domain;

use crate::action::Action;
use crate::components::text_input::TextInput;
use crate::components::{centered_rect, Component};
use crate::theme::Theme;

const DIALOG_WIDTH: u16 = 56;
const DIALOG_HEIGHT: u16 = 10;

pub struct DeployDialogComponent {
    pub visible: bool,
    pub input: TextInput,
    /// Inline validation message.
    pub error: Option<String>,
    /// A deploy request is outstanding; the publish control is disabled.
    pub publishing: bool,
}

impl DeployDialogComponent {
    pub fn new() -> Self {
        Self {
            visible: false,
            input: TextInput::new(),
            error: None,
            publishing: false,
        }
    }

    /// Show the dialog with an empty field and no error.
    pub fn open(&mut self) {
        self.visible = true;
        self.input.clear();
        self.error = None;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Validate the domain and hand it off for deployment.
    pub fn publish(&mut self) -> Option<Action> {
        if self.publishing {
            return None;
        }
        let domain = self.input.value.trim().to_string();
        if let Err(e) = validate_domain(&domain) {
            debug!(error = %e, "Domain rejected");
            self.error = Some(e.to_string());
            return None;
        }
        self.error = None;
        self.publishing = true;
        Some(Action::DispatchDeploy { domain })
    }

    /// Screen area the dialog occupies inside `area`.
    pub fn dialog_rect(area: Rect) -> Rect {
        centered_rect(area, DIALOG_WIDTH, DIALOG_HEIGHT)
    }
}

impl Default for DeployDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DeployDialogComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        // A result can arrive after the dialog was dismissed.
        if let Action::DeployCompleted(result) = action {
            self.publishing = false;
            self.close();
            return Some(Action::ShowPopup(Popup::from_deploy(result)));
        }

        if !self.visible {
            if matches!(action, Action::OpenDeployDialog) {
                self.open();
            }
            return None;
        }

        match action {
            Action::CloseDeployDialog => {
                self.close();
                None
            }
            Action::CharInput(c) => {
                self.input.insert_char(*c);
                None
            }
            Action::PasteBulk(text) => {
                self.input.insert_str(text.trim_end_matches(['\r', '\n']));
                None
            }
            Action::BackspaceInput => {
                self.input.delete_char();
                None
            }
            Action::DeleteWord => {
                self.input.delete_word();
                None
            }
            Action::Submit => self.publish(),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog = Self::dialog_rect(area);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Deploy your site ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Label
            Constraint::Length(3), // Field
            Constraint::Length(1), // Error
            Constraint::Min(0),
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled("  Domain name", Theme::header())),
            chunks[1],
        );

        let field_area = Rect {
            x: chunks[2].x + 2,
            width: chunks[2].width.saturating_sub(4),
            ..chunks[2]
        };
        let field = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.error.is_some() {
                Theme::error_text()
            } else {
                Theme::border()
            });
        frame.render_widget(
            Paragraph::new(Span::styled(self.input.with_cursor(), Theme::normal())).block(field),
            field_area,
        );

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {error}"), Theme::error_text())),
                chunks[3],
            );
        }

        let publish = if self.publishing {
            Span::styled("Publishing...", Theme::dim())
        } else {
            Span::styled("[Enter] Publish", Theme::key_hint())
        };
        let buttons = Line::from(vec![
            Span::raw("  "),
            publish,
            Span::styled("   [Esc] Cancel", Theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(buttons), chunks[5]);
    }
}
