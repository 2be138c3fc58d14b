//! Help overlay with the keybinding reference.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::action::Action;
use crate::components::{centered_rect, Component};
use crate::theme::Theme;

pub struct HelpComponent {
    pub visible: bool,
}

impl HelpComponent {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ToggleHelp => {
                self.visible = !self.visible;
                None
            }
            Action::Escape | Action::Submit | Action::Click { .. } if self.visible => {
                self.visible = false;
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog = centered_rect(area, 56, 20);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Help: Keybindings ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));

        let help_text = vec![
            Line::from(""),
            key_line("Ctrl+C", "Quit"),
            key_line("F1", "Toggle this help"),
            key_line("Esc", "Close popup / dialog"),
            Line::from(""),
            Line::from(Span::styled("── Start ──", Theme::header())),
            key_line("Up / Down", "Choose code target"),
            key_line("Enter", "Start session"),
            Line::from(""),
            Line::from(Span::styled("── Workspace ──", Theme::header())),
            key_line("Enter", "Send prompt"),
            key_line("Shift/Alt+Enter", "New line"),
            key_line("Ctrl+W", "Delete word"),
            key_line("Up / Down / PgUp / PgDn", "Scroll chat"),
            key_line("Ctrl+Y", "Copy latest code"),
            key_line("Ctrl+O", "Open preview in browser"),
            key_line("Ctrl+D", "Deploy"),
        ];

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, dialog);
    }
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<24}", key), Theme::selected()),
        Span::styled(desc, Theme::normal()),
    ])
}
