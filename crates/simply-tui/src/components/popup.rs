//! Result popup shown after a deploy attempt.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use simply_core::render::Popup;

use crate::action::Action;
use crate::components::{centered_rect, Component};
use crate::theme::Theme;

pub struct PopupComponent {
    pub popup: Option<Popup>,
}

impl PopupComponent {
    pub fn new() -> Self {
        Self { popup: None }
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn area(area: Rect) -> Rect {
        centered_rect(area, 52, 9)
    }
}

impl Default for PopupComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PopupComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ShowPopup(popup) => {
                self.popup = Some(popup.clone());
                None
            }
            Action::ClosePopup | Action::Submit if self.is_open() => {
                self.popup = None;
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(popup) = &self.popup else {
            return;
        };

        let rect = Self::area(area);
        frame.render_widget(Clear, rect);

        let color = if popup.is_success() {
            Theme::success()
        } else {
            Theme::error()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw(format!("{}  ", popup.icon())),
                Span::styled(popup.title(), Theme::label(color)),
            ])
            .centered(),
            Line::from(""),
            Line::styled(popup.message().to_string(), Theme::normal()).centered(),
        ];
        if let Some(url) = popup.link() {
            lines.push(Line::styled(url.to_string(), Theme::link()).centered());
        }
        lines.push(Line::from(""));
        lines.push(Line::styled("[Enter/Esc] Close", Theme::dim()).centered());

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true }),
            rect,
        );
    }
}
