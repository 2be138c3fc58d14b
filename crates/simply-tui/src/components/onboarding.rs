//! Onboarding screen. Pick a code target and start a session.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use simply_core::session::Target;

use crate::action::Action;
use crate::components::{centered_rect, Component};
use crate::theme::Theme;

pub struct OnboardingComponent {
    /// Index into [`Target::all`].
    selected: usize,
}

impl OnboardingComponent {
    pub fn new(initial: Target) -> Self {
        Self {
            selected: initial.index(),
        }
    }

    pub fn selected_target(&self) -> Target {
        Target::all()
            .get(self.selected)
            .copied()
            .unwrap_or_default()
    }

    pub fn select(&mut self, target: Target) {
        self.selected = target.index();
    }
}

impl Component for OnboardingComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            Action::ScrollDown => {
                if self.selected + 1 < Target::all().len() {
                    self.selected += 1;
                }
                None
            }
            Action::Submit => Some(Action::StartSession(self.selected_target())),
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let height = Target::all().len() as u16 + 10;
        let card = centered_rect(area, 48, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Title
            Constraint::Length(1), // Tagline
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Selector label
            Constraint::Min(1),    // Targets
            Constraint::Length(1), // Hint
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled("Simply Design", Theme::title())).centered(),
            chunks[1],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Describe a website. Watch it build.",
                Theme::muted(),
            ))
            .centered(),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(Span::styled("  Code target", Theme::header())),
            chunks[4],
        );

        let items: Vec<ListItem> = Target::all()
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let (marker, style) = if i == self.selected {
                    ("  \u{25b8} ", Theme::selected())
                } else {
                    ("    ", Theme::normal())
                };
                let mut spans = vec![Span::styled(marker, style), Span::styled(target.label(), style)];
                if target.has_live_preview() {
                    spans.push(Span::styled("  live preview", Theme::dim()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        frame.render_widget(List::new(items), chunks[5]);

        let hint = Line::from(vec![
            Span::styled("[Up/Down]", Theme::key_hint()),
            Span::styled(" choose  ", Theme::dim()),
            Span::styled("[Enter]", Theme::key_hint()),
            Span::styled(" start", Style::default().fg(Theme::fg_dim())),
        ]);
        frame.render_widget(Paragraph::new(hint).centered(), chunks[6]);
    }
}
