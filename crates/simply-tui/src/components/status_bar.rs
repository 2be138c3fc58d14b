//! Status bar at the bottom of the TUI.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::{Action, Screen};
use crate::components::Component;
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current status message.
    pub message: String,
    /// When a flashed message should disappear.
    expires_at: Option<Instant>,
    pub screen: Screen,
}

impl StatusBarComponent {
    pub fn new() -> Self {
        Self {
            message: "Pick a code target and press Enter.".to_string(),
            expires_at: None,
            screen: Screen::Onboarding,
        }
    }

    /// Show `message` for `ttl`, then clear it on a later tick.
    pub fn flash(&mut self, message: &str, ttl: Duration) {
        self.message = message.to_string();
        self.expires_at = Some(Instant::now() + ttl);
    }

    fn hints(&self) -> &'static str {
        match self.screen {
            Screen::Onboarding => "Enter start · F1 help",
            Screen::Transition => "",
            Screen::Workspace => "^D deploy · ^Y copy · F1 help",
        }
    }
}

impl Default for StatusBarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SetStatus(msg) => {
                self.message = msg.clone();
                self.expires_at = None;
                None
            }
            Action::ClearStatus => {
                self.message.clear();
                self.expires_at = None;
                None
            }
            Action::Tick => {
                if self.expires_at.is_some_and(|at| Instant::now() >= at) {
                    self.message.clear();
                    self.expires_at = None;
                }
                None
            }
            Action::StartSession(_) => {
                self.screen = Screen::Transition;
                self.message.clear();
                None
            }
            Action::EnterWorkspace => {
                self.screen = Screen::Workspace;
                self.message = "Describe what you want to build.".to_string();
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        let hints = self.hints();
        let hints_len = hints.chars().count() + 1;

        let badge = self.screen.label();
        let badge_len = badge.len() + 2;

        // Truncate message to remaining space
        let msg_budget = width
            .saturating_sub(badge_len)
            .saturating_sub(hints_len)
            .saturating_sub(4);

        let msg_len = self.message.chars().count();
        let msg = if msg_len > msg_budget {
            if msg_budget > 3 {
                let head: String = self.message.chars().take(msg_budget - 3).collect();
                format!("{head}...")
            } else {
                String::new()
            }
        } else {
            self.message.clone()
        };

        // Pad to push hints to the right edge
        let used = badge_len + 2 + msg.chars().count();
        let pad = width.saturating_sub(used + hints_len);

        let line = Line::from(vec![
            Span::styled(format!(" {} ", badge), Theme::badge()),
            Span::styled("  ", Theme::dim()),
            Span::styled(msg, Theme::status_bar()),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
