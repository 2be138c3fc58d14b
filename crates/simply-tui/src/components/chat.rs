//! Chat engine: prompt input, the message stream, and the single
//! in-flight request guard.

use std::cell::Cell;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use simply_core::outcome::{ApiResult, GenerationData};
use simply_core::render::{Bubble, ASSETS_TITLE, HIGHLIGHTS_TITLE, THINKING_TEXT};
use simply_core::session::Target;

use crate::action::{Action, WorkspaceView};
use crate::components::text_input::{wrap_chars, wrap_words, TextInput};
use crate::components::Component;
use crate::theme::Theme;

const WELCOME_TEXT: &str =
    "Hi! Describe the page you want and I'll generate the code. Follow-ups refine the last result.";

const SPINNER: [&str; 4] = ["\u{280b}", "\u{2819}", "\u{2838}", "\u{2834}"];

const PAGE_LINES: u16 = 10;

pub struct ChatComponent {
    bubbles: Vec<Bubble>,
    pub input: TextInput,
    view: WorkspaceView,
    target: Target,
    welcome_visible: bool,
    /// At most one chat request may be outstanding.
    processing: bool,
    /// Lines scrolled back from the newest bubble.
    scroll_back: u16,
    /// Highest useful `scroll_back` as of the last draw.
    max_scroll: Cell<u16>,
    spinner_frame: usize,
}

impl ChatComponent {
    pub fn new(target: Target) -> Self {
        Self {
            bubbles: Vec::new(),
            input: TextInput::new(),
            view: WorkspaceView::Create,
            target,
            welcome_visible: true,
            processing: false,
            scroll_back: 0,
            max_scroll: Cell::new(0),
            spinner_frame: 0,
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn view(&self) -> WorkspaceView {
        self.view
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome_visible
    }

    /// Code of the newest bot bubble that carries any.
    pub fn latest_code(&self) -> Option<&str> {
        self.bubbles.iter().rev().find_map(Bubble::code)
    }

    /// Send the current input. Returns the dispatch action, or `None` when
    /// the input is blank or a request is already outstanding.
    pub fn submit(&mut self) -> Option<Action> {
        if self.processing || self.input.is_blank() {
            return None;
        }
        let text = self.input.value.trim().to_string();

        self.view = WorkspaceView::Chat;
        self.welcome_visible = false;
        self.bubbles.push(Bubble::User(text.clone()));
        self.input.clear();
        self.bubbles.push(Bubble::Thinking);
        self.processing = true;
        self.scroll_back = 0;

        Some(Action::DispatchChat { text })
    }

    /// Fold a finished call into the stream and release the guard.
    pub fn complete(&mut self, result: &ApiResult<GenerationData>) {
        self.bubbles.retain(|b| !matches!(b, Bubble::Thinking));
        self.processing = false;
        self.scroll_back = 0;

        let bubble = match result {
            ApiResult::Success(reply) => Bubble::Bot {
                target: self.target,
                reply: reply.clone(),
            },
            ApiResult::Failure(failure) => Bubble::Error(failure.chat_message().to_string()),
        };
        self.bubbles.push(bubble);
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll_back as i32 + delta).max(0) as u16;
        self.scroll_back = next.min(self.max_scroll.get());
    }

    fn stream_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.welcome_visible {
            push_label(&mut lines, "Simply Design AI", Theme::bot_bubble());
            for row in wrap_words(WELCOME_TEXT, width) {
                lines.push(Line::styled(row, Theme::muted()));
            }
            lines.push(Line::default());
        }

        for bubble in &self.bubbles {
            match bubble {
                Bubble::User(text) => {
                    push_label(&mut lines, bubble.label(), Theme::user_bubble());
                    for row in wrap_words(text, width) {
                        lines.push(Line::styled(row, Theme::normal()));
                    }
                }
                Bubble::Bot { target, reply } => {
                    push_label(&mut lines, bubble.label(), Theme::bot_bubble());
                    self.push_reply(&mut lines, *target, reply, width);
                }
                Bubble::Error(message) => {
                    push_label(&mut lines, bubble.label(), Theme::error());
                    for row in wrap_words(message, width) {
                        lines.push(Line::styled(row, Theme::error_text()));
                    }
                }
                Bubble::Thinking => {
                    let frame = SPINNER[self.spinner_frame % SPINNER.len()];
                    lines.push(Line::from(vec![
                        Span::styled(format!("{frame} "), Theme::key_hint()),
                        Span::styled(THINKING_TEXT, Theme::muted()),
                    ]));
                }
            }
            lines.push(Line::default());
        }
        lines
    }

    fn push_reply(
        &self,
        lines: &mut Vec<Line<'static>>,
        target: Target,
        reply: &GenerationData,
        width: usize,
    ) {
        if let Some(code) = reply.code.as_deref().filter(|c| !c.is_empty()) {
            lines.push(Line::from(vec![
                Span::styled(format!("\u{250c} {} ", target.label()), Theme::header()),
                Span::styled("[Ctrl+Y] Copy", Theme::key_hint()),
            ]));
            for row in wrap_chars(code, width.saturating_sub(2)) {
                lines.push(Line::from(vec![
                    Span::styled("\u{2502} ", Theme::border()),
                    Span::styled(row, Theme::code()),
                ]));
            }
            lines.push(Line::styled("\u{2514}", Theme::border()));
        }
        if let Some(note) = reply.keynode.as_deref().filter(|n| !n.is_empty()) {
            lines.push(Line::styled(HIGHLIGHTS_TITLE, Theme::label(Theme::warning())));
            for row in wrap_words(note, width) {
                lines.push(Line::styled(row, Theme::normal()));
            }
        }
        if let Some(assets) = reply.asset_list.as_deref().filter(|a| !a.is_empty()) {
            lines.push(Line::styled(ASSETS_TITLE, Theme::label(Theme::warning())));
            for row in wrap_words(assets, width) {
                lines.push(Line::styled(row, Theme::normal()));
            }
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let title = if self.processing {
            Span::styled(" Sending... ", Theme::dim())
        } else {
            Span::styled(" [Enter] Send ", Theme::key_hint())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()))
            .title_bottom(Line::from(title).right_aligned());
        let inner = block.inner(area);

        let rows = wrap_chars(&self.input.with_cursor(), inner.width as usize);
        let skip = rows.len().saturating_sub(inner.height as usize);
        let lines: Vec<Line> = rows
            .into_iter()
            .skip(skip)
            .map(|row| Line::styled(row, Theme::normal()))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_create(&self, frame: &mut Frame, area: Rect) {
        let input_height = self.input.visible_rows(area.width.saturating_sub(2)) + 2;
        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(input_height),
            Constraint::Min(0),
        ])
        .split(area);

        let heading = vec![
            Line::styled("What do you want to build?", Theme::title()).centered(),
            Line::styled(
                format!("Output: {}", self.target.label()),
                Theme::muted(),
            )
            .centered(),
        ];
        frame.render_widget(Paragraph::new(heading), chunks[1]);
        self.render_input(frame, chunks[2]);
    }

    fn render_stream(&self, frame: &mut Frame, area: Rect) {
        let input_height = self.input.visible_rows(area.width.saturating_sub(2)) + 2;
        let chunks =
            Layout::vertical([Constraint::Min(1), Constraint::Length(input_height)]).split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Chat ", Theme::header()));
        let inner = block.inner(chunks[0]);

        let lines = self.stream_lines(inner.width as usize);
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
        self.max_scroll.set(max_scroll);
        let offset = max_scroll.saturating_sub(self.scroll_back.min(max_scroll));

        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((offset, 0)),
            chunks[0],
        );
        self.render_input(frame, chunks[1]);
    }
}

fn push_label(lines: &mut Vec<Line<'static>>, label: &'static str, color: ratatui::style::Color) {
    lines.push(Line::styled(label, Theme::label(color)));
}

impl Component for ChatComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::StartSession(target) => {
                self.target = *target;
                None
            }
            Action::EnterWorkspace => {
                self.view = WorkspaceView::Create;
                None
            }
            Action::CharInput(c) => {
                self.input.insert_char(*c);
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
            Action::NewlineInput => {
                self.input.insert_char('\n');
                None
            }
            Action::PasteBulk(text) => {
                self.input.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                None
            }
            Action::Submit => self.submit(),
            Action::ChatCompleted(result) => {
                self.complete(result);
                None
            }
            Action::ScrollUp => {
                self.scroll_by(1);
                None
            }
            Action::ScrollDown => {
                self.scroll_by(-1);
                None
            }
            Action::PageUp => {
                self.scroll_by(PAGE_LINES as i32);
                None
            }
            Action::PageDown => {
                self.scroll_by(-(PAGE_LINES as i32));
                None
            }
            Action::Tick => {
                if self.processing {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self.view {
            WorkspaceView::Create => self.render_create(frame, area),
            WorkspaceView::Chat => self.render_stream(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use simply_core::outcome::{Failure, CHAT_FALLBACK_MESSAGE, TIMEOUT_MESSAGE};

    fn typed(text: &str) -> ChatComponent {
        let mut chat = ChatComponent::new(Target::HtmlCss);
        chat.input.insert_str(text);
        chat
    }

    #[test]
    fn blank_submit_is_a_no_op() {
        let mut chat = typed("   \n  ");
        assert!(chat.submit().is_none());
        assert!(chat.bubbles().is_empty());
        assert!(!chat.is_processing());
        assert!(chat.welcome_visible());
        assert_eq!(chat.view(), WorkspaceView::Create);
    }

    #[test]
    fn submit_appends_user_bubble_and_thinking() {
        let mut chat = typed("  a pricing page  ");
        let action = chat.submit();

        assert!(matches!(action, Some(Action::DispatchChat { ref text }) if text == "a pricing page"));
        assert_eq!(
            chat.bubbles(),
            &[Bubble::User("a pricing page".into()), Bubble::Thinking]
        );
        assert!(chat.input.value.is_empty());
        assert!(chat.is_processing());
        assert!(!chat.welcome_visible());
        assert_eq!(chat.view(), WorkspaceView::Chat);
    }

    #[test]
    fn second_submit_while_processing_is_dropped() {
        let mut chat = typed("first");
        assert!(chat.submit().is_some());

        chat.input.insert_str("second");
        assert!(chat.submit().is_none());
        assert_eq!(chat.bubbles().len(), 2);
        // Input is kept so the prompt can be sent later.
        assert_eq!(chat.input.value, "second");
    }

    #[test]
    fn completion_replaces_thinking_and_releases_guard() {
        let mut chat = typed("hero");
        chat.submit();
        chat.complete(&ApiResult::Success(GenerationData {
            code: Some("<h1>Hero</h1>".into()),
            ..Default::default()
        }));

        assert!(!chat.is_processing());
        assert!(!chat.bubbles().contains(&Bubble::Thinking));
        assert_eq!(chat.latest_code(), Some("<h1>Hero</h1>"));

        chat.input.insert_str("again");
        assert!(chat.submit().is_some());
    }

    #[test]
    fn failure_renders_error_bubble_with_fallback() {
        let mut chat = typed("hero");
        chat.submit();
        chat.complete(&ApiResult::Failure(Failure::unknown()));
        assert_eq!(
            chat.bubbles().last(),
            Some(&Bubble::Error(CHAT_FALLBACK_MESSAGE.into()))
        );
        assert!(!chat.is_processing());
    }

    #[test]
    fn latest_code_skips_replies_without_code() {
        let mut chat = typed("one");
        chat.submit();
        chat.complete(&ApiResult::Success(GenerationData {
            code: Some("<p>1</p>".into()),
            ..Default::default()
        }));
        chat.input.insert_str("two");
        chat.submit();
        chat.complete(&ApiResult::Success(GenerationData {
            keynode: Some("no code this time".into()),
            ..Default::default()
        }));
        assert_eq!(chat.latest_code(), Some("<p>1</p>"));
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut chat = ChatComponent::new(Target::HtmlCss);
        chat.handle_action(&Action::PasteBulk("a\r\nb\rc".into()));
        assert_eq!(chat.input.value, "a\nb\nc");
    }

    #[test]
    fn create_view_shows_prompt_and_send_hint() {
        let chat = ChatComponent::new(Target::React);
        let mut term = TestTerminal::new();
        term.draw_with(|frame| chat.render(frame, frame.area()));
        assert!(term.buffer_contains("What do you want to build?"));
        assert!(term.buffer_contains("Output: React"));
        assert!(term.buffer_contains("[Enter] Send"));
    }

    #[test]
    fn stream_shows_bubbles_and_sending_state() {
        let mut chat = typed("make a navbar");
        chat.submit();
        let mut term = TestTerminal::new();
        term.draw_with(|frame| chat.render(frame, frame.area()));
        assert!(term.buffer_contains("You"));
        assert!(term.buffer_contains("make a navbar"));
        assert!(term.buffer_contains(THINKING_TEXT));
        assert!(term.buffer_contains("Sending..."));

        chat.complete(&ApiResult::Failure(Failure::timeout()));
        term.draw_with(|frame| chat.render(frame, frame.area()));
        assert!(term.buffer_contains("Error"));
        assert!(term.buffer_contains(&TIMEOUT_MESSAGE[..20]));
        assert!(term.buffer_contains("[Enter] Send"));
    }

    #[test]
    fn stream_sticks_to_newest_bubble() {
        let mut chat = ChatComponent::new(Target::HtmlCss);
        for i in 0..30 {
            chat.input.insert_str(&format!("prompt {i}"));
            chat.submit();
            chat.complete(&ApiResult::Failure(Failure::application(Some(format!(
                "reply {i}"
            )))));
        }
        let mut term = TestTerminal::new();
        term.draw_with(|frame| chat.render(frame, frame.area()));
        assert!(term.buffer_contains("reply 29"));
        assert!(!term.buffer_contains("reply 0 "));

        chat.handle_action(&Action::PageUp);
        chat.handle_action(&Action::PageUp);
        term.draw_with(|frame| chat.render(frame, frame.area()));
        assert!(!term.buffer_contains("reply 29"));
    }
}
