//! Main application state and render loop.

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use simply_client::ApiClient;
use simply_core::config::SimplyConfig;
use simply_core::outcome::{ApiResult, Failure};
use simply_core::output::SessionOutput;
use simply_core::payload::RequestPayload;
use simply_core::preview::PreviewEngine;
use simply_core::session::{Session, Target};
use simply_core::transcript::render_transcript;

use crate::action::{Action, InputMode, Screen, WorkspaceView};
use crate::components::chat::ChatComponent;
use crate::components::deploy_dialog::DeployDialogComponent;
use crate::components::help::HelpComponent;
use crate::components::onboarding::OnboardingComponent;
use crate::components::popup::PopupComponent;
use crate::components::preview_pane::PreviewPaneComponent;
use crate::components::status_bar::StatusBarComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, InputModeFlag};
use crate::system;
use crate::theme::Theme;

/// Delay between hiding onboarding and showing the workspace.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(300);

/// How long "Copied!" stays in the status bar.
const COPY_FLASH: Duration = Duration::from_secs(2);

/// Main application state.
pub struct App {
    screen: Screen,
    /// Whether the app should exit.
    should_quit: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,

    /// Webhook client (shared across async tasks).
    client: Arc<ApiClient>,
    /// Base directory for per-session output.
    preview_dir: PathBuf,
    /// Set once the user leaves onboarding.
    session: Option<Session>,
    output: Option<SessionOutput>,
    /// Size of the last drawn frame, for mouse hit-testing.
    last_area: Rect,

    // Components
    onboarding: OnboardingComponent,
    chat: ChatComponent,
    preview: PreviewPaneComponent,
    deploy_dialog: DeployDialogComponent,
    popup: PopupComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl App {
    pub fn new(config: &SimplyConfig) -> Self {
        let target = config.session.target();
        Self {
            screen: Screen::Onboarding,
            should_quit: false,
            input_mode_flag: event::new_input_mode_flag(),
            client: Arc::new(ApiClient::new(
                config.api.endpoint.clone(),
                config.api.timeout(),
            )),
            preview_dir: config.preview.dir.clone(),
            session: None,
            output: None,
            last_area: Rect::default(),
            onboarding: OnboardingComponent::new(target),
            chat: ChatComponent::new(target),
            preview: PreviewPaneComponent::new(),
            deploy_dialog: DeployDialogComponent::new(),
            popup: PopupComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        }
    }

    /// Preselect the target from CLI args.
    pub fn set_initial_target(&mut self, target: Target) {
        self.onboarding.select(target);
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        self.sync_input_mode();
        info!(endpoint = %self.client.endpoint(), "Simply started");

        // Main loop.
        loop {
            // Render.
            let completed = terminal.draw(|frame| {
                self.render(frame);
            })?;
            self.last_area = completed.area;

            // Process actions.
            if let Some(action) = rx.recv().await {
                self.handle_action(&action, &tx);

                if self.should_quit {
                    break;
                }
            }
        }

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn sync_input_mode(&self) {
        event::set_input_mode(&self.input_mode_flag, self.current_input_mode());
    }

    /// Typing goes to a text field only in the workspace with no overlay
    /// other than the deploy dialog on top.
    fn current_input_mode(&self) -> InputMode {
        if self.help.visible || self.popup.is_open() {
            return InputMode::Normal;
        }
        match self.screen {
            Screen::Workspace => InputMode::Editing,
            Screen::Onboarding | Screen::Transition => InputMode::Normal,
        }
    }

    /// Dispatch an action to the components it concerns.
    fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        let chained = match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::Escape => {
                self.close_topmost();
                None
            }
            Action::Click { column, row } => {
                self.close_on_outside_click(Position::new(*column, *row));
                None
            }
            Action::Tick => {
                self.chat.handle_action(action);
                self.status_bar.handle_action(action)
            }
            Action::SetStatus(_) | Action::ClearStatus => self.status_bar.handle_action(action),

            // ── Navigation ──────────────────────────────────────
            Action::StartSession(target) => {
                if self.screen != Screen::Onboarding {
                    return;
                }
                self.start_session(*target, tx);
                self.chat.handle_action(action);
                self.status_bar.handle_action(action)
            }
            Action::EnterWorkspace => {
                self.screen = Screen::Workspace;
                self.chat.handle_action(action);
                self.status_bar.handle_action(action)
            }

            // ── Chat ────────────────────────────────────────────
            Action::DispatchChat { text } => {
                self.spawn_chat(text.clone(), tx.clone());
                self.write_transcript();
                None
            }
            Action::ChatCompleted(_) => {
                self.chat.handle_action(action);
                self.write_transcript();
                self.preview.handle_action(action)
            }
            Action::CopyCode => self.copy_code(),
            Action::OpenPreview => Some(self.open_preview()),

            // ── Deploy ──────────────────────────────────────────
            Action::OpenDeployDialog => {
                if self.screen == Screen::Workspace && !self.popup.is_open() {
                    self.deploy_dialog.handle_action(action);
                }
                None
            }
            Action::CloseDeployDialog => self.deploy_dialog.handle_action(action),
            Action::DispatchDeploy { domain } => {
                self.spawn_deploy(domain.clone(), tx.clone());
                None
            }
            Action::DeployCompleted(_) => self.deploy_dialog.handle_action(action),
            Action::ShowPopup(_) | Action::ClosePopup => self.popup.handle_action(action),

            // ── Input goes to the topmost surface ───────────────
            Action::ToggleHelp => self.help.handle_action(action),
            _ => self.route_input(action),
        };

        self.sync_input_mode();

        if let Some(next) = chained {
            self.handle_action(&next, tx);
        }
    }

    fn route_input(&mut self, action: &Action) -> Option<Action> {
        if self.help.visible {
            return self.help.handle_action(action);
        }
        if self.popup.is_open() {
            return self.popup.handle_action(action);
        }
        if self.deploy_dialog.visible {
            return self.deploy_dialog.handle_action(action);
        }
        match self.screen {
            Screen::Onboarding => self.onboarding.handle_action(action),
            Screen::Workspace => self.chat.handle_action(action),
            Screen::Transition => None,
        }
    }

    /// Esc: help, then the result popup, then the deploy dialog.
    fn close_topmost(&mut self) {
        if self.help.visible {
            self.help.handle_action(&Action::Escape);
        } else if self.popup.is_open() {
            self.popup.handle_action(&Action::ClosePopup);
        } else if self.deploy_dialog.visible {
            self.deploy_dialog.handle_action(&Action::CloseDeployDialog);
        }
    }

    fn close_on_outside_click(&mut self, at: Position) {
        if self.help.visible {
            self.help.handle_action(&Action::Click {
                column: at.x,
                row: at.y,
            });
        } else if self.popup.is_open() {
            if !PopupComponent::area(self.last_area).contains(at) {
                self.popup.handle_action(&Action::ClosePopup);
            }
        } else if self.deploy_dialog.visible
            && !DeployDialogComponent::dialog_rect(self.last_area).contains(at)
        {
            self.deploy_dialog.handle_action(&Action::CloseDeployDialog);
        }
    }

    /// Create the session, bind its output directory, and schedule the
    /// switch to the workspace.
    fn start_session(&mut self, target: Target, tx: &mpsc::UnboundedSender<Action>) {
        let session = Session::start(target);
        info!(session = %session.id(), target = %target, "Session started");

        let output = SessionOutput::new(&self.preview_dir, session.id());
        debug!(dir = %output.dir().display(), "Session output directory");
        self.preview
            .attach(PreviewEngine::new(output.clone()), target);
        self.output = Some(output);
        self.session = Some(session);
        self.screen = Screen::Transition;

        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TRANSITION_DELAY).await;
            let _ = tx.send(Action::EnterWorkspace);
        });
    }

    // ── Async task spawners ─────────────────────────────────────

    /// Spawn a task to send one chat turn.
    fn spawn_chat(&self, text: String, tx: mpsc::UnboundedSender<Action>) {
        let Some(session) = &self.session else {
            warn!("Chat submitted without a session");
            let _ = tx.send(Action::ChatCompleted(ApiResult::Failure(Failure::unknown())));
            return;
        };
        let payload = RequestPayload::chat(session, &text);
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = client.call_chat(&payload).await;
            let _ = tx.send(Action::ChatCompleted(result));
        });
    }

    /// Spawn a task to publish the session's project under `domain`.
    fn spawn_deploy(&self, domain: String, tx: mpsc::UnboundedSender<Action>) {
        let Some(session) = &self.session else {
            warn!("Deploy requested without a session");
            let _ = tx.send(Action::DeployCompleted(ApiResult::Failure(Failure::unknown())));
            return;
        };
        let payload = RequestPayload::deploy(session, &domain);
        let client = self.client.clone();
        let _ = tx.send(Action::SetStatus(format!("Publishing {domain}...")));

        tokio::spawn(async move {
            let result = client.call_deploy(&payload).await;
            if result.is_success() {
                let _ = tx.send(Action::SetStatus("Deployed".to_string()));
            } else {
                let _ = tx.send(Action::ClearStatus);
            }
            let _ = tx.send(Action::DeployCompleted(result));
        });
    }

    /// Mirror the chat stream to the session's transcript file.
    fn write_transcript(&self) {
        let (Some(session), Some(output)) = (&self.session, &self.output) else {
            return;
        };
        let document = render_transcript(session, self.chat.bubbles(), chrono::Local::now());
        match output.write_transcript(&document) {
            Ok(path) => debug!(path = %path.display(), "Transcript written"),
            Err(e) => warn!("Failed to write transcript: {}", e),
        }
    }

    fn copy_code(&mut self) -> Option<Action> {
        let Some(code) = self.chat.latest_code() else {
            return Some(Action::SetStatus("No code to copy yet".to_string()));
        };
        match system::copy_to_clipboard(code) {
            Ok(()) => {
                self.status_bar.flash("Copied!", COPY_FLASH);
                None
            }
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                Some(Action::SetStatus(format!("Copy failed: {e}")))
            }
        }
    }

    fn open_preview(&self) -> Action {
        let Some(engine) = self.preview.engine().filter(|e| e.surface_visible()) else {
            return Action::SetStatus("No preview yet".to_string());
        };
        let path = engine.document_path();
        match system::open_path(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Opened preview");
                Action::SetStatus(format!("Opened {}", path.display()))
            }
            Err(e) => {
                warn!("Failed to open preview: {}", e);
                Action::SetStatus(format!("Cannot open preview: {e}"))
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        match self.screen {
            Screen::Onboarding => self.onboarding.render(frame, chunks[1]),
            // Blank frame between the two screens.
            Screen::Transition => {}
            Screen::Workspace => {
                self.render_header(frame, chunks[0]);
                self.render_workspace(frame, chunks[1]);
            }
        }

        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.deploy_dialog.render(frame, area);
        self.popup.render(frame, area);
        self.help.render(frame, area);
    }

    fn render_header(&self, frame: &mut ratatui::Frame, area: Rect) {
        let Some(session) = &self.session else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(" Simply Design ", Theme::title()),
            Span::raw(" "),
            Span::styled(format!(" {} ", session.badge()), Theme::badge()),
            Span::raw(" "),
            Span::styled(format!(" {} ", session.target().label()), Theme::badge()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_workspace(&self, frame: &mut ratatui::Frame, area: Rect) {
        match self.chat.view() {
            WorkspaceView::Create => self.chat.render(frame, area),
            WorkspaceView::Chat => {
                let panes = Layout::horizontal([
                    Constraint::Percentage(50),
                    Constraint::Percentage(50),
                ])
                .split(area);
                self.chat.render(frame, panes[0]);
                self.preview.render(frame, panes[1]);
            }
        }
    }
}
