//! Action enum, the central message bus for the TUI.
//! All user interactions and async results flow through here.

use simply_core::outcome::{ApiResult, DeployData, GenerationData};
use simply_core::render::Popup;
use simply_core::session::Target;

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Display a status message in the status bar.
    SetStatus(String),
    /// Clear the status message.
    ClearStatus,
    /// A tick event for animations and timed status resets.
    Tick,
    /// Esc: close the topmost popup or dialog.
    Escape,
    /// Left mouse button pressed at a terminal cell.
    Click { column: u16, row: u16 },

    // ── Navigation ──────────────────────────────────────────
    /// User picked a target on the onboarding screen.
    StartSession(Target),
    /// The onboarding fade-out finished; show the workspace.
    EnterWorkspace,

    // ── Chat ─────────────────────────────────────────────────
    /// The chat engine accepted a prompt; send it.
    DispatchChat { text: String },
    /// The chat call finished (success or failure).
    ChatCompleted(ApiResult<GenerationData>),
    /// Copy the latest generated code to the clipboard.
    CopyCode,
    /// Open the preview document in the system browser.
    OpenPreview,

    // ── Deploy ───────────────────────────────────────────────
    OpenDeployDialog,
    CloseDeployDialog,
    /// The deploy dialog validated a domain; send the deploy request.
    DispatchDeploy { domain: String },
    /// The deploy call finished (success or failure).
    DeployCompleted(ApiResult<DeployData>),
    ShowPopup(Popup),
    ClosePopup,

    // ── Text Input ───────────────────────────────────────────
    /// A character was typed (only sent when in input mode).
    CharInput(char),
    /// Backspace pressed (only sent when in input mode).
    BackspaceInput,
    /// Delete word (Ctrl+W).
    DeleteWord,
    /// Insert a newline (Shift+Enter / Alt+Enter).
    NewlineInput,
    /// Enter: submit the focused field or confirm.
    Submit,
    /// Bulk paste from bracketed paste mode (terminal sends entire text at once).
    PasteBulk(String),

    // ── Scrolling / Selection ───────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

/// Whether the app is in a text-input mode where raw keys should
/// be forwarded to the active component instead of interpreted as
/// global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode: keys are global shortcuts.
    Normal,
    /// Text input mode: keys go to the focused text field.
    Editing,
}

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    /// Onboarding hidden, workspace not yet shown.
    Transition,
    Workspace,
}

impl Screen {
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Onboarding => "Start",
            Screen::Transition => "...",
            Screen::Workspace => "Workspace",
        }
    }
}

/// Sub-views of the workspace screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceView {
    /// Initial "what do you want to build?" prompt.
    Create,
    /// Message stream and preview.
    Chat,
}
