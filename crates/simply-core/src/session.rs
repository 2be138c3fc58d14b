//! Session bookkeeping: the opaque correlation id and the chosen code target.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated session id.
pub const SESSION_ID_LEN: usize = 16;

const SESSION_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The output code style the backend should generate, sent as `code_language`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Target {
    /// Plain markup and styling. The only target with a live preview.
    #[default]
    #[serde(rename = "HTML/CSS")]
    HtmlCss,
    #[serde(rename = "React")]
    React,
    #[serde(rename = "Vue")]
    Vue,
    #[serde(rename = "Angular")]
    Angular,
    #[serde(rename = "Svelte")]
    Svelte,
    #[serde(rename = "Next.js")]
    NextJs,
}

impl Target {
    /// All targets in selector order.
    pub fn all() -> &'static [Target] {
        &[
            Target::HtmlCss,
            Target::React,
            Target::Vue,
            Target::Angular,
            Target::Svelte,
            Target::NextJs,
        ]
    }

    /// The wire/display label.
    pub fn label(&self) -> &'static str {
        match self {
            Target::HtmlCss => "HTML/CSS",
            Target::React => "React",
            Target::Vue => "Vue",
            Target::Angular => "Angular",
            Target::Svelte => "Svelte",
            Target::NextJs => "Next.js",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Target> {
        let label = label.trim();
        Target::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    /// Whether generated code for this target can be shown in the live preview.
    pub fn has_live_preview(&self) -> bool {
        matches!(self, Target::HtmlCss)
    }

    /// Position in [`Target::all`].
    pub fn index(&self) -> usize {
        Target::all()
            .iter()
            .position(|t| t == self)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Generate a 16-character id drawn uniformly from `[A-Za-z0-9]`.
///
/// Not a security token: it only correlates calls at the backend.
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SESSION_ID_ALPHABET.len());
            SESSION_ID_ALPHABET[idx] as char
        })
        .collect()
}

/// A started session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    target: Target,
}

impl Session {
    /// Capture the selected target and mint a fresh id.
    pub fn start(target: Target) -> Self {
        Self {
            id: generate_session_id(),
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Badge text for the header, e.g. `Session: aB3dE5gH…`.
    pub fn badge(&self) -> String {
        let short: String = self.id.chars().take(8).collect();
        format!("Session: {short}\u{2026}")
    }
}
