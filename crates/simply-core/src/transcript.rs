//! HTML mirror of the chat stream, written next to the preview document.

use chrono::{DateTime, Local};

use crate::render::{html_escape, Bubble};
use crate::session::Session;

const TRANSCRIPT_STYLE: &str = "body{font-family:sans-serif;background:#111;color:#ddd;max-width:860px;margin:2rem auto}\
.chat-bubble{border-radius:8px;padding:.75rem 1rem;margin:.75rem 0;white-space:pre-wrap}\
.user{background:#1d2a3a}.bot{background:#1c1c1c}.bot-error{background:#3a1d1d}\
.bubble-label{display:block;font-size:.75rem;opacity:.6;margin-bottom:.25rem}\
pre{overflow-x:auto;background:#000;padding:.75rem}";

/// Render the full transcript document. Thinking placeholders are skipped.
pub fn render_transcript(
    session: &Session,
    bubbles: &[Bubble],
    generated_at: DateTime<Local>,
) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str(&format!(
        "<title>Simply Design \u{2014} {}</title><style>{}</style></head><body>",
        html_escape(session.id()),
        TRANSCRIPT_STYLE
    ));
    html.push_str(&format!(
        "<header><span class=\"session-badge\">{}</span> <span class=\"lang-badge\">{}</span> <time>{}</time></header>\n",
        html_escape(&session.badge()),
        html_escape(session.target().label()),
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    for bubble in bubbles.iter().filter(|b| !matches!(b, Bubble::Thinking)) {
        html.push_str(&bubble.to_html());
        html.push('\n');
    }
    html.push_str("</body></html>\n");
    html
}
