//! Chat bubbles and result popups, plus their escaped HTML fragments.
//!
//! Every user- or server-supplied string passes through [`html_escape`]
//! before it lands in markup. Generated code is escaped here too; the only
//! place it goes in raw is the isolated preview document.

use crate::outcome::{ApiResult, DeployData, GenerationData};
use crate::session::Target;

pub const USER_LABEL: &str = "You";
pub const BOT_LABEL: &str = "Simply Design AI";
pub const ERROR_LABEL: &str = "Error";
pub const THINKING_TEXT: &str = "Thinking...";
pub const HIGHLIGHTS_TITLE: &str = "Key Highlights";
pub const ASSETS_TITLE: &str = "Assets Required";

/// Escape text for safe inclusion in HTML text content and attribute values.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// One entry in the message stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bubble {
    User(String),
    Bot { target: Target, reply: GenerationData },
    Error(String),
    /// Placeholder while a chat call is outstanding.
    Thinking,
}

impl Bubble {
    pub fn label(&self) -> &'static str {
        match self {
            Bubble::User(_) => USER_LABEL,
            Bubble::Bot { .. } => BOT_LABEL,
            Bubble::Error(_) => ERROR_LABEL,
            Bubble::Thinking => THINKING_TEXT,
        }
    }

    /// The generated code carried by a bot bubble, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Bubble::Bot { reply, .. } => reply.code.as_deref().filter(|c| !c.is_empty()),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Bubble::User(text) => format!(
                "<div class=\"chat-bubble user\"><span class=\"bubble-label\">{}</span>{}</div>",
                USER_LABEL,
                html_escape(text)
            ),
            Bubble::Bot { target, reply } => bot_html(*target, reply),
            Bubble::Error(msg) => format!(
                "<div class=\"chat-bubble bot-error\"><span class=\"bubble-label\">{}</span>{}</div>",
                ERROR_LABEL,
                html_escape(msg)
            ),
            Bubble::Thinking => format!(
                "<div class=\"thinking-loader\"><div class=\"thinking-dots\"><span></span><span></span><span></span></div><span class=\"thinking-text\">{}</span></div>",
                THINKING_TEXT
            ),
        }
    }
}

fn bot_html(target: Target, reply: &GenerationData) -> String {
    let mut html = format!(
        "<div class=\"chat-bubble bot\"><span class=\"bubble-label\">{}</span>",
        BOT_LABEL
    );

    if let Some(code) = reply.code.as_deref().filter(|c| !c.is_empty()) {
        html.push_str(&format!(
            "<div class=\"code-block-wrapper\"><div class=\"code-block-header\"><span>{}</span><button class=\"btn-copy\" data-action=\"copy\">Copy</button></div><div class=\"code-block-body\"><pre><code>{}</code></pre></div></div>",
            html_escape(target.label()),
            html_escape(code)
        ));
    }

    if let Some(note) = reply.keynode.as_deref().filter(|n| !n.is_empty()) {
        html.push_str(&format!(
            "<div class=\"system-note\"><span class=\"note-title\">{}</span>{}</div>",
            HIGHLIGHTS_TITLE,
            html_escape(note)
        ));
    }

    if let Some(assets) = reply.asset_list.as_deref().filter(|a| !a.is_empty()) {
        html.push_str(&format!(
            "<div class=\"asset-list\"><span class=\"asset-title\">{}</span>{}</div>",
            ASSETS_TITLE,
            html_escape(assets)
        ));
    }

    html.push_str("</div>");
    html
}

/// Only `http` and `https` targets become clickable links.
pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The deploy result popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    Deployed { url: String },
    DeployFailed { message: String },
}

impl Popup {
    pub fn from_deploy(result: &ApiResult<DeployData>) -> Self {
        match result {
            ApiResult::Success(data) => Popup::Deployed {
                url: data.url.clone(),
            },
            ApiResult::Failure(failure) => Popup::DeployFailed {
                message: failure.deploy_message().to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Popup::Deployed { .. })
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Popup::Deployed { .. } => "\u{1F389}",
            Popup::DeployFailed { .. } => "\u{274C}",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Popup::Deployed { .. } => "Deployed Successfully!",
            Popup::DeployFailed { .. } => "Deployment Failed",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Popup::Deployed { .. } => "Your project is now live at:",
            Popup::DeployFailed { message } => message,
        }
    }

    /// Link to the deployed site. Error popups carry none.
    pub fn link(&self) -> Option<&str> {
        match self {
            Popup::Deployed { url } => Some(url),
            Popup::DeployFailed { .. } => None,
        }
    }

    pub fn to_html(&self) -> String {
        let class = if self.is_success() { "success" } else { "error" };
        let mut html = format!(
            "<div class=\"popup-box {}\"><span class=\"popup-icon\">{}</span><h3 class=\"popup-title\">{}</h3><p class=\"popup-message\">{}</p>",
            class,
            self.icon(),
            html_escape(self.title()),
            html_escape(self.message())
        );
        if let Some(link) = self.link() {
            let url = html_escape(link);
            if is_web_url(link) {
                html.push_str(&format!(
                    "<a class=\"popup-link\" href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a>"
                ));
            } else {
                html.push_str(&format!("<span class=\"popup-link\">{url}</span>"));
            }
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Failure;

    const SCRIPT: &str = "<script>alert(1)</script>";
    const ESCAPED: &str = "&lt;script&gt;alert(1)&lt;/script&gt;";

    #[test]
    fn popup_links_only_web_urls() {
        let ok = Popup::Deployed {
            url: "https://mysite.example".into(),
        }
        .to_html();
        assert!(ok.contains("href=\"https://mysite.example\""));

        for url in ["javascript:alert(1)", " JavaScript:alert(1)", "data:text/html,x"] {
            let html = Popup::Deployed { url: url.into() }.to_html();
            assert!(!html.contains("href="), "{url}");
            assert!(html.contains("<span class=\"popup-link\">"));
        }
    }

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(html_escape("<b>&test</b>"), "&lt;b&gt;&amp;test&lt;/b&gt;");
        assert_eq!(html_escape(r#"a"b'c"#), "a&quot;b&#39;c");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn user_bubble_escapes_script() {
        let html = Bubble::User(SCRIPT.to_string()).to_html();
        assert!(html.contains(ESCAPED));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<span class=\"bubble-label\">You</span>"));
    }

    #[test]
    fn error_bubble_escapes_script() {
        let html = Bubble::Error(SCRIPT.to_string()).to_html();
        assert!(html.contains("bot-error"));
        assert!(html.contains(ESCAPED));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn bot_bubble_escapes_every_server_field() {
        let bubble = Bubble::Bot {
            target: Target::HtmlCss,
            reply: GenerationData {
                code: Some(SCRIPT.to_string()),
                keynode: Some(SCRIPT.to_string()),
                asset_list: Some(SCRIPT.to_string()),
            },
        };
        let html = bubble.to_html();
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches(ESCAPED).count(), 3);
        assert!(html.contains(HIGHLIGHTS_TITLE));
        assert!(html.contains(ASSETS_TITLE));
        assert!(html.contains("<span>HTML/CSS</span>"));
    }

    #[test]
    fn bot_bubble_omits_absent_sections() {
        let bubble = Bubble::Bot {
            target: Target::React,
            reply: GenerationData {
                keynode: Some("responsive grid".to_string()),
                ..Default::default()
            },
        };
        let html = bubble.to_html();
        assert!(!html.contains("code-block-wrapper"));
        assert!(!html.contains("asset-list"));
        assert!(html.contains("responsive grid"));
        assert_eq!(bubble.code(), None);
    }

    #[test]
    fn deploy_success_popup_links_exact_url() {
        let result = ApiResult::Success(DeployData {
            url: "https://x.example/site".to_string(),
        });
        let popup = Popup::from_deploy(&result);
        assert_eq!(popup.link(), Some("https://x.example/site"));
        assert_eq!(popup.title(), "Deployed Successfully!");
        let html = popup.to_html();
        assert!(html.contains(
            "href=\"https://x.example/site\" target=\"_blank\" rel=\"noopener\">https://x.example/site</a>"
        ));
    }

    #[test]
    fn deploy_failure_popup_has_message_and_no_link() {
        let result: ApiResult<DeployData> =
            ApiResult::Failure(Failure::application(Some("quota exceeded".to_string())));
        let popup = Popup::from_deploy(&result);
        assert_eq!(popup.message(), "quota exceeded");
        assert_eq!(popup.link(), None);
        assert!(!popup.to_html().contains("<a "));
    }

    #[test]
    fn popup_escapes_server_text() {
        let popup = Popup::DeployFailed {
            message: SCRIPT.to_string(),
        };
        assert!(popup.to_html().contains(ESCAPED));

        let popup = Popup::Deployed {
            url: "\"><script>x</script>".to_string(),
        };
        assert!(!popup.to_html().contains("<script>"));
    }
}
