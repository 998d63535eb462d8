use serde::{Deserialize, Serialize};

/// One recorded plain-text message with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub user_id: String,
    pub username: String,
    pub text: String,
}

impl Entry {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            text: text.into(),
        }
    }
}

/// Where the text handed to the summarizer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    History,
    WebPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub source_text: String,
    pub origin: Origin,
}

impl SummaryRequest {
    #[must_use]
    pub fn history(source_text: Option<String>) -> Self {
        Self {
            source_text: source_text.unwrap_or_default(),
            origin: Origin::History,
        }
    }

    #[must_use]
    pub fn web_page(source_text: String) -> Self {
        Self {
            source_text,
            origin: Origin::WebPage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryResult {
    pub lines: Vec<String>,
}

impl SummaryResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// The summary as a single reply body, `None` when there is nothing to say.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let joined = self.lines.join("\n");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Encoded speech ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReply {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// A text message as delivered by the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub chat_id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandName {
    Tldr,
    TldrAudio,
    Other(String),
}

impl CommandName {
    #[must_use]
    pub fn from_token(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tldr" => CommandName::Tldr,
            "tldraudio" => CommandName::TldrAudio,
            _ => CommandName::Other(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundUpdate {
    PlainText(String),
    Command { name: CommandName, argument: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_text_joins_lines() {
        let result = SummaryResult {
            lines: vec!["Sonic won.".to_string(), "Robotnik lost.".to_string()],
        };
        assert_eq!(result.text().as_deref(), Some("Sonic won.\nRobotnik lost."));
    }

    #[test]
    fn test_blank_summary_has_no_text() {
        assert_eq!(SummaryResult::default().text(), None);
        let blank = SummaryResult {
            lines: vec![String::new(), "  ".to_string()],
        };
        assert_eq!(blank.text(), None);
        assert!(blank.is_empty());
    }
}
