use crate::core::models::{CommandName, InboundUpdate};

pub const COMMAND_PREFIX: char = '/';

/// Classifies raw message text as a plain message or a slash command.
///
/// The command token may carry a `@botname` suffix, as Telegram sends in
/// group chats. Everything after the token, trimmed, is the argument.
///
/// # Examples
///
/// ```
/// use tldr::command_parser::parse_update;
/// use tldr::core::models::{CommandName, InboundUpdate};
///
/// assert_eq!(
///     parse_update("/tldr@tldr_bot https://example.com "),
///     InboundUpdate::Command {
///         name: CommandName::Tldr,
///         argument: "https://example.com".to_string(),
///     }
/// );
/// assert_eq!(parse_update("emeralds"), InboundUpdate::PlainText("emeralds".to_string()));
/// ```
#[must_use]
pub fn parse_update(text: &str) -> InboundUpdate {
    let Some(rest) = text.strip_prefix(COMMAND_PREFIX) else {
        return InboundUpdate::PlainText(text.to_string());
    };

    let (token, argument) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let name = token.split('@').next().unwrap_or_default();

    InboundUpdate::Command {
        name: CommandName::from_token(name),
        argument: argument.trim().to_string(),
    }
}
