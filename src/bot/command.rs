//! Chat command parsing.

/// Commands the bot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// `/strangle`: run a cycle now.
    Strangle,
}

/// Parse a chat message. Anything unrecognised is `None`.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let text = text.trim().to_lowercase();
    if text.starts_with("/strangle") {
        Some(BotCommand::Strangle)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strangle() {
        assert_eq!(parse_command("/strangle"), Some(BotCommand::Strangle));
        assert_eq!(parse_command("  /STRANGLE now "), Some(BotCommand::Strangle));
        assert_eq!(parse_command("/strangle@my_bot"), Some(BotCommand::Strangle));
    }

    #[test]
    fn test_other_text_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("please /strangle"), None);
    }
}
