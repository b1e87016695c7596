//! Bot command parsing (`/name[@bot] arg1 arg2 ...`).

/// A parsed bot command: lowercase name without the leading `/` and whitespace-separated args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    /// Parses `text` as a command.
    ///
    /// Returns `None` when the text does not start with `/`, the name is empty or contains
    /// characters other than ASCII alphanumerics and `_`, or the command is addressed to
    /// another bot (`/cmd@other_bot` while `bot_username` is known).
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;

        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (head, None),
        };

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }

        if let (Some(mention), Some(username)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(username) {
                return None;
            }
        }

        Some(Self {
            name: name.to_ascii_lowercase(),
            args: words.map(str::to_string).collect(),
        })
    }

    /// True when the command name equals `name` (case-insensitive, leading `/` optional).
    pub fn is(&self, name: &str) -> bool {
        self.name
            .eq_ignore_ascii_case(name.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_command() {
        let cmd = Command::parse("/start", None).unwrap();
        assert_eq!(cmd.name, "start");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_parse_command_with_args() {
        let cmd = Command::parse("/role   @b  extra", None).unwrap();
        assert_eq!(cmd.name, "role");
        assert_eq!(cmd.args, vec!["@b".to_string(), "extra".to_string()]);
    }

    #[test]
    fn test_parse_lowercases_name() {
        let cmd = Command::parse("/ROLE @b", None).unwrap();
        assert_eq!(cmd.name, "role");
        assert!(cmd.is("/role"));
        assert!(cmd.is("Role"));
    }

    #[test]
    fn test_parse_mention_matching_bot() {
        let cmd = Command::parse("/role@My_Bot @a", Some("my_bot")).unwrap();
        assert_eq!(cmd.name, "role");
        assert_eq!(cmd.args, vec!["@a".to_string()]);
    }

    #[test]
    fn test_parse_mention_other_bot_is_not_ours() {
        assert!(Command::parse("/role@other_bot @a", Some("my_bot")).is_none());
    }

    #[test]
    fn test_parse_mention_accepted_when_username_unknown() {
        assert!(Command::parse("/help@whatever", None).is_some());
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert!(Command::parse("hello /start", None).is_none());
        assert!(Command::parse("/", None).is_none());
        assert!(Command::parse("", None).is_none());
        assert!(Command::parse("/what?", None).is_none());
    }
}
