//! Rendering of external command invocations for logs and error reports.
//!
//! Tracker adapters shell out to a CLI; these helpers turn the argument
//! vector back into a line a user could paste into a POSIX shell.

/// Characters that never need quoting in a POSIX shell word.
const fn is_shell_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | ',' | '=' | '@' | '+')
}

/// Escapes a value for safe inclusion in a POSIX shell command.
///
/// Uses single-quote wrapping and the standard `'\''` sequence for embedded
/// quotes.
#[must_use]
pub fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// Quotes a single shell word only when it contains unsafe characters.
#[must_use]
pub fn shell_word(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_shell_safe) {
        value.to_owned()
    } else {
        shell_escape(value)
    }
}

/// Renders `program` and `args` as a single shell command line.
#[must_use]
pub fn render_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let mut rendered = shell_word(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&shell_word(arg.as_ref()));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::{render_command, shell_escape, shell_word};

    #[test]
    fn shell_escape_handles_empty_string() {
        assert_eq!(shell_escape(""), "''");
    }

    #[test]
    fn shell_escape_escapes_single_quotes() {
        assert_eq!(shell_escape("it's"), "'it'\\''s'");
    }

    #[test]
    fn shell_word_leaves_plain_arguments_bare() {
        assert_eq!(shell_word("--add-label"), "--add-label");
        assert_eq!(shell_word("status:ready,priority:high"), "status:ready,priority:high");
    }

    #[test]
    fn shell_word_quotes_whitespace_and_empty_values() {
        assert_eq!(shell_word("SMK-010: Login"), "'SMK-010: Login'");
        assert_eq!(shell_word(""), "''");
    }

    #[test]
    fn render_command_joins_program_and_arguments() {
        let rendered = render_command(
            "gh",
            &["issue", "edit", "42", "--repo", "owner/repo", "--title", "a b"],
        );
        assert_eq!(
            rendered,
            "gh issue edit 42 --repo owner/repo --title 'a b'"
        );
    }
}
