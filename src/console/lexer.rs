//! Splits raw console lines into commands and chat messages.

/// Character that marks a console line as a command.
pub const COMMAND_PREFIX: char = '#';

/// Result of lexing one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// A line that is exactly `#`. Nothing happens.
    Empty,
    /// Chat text, kept exactly as typed.
    Message(String),
    /// A `#name arg...` command.
    Command(Command),
}

/// A command name with its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Name after the `#`, matched case-sensitively.
    pub name: String,
    /// Whitespace-separated tokens after the name.
    pub args: Vec<String>,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{COMMAND_PREFIX}{}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Lex a console line.
///
/// The command name runs up to the first space, so `#quit\tnow` is the
/// (unknown) command `quit\tnow`.
pub fn parse_line(line: &str) -> ConsoleInput {
    let Some(rest) = line.strip_prefix(COMMAND_PREFIX) else {
        return ConsoleInput::Message(line.to_string());
    };

    if rest.is_empty() {
        return ConsoleInput::Empty;
    }

    let (name, tail) = rest.split_once(' ').unwrap_or((rest, ""));

    ConsoleInput::Command(Command {
        name: name.to_string(),
        args: tail.split_whitespace().map(str::to_string).collect(),
    })
}
