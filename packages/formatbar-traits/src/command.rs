use std::fmt;
use std::str::FromStr;

/// A rich-text editing command understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    /// Legacy HTML font size, `1..=7`.
    FontSize(u8),
}

impl FormatCommand {
    /// Name under which hosts report the current font size.
    pub const FONT_SIZE: &'static str = "fontSize";

    /// The command identifier, as accepted by `execCommand`.
    pub fn name(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::FontSize(_) => Self::FONT_SIZE,
        }
    }

    /// The command argument, if it takes one.
    pub fn value(&self) -> Option<String> {
        match self {
            FormatCommand::FontSize(size) => Some(size.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The host ran the command but reported that it had no effect.
    #[error("`{command}` was rejected by the host")]
    Rejected { command: &'static str },
    /// The host has no rich-text editing facility.
    #[error("`{command}` is not supported by the host")]
    Unsupported { command: &'static str },
    #[error("host error: {0}")]
    Host(String),
}

/// The rich-text command facility of the host document.
pub trait CommandApi {
    fn exec_command(&mut self, command: FormatCommand) -> Result<(), CommandError>;

    /// The current value of a command's state (e.g. `"fontSize"`), `None` if unknown.
    fn query_command_value(&self, name: &str) -> Option<String>;
}

/// What a toolbar button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatAction {
    Bold,
    Italic,
    Underline,
    FontSizeDown,
    FontSizeUp,
}

impl FormatAction {
    pub const ALL: [FormatAction; 5] = [
        FormatAction::Bold,
        FormatAction::Italic,
        FormatAction::Underline,
        FormatAction::FontSizeDown,
        FormatAction::FontSizeUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatAction::Bold => "bold",
            FormatAction::Italic => "italic",
            FormatAction::Underline => "underline",
            FormatAction::FontSizeDown => "font-size-down",
            FormatAction::FontSizeUp => "font-size-up",
        }
    }
}

impl fmt::Display for FormatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toolbar action `{0}`")]
pub struct ParseActionError(pub String);

impl FromStr for FormatAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
