use std::fmt;

/// Entries in the Format menu. Neither changes any style yet; both are
/// declared unsupported so the UI can say so instead of silently doing
/// nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    FontColor,
}

impl FormatCommand {
    pub fn all() -> &'static [FormatCommand] {
        &[FormatCommand::Bold, FormatCommand::FontColor]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "Bold",
            FormatCommand::FontColor => "Change Font Color",
        }
    }
}

/// Explicit "this command exists but does nothing" result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported {
    pub command: FormatCommand,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            FormatCommand::Bold => write!(f, "Bold formatting is not implemented yet."),
            FormatCommand::FontColor => write!(f, "Font color selection is not implemented yet."),
        }
    }
}

impl std::error::Error for Unsupported {}

pub fn apply(command: FormatCommand) -> Result<(), Unsupported> {
    Err(Unsupported { command })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_command_reports_unsupported() {
        for &command in FormatCommand::all() {
            let err = apply(command).unwrap_err();
            assert_eq!(err.command, command);
            assert!(err.to_string().contains("not implemented"));
        }
    }
}
