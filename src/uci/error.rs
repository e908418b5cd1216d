//! Error types for UCI command handling.
//!
//! Every error is scoped to the line that produced it: the loop reports it
//! and keeps reading.

use thiserror::Error;

use crate::engine::EngineError;

use super::options::OptionError;

/// Error produced while parsing, validating or dispatching one input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciError {
    /// The first token of the line is not a registered command
    #[error("Unknown command: '{command}' from line: '{line}'")]
    UnknownCommand { command: String, line: String },
    /// A token appeared where no keyword could own it
    #[error("Unexpected token: {token} in command {command}")]
    UnexpectedToken { token: String, command: String },
    /// `setoption` did not start with `name`
    #[error("Malformed setoption (expected 'name')")]
    ExpectedName,
    /// `setoption` has no bounded `value` keyword
    #[error("Malformed setoption (missing 'value')")]
    MissingValue,
    #[error("Empty option name")]
    EmptyOptionName,
    #[error("Empty option value")]
    EmptyOptionValue,
    #[error("Empty context for '{name}'")]
    EmptyContext { name: String },
    /// `position` needs exactly one of `fen` and `startpos`
    #[error("Position requires either fen or startpos")]
    PositionBase,
    /// A numeric keyword was given without an argument
    #[error("expected value after {keyword}")]
    MissingNumber { keyword: &'static str },
    #[error("invalid value {value}")]
    InvalidNumber { value: String },
    #[error("out of range value {value}")]
    NumberOutOfRange { value: String },
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = UciError::UnknownCommand {
            command: "foo".to_string(),
            line: "foo bar".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown command: 'foo' from line: 'foo bar'");

        let err = UciError::UnexpectedToken {
            token: "x".to_string(),
            command: "go".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected token: x in command go");

        let err = UciError::NumberOutOfRange {
            value: "99999999999999999999".to_string(),
        };
        assert!(err.to_string().contains("99999999999999999999"));
    }
}
