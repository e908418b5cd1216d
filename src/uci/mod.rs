//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Input lines go through three stages:
//!
//! 1. [`command::parse_command`] splits a line into a command and its keyword
//!    values, using the fixed per-command keyword table.
//! 2. [`request::Request`] validates those values into typed requests.
//! 3. [`dispatch::UciLoop`] hands requests to the engine controller.
//!
//! Engine reports travel back through [`responder::UciResponder`].

pub mod command;
pub mod dispatch;
pub mod error;
pub mod moves;
pub mod options;
pub mod report;
pub mod request;
pub mod responder;
pub mod tokenizer;

pub use command::{parse_command, ParsedCommand, UciCommand};
pub use dispatch::{LineOutcome, UciLoop};
pub use error::UciError;
pub use moves::Move;
pub use options::{OptionKind, OptionStore};
pub use report::{BestMoveInfo, Score, Side, ThinkingInfo, Wdl};
pub use request::{BasePosition, GoRequest, OptionRequest, PositionRequest, Request};
pub use responder::{Responder, SharedSink, UciResponder};
