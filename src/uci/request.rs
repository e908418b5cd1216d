//! Typed requests built from parsed commands.
//!
//! Conversion validates the whole command before anything reaches the
//! engine: a request either comes out complete or not at all.

use std::num::IntErrorKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::command::{ParsedCommand, UciCommand};
use super::error::UciError;

/// FEN of the standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Search parameters from `go`. `None` means the limit was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoRequest {
    pub infinite: bool,
    pub ponder: bool,
    pub searchmoves: Vec<String>,
    pub wtime: Option<i32>,
    pub btime: Option<i32>,
    pub winc: Option<i32>,
    pub binc: Option<i32>,
    pub movestogo: Option<i32>,
    pub depth: Option<i32>,
    pub mate: Option<i32>,
    pub nodes: Option<i32>,
    pub movetime: Option<i32>,
}

type LimitSlot = fn(&mut GoRequest) -> &mut Option<i32>;

/// Numeric `go` keywords and the request field each one fills.
const GO_LIMITS: &[(&str, LimitSlot)] = &[
    ("wtime", |r| &mut r.wtime),
    ("btime", |r| &mut r.btime),
    ("winc", |r| &mut r.winc),
    ("binc", |r| &mut r.binc),
    ("movestogo", |r| &mut r.movestogo),
    ("depth", |r| &mut r.depth),
    ("mate", |r| &mut r.mate),
    ("nodes", |r| &mut r.nodes),
    ("movetime", |r| &mut r.movetime),
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BasePosition {
    StartPos,
    Fen(String),
}

/// Position from `position`: a base plus moves played from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionRequest {
    pub base: BasePosition,
    pub moves: Vec<String>,
}

impl PositionRequest {
    #[must_use]
    pub fn startpos() -> Self {
        PositionRequest {
            base: BasePosition::StartPos,
            moves: Vec::new(),
        }
    }

    /// FEN of the base position.
    #[must_use]
    pub fn fen(&self) -> &str {
        match &self.base {
            BasePosition::StartPos => STARTPOS_FEN,
            BasePosition::Fen(fen) => fen,
        }
    }
}

/// Arguments of `setoption`. An empty context addresses the global value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptionRequest {
    pub name: String,
    pub value: String,
    pub context: String,
}

/// A validated command, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Uci,
    IsReady,
    SetOption(OptionRequest),
    NewGame,
    Position(PositionRequest),
    Go(GoRequest),
    Stop,
    PonderHit,
    Quit,
    Xyzzy,
}

fn split_moves(moves: &str) -> Vec<String> {
    moves.split_whitespace().map(str::to_string).collect()
}

/// Parse a numeric keyword value as a signed 32-bit integer.
fn parse_number(keyword: &'static str, value: &str) -> Result<i32, UciError> {
    value.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::Empty => UciError::MissingNumber { keyword },
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => UciError::NumberOutOfRange {
            value: value.to_string(),
        },
        _ => UciError::InvalidNumber {
            value: value.to_string(),
        },
    })
}

/// A keyword that must appear without an argument.
fn flag(cmd: &ParsedCommand, keyword: &str) -> Result<bool, UciError> {
    match cmd.get(keyword) {
        None => Ok(false),
        Some("") => Ok(true),
        Some(arg) => Err(UciError::UnexpectedToken {
            token: arg.to_string(),
            command: cmd.command.name().to_string(),
        }),
    }
}

impl TryFrom<&ParsedCommand> for GoRequest {
    type Error = UciError;

    fn try_from(cmd: &ParsedCommand) -> Result<Self, Self::Error> {
        let mut request = GoRequest {
            infinite: flag(cmd, "infinite")?,
            ponder: flag(cmd, "ponder")?,
            searchmoves: split_moves(cmd.get_or_empty("searchmoves")),
            ..GoRequest::default()
        };

        for &(keyword, slot) in GO_LIMITS {
            if let Some(value) = cmd.get(keyword) {
                *slot(&mut request) = Some(parse_number(keyword, value)?);
            }
        }
        Ok(request)
    }
}

impl TryFrom<&ParsedCommand> for PositionRequest {
    type Error = UciError;

    fn try_from(cmd: &ParsedCommand) -> Result<Self, Self::Error> {
        if cmd.contains("fen") == cmd.contains("startpos") {
            return Err(UciError::PositionBase);
        }

        if let Some(extra) = cmd.get("startpos").filter(|s| !s.is_empty()) {
            log::warn!("ignoring tokens after startpos: {extra}");
        }

        let base = match cmd.get("fen") {
            Some(fen) if !fen.is_empty() => BasePosition::Fen(fen.to_string()),
            _ => BasePosition::StartPos,
        };
        Ok(PositionRequest {
            base,
            moves: split_moves(cmd.get_or_empty("moves")),
        })
    }
}

impl TryFrom<&ParsedCommand> for OptionRequest {
    type Error = UciError;

    fn try_from(cmd: &ParsedCommand) -> Result<Self, Self::Error> {
        let name = cmd.get("name").filter(|s| !s.is_empty());
        let value = cmd.get("value").filter(|s| !s.is_empty());
        match (name, value) {
            (None, _) => Err(UciError::EmptyOptionName),
            (_, None) => Err(UciError::EmptyOptionValue),
            (Some(name), Some(value)) => Ok(OptionRequest {
                name: name.to_string(),
                value: value.to_string(),
                context: cmd.get_or_empty("context").to_string(),
            }),
        }
    }
}

impl TryFrom<ParsedCommand> for Request {
    type Error = UciError;

    fn try_from(cmd: ParsedCommand) -> Result<Self, Self::Error> {
        Ok(match cmd.command {
            UciCommand::Uci => Request::Uci,
            UciCommand::IsReady => Request::IsReady,
            UciCommand::SetOption => Request::SetOption(OptionRequest::try_from(&cmd)?),
            UciCommand::UciNewGame => Request::NewGame,
            UciCommand::Position => Request::Position(PositionRequest::try_from(&cmd)?),
            UciCommand::Go => Request::Go(GoRequest::try_from(&cmd)?),
            UciCommand::Stop => Request::Stop,
            UciCommand::PonderHit => Request::PonderHit,
            UciCommand::Quit => Request::Quit,
            UciCommand::Xyzzy => Request::Xyzzy,
        })
    }
}
