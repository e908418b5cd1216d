//! UCI command registry and line grammar.
//!
//! Each command accepts a fixed set of keywords. A keyword opens a slot, and
//! every following non-keyword token is appended to that slot, so values such
//! as move lists or FEN strings can span several tokens.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::error::UciError;
use super::tokenizer::{find_bounded_keyword, Search};

/// Commands understood by the protocol loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption,
    UciNewGame,
    Position,
    Go,
    Stop,
    PonderHit,
    Quit,
    Xyzzy,
}

/// Declaration table: command, its name on the wire, and the keywords it accepts.
const COMMAND_TABLE: &[(UciCommand, &str, &[&str])] = &[
    (UciCommand::Uci, "uci", &[]),
    (UciCommand::IsReady, "isready", &[]),
    (UciCommand::SetOption, "setoption", &["name", "value", "context"]),
    (UciCommand::UciNewGame, "ucinewgame", &[]),
    (UciCommand::Position, "position", &["fen", "startpos", "moves"]),
    (
        UciCommand::Go,
        "go",
        &[
            "infinite",
            "ponder",
            "wtime",
            "btime",
            "winc",
            "binc",
            "movestogo",
            "depth",
            "mate",
            "nodes",
            "movetime",
            "searchmoves",
        ],
    ),
    (UciCommand::Stop, "stop", &[]),
    (UciCommand::PonderHit, "ponderhit", &[]),
    (UciCommand::Quit, "quit", &[]),
    (UciCommand::Xyzzy, "xyzzy", &[]),
];

struct RegistryEntry {
    command: UciCommand,
    keywords: HashSet<&'static str>,
}

static REGISTRY: Lazy<HashMap<&'static str, RegistryEntry>> = Lazy::new(|| {
    COMMAND_TABLE
        .iter()
        .map(|&(command, name, keywords)| {
            let entry = RegistryEntry {
                command,
                keywords: keywords.iter().copied().collect(),
            };
            (name, entry)
        })
        .collect()
});

impl UciCommand {
    /// Wire name of the command.
    #[must_use]
    pub fn name(self) -> &'static str {
        COMMAND_TABLE
            .iter()
            .find(|(command, _, _)| *command == self)
            .map_or("", |&(_, name, _)| name)
    }

    /// Keywords the command accepts, in declaration order.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        COMMAND_TABLE
            .iter()
            .find(|(command, _, _)| *command == self)
            .map_or(&[][..], |&(_, _, keywords)| keywords)
    }

    /// Look a command up by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.get(name).map(|entry| entry.command)
    }
}

/// Keyword → accumulated value. An empty value means the keyword was present
/// without an argument.
pub type Params = HashMap<&'static str, String>;

/// One input line split into a command and its keyword values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: UciCommand,
    pub params: Params,
}

impl ParsedCommand {
    #[must_use]
    pub fn new(command: UciCommand) -> Self {
        ParsedCommand {
            command,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.params.contains_key(keyword)
    }

    /// Value of a keyword, or `None` if it was not given.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.params.get(keyword).map(String::as_str)
    }

    /// Value of a keyword, empty if it was not given.
    #[must_use]
    pub fn get_or_empty(&self, keyword: &str) -> &str {
        self.get(keyword).unwrap_or("")
    }
}

/// Parse one input line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<ParsedCommand>, UciError> {
    let trimmed = line.trim();
    let Some(name) = trimmed.split_whitespace().next() else {
        return Ok(None);
    };
    let rest = trimmed[name.len()..].trim_start();

    let entry = REGISTRY.get(name).ok_or_else(|| UciError::UnknownCommand {
        command: name.to_string(),
        line: line.to_string(),
    })?;

    if entry.command == UciCommand::SetOption {
        return Ok(Some(ParsedCommand {
            command: entry.command,
            params: parse_setoption(rest)?,
        }));
    }

    let mut params = Params::new();
    let mut target: Option<&'static str> = None;
    for token in rest.split_whitespace() {
        if let Some(&keyword) = entry.keywords.get(token) {
            params.insert(keyword, String::new());
            target = Some(keyword);
            continue;
        }

        let Some(keyword) = target else {
            return Err(UciError::UnexpectedToken {
                token: token.to_string(),
                command: name.to_string(),
            });
        };
        let value = params.entry(keyword).or_default();
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(token);
    }

    Ok(Some(ParsedCommand {
        command: entry.command,
        params,
    }))
}

const NAME: &str = "name";
const VALUE: &str = "value";
const CONTEXT: &str = "context";

/// Parse the arguments of `setoption name <NAME> value <VALUE> [context <CONTEXT>]`.
///
/// The name ends at the first bounded `value`; the optional context starts
/// at the last bounded `context` after it.
pub fn parse_setoption(args: &str) -> Result<Params, UciError> {
    let rest = args
        .trim()
        .strip_prefix(NAME)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .ok_or(UciError::ExpectedName)?
        .trim();

    let value_pos = find_bounded_keyword(rest, VALUE, Search::First).ok_or(UciError::MissingValue)?;
    let name = rest[..value_pos].trim();
    if name.is_empty() {
        return Err(UciError::EmptyOptionName);
    }

    let rest = rest[value_pos + VALUE.len()..].trim();
    let mut params = Params::new();
    let value = match find_bounded_keyword(rest, CONTEXT, Search::LastFrom(0)) {
        Some(pos) => {
            let context = rest[pos + CONTEXT.len()..].trim();
            if context.is_empty() {
                return Err(UciError::EmptyContext {
                    name: name.to_string(),
                });
            }
            params.insert(CONTEXT, context.to_string());
            rest[..pos].trim()
        }
        None => rest,
    };

    if value.is_empty() {
        return Err(UciError::EmptyOptionValue);
    }
    params.insert(NAME, name.to_string());
    params.insert(VALUE, value.to_string());
    Ok(params)
}
