//! Search reports produced by the engine.
//!
//! The protocol layer does not own these; it only formats them. Every
//! optional field is printed only when set.

use std::fmt;

use super::moves::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::White => "white",
            Side::Black => "black",
        })
    }
}

/// Evaluation of a line: centipawns, or moves to mate (negative when being mated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

/// Win/draw/loss, in permille.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wdl {
    pub w: u32,
    pub d: u32,
    pub l: u32,
}

/// The engine's final choice for a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMoveInfo {
    pub bestmove: Move,
    pub ponder: Option<Move>,
    pub player: Option<u32>,
    pub game_id: Option<u32>,
    pub side: Option<Side>,
}

impl BestMoveInfo {
    #[must_use]
    pub fn new(bestmove: Move) -> Self {
        BestMoveInfo {
            bestmove,
            ponder: None,
            player: None,
            game_id: None,
            side: None,
        }
    }
}

/// Progress of a running search, one `info` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThinkingInfo {
    pub player: Option<u32>,
    pub game_id: Option<u32>,
    pub side: Option<Side>,
    pub depth: Option<i32>,
    pub seldepth: Option<i32>,
    /// Milliseconds since the search started.
    pub time: Option<u64>,
    pub nodes: Option<u64>,
    pub score: Option<Score>,
    pub wdl: Option<Wdl>,
    pub moves_left: Option<u32>,
    /// Transposition table fill, in permille.
    pub hashfull: Option<u32>,
    pub nps: Option<u64>,
    pub tb_hits: Option<u64>,
    pub multipv: Option<u32>,
    pub pv: Vec<Move>,
    pub comment: String,
}
