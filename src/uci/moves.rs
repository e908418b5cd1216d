//! Move values as they appear in engine reports.
//!
//! Castling is carried internally as "king takes rook" (`e1h1`). In standard
//! notation it is printed as the king's two-square step (`e1g1`); with
//! `UCI_Chess960` enabled it is printed unchanged.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A board square, file and rank both in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    #[must_use]
    pub const fn new(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Promotion {
    fn as_char(self) -> char {
        match self {
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Rook => 'r',
            Promotion::Queen => 'q',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Promotion::Knight),
            'b' => Some(Promotion::Bishop),
            'r' => Some(Promotion::Rook),
            'q' => Some(Promotion::Queen),
            _ => None,
        }
    }
}

/// A move in coordinate form. The null move is printed as `0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
    castling: bool,
}

impl Move {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            castling: false,
        }
    }

    #[must_use]
    pub const fn with_promotion(from: Square, to: Square, promotion: Promotion) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
            castling: false,
        }
    }

    /// Castling, given as the king's square and the castling rook's square.
    #[must_use]
    pub const fn castling(king: Square, rook: Square) -> Self {
        Move {
            from: king,
            to: rook,
            promotion: None,
            castling: true,
        }
    }

    #[must_use]
    pub const fn null() -> Self {
        Move::new(Square::new(0, 0), Square::new(0, 0))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Move::null()
    }

    #[must_use]
    pub fn is_castling(&self) -> bool {
        self.castling
    }

    /// Render the move in UCI notation.
    #[must_use]
    pub fn to_uci_string(&self, chess960: bool) -> String {
        if self.is_null() {
            return "0000".to_string();
        }

        let to = if self.castling && !chess960 {
            let file = if self.to.file > self.from.file { 6 } else { 2 };
            Square::new(file, self.from.rank)
        } else {
            self.to
        };

        let mut s = format!("{}{}", self.from, to);
        if let Some(promotion) = self.promotion {
            s.push(promotion.as_char());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci_string(false))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid move '{0}'")]
pub struct MoveParseError(pub String);

fn parse_square(file: u8, rank: u8) -> Option<Square> {
    let file = file.checked_sub(b'a').filter(|f| *f < 8)?;
    let rank = rank.checked_sub(b'1').filter(|r| *r < 8)?;
    Some(Square::new(file, rank))
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Parses plain coordinate moves. Castling cannot be recognized without a
    /// board, so `e1g1` comes back as an ordinary king move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MoveParseError(s.to_string());
        if s == "0000" {
            return Ok(Move::null());
        }

        let bytes = s.as_bytes();
        if !(4..=5).contains(&bytes.len()) {
            return Err(err());
        }
        let from = parse_square(bytes[0], bytes[1]).ok_or_else(err)?;
        let to = parse_square(bytes[2], bytes[3]).ok_or_else(err)?;
        match bytes.get(4) {
            None => Ok(Move::new(from, to)),
            Some(&c) => {
                let promotion = Promotion::from_char(c as char).ok_or_else(err)?;
                Ok(Move::with_promotion(from, to, promotion))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castling_notation() {
        let short = Move::castling(Square::new(4, 0), Square::new(7, 0));
        let long = Move::castling(Square::new(4, 7), Square::new(0, 7));
        assert_eq!(short.to_uci_string(false), "e1g1");
        assert_eq!(short.to_uci_string(true), "e1h1");
        assert_eq!(long.to_uci_string(false), "e8c8");
        assert_eq!(long.to_uci_string(true), "e8a8");
    }

    #[test]
    fn test_plain_moves_ignore_chess960() {
        let mv: Move = "e7e8q".parse().unwrap();
        assert_eq!(mv.to_uci_string(false), "e7e8q");
        assert_eq!(mv.to_uci_string(true), "e7e8q");
        assert_eq!(mv.to_string(), "e7e8q");
    }

    #[test]
    fn test_null_move() {
        let mv: Move = "0000".parse().unwrap();
        assert!(mv.is_null());
        assert_eq!(mv.to_uci_string(true), "0000");
    }

    #[test]
    fn test_rejects_malformed_moves() {
        for s in ["", "e2", "e2e9", "i2e4", "e7e8k", "e2e4e5"] {
            assert_eq!(s.parse::<Move>(), Err(MoveParseError(s.to_string())), "{s}");
        }
    }
}
