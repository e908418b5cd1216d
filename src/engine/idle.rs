//! A controller without a search.
//!
//! `IdleEngine` accepts every command and answers `go` straight away with the
//! first `searchmoves` entry, or the null move. It lets GUIs and test
//! harnesses exercise the protocol without an engine core attached.

use std::sync::Arc;

use crate::uci::moves::Move;
use crate::uci::options::{OptionKind, OptionStore};
use crate::uci::report::{BestMoveInfo, ThinkingInfo};
use crate::uci::request::{GoRequest, STARTPOS_FEN};
use crate::uci::responder::Responder;

use super::controller::{EngineController, EngineError};

pub const DEFAULT_HASH_MB: i64 = 16;

pub struct IdleEngine {
    fen: String,
    moves: Vec<Move>,
    /// Best move held back until `stop` or `ponderhit`
    pending: Option<Move>,
    responder: Option<Arc<dyn Responder>>,
}

impl Default for IdleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleEngine {
    #[must_use]
    pub fn new() -> Self {
        IdleEngine {
            fen: STARTPOS_FEN.to_string(),
            moves: Vec::new(),
            pending: None,
            responder: None,
        }
    }

    /// Engine settings announced to the GUI. They are accepted and stored, but
    /// nothing here reads them.
    pub fn declare_options(store: &mut OptionStore) {
        store
            .declare(
                "Hash",
                OptionKind::Spin {
                    default: DEFAULT_HASH_MB,
                    min: 1,
                    max: 65536,
                },
            )
            .declare(
                "Threads",
                OptionKind::Spin {
                    default: 1,
                    min: 1,
                    max: 256,
                },
            )
            .declare(
                "MultiPV",
                OptionKind::Spin {
                    default: 1,
                    min: 1,
                    max: 64,
                },
            )
            .declare("Ponder", OptionKind::Check { default: false });
    }

    /// Current base position and moves played from it.
    #[must_use]
    pub fn position(&self) -> (&str, &[Move]) {
        (&self.fen, &self.moves)
    }

    #[must_use]
    pub fn has_responder(&self) -> bool {
        self.responder.is_some()
    }

    fn report(&self, bestmove: Move) {
        let Some(responder) = &self.responder else {
            log::warn!("search finished with no responder attached");
            return;
        };
        responder.output_thinking_info(&[ThinkingInfo {
            depth: Some(0),
            comment: "no search core attached".to_string(),
            ..ThinkingInfo::default()
        }]);
        responder.output_best_move(&BestMoveInfo::new(bestmove));
    }
}

impl EngineController for IdleEngine {
    fn ensure_ready(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.fen = STARTPOS_FEN.to_string();
        self.moves.clear();
        self.pending = None;
        Ok(())
    }

    fn set_position(&mut self, fen: &str, moves: &[String]) -> Result<(), EngineError> {
        if fen.split_whitespace().count() < 4 {
            return Err(EngineError::InvalidFen(fen.to_string()));
        }
        let moves = moves
            .iter()
            .map(|m| m.parse::<Move>().map_err(|_| EngineError::InvalidMove(m.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        self.fen = fen.to_string();
        self.moves = moves;
        Ok(())
    }

    fn go(&mut self, request: &GoRequest) -> Result<(), EngineError> {
        let bestmove = match request.searchmoves.first() {
            Some(m) => m.parse::<Move>().map_err(|_| EngineError::InvalidMove(m.clone()))?,
            None => Move::null(),
        };

        if request.infinite || request.ponder {
            self.pending = Some(bestmove);
        } else {
            self.report(bestmove);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(bestmove) = self.pending.take() {
            self.report(bestmove);
        }
    }

    fn ponder_hit(&mut self) {
        self.stop();
    }

    fn register_responder(&mut self, responder: Arc<dyn Responder>) {
        self.responder = Some(responder);
    }

    fn unregister_responder(&mut self) {
        self.responder = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl Responder for Collect {
        fn output_best_move(&self, info: &BestMoveInfo) {
            self.0.lock().push(format!("bestmove {}", info.bestmove));
        }

        fn output_thinking_info(&self, infos: &[ThinkingInfo]) {
            self.0.lock().extend(infos.iter().map(|i| i.comment.clone()));
        }
    }

    fn engine() -> (IdleEngine, Arc<Collect>) {
        let collect = Arc::new(Collect::default());
        let mut engine = IdleEngine::new();
        engine.register_responder(collect.clone());
        (engine, collect)
    }

    fn bestmoves(collect: &Collect) -> Vec<String> {
        collect
            .0
            .lock()
            .iter()
            .filter(|l| l.starts_with("bestmove"))
            .cloned()
            .collect()
    }

    #[test]
    fn test_go_reports_immediately() {
        let (mut engine, collect) = engine();
        engine.go(&GoRequest::default()).unwrap();
        assert_eq!(bestmoves(&collect), vec!["bestmove 0000"]);

        let request = GoRequest {
            searchmoves: vec!["d2d4".to_string(), "e2e4".to_string()],
            ..GoRequest::default()
        };
        engine.go(&request).unwrap();
        assert_eq!(bestmoves(&collect), vec!["bestmove 0000", "bestmove d2d4"]);
    }

    #[test]
    fn test_infinite_waits_for_stop() {
        let (mut engine, collect) = engine();
        engine
            .go(&GoRequest {
                infinite: true,
                ..GoRequest::default()
            })
            .unwrap();
        assert!(bestmoves(&collect).is_empty());

        engine.stop();
        assert_eq!(bestmoves(&collect), vec!["bestmove 0000"]);
        engine.stop();
        assert_eq!(bestmoves(&collect).len(), 1);
    }

    #[test]
    fn test_ponderhit_releases_ponder_search() {
        let (mut engine, collect) = engine();
        engine
            .go(&GoRequest {
                ponder: true,
                ..GoRequest::default()
            })
            .unwrap();
        engine.ponder_hit();
        assert_eq!(bestmoves(&collect), vec!["bestmove 0000"]);
    }

    #[test]
    fn test_set_position_validates_syntax() {
        let (mut engine, _) = engine();
        engine
            .set_position(STARTPOS_FEN, &["e2e4".to_string(), "e7e5".to_string()])
            .unwrap();
        assert_eq!(engine.position().1.len(), 2);

        assert_eq!(
            engine.set_position("garbage", &[]),
            Err(EngineError::InvalidFen("garbage".to_string()))
        );
        assert_eq!(
            engine.set_position(STARTPOS_FEN, &["e2e9".to_string()]),
            Err(EngineError::InvalidMove("e2e9".to_string()))
        );
        // A rejected position leaves the previous one in place.
        assert_eq!(engine.position().1.len(), 2);

        engine.new_game().unwrap();
        assert_eq!(engine.position(), (STARTPOS_FEN, &[][..]));
    }

    #[test]
    fn test_unregistered_engine_stays_silent() {
        let (mut engine, collect) = engine();
        engine.unregister_responder();
        assert!(!engine.has_responder());
        engine.go(&GoRequest::default()).unwrap();
        assert!(collect.0.lock().is_empty());
    }
}
