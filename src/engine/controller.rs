//! The interface the protocol loop drives.

use std::sync::Arc;

use thiserror::Error;

use crate::uci::request::GoRequest;
use crate::uci::responder::Responder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
    #[error("Invalid move '{0}'")]
    InvalidMove(String),
    /// The engine could not finish initialization (network file, tables, ...)
    #[error("Engine not ready: {0}")]
    NotReady(String),
}

/// An engine core, seen from the protocol side.
///
/// Search results are not returned from `go`: the engine reports them later,
/// from any thread, through the registered [`Responder`].
pub trait EngineController {
    /// Block until the engine can accept a search.
    fn ensure_ready(&mut self) -> Result<(), EngineError>;

    /// Forget everything learned during the previous game.
    fn new_game(&mut self) -> Result<(), EngineError>;

    /// Set up `fen` and play `moves` from it.
    fn set_position(&mut self, fen: &str, moves: &[String]) -> Result<(), EngineError>;

    /// Start a search. Must return without waiting for the result.
    fn go(&mut self, request: &GoRequest) -> Result<(), EngineError>;

    fn stop(&mut self);

    /// The opponent played the expected move; continue as a normal search.
    fn ponder_hit(&mut self);

    /// Attach the sink for reports. Replaces any earlier responder.
    fn register_responder(&mut self, responder: Arc<dyn Responder>);

    /// Drop the responder. No report may be emitted afterwards.
    fn unregister_responder(&mut self);
}
