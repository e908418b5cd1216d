//! The command loop: one line in, zero or more lines out.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::engine::EngineController;

use super::command::parse_command;
use super::error::UciError;
use super::options::OptionStore;
use super::request::Request;
use super::responder::{Responder, UciResponder};

/// What processing a line amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line; nothing was done
    Blank,
    /// The command was carried out
    Handled,
    /// `quit`: stop reading input
    Quit,
}

/// Drives an engine from UCI input.
///
/// The responder is registered with the engine for as long as the loop
/// lives, and unregistered when the loop is dropped.
pub struct UciLoop<E: EngineController, W: Write + Send + 'static> {
    engine: E,
    options: Arc<OptionStore>,
    responder: Arc<UciResponder<W>>,
}

impl<E: EngineController, W: Write + Send + 'static> UciLoop<E, W> {
    pub fn new(mut engine: E, options: Arc<OptionStore>, responder: Arc<UciResponder<W>>) -> Self {
        let sink: Arc<dyn Responder> = responder.clone();
        engine.register_responder(sink);
        UciLoop {
            engine,
            options,
            responder,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn responder(&self) -> &Arc<UciResponder<W>> {
        &self.responder
    }

    /// Parse, validate and dispatch one input line.
    pub fn process_line(&mut self, line: &str) -> Result<LineOutcome, UciError> {
        log::debug!(">> {line}");
        let Some(command) = parse_command(line)? else {
            return Ok(LineOutcome::Blank);
        };
        let request = Request::try_from(command)?;
        self.dispatch(request)
    }

    /// Carry out a validated request.
    pub fn dispatch(&mut self, request: Request) -> Result<LineOutcome, UciError> {
        match request {
            Request::Uci => {
                self.responder.send_id();
                self.responder.send_raw_responses(&self.options.uci_declarations());
                self.responder.send_raw_response("uciok");
            }
            Request::IsReady => {
                self.engine.ensure_ready()?;
                self.responder.send_raw_response("readyok");
            }
            Request::SetOption(option) => {
                self.options
                    .set_uci_option(&option.name, &option.value, &option.context)?;
            }
            Request::NewGame => self.engine.new_game()?,
            Request::Position(position) => {
                self.engine.set_position(position.fen(), &position.moves)?;
            }
            Request::Go(go) => self.engine.go(&go)?,
            Request::Stop => self.engine.stop(),
            Request::PonderHit => self.engine.ponder_hit(),
            Request::Xyzzy => self.responder.send_raw_response("Nothing happens."),
            Request::Quit => return Ok(LineOutcome::Quit),
        }
        Ok(LineOutcome::Handled)
    }

    /// Read lines until `quit` or end of input.
    ///
    /// A line that fails is answered with `error <message>` and the loop
    /// carries on with the next one. Bytes that are not valid UTF-8 are
    /// replaced, so they fail only the line they appear on. Only a read error
    /// ends the loop early.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            match self.process_line(line) {
                Ok(LineOutcome::Quit) => {
                    log::info!("quit received");
                    break;
                }
                Ok(LineOutcome::Blank | LineOutcome::Handled) => {}
                Err(e) => {
                    log::warn!("{e}");
                    self.responder.send_raw_response(&format!("error {e}"));
                }
            }
        }
        Ok(())
    }
}

impl<E: EngineController, W: Write + Send + 'static> Drop for UciLoop<E, W> {
    fn drop(&mut self) {
        self.engine.unregister_responder();
    }
}
