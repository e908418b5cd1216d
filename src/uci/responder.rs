//! Serialization of engine reports into UCI output lines.
//!
//! The responder can be called from the command thread and from search
//! threads at the same time. All lines of one call are written while holding
//! the sink's lock, so the lines of a batch are never interleaved with
//! another caller's.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use super::options::{OptionKind, OptionStore};
use super::report::{BestMoveInfo, Score, ThinkingInfo};

pub const ENGINE_NAME: &str = "chess_uci";
pub const ENGINE_AUTHOR: &str = "Dean Menezes";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print castling as king-takes-rook.
pub const CHESS960: &str = "UCI_Chess960";
/// Append `wdl` to info lines.
pub const SHOW_WDL: &str = "UCI_ShowWDL";
/// Append `movesleft` to info lines.
pub const SHOW_MOVES_LEFT: &str = "UCI_ShowMovesLeft";

/// Declare the options the responder reads while formatting.
pub fn declare_display_options(store: &mut OptionStore) {
    store
        .declare(CHESS960, OptionKind::Check { default: false })
        .declare(SHOW_WDL, OptionKind::Check { default: true })
        .declare(SHOW_MOVES_LEFT, OptionKind::Check { default: false });
}

/// Where engines send their reports.
pub trait Responder: Send + Sync {
    fn output_best_move(&self, info: &BestMoveInfo);
    fn output_thinking_info(&self, infos: &[ThinkingInfo]);
}

/// An output stream shared by every writer of protocol lines.
#[derive(Debug)]
pub struct SharedSink<W>(Arc<Mutex<W>>);

impl<W> Clone for SharedSink<W> {
    fn clone(&self) -> Self {
        SharedSink(Arc::clone(&self.0))
    }
}

impl<W: Write> SharedSink<W> {
    pub fn new(writer: W) -> Self {
        SharedSink(Arc::new(Mutex::new(writer)))
    }

    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.0.lock()
    }
}

/// Formats reports as UCI lines and writes them to a shared sink.
pub struct UciResponder<W: Write + Send> {
    options: Arc<OptionStore>,
    sink: SharedSink<W>,
}

impl<W: Write + Send> UciResponder<W> {
    pub fn new(options: Arc<OptionStore>, sink: SharedSink<W>) -> Self {
        UciResponder { options, sink }
    }

    #[must_use]
    pub fn sink(&self) -> &SharedSink<W> {
        &self.sink
    }

    fn is_chess960(&self) -> bool {
        self.options.get_bool(CHESS960)
    }

    pub fn send_raw_response(&self, response: &str) {
        self.send_raw_responses(&[response]);
    }

    /// Write lines as one uninterrupted batch, flushing after each.
    pub fn send_raw_responses<S: AsRef<str>>(&self, responses: &[S]) {
        let mut sink = self.sink.lock();
        for response in responses {
            let response = response.as_ref();
            log::debug!("<< {response}");
            if let Err(e) = writeln!(sink, "{response}").and_then(|()| sink.flush()) {
                log::error!("failed to write response '{response}': {e}");
            }
        }
    }

    pub fn send_id(&self) {
        self.send_raw_responses(&[
            format!("id name {ENGINE_NAME} v{VERSION}"),
            format!("id author {ENGINE_AUTHOR} ({ENGINE_NAME} v{VERSION})"),
        ]);
    }

    #[must_use]
    pub fn format_best_move(&self, info: &BestMoveInfo) -> String {
        BestMoveLine {
            info,
            chess960: self.is_chess960(),
        }
        .to_string()
    }

    /// Format one `info` line. Display options are read on every call.
    #[must_use]
    pub fn format_thinking_info(&self, info: &ThinkingInfo) -> String {
        ThinkingLine {
            info,
            chess960: self.is_chess960(),
            show_wdl: self.options.get_bool(SHOW_WDL),
            show_moves_left: self.options.get_bool(SHOW_MOVES_LEFT),
        }
        .to_string()
    }
}

impl<W: Write + Send> Responder for UciResponder<W> {
    fn output_best_move(&self, info: &BestMoveInfo) {
        self.send_raw_response(&self.format_best_move(info));
    }

    fn output_thinking_info(&self, infos: &[ThinkingInfo]) {
        let lines: Vec<String> = infos.iter().map(|info| self.format_thinking_info(info)).collect();
        self.send_raw_responses(&lines);
    }
}

struct BestMoveLine<'a> {
    info: &'a BestMoveInfo,
    chess960: bool,
}

impl fmt::Display for BestMoveLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info;
        write!(f, "bestmove {}", info.bestmove.to_uci_string(self.chess960))?;
        if let Some(ponder) = &info.ponder {
            write!(f, " ponder {}", ponder.to_uci_string(self.chess960))?;
        }
        if let Some(player) = info.player {
            write!(f, " player {player}")?;
        }
        if let Some(game_id) = info.game_id {
            write!(f, " gameid {game_id}")?;
        }
        if let Some(side) = info.side {
            write!(f, " side {side}")?;
        }
        Ok(())
    }
}

struct ThinkingLine<'a> {
    info: &'a ThinkingInfo,
    chess960: bool,
    show_wdl: bool,
    show_moves_left: bool,
}

impl fmt::Display for ThinkingLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info;
        f.write_str("info")?;
        if let Some(player) = info.player {
            write!(f, " player {player}")?;
        }
        if let Some(game_id) = info.game_id {
            write!(f, " gameid {game_id}")?;
        }
        if let Some(side) = info.side {
            write!(f, " side {side}")?;
        }
        if let Some(depth) = info.depth {
            write!(f, " depth {}", depth.max(1))?;
        }
        if let Some(seldepth) = info.seldepth {
            write!(f, " seldepth {seldepth}")?;
        }
        if let Some(time) = info.time {
            write!(f, " time {time}")?;
        }
        if let Some(nodes) = info.nodes {
            write!(f, " nodes {nodes}")?;
        }
        match info.score {
            Some(Score::Mate(moves)) => write!(f, " score mate {moves}")?,
            Some(Score::Centipawns(cp)) => write!(f, " score cp {cp}")?,
            None => {}
        }
        if let Some(wdl) = info.wdl.filter(|_| self.show_wdl) {
            write!(f, " wdl {} {} {}", wdl.w, wdl.d, wdl.l)?;
        }
        if let Some(moves_left) = info.moves_left.filter(|_| self.show_moves_left) {
            write!(f, " movesleft {moves_left}")?;
        }
        if let Some(hashfull) = info.hashfull {
            write!(f, " hashfull {hashfull}")?;
        }
        if let Some(nps) = info.nps {
            write!(f, " nps {nps}")?;
        }
        if let Some(tb_hits) = info.tb_hits {
            write!(f, " tbhits {tb_hits}")?;
        }
        if let Some(multipv) = info.multipv {
            write!(f, " multipv {multipv}")?;
        }
        if !info.pv.is_empty() {
            f.write_str(" pv")?;
            for mv in &info.pv {
                write!(f, " {}", mv.to_uci_string(self.chess960))?;
            }
        }
        if !info.comment.is_empty() {
            write!(f, " string {}", info.comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uci::moves::{Move, Square};
    use crate::uci::report::{Side, Wdl};
    use std::thread;

    fn responder() -> UciResponder<Vec<u8>> {
        let mut store = OptionStore::new();
        declare_display_options(&mut store);
        UciResponder::new(Arc::new(store), SharedSink::new(Vec::new()))
    }

    fn output(responder: &UciResponder<Vec<u8>>) -> Vec<String> {
        let sink = responder.sink().lock();
        String::from_utf8(sink.clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_bestmove_only_move() {
        let r = responder();
        r.output_best_move(&BestMoveInfo::new(mv("e2e4")));
        assert_eq!(output(&r), vec!["bestmove e2e4"]);
    }

    #[test]
    fn test_bestmove_all_fields() {
        let r = responder();
        let info = BestMoveInfo {
            bestmove: mv("e2e4"),
            ponder: Some(mv("e7e5")),
            player: Some(1),
            game_id: Some(7),
            side: Some(Side::Black),
        };
        assert_eq!(
            r.format_best_move(&info),
            "bestmove e2e4 ponder e7e5 player 1 gameid 7 side black"
        );
    }

    #[test]
    fn test_chess960_is_read_on_every_call() {
        let r = responder();
        let castle = Move::castling(Square::new(4, 0), Square::new(7, 0));
        let info = BestMoveInfo::new(castle);
        assert_eq!(r.format_best_move(&info), "bestmove e1g1");

        r.options.set_uci_option(CHESS960, "true", "").unwrap();
        assert_eq!(r.format_best_move(&info), "bestmove e1h1");

        let thinking = ThinkingInfo {
            pv: vec![castle, mv("e7e5")],
            ..ThinkingInfo::default()
        };
        assert_eq!(r.format_thinking_info(&thinking), "info pv e1h1 e7e5");
    }

    #[test]
    fn test_empty_info() {
        let r = responder();
        assert_eq!(r.format_thinking_info(&ThinkingInfo::default()), "info");
    }

    #[test]
    fn test_info_field_order() {
        let r = responder();
        r.options.set_uci_option(SHOW_MOVES_LEFT, "true", "").unwrap();
        let info = ThinkingInfo {
            player: Some(0),
            game_id: Some(3),
            side: Some(Side::White),
            depth: Some(12),
            seldepth: Some(20),
            time: Some(1500),
            nodes: Some(123_456),
            score: Some(Score::Centipawns(35)),
            wdl: Some(Wdl { w: 300, d: 600, l: 100 }),
            moves_left: Some(42),
            hashfull: Some(250),
            nps: Some(82_304),
            tb_hits: Some(5),
            multipv: Some(1),
            pv: vec![mv("e2e4"), mv("e7e5"), mv("g1f3")],
            comment: "hello world".to_string(),
        };
        assert_eq!(
            r.format_thinking_info(&info),
            "info player 0 gameid 3 side white depth 12 seldepth 20 time 1500 nodes 123456 \
             score cp 35 wdl 300 600 100 movesleft 42 hashfull 250 nps 82304 tbhits 5 \
             multipv 1 pv e2e4 e7e5 g1f3 string hello world"
        );
    }

    #[test]
    fn test_depth_is_at_least_one() {
        let r = responder();
        let info = ThinkingInfo {
            depth: Some(0),
            ..ThinkingInfo::default()
        };
        assert_eq!(r.format_thinking_info(&info), "info depth 1");
    }

    #[test]
    fn test_mate_score() {
        let r = responder();
        let info = ThinkingInfo {
            score: Some(Score::Mate(-3)),
            ..ThinkingInfo::default()
        };
        assert_eq!(r.format_thinking_info(&info), "info score mate -3");
    }

    #[test]
    fn test_display_options_gate_wdl_and_moves_left() {
        let r = responder();
        let info = ThinkingInfo {
            wdl: Some(Wdl { w: 1, d: 2, l: 3 }),
            moves_left: Some(30),
            ..ThinkingInfo::default()
        };
        // UCI_ShowWDL defaults to on, UCI_ShowMovesLeft to off.
        assert_eq!(r.format_thinking_info(&info), "info wdl 1 2 3");

        r.options.set_uci_option(SHOW_WDL, "false", "").unwrap();
        r.options.set_uci_option(SHOW_MOVES_LEFT, "true", "").unwrap();
        assert_eq!(r.format_thinking_info(&info), "info movesleft 30");
    }

    #[test]
    fn test_each_info_is_its_own_line() {
        let r = responder();
        let first = ThinkingInfo {
            depth: Some(1),
            multipv: Some(1),
            ..ThinkingInfo::default()
        };
        let second = ThinkingInfo {
            depth: Some(1),
            multipv: Some(2),
            ..ThinkingInfo::default()
        };
        r.output_thinking_info(&[first, second]);
        assert_eq!(
            output(&r),
            vec!["info depth 1 multipv 1", "info depth 1 multipv 2"]
        );
    }

    #[test]
    fn test_id_lines_carry_version() {
        let r = responder();
        r.send_id();
        let lines = output(&r);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id name "));
        assert!(lines[1].starts_with("id author "));
        assert!(lines.iter().all(|l| l.contains(VERSION)));
    }

    #[test]
    fn test_concurrent_batches_are_not_interleaved() {
        let r = Arc::new(responder());
        let handles: Vec<_> = (0..4u32)
            .map(|player| {
                let r = Arc::clone(&r);
                thread::spawn(move || {
                    let batch: Vec<ThinkingInfo> = (0..3u32)
                        .map(|multipv| ThinkingInfo {
                            player: Some(player),
                            multipv: Some(multipv),
                            ..ThinkingInfo::default()
                        })
                        .collect();
                    for _ in 0..50 {
                        r.output_thinking_info(&batch);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = output(&r);
        assert_eq!(lines.len(), 4 * 3 * 50);
        for batch in lines.chunks(3) {
            let player = batch[0].split_whitespace().nth(2).unwrap();
            for (multipv, line) in batch.iter().enumerate() {
                assert_eq!(line, &format!("info player {player} multipv {multipv}"));
            }
        }
    }
}
