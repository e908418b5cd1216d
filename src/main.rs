use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::LevelFilter;

use chess_uci::engine::IdleEngine;
use chess_uci::logging;
use chess_uci::uci::options::OptionStore;
use chess_uci::uci::responder::{declare_display_options, SharedSink, UciResponder};
use chess_uci::uci::UciLoop;

/// UCI front end. Reads commands on stdin and answers on stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Append a transcript of the session to this file
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Verbosity of the log file
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.logfile {
        logging::init(path, args.log_level)?;
    }

    let mut options = OptionStore::new();
    declare_display_options(&mut options);
    IdleEngine::declare_options(&mut options);
    let options = Arc::new(options);

    let responder = Arc::new(UciResponder::new(
        Arc::clone(&options),
        SharedSink::new(io::stdout()),
    ));
    let mut uci = UciLoop::new(IdleEngine::new(), options, responder);
    uci.run(io::stdin().lock())?;
    log::info!("input closed, exiting");
    Ok(())
}
