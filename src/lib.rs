pub mod engine;
pub mod logging;
pub mod uci;

pub use engine::{EngineController, EngineError, IdleEngine};
pub use uci::{UciError, UciLoop, UciResponder};
