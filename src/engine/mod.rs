//! Engine side of the protocol boundary.
//!
//! The search itself lives outside this crate. The protocol loop only needs
//! the [`EngineController`] interface; [`IdleEngine`] implements it without a
//! search so the protocol can run on its own.

mod controller;
mod idle;

pub use controller::{EngineController, EngineError};
pub use idle::{IdleEngine, DEFAULT_HASH_MB};
