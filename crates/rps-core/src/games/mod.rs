//! Game rules.

mod rps;

pub use rps::{resolve, settle, Move, Outcome};
