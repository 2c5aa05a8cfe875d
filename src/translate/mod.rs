//! Worksheet-to-notebook translation.
//!
//! The translator walks the worksheet's lines exactly once, recognizing the
//! three block markers (`{{{`, `}}}`, `///`), and emits notebook cell
//! envelopes as it goes. Nothing is buffered or reordered: a line is fully
//! classified and written before the next one is read.

mod state;
mod translator;

pub use state::CellKind;
pub use translator::Translator;
