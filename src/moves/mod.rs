//! Move descriptors, their text form, and game transcripts.

pub mod record;
pub mod text;
pub mod transcript;

pub use record::{Location, MoveRecord, OpCode};
pub use transcript::Transcript;
