pub mod builtins;
pub mod executor;
pub mod parser;
mod readline;
pub mod sequencer;
#[allow(clippy::module_inception)]
mod shell;

pub use sequencer::{Flow, JobSequencer};
pub use shell::{handle_line, Shell};
