mod error;
#[allow(clippy::module_inception)]
mod executor;
mod pipe;
mod process;
mod redirect;
mod wait;

pub use error::ExecError;
pub use executor::{Executor, Launcher, WaitPolicy};
pub use pipe::PipeStatus;
pub use process::{EXEC_FAILURE_STATUS, SETUP_FAILURE_STATUS};
pub use wait::{ExitStatus, Reaped};
