use std::fmt;

use log::debug;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{wait, waitpid, WaitStatus as WS};
use nix::unistd::Pid;

use super::error::ExecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(Signal),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    /// Shell-style numeric status: the exit code, or 128 + signal number.
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Exited(code) => *code,
            ExitStatus::Signaled(sig) => 128 + *sig as i32,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exited {}", code),
            ExitStatus::Signaled(sig) => write!(f, "killed by {}", sig),
        }
    }
}

/// A child collected by one of the wait calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub pid: Pid,
    pub status: ExitStatus,
}

/// Blocks until `pid` terminates.
pub fn wait_for(pid: Pid) -> Result<ExitStatus, ExecError> {
    let reaped = reap(|| waitpid(pid, None))?;
    Ok(reaped.status)
}

/// Blocks until any child of this process terminates.
pub fn wait_any() -> Result<Reaped, ExecError> {
    reap(wait)
}

fn reap<F>(mut call: F) -> Result<Reaped, ExecError>
where
    F: FnMut() -> nix::Result<WS>,
{
    loop {
        match call() {
            Ok(WS::Exited(pid, code)) => {
                debug!("reaped {} (exit {})", pid, code);
                return Ok(Reaped {
                    pid,
                    status: ExitStatus::Exited(code),
                });
            }
            Ok(WS::Signaled(pid, sig, _core_dumped)) => {
                debug!("reaped {} (signal {})", pid, sig);
                return Ok(Reaped {
                    pid,
                    status: ExitStatus::Signaled(sig),
                });
            }
            // stop/continue reports only arrive with WUNTRACED/WCONTINUED
            Ok(other) => debug!("ignoring wait status {:?}", other),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ExecError::Wait(errno)),
        }
    }
}
