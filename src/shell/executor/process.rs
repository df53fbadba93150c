use std::ffi::CString;
use std::io;

use log::debug;
use nix::unistd::{self, execvp, fork, ForkResult, Pid};

use super::error::ExecError;
use crate::shell::parser::Command;

/// Exit status of a child whose image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 127;
/// Exit status of a child whose stream setup (redirect, pipe end) failed.
pub const SETUP_FAILURE_STATUS: i32 = 1;

/// Owned C copies of a command's argv, built before `fork` so nothing the
/// child hands to `execvp` points into the parent's job list.
pub(crate) struct PreparedCommand {
    program: CString,
    argv: Vec<CString>,
    name: String,
}

impl PreparedCommand {
    pub(crate) fn new(command: &Command) -> Result<Self, ExecError> {
        let argv = command
            .argv
            .iter()
            .map(|word| to_cstring(word))
            .collect::<Result<Vec<_>, _>>()?;
        let program = argv
            .first()
            .cloned()
            .ok_or_else(|| ExecError::InvalidArgument(String::new()))?;
        let name = program.to_string_lossy().into_owned();
        Ok(Self {
            program,
            argv,
            name,
        })
    }
}

pub(crate) fn to_cstring(word: &str) -> Result<CString, ExecError> {
    CString::new(word).map_err(|_| ExecError::InvalidArgument(word.to_string()))
}

/// Forks a child that runs `setup` and then replaces its image with
/// `command`. Returns the child's pid to the parent; never returns in the
/// child.
pub(crate) fn spawn<F>(command: &PreparedCommand, setup: F) -> Result<Pid, ExecError>
where
    F: FnOnce() -> Result<(), ExecError>,
{
    // SAFETY: the child only performs dup2/close/open/execvp/write/_exit
    // before replacing its image or exiting.
    match unsafe { fork() } {
        Err(errno) => Err(ExecError::Spawn(errno)),
        Ok(ForkResult::Parent { child }) => {
            debug!("spawned {} as {}", command.name, child);
            Ok(child)
        }
        Ok(ForkResult::Child) => {
            if let Err(err) = setup() {
                child_fail(&err, SETUP_FAILURE_STATUS);
            }
            exec_image(command)
        }
    }
}

fn exec_image(command: &PreparedCommand) -> ! {
    let errno = match execvp(&command.program, &command.argv) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    let err = ExecError::Exec {
        program: command.name.clone(),
        errno,
    };
    child_fail(&err, EXEC_FAILURE_STATUS)
}

/// Reports `err` on stderr and leaves the child without running any of the
/// interpreter's destructors or flushing its buffered stdio.
pub(crate) fn child_fail(err: &ExecError, code: i32) -> ! {
    let message = format!("osh: {}\n", err);
    let _ = unistd::write(io::stderr(), message.as_bytes());
    // SAFETY: _exit is async-signal-safe and never returns.
    unsafe { libc::_exit(code) }
}
