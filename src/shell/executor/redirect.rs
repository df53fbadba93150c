use std::ffi::CString;
use std::os::fd::RawFd;

use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};

use super::error::ExecError;
use super::process::{spawn, to_cstring, PreparedCommand};
use super::wait::{wait_for, ExitStatus};
use crate::shell::parser::{Command, Direction, Redirect};

/// A redirect target copied out before `fork`.
pub(crate) struct PreparedRedirect {
    direction: Direction,
    path: CString,
    display: String,
}

impl PreparedRedirect {
    pub(crate) fn new(redirect: &Redirect) -> Result<Self, ExecError> {
        Ok(Self {
            direction: redirect.direction,
            path: to_cstring(&redirect.path)?,
            display: redirect.path.clone(),
        })
    }
}

/// Child side: points stdin or stdout at the target file.
pub(crate) fn bind(redirect: &PreparedRedirect) -> Result<(), ExecError> {
    let (flags, target) = match redirect.direction {
        Direction::Output => (
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            libc::STDOUT_FILENO,
        ),
        Direction::Input => (OFlag::O_RDONLY, libc::STDIN_FILENO),
    };
    let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;

    let fd = open(redirect.path.as_c_str(), flags, mode).map_err(|errno| {
        ExecError::RedirectOpen {
            path: redirect.display.clone(),
            errno,
        }
    })?;
    install(fd, target)
}

/// Moves `fd` onto `target`. When `open` already handed back `target`
/// itself (the stream was closed), the descriptor is left in place.
pub(crate) fn install(fd: RawFd, target: RawFd) -> Result<(), ExecError> {
    if fd == target {
        return Ok(());
    }
    let bound = dup2(fd, target).map(drop).map_err(ExecError::Redirect);
    let _ = close(fd);
    bound
}

/// Runs `command` with one standard stream bound to `redirect` and always
/// waits for it, whatever connector follows the command.
pub fn run_with_redirect(command: &Command, redirect: &Redirect) -> Result<ExitStatus, ExecError> {
    let prepared = PreparedCommand::new(command)?;
    let target = PreparedRedirect::new(redirect)?;
    let pid = spawn(&prepared, || bind(&target))?;
    wait_for(pid)
}
