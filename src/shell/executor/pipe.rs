use std::os::fd::AsRawFd;

use log::{debug, warn};
use nix::unistd::{close, pipe};

use super::error::ExecError;
use super::process::{spawn, PreparedCommand};
use super::redirect::{bind, install, PreparedRedirect};
use super::wait::{wait_any, wait_for, ExitStatus};
use crate::shell::parser::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeStatus {
    pub left: ExitStatus,
    pub right: ExitStatus,
    /// Number of untargeted waits the parent performed to collect both sides.
    pub waits: usize,
}

/// Runs `left | right`. Either side may carry its own redirect, which is
/// bound after the pipe end so an explicit file wins over the pipe.
pub fn run_pipe(left: &Command, right: &Command) -> Result<PipeStatus, ExecError> {
    let left_cmd = PreparedCommand::new(left)?;
    let right_cmd = PreparedCommand::new(right)?;
    let left_redirect = left.redirect.as_ref().map(PreparedRedirect::new).transpose()?;
    let right_redirect = right.redirect.as_ref().map(PreparedRedirect::new).transpose()?;

    let (read_end, write_end) = pipe().map_err(ExecError::PipeCreation)?;
    let read_fd = read_end.as_raw_fd();
    let write_fd = write_end.as_raw_fd();

    let left_pid = spawn(&left_cmd, || {
        let _ = close(read_fd);
        install(write_fd, libc::STDOUT_FILENO)?;
        left_redirect.as_ref().map_or(Ok(()), bind)
    })?;

    let right_pid = match spawn(&right_cmd, || {
        let _ = close(write_fd);
        install(read_fd, libc::STDIN_FILENO)?;
        right_redirect.as_ref().map_or(Ok(()), bind)
    }) {
        Ok(pid) => pid,
        Err(err) => {
            // the writer sees EPIPE/EOF once both ends are gone
            drop(read_end);
            drop(write_end);
            if let Err(wait_err) = wait_for(left_pid) {
                warn!("could not reap pipe writer {}: {}", left_pid, wait_err);
            }
            return Err(err);
        }
    };

    drop(read_end);
    drop(write_end);
    debug!("pipe {} | {} running", left_pid, right_pid);

    let mut left_status = None;
    let mut right_status = None;
    let mut waits = 0;
    loop {
        if let (Some(left), Some(right)) = (left_status, right_status) {
            return Ok(PipeStatus { left, right, waits });
        }
        let reaped = wait_any()?;
        waits += 1;
        if reaped.pid == left_pid {
            left_status = Some(reaped.status);
        } else if reaped.pid == right_pid {
            right_status = Some(reaped.status);
        } else {
            debug!("pipe wait reaped another child {}", reaped.pid);
        }
    }
}
