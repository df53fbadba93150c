use log::debug;

use super::error::ExecError;
use super::pipe::{self, PipeStatus};
use super::process::{spawn, PreparedCommand};
use super::redirect;
use super::wait::{self, ExitStatus, Reaped};
use crate::shell::parser::{Command, Redirect};

/// Wait behaviour for a plain command launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Block until this child terminates.
    pub wait_now: bool,
    /// Afterwards, block on one more (unspecified) child.
    pub wait_previous: bool,
}

impl WaitPolicy {
    pub fn foreground(wait_previous: bool) -> Self {
        Self {
            wait_now: true,
            wait_previous,
        }
    }

    pub fn background() -> Self {
        Self {
            wait_now: false,
            wait_previous: false,
        }
    }
}

/// The process operations the job sequencer dispatches to.
pub trait Launcher {
    /// Runs a single command. Returns `None` when the child was left running.
    fn run(&mut self, command: &Command, policy: WaitPolicy)
        -> Result<Option<ExitStatus>, ExecError>;

    /// Runs a command with one standard stream bound to a file; always waits.
    fn run_with_redirect(
        &mut self,
        command: &Command,
        redirect: &Redirect,
    ) -> Result<ExitStatus, ExecError>;

    /// Runs `left | right` and waits for both sides.
    fn run_pipe(&mut self, left: &Command, right: &Command) -> Result<PipeStatus, ExecError>;

    /// Reaps whichever child terminates next.
    fn wait_any(&mut self) -> Result<Reaped, ExecError>;
}

/// Launches commands as real child processes with fork/exec.
#[derive(Debug, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for Executor {
    fn run(
        &mut self,
        command: &Command,
        policy: WaitPolicy,
    ) -> Result<Option<ExitStatus>, ExecError> {
        let prepared = PreparedCommand::new(command)?;
        let pid = spawn(&prepared, || Ok(()))?;

        let status = if policy.wait_now {
            let status = wait::wait_for(pid)?;
            debug!("{} ({}) {}", command, pid, status);
            Some(status)
        } else {
            debug!("{} ({}) left running", command, pid);
            None
        };

        if policy.wait_previous {
            let reaped = wait::wait_any()?;
            debug!("deferred wait reaped {} ({})", reaped.pid, reaped.status);
        }
        Ok(status)
    }

    fn run_with_redirect(
        &mut self,
        command: &Command,
        redirect: &Redirect,
    ) -> Result<ExitStatus, ExecError> {
        let status = redirect::run_with_redirect(command, redirect)?;
        debug!("{} {}", command, status);
        Ok(status)
    }

    fn run_pipe(&mut self, left: &Command, right: &Command) -> Result<PipeStatus, ExecError> {
        let status = pipe::run_pipe(left, right)?;
        if status.waits > 2 {
            debug!("pipe needed {} waits to collect both sides", status.waits);
        }
        Ok(status)
    }

    fn wait_any(&mut self) -> Result<Reaped, ExecError> {
        wait::wait_any()
    }
}
