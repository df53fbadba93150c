use std::io;

use log::{debug, error, warn};

use crate::shell::builtins::{print_banner, Builtin};
use crate::shell::executor::{ExecError, Launcher, WaitPolicy};
use crate::shell::parser::{Connector, Job, JobList, Redirect};

/// What the REPL should do after a line has been sequenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Walks a job list left to right and dispatches each entry by connector.
///
/// A background launch arms one deferred, untargeted wait which the next
/// foreground entry closed by `;` or end of line discharges. The wait is not
/// tied to the background pid: with several background jobs on one line it
/// may reap any of them, and a line ending in `&` leaves its child for some
/// later untargeted wait to collect.
pub struct JobSequencer<L: Launcher> {
    launcher: L,
    deferred_wait: bool,
}

impl<L: Launcher> JobSequencer<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            deferred_wait: false,
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn run_line(&mut self, jobs: &JobList) -> Flow {
        self.deferred_wait = false;
        let mut index = 0;

        while let Some(job) = jobs.get(index) {
            index += 1;

            let program = match job.command.program() {
                Some(program) => program,
                None => {
                    debug!("skipping empty command ({:?})", job.connector);
                    continue;
                }
            };

            if let Some(builtin) = Builtin::lookup(program) {
                if job.connector == Connector::Pipe {
                    warn!("builtin '{}' cannot be piped; dropping the right side", program);
                    index += 1;
                }
                match builtin {
                    Builtin::Exit => return Flow::Exit,
                    Builtin::Banner => {
                        if let Err(e) = print_banner(&mut io::stdout()) {
                            error!("failed to print banner: {}", e);
                        }
                    }
                }
                continue;
            }

            debug!("dispatching `{}` ({:?})", job.command, job.connector);
            let result = match (job.connector, &job.command.redirect) {
                (Connector::Pipe, _) => match jobs.get(index) {
                    Some(right) => {
                        index += 1;
                        self.dispatch_pipe(job, right)
                    }
                    None => {
                        warn!("pipe from `{}` has no right-hand command", job.command);
                        Ok(())
                    }
                },
                (_, Some(redirect)) => self.dispatch_redirect(job, redirect),
                (_, None) => self.dispatch(job),
            };

            if let Err(err) = result {
                report(&err);
            }
        }
        Flow::Continue
    }

    fn dispatch(&mut self, job: &Job) -> Result<(), ExecError> {
        if job.connector == Connector::Background {
            self.launcher.run(&job.command, WaitPolicy::background())?;
            self.deferred_wait = true;
            return Ok(());
        }

        let policy = WaitPolicy::foreground(self.deferred_wait);
        match self.launcher.run(&job.command, policy) {
            // nothing was started, so nothing was waited for either
            Err(err @ (ExecError::Spawn(_) | ExecError::InvalidArgument(_))) => Err(err),
            result => {
                self.deferred_wait = false;
                result.map(drop)
            }
        }
    }

    fn dispatch_redirect(&mut self, job: &Job, redirect: &Redirect) -> Result<(), ExecError> {
        if job.connector == Connector::Background {
            debug!("`{}` is redirected and runs in the foreground", job.command);
        }
        self.launcher.run_with_redirect(&job.command, redirect)?;
        self.settle(job.connector)
    }

    fn dispatch_pipe(&mut self, left: &Job, right: &Job) -> Result<(), ExecError> {
        let status = self.launcher.run_pipe(&left.command, &right.command)?;
        debug!(
            "`{} | {}` finished: {} / {}",
            left.command, right.command, status.left, status.right
        );
        if status.waits > 2 && self.deferred_wait {
            // the pipe's own waits already collected a background child
            debug!("pipe reaped {} extra child(ren); deferred wait dropped", status.waits - 2);
            self.deferred_wait = false;
        }
        self.settle(right.connector)
    }

    /// Discharges an armed deferred wait once a synchronous entry closes
    /// with `;` or end of line.
    fn settle(&mut self, connector: Connector) -> Result<(), ExecError> {
        if self.deferred_wait && matches!(connector, Connector::Sequential | Connector::None) {
            self.deferred_wait = false;
            let reaped = self.launcher.wait_any()?;
            debug!("deferred wait reaped {} ({})", reaped.pid, reaped.status);
        }
        Ok(())
    }
}

fn report(err: &ExecError) {
    error!("{}", err);
    eprintln!("osh: {}", err);
}
