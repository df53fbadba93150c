//! Runs real child processes. Untargeted waits reap any child of the test
//! process, so every test holds `PROCESS_LOCK` for its whole body.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use nix::errno::Errno;
use osh::shell::executor::{
    ExecError, Executor, ExitStatus, Launcher, PipeStatus, Reaped, WaitPolicy,
    EXEC_FAILURE_STATUS, SETUP_FAILURE_STATUS,
};
use osh::shell::parser::{Command, Direction, Parser, Redirect};
use osh::shell::{handle_line, Flow, JobSequencer};
use osh::utils::config::Config;
use osh::utils::theme::Theme;

static PROCESS_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    PROCESS_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[allow(clippy::unwrap_used)]
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("osh-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = fs::remove_file(&path);
    path
}

fn run_line(line: &str) -> Flow {
    let config = Config::from_lookup(|_| None);
    let theme = Theme::load("plain");
    let mut sequencer = JobSequencer::new(Executor::new());
    handle_line(line, &config, &theme, &mut sequencer)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn no_children_left() -> bool {
    matches!(Executor::new().wait_any(), Err(ExecError::Wait(Errno::ECHILD)))
}

#[test]
fn output_redirect_truncates() {
    let _guard = serial();
    let out = scratch("out.txt");
    let line = format!("echo hi > {}", out.display());

    assert_eq!(run_line(&line), Flow::Continue);
    assert_eq!(read(&out), "hi\n");

    assert_eq!(run_line(&line), Flow::Continue);
    assert_eq!(read(&out), "hi\n");
    assert!(no_children_left());
}

#[test]
fn input_redirect_feeds_stdin() {
    let _guard = serial();
    let input = scratch("lines.txt");
    let count = scratch("count.txt");
    fs::write(&input, "hi\n").ok();

    let line = format!(
        "wc -l < {} | cat > {}",
        input.display(),
        count.display()
    );
    run_line(&line);
    assert_eq!(read(&count).trim(), "1");
    assert!(no_children_left());
}

#[allow(clippy::unwrap_used)]
#[test]
fn pipe_spawns_two_children_and_waits_twice() {
    let _guard = serial();
    let out = scratch("words.txt");
    let left = Command::new(["echo", "a", "b", "c"]);
    let right = Command::new(["wc", "-w"]).with_redirect(Direction::Output, out.to_string_lossy());

    let status = Executor::new().run_pipe(&left, &right).unwrap();
    assert!(status.left.success());
    assert!(status.right.success());
    assert_eq!(status.waits, 2);
    assert_eq!(read(&out).trim(), "3");
    assert!(no_children_left());
}

#[test]
fn pipe_line_counts_lines() {
    let _guard = serial();
    let out = scratch("pipe-count.txt");
    run_line(&format!("echo x | wc -l > {}", out.display()));
    assert_eq!(read(&out).trim(), "1");
}

#[test]
fn exec_failure_exits_nonzero() {
    let _guard = serial();
    let command = Command::new(["osh-definitely-not-a-program"]);
    let status = Executor::new().run(&command, WaitPolicy::foreground(false));
    assert_eq!(status, Ok(Some(ExitStatus::Exited(EXEC_FAILURE_STATUS))));
    assert!(no_children_left());
}

#[test]
fn redirect_open_failure_aborts_child() {
    let _guard = serial();
    let missing = Redirect {
        direction: Direction::Input,
        path: "/nonexistent/osh/in.txt".to_string(),
    };
    let status = Executor::new().run_with_redirect(&Command::new(["cat"]), &missing);
    assert_eq!(status, Ok(ExitStatus::Exited(SETUP_FAILURE_STATUS)));

    // the program itself must not run when its output cannot be bound
    let marker = scratch("marker.txt");
    let touch = Command::new(["touch".to_string(), marker.to_string_lossy().to_string()]);
    let unwritable = Redirect {
        direction: Direction::Output,
        path: "/nonexistent/osh/out.txt".to_string(),
    };
    let status = Executor::new().run_with_redirect(&touch, &unwritable);
    assert_eq!(status, Ok(ExitStatus::Exited(SETUP_FAILURE_STATUS)));
    assert!(!marker.exists());
}

#[test]
fn background_is_reaped_by_next_foreground_entry() {
    let _guard = serial();
    let out = scratch("done.txt");
    let started = Instant::now();
    run_line(&format!("sleep 0.3 & echo done > {}", out.display()));
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert_eq!(read(&out), "done\n");
    assert!(no_children_left());
}

/// The real executor, counting the untargeted waits the sequencer asks for.
struct CountingExecutor {
    inner: Executor,
    wait_any_calls: usize,
}

impl Launcher for CountingExecutor {
    fn run(&mut self, command: &Command, policy: WaitPolicy) -> Result<Option<ExitStatus>, ExecError> {
        self.inner.run(command, policy)
    }

    fn run_with_redirect(&mut self, command: &Command, redirect: &Redirect) -> Result<ExitStatus, ExecError> {
        self.inner.run_with_redirect(command, redirect)
    }

    fn run_pipe(&mut self, left: &Command, right: &Command) -> Result<PipeStatus, ExecError> {
        self.inner.run_pipe(left, right)
    }

    fn wait_any(&mut self) -> Result<Reaped, ExecError> {
        self.wait_any_calls += 1;
        self.inner.wait_any()
    }
}

#[allow(clippy::unwrap_used)]
#[test]
fn pipe_that_reaps_background_child_skips_deferred_wait() {
    let _guard = serial();
    let jobs = Parser::new("true & sleep 0.3 | cat", Some(9)).parse().unwrap();
    let mut sequencer = JobSequencer::new(CountingExecutor {
        inner: Executor::new(),
        wait_any_calls: 0,
    });

    assert_eq!(sequencer.run_line(&jobs), Flow::Continue);
    // `true` exits long before `sleep`, so the pipe's own waits collect it
    assert_eq!(sequencer.launcher().wait_any_calls, 0);
    assert!(no_children_left());
}

#[test]
fn background_launch_does_not_block() {
    let _guard = serial();
    let mut executor = Executor::new();
    let started = Instant::now();
    let status = executor.run(&Command::new(["sleep", "1"]), WaitPolicy::background());
    assert_eq!(status, Ok(None));
    assert!(started.elapsed() < Duration::from_millis(900));

    let reaped = executor.wait_any();
    assert!(matches!(reaped, Ok(r) if r.status.success()));
    assert!(no_children_left());
}

#[test]
fn empty_command_creates_no_process() {
    let _guard = serial();
    assert_eq!(run_line(";"), Flow::Continue);
    assert_eq!(run_line("&"), Flow::Continue);
    assert_eq!(run_line("|"), Flow::Continue);
    assert!(no_children_left());
}

#[test]
fn builtins_short_circuit() {
    let _guard = serial();
    assert_eq!(run_line("exit"), Flow::Exit);
    assert_eq!(run_line("ascii"), Flow::Continue);
    assert_eq!(run_line("osh-definitely-not-a-program"), Flow::Continue);
    assert!(no_children_left());
}

#[test]
fn word_limit_rejects_one_past() {
    let _guard = serial();
    let at_limit = scratch("nine.txt");
    run_line(&format!("echo 2 3 4 5 6 7 8 9 > {}", at_limit.display()));
    assert_eq!(read(&at_limit), "2 3 4 5 6 7 8 9\n");

    let past_limit = scratch("ten.txt");
    run_line(&format!("echo 2 3 4 5 6 7 8 9 10 > {}", past_limit.display()));
    assert!(!past_limit.exists());
}
