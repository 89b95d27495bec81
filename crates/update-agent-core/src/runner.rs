//! Shell command execution with a wall-clock timeout.
//!
//! [`run_command`] never fails: spawn errors, wait errors and timeouts are
//! folded into a [`CommandOutput`] with `exit_code = 1` so every caller can
//! treat the result uniformly. The failure kind stays available on
//! [`CommandOutput::failure`] for callers that care.

use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

pub const TIMED_OUT_MESSAGE: &str = "Command timed out";

const SHELL: &str = "sh";

/// How long to wait for a killed process group to be reaped before giving up
/// on its helper threads.
const REAP_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
    TimedOut(Duration),
    Spawn(String),
    Wait(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Set when the command could not run to completion.
    pub failure: Option<CommandFailure>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.failure.is_none()
    }

    fn failed(failure: CommandFailure) -> Self {
        let stderr = match &failure {
            CommandFailure::TimedOut(_) => TIMED_OUT_MESSAGE.to_string(),
            CommandFailure::Spawn(msg) | CommandFailure::Wait(msg) => msg.clone(),
        };
        CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr,
            failure: Some(failure),
        }
    }
}

/// Run `command` through `sh -c`, waiting at most `timeout`.
///
/// Stdout and stderr are drained on dedicated threads so a chatty command
/// cannot deadlock on a full pipe, and the wait happens on a third thread so
/// the timeout is a plain `recv_timeout` rather than a poll loop. The shell
/// leads its own process group, so on timeout every member of a pipeline is
/// killed, not just the shell.
pub fn run_command(command: &str, timeout: Duration) -> CommandOutput {
    run_with_shell(SHELL, command, timeout)
}

fn run_with_shell(shell: &str, command: &str, timeout: Duration) -> CommandOutput {
    let mut child = match Command::new(shell)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .spawn()
    {
        Ok(c) => c,
        Err(e) => return CommandOutput::failed(CommandFailure::Spawn(e.to_string())),
    };

    let child_pid = child.id();

    let stdout_thread = spawn_reader(child.stdout.take());
    let stderr_thread = spawn_reader(child.stderr.take());

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });

    let wait_result = match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => {
            kill_process_group(child_pid);
            // With the whole group gone the pipes close, so the waiter and the
            // readers finish. Anything that escaped the group is left behind
            // rather than blocking the caller.
            if rx.recv_timeout(REAP_GRACE).is_ok() {
                let _ = stdout_thread.join();
                let _ = stderr_thread.join();
            }
            return CommandOutput::failed(CommandFailure::TimedOut(timeout));
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    match wait_result {
        Ok(status) => CommandOutput {
            // Killed by a signal: no exit code.
            exit_code: status.code().unwrap_or(1),
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            failure: None,
        },
        Err(e) => CommandOutput::failed(CommandFailure::Wait(e.to_string())),
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    handle: Option<R>,
) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut r) = handle {
            let _ = r.read_to_end(&mut bytes);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// SIGKILL every process in the group led by `pgid`. Best-effort; errors are
/// ignored.
fn kill_process_group(pgid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg("--")
        .arg(format!("-{pgid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}
