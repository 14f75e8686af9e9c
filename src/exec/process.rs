//! Blocking process invocation with captured output and a timeout

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A fully built command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Space-joined command line for logs and error messages.
    pub fn display(&self) -> String {
        let program = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        std::iter::once(program)
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Argument list as UTF-8 strings (lossy); convenient in tests.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// Stderr when present, otherwise a description of the exit status.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr_str();
        if !stderr.is_empty() {
            return stderr;
        }
        match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external commands. The production implementation is [`ProcessRunner`];
/// tests substitute a recorder.
pub trait CommandRunner: Send + Sync {
    /// Run to completion. A non-zero exit is reported through
    /// [`CommandOutput::code`], not as an error.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Spawns real processes, killing them once `timeout` elapses.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timed_out(&self, invocation: &Invocation) -> Error {
        tracing::warn!(
            command = %invocation.display(),
            timeout_secs = self.timeout.as_secs(),
            "command timed out"
        );
        Error::Timeout { command: invocation.display(), timeout: self.timeout }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        tracing::debug!(command = %invocation.display(), cwd = ?invocation.cwd, "running");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;
        let deadline = Instant::now() + self.timeout;
        let (tx, rx) = mpsc::channel();
        let readers = spawn_reader(Stream::Stdout, child.stdout.take(), &tx)
            + spawn_reader(Stream::Stderr, child.stderr.take(), &tx);
        drop(tx);

        let Some(code) = wait_until(&mut child, deadline)? else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(self.timed_out(invocation));
        };

        // A grandchild can keep the pipes open after the child exits.
        let mut output = CommandOutput { code, ..Default::default() };
        for _ in 0..readers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((Stream::Stdout, buf)) => output.stdout = buf,
                Ok((Stream::Stderr, buf)) => output.stderr = buf,
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(invocation)),
            }
        }
        Ok(output)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// `Ok(Some(code))` once the child exits, `Ok(None)` when the deadline passes.
fn wait_until(child: &mut Child, deadline: Instant) -> Result<Option<Option<i32>>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status.code()));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Drain `source` on a detached thread; returns how many readers were started.
fn spawn_reader<R>(stream: Stream, source: Option<R>, tx: &Sender<(Stream, Vec<u8>)>) -> usize
where
    R: Read + Send + 'static,
{
    let Some(mut reader) = source else {
        return 0;
    };
    let tx = tx.clone();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
    1
}

/// Build a `git` invocation, optionally inside `cwd`.
pub fn git<I, S>(args: I, cwd: Option<&Path>) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let invocation = Invocation::new("git").args(args);
    match cwd {
        Some(dir) => invocation.current_dir(dir),
        None => invocation,
    }
}
