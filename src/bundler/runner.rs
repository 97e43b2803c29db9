//! Process-runner seam for external tools.
//!
//! Every external collaborator (`git`, the upstream build script,
//! `xcodebuild`) is invoked through the [`ProcessRunner`] trait, so pipeline
//! logic can be exercised in tests with a scripted runner instead of real
//! toolchains.

use crate::bundler::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// A single external command invocation.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Program to launch
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory for the child process, if any
    pub cwd: Option<PathBuf>,
}

impl ProcessRequest {
    /// Creates a request for the given program with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the child's working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Full command line, for diagnostics.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Exit status and captured output of a completed command.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; `None` when the child was killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the command exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion, capturing their output.
///
/// A launch failure (program missing, not executable) is an error; a nonzero
/// exit is reported through [`ProcessOutput`] and left to the caller's
/// policy.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Launches the command and waits for it to exit.
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput>;
}

/// Runs the request and converts a nonzero exit into a
/// [`Error::CommandFailed`] carrying the command's stderr verbatim.
pub async fn run_checked(
    runner: &dyn ProcessRunner,
    request: &ProcessRequest,
) -> Result<ProcessOutput> {
    let output = runner.run(request).await?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: request.command_line(),
            stderr: output.stderr,
        });
    }
    Ok(output)
}

/// [`ProcessRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput> {
        let mut command = tokio::process::Command::new(&request.program);
        command.args(&request.args);
        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }

        log::debug!("Running: {}", request.command_line());
        let output = command.output().await.map_err(|source| Error::CommandLaunch {
            command: request.command_line(),
            source,
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for unit tests.

    use super::*;
    use std::sync::Mutex;

    type Script = Box<dyn Fn(&ProcessRequest) -> ProcessOutput + Send + Sync>;

    /// Runner that records every request and answers from a script.
    pub(crate) struct FakeRunner {
        script: Script,
        calls: Mutex<Vec<ProcessRequest>>,
    }

    impl FakeRunner {
        /// Every command succeeds with empty output.
        pub(crate) fn succeeding() -> Self {
            Self::with(|_| ProcessOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            })
        }

        /// Every command fails with the given stderr.
        pub(crate) fn failing(stderr: &str) -> Self {
            let stderr = stderr.to_string();
            Self::with(move |_| ProcessOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.clone(),
            })
        }

        /// Answers each request with the given closure.
        pub(crate) fn with(
            script: impl Fn(&ProcessRequest) -> ProcessOutput + Send + Sync + 'static,
        ) -> Self {
            Self {
                script: Box::new(script),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Requests seen so far, in order.
        pub(crate) fn calls(&self) -> Vec<ProcessRequest> {
            self.calls.lock().expect("runner call log poisoned").clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeRunner {
        async fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput> {
            self.calls
                .lock()
                .expect("runner call log poisoned")
                .push(request.clone());
            Ok((self.script)(request))
        }
    }
}
