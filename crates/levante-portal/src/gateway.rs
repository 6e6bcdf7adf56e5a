//! External command execution against the `ios` tool.
//!
//! `IosGateway` spawns the cupertino `ios` command with structured argv
//! (never through a shell), races it against a timeout that kills the child
//! process, and bounds how much output it is willing to buffer. Every
//! invocation is single-shot: a failed command is surfaced as a rejected
//! operation, never retried.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncReadExt;

use crate::error::Error;

/// Timeout for device and profile commands.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(40);

/// Timeout for the availability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Cap on buffered stdout/stderr per invocation.
pub const MAX_OUTPUT_BYTES: usize = 400 * 1024;

/// Account-scoped credentials for one command invocation.
///
/// The password is solicited interactively per run and never persisted;
/// it is exposed only at the instant the command argv is assembled.
#[derive(Clone)]
pub struct Credentials {
    pub apple_id: String,
    pub team: Option<String>,
    pub password: SecretString,
}

/// Handle to the external `ios` command-line tool.
pub struct IosGateway {
    pub(crate) program: String,
    pub(crate) timeout: Duration,
    pub(crate) max_output: usize,
    /// Parent directory for the downloader's scratch dir. `None` means the
    /// system temp dir.
    pub(crate) tmp_root: Option<PathBuf>,
}

impl Default for IosGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl IosGateway {
    /// Gateway for the `ios` tool found on `PATH`.
    pub fn new() -> Self {
        Self::with_program("ios")
    }

    /// Gateway for an `ios` tool at a non-default location.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: COMMAND_TIMEOUT,
            max_output: MAX_OUTPUT_BYTES,
            tmp_root: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tmp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.tmp_root = Some(root.into());
        self
    }

    /// Check that the external tool is installed and answers within 5s.
    pub async fn probe(&self) -> Result<(), Error> {
        match self.run(&["--version".into()], None, PROBE_TIMEOUT).await {
            Ok(_) => Ok(()),
            Err(Error::Spawn { .. } | Error::CommandFailed { .. } | Error::Timeout { .. }) => {
                Err(Error::Unavailable {
                    program: self.program.clone(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// The `-u/-p/--team` argument tail shared by every portal command.
    /// The team flag is appended only when a team id is configured.
    pub(crate) fn auth_args(credentials: &Credentials) -> Vec<String> {
        let mut args = vec![
            "-u".into(),
            credentials.apple_id.clone(),
            "-p".into(),
            credentials.password.expose_secret().to_owned(),
        ];
        if let Some(ref team) = credentials.team {
            args.push("--team".into());
            args.push(team.clone());
        }
        args
    }

    /// Spawn the external tool and collect stdout.
    ///
    /// The child is killed -- not merely abandoned -- when the timeout
    /// elapses or the output cap is exceeded. Non-zero exit becomes
    /// [`Error::CommandFailed`] with trimmed stderr attached.
    pub(crate) async fn run(
        &self,
        args: &[String],
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<String, Error> {
        let start = Instant::now();

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let cap = self.max_output;

        let (status, stdout, stderr) = tokio::select! {
            result = async {
                let mut stdout = Vec::new();
                let mut stderr = Vec::new();
                if let Some(out) = stdout_pipe.take() {
                    out.take(cap as u64 + 1).read_to_end(&mut stdout).await?;
                }
                if stdout.len() > cap {
                    let _ = child.kill().await;
                    return Err(Error::OutputOverflow {
                        program: self.program.clone(),
                        limit: cap,
                    });
                }
                if let Some(err) = stderr_pipe.take() {
                    err.take(cap as u64 + 1).read_to_end(&mut stderr).await?;
                }
                if stderr.len() > cap {
                    let _ = child.kill().await;
                    return Err(Error::OutputOverflow {
                        program: self.program.clone(),
                        limit: cap,
                    });
                }
                let status = child.wait().await?;
                Ok((status, stdout, stderr))
            } => result?,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                return Err(Error::Timeout {
                    program: self.program.clone(),
                    secs: timeout.as_secs(),
                });
            }
        };

        let exit_code = status.code().unwrap_or(-1);
        tracing::info!(
            program = %self.program,
            args = %redact_args(args),
            exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "external command finished"
        );

        let stderr = String::from_utf8_lossy(&stderr).trim().to_owned();
        if !status.success() {
            return Err(Error::CommandFailed {
                program: self.program.clone(),
                code: exit_code,
                stderr,
            });
        }
        if !stderr.is_empty() {
            tracing::debug!(program = %self.program, stderr = %stderr, "external command stderr");
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Render args for logging with the password value blanked out.
fn redact_args(args: &[String]) -> String {
    let mut rendered = Vec::with_capacity(args.len());
    let mut redact_next = false;
    for arg in args {
        if redact_next {
            rendered.push("****");
            redact_next = false;
            continue;
        }
        if arg == "-p" {
            redact_next = true;
        }
        rendered.push(arg);
    }
    rendered.join(" ")
}
