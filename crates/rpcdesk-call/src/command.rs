//! grpcurl invocation.

use crate::vars::substitute;
use crate::CallError;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;

/// Everything grpcurl needs for one unary call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub plaintext: bool,
    /// Session cookie; sent as `Cookie:s=<cookie>` and wins over the token.
    pub cookie: String,
    pub bearer_token: String,
    pub protoset: String,
    pub server: String,
    pub method: String,
    /// Serialized JSON body; empty sends no `-d`.
    pub body: String,
}

impl CallRequest {
    /// Protoset, server and method must all be present.
    pub fn validate(&self) -> Result<(), CallError> {
        if self.protoset.trim().is_empty()
            || self.server.trim().is_empty()
            || self.method.trim().is_empty()
        {
            return Err(CallError::MissingRequired);
        }
        Ok(())
    }

    /// Substitute `{{name}}` tokens in every parameter except the body, whose
    /// values are substituted field by field before serialization.
    pub fn with_variables(self, vars: &BTreeMap<String, String>) -> Self {
        CallRequest {
            plaintext: self.plaintext,
            cookie: substitute(&self.cookie, vars),
            bearer_token: substitute(&self.bearer_token, vars),
            protoset: substitute(&self.protoset, vars),
            server: substitute(&self.server, vars),
            method: substitute(&self.method, vars),
            body: self.body,
        }
    }
}

/// Result of running one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Exit code; `None` when the process could not be spawned or was killed
    /// by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The exact argument vector, program first.
    pub argv: Vec<String>,
}

impl CallOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == Some(0)
    }

    /// Human-readable transcript of the call.
    pub fn report(&self) -> String {
        let mut out = format!("Executing command: {}\n\n", self.argv.join(" "));
        let has_stderr = !self.stderr.trim().is_empty();
        if self.succeeded() {
            let _ = writeln!(out, "stdout:\n{}", self.stdout);
        } else {
            let code = self
                .status
                .map(|c| c.to_string())
                .unwrap_or_else(|| "None".to_string());
            let _ = writeln!(out, "Command failed with return code {code}.");
        }
        if has_stderr {
            let _ = writeln!(out, "stderr:\n{}", self.stderr);
        }
        out
    }
}

/// Runs a [`CallRequest`] somewhere.
pub trait CallExecutor {
    fn execute(&self, request: &CallRequest) -> CallOutcome;
}

/// Shells out to the `grpcurl` binary.
#[derive(Debug, Clone)]
pub struct GrpcurlExecutor {
    bin: PathBuf,
}

impl Default for GrpcurlExecutor {
    fn default() -> Self {
        Self::new("grpcurl")
    }
}

impl GrpcurlExecutor {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Argument vector for `request`, program name first.
    pub fn build_args(&self, request: &CallRequest) -> Vec<String> {
        let mut argv = vec![self.bin.display().to_string()];
        if request.plaintext {
            argv.push("-plaintext".to_string());
        }
        if !request.cookie.is_empty() {
            argv.push("-H".to_string());
            argv.push(format!("Cookie:s={}", request.cookie));
        } else if !request.bearer_token.is_empty() {
            argv.push("-H".to_string());
            argv.push(format!("authorization: Bearer {}", request.bearer_token));
        }
        argv.push("--protoset".to_string());
        argv.push(request.protoset.clone());
        if !request.body.is_empty() {
            argv.push("-d".to_string());
            argv.push(request.body.clone());
        }
        argv.push(request.server.clone());
        argv.push(request.method.clone());
        argv
    }
}

impl CallExecutor for GrpcurlExecutor {
    fn execute(&self, request: &CallRequest) -> CallOutcome {
        let argv = self.build_args(request);
        tracing::debug!(server = %request.server, method = %request.method, "running grpcurl");

        match Command::new(&self.bin).args(&argv[1..]).output() {
            Ok(output) => {
                let status = output.status.code();
                if status != Some(0) {
                    tracing::debug!(?status, "grpcurl exited unsuccessfully");
                }
                CallOutcome {
                    status,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    argv,
                }
            }
            Err(err) => {
                tracing::warn!(bin = %self.bin.display(), error = %err, "failed to spawn grpcurl");
                CallOutcome {
                    status: None,
                    stdout: String::new(),
                    stderr: format!("Error while running grpcurl: {err}"),
                    argv,
                }
            }
        }
    }
}
