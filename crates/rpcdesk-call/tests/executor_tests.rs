//! Runs the executor against a stand-in grpcurl script.

#![cfg(unix)]

use rpcdesk_call::{CallExecutor, CallRequest, GrpcurlExecutor};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn fake_grpcurl(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("grpcurl");
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn request() -> CallRequest {
    CallRequest {
        plaintext: true,
        protoset: "api.protoset".to_string(),
        server: "localhost:50051".to_string(),
        method: "pkg.Greeter.Hello".to_string(),
        body: r#"{"name":"world"}"#.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_captures_stdout_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    // Echo the arguments back, one per line.
    let bin = fake_grpcurl(dir.path(), r#"for a in "$@"; do echo "$a"; done"#);

    let outcome = GrpcurlExecutor::new(&bin).execute(&request());
    assert!(outcome.succeeded());
    let echoed: Vec<&str> = outcome.stdout.lines().collect();
    assert_eq!(echoed, outcome.argv[1..].iter().map(String::as_str).collect::<Vec<_>>());
    assert!(outcome.report().contains("stdout:\n-plaintext\n"));
}

#[test]
fn test_nonzero_exit_keeps_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let bin = fake_grpcurl(dir.path(), "echo 'Failed to dial target host' >&2\nexit 1");

    let outcome = GrpcurlExecutor::new(&bin).execute(&request());
    assert_eq!(outcome.status, Some(1));
    assert_eq!(outcome.stderr.trim(), "Failed to dial target host");
    let report = outcome.report();
    assert!(report.contains("Command failed with return code 1."));
    assert!(report.contains("stderr:\nFailed to dial target host"));
    assert!(!report.contains("stdout:"));
}
