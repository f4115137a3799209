//! Unit tests for CLI commands

use crate::cli::commands::exit_status;
use crate::cli::{run_cli, Cli, Commands};
use crate::error::BusinessError;
use crate::registry::{ResourceType, TypeRegistry};
use clap::Parser;
use http::Method;
use std::io::Write;

#[derive(Default)]
struct Echo {
    tag: String,
}

impl Echo {
    fn get(&mut self, word: String) -> Result<String, BusinessError> {
        Ok(format!("{}{}", self.tag, word))
    }

    fn post(&mut self) -> Result<String, BusinessError> {
        Err(BusinessError::bad_request("nothing to post"))
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register(
        ResourceType::builder::<Echo>("tools.Echo")
            .verb(Method::GET, Echo::get)
            .verb(Method::POST, Echo::post)
            .setter("tag", |e: &mut Echo, v: String| e.tag = v)
            .build(),
    );
    registry
}

fn run(args: &[&str]) -> (bool, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let ok = run_cli(&cli, registry(), &mut out).unwrap();
    (ok, String::from_utf8(out).unwrap())
}

#[test]
fn test_dispatch_command_parses() {
    let cli = Cli::try_parse_from([
        "cakerouter",
        "dispatch",
        "-m",
        "post",
        "--prefix",
        "/api",
        "--body",
        "{}",
        "/api/x",
    ])
    .unwrap();

    match cli.command {
        Commands::Dispatch {
            method,
            prefix,
            body,
            body_file,
            target,
        } => {
            assert_eq!(method, "post");
            assert_eq!(prefix.as_deref(), Some("/api"));
            assert_eq!(body.as_deref(), Some("{}"));
            assert!(body_file.is_none());
            assert_eq!(target, "/api/x");
        }
        Commands::Types => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_body_and_body_file_conflict() {
    let parsed = Cli::try_parse_from([
        "cakerouter",
        "dispatch",
        "--body",
        "{}",
        "--body-file",
        "b.json",
        "/x",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_dispatch_prints_json_result() {
    let (ok, out) = run(&["cakerouter", "dispatch", "/tools/echo/hi?tag=%3E"]);
    assert!(ok);
    assert_eq!(out.trim(), "\">hi\"");
}

#[test]
fn test_dispatch_strips_prefix() {
    let (ok, out) = run(&["cakerouter", "dispatch", "--prefix", "/api", "/api/tools/echo/x"]);
    assert!(ok);
    assert_eq!(out.trim(), "\"x\"");
}

#[test]
fn test_dispatch_failure_reports_class() {
    let (ok, out) = run(&["cakerouter", "dispatch", "-m", "POST", "/tools/echo"]);
    assert!(!ok);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["error"], "bad_request");
    assert_eq!(report["message"], "nothing to post");

    let (ok, out) = run(&["cakerouter", "dispatch", "/nowhere"]);
    assert!(!ok);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["error"], "not_found");
}

#[test]
fn test_dispatch_reads_body_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "   ").unwrap();
    let path = file.path().to_string_lossy().to_string();
    let (ok, out) = run(&[
        "cakerouter",
        "dispatch",
        "-m",
        "POST",
        "--body-file",
        &path,
        "/tools/echo",
    ]);
    assert!(!ok);
    assert!(out.contains("nothing to post"));
}

#[test]
fn test_invalid_method_is_an_error() {
    let cli = Cli::try_parse_from(["cakerouter", "dispatch", "-m", "GE T", "/tools/echo/x"]).unwrap();
    let mut out = Vec::new();
    assert!(run_cli(&cli, registry(), &mut out).is_err());
}

#[test]
fn test_types_lists_methods_and_members() {
    let (ok, out) = run(&["cakerouter", "types"]);
    assert!(ok);
    assert!(out.contains("tools.Echo"));
    assert!(out.contains("get(String)"));
    assert!(out.contains("post()"));
    assert!(out.contains("members: tag"));
}

#[test]
fn test_failed_dispatch_maps_to_failure_status() {
    let (ok, _) = run(&["cakerouter", "dispatch", "-m", "POST", "/tools/echo"]);
    assert_eq!(
        format!("{:?}", exit_status(ok)),
        format!("{:?}", std::process::ExitCode::FAILURE)
    );

    let (ok, _) = run(&["cakerouter", "dispatch", "/tools/echo/hi"]);
    assert_eq!(
        format!("{:?}", exit_status(ok)),
        format!("{:?}", std::process::ExitCode::SUCCESS)
    );
}
