use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use launchseq::cli::CliArgs;
use launchseq::config::{ConfigFile, LaunchDefaults, load_and_validate, load_or_default};
use launchseq::errors::LaunchseqError;
use launchseq::exec::StdioTarget;
use launchseq::types::ErrorPolicyKind;
use launchseq_test_utils::init_tracing;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Launchseq.toml");
    fs::write(&path, contents).expect("write config");
    (dir, path)
}

fn expect_config_error(contents: &str, needle: &str) {
    let (_dir, path) = write_config(contents);
    match load_and_validate(&path) {
        Err(LaunchseqError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}")
        }
        other => panic!("expected ConfigError, got {:?}", other),
    }
}

#[test]
fn full_config_is_parsed_and_validated() -> TestResult {
    init_tracing();
    let (_dir, path) = write_config(
        r#"
[logging]
level = "debug"

[launch]
error_policy = "recover"
working_dir = "/srv/app"
inherit_handles = false
clear_env = true
new_process_group = true
unset_env = ["OLDPWD"]
stdin = "null"
stdout = ">>/var/log/app.out"
stderr = "/var/log/app.err"

[launch.env]
RUST_LOG = "info"
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.log_level, Some(tracing::Level::DEBUG));
    let launch = &cfg.launch;
    assert_eq!(launch.error_policy, ErrorPolicyKind::Recover);
    assert_eq!(launch.working_dir, Some(PathBuf::from("/srv/app")));
    assert!(!launch.inherit_handles);
    assert!(launch.clear_env);
    assert!(launch.new_process_group);
    assert_eq!(launch.unset_env, vec!["OLDPWD".to_string()]);
    assert_eq!(launch.env.get("RUST_LOG").map(String::as_str), Some("info"));
    assert_eq!(launch.stdin, StdioTarget::Null);
    assert_eq!(
        launch.stdout,
        StdioTarget::Append(PathBuf::from("/var/log/app.out"))
    );
    assert_eq!(
        launch.stderr,
        StdioTarget::File(PathBuf::from("/var/log/app.err"))
    );
    Ok(())
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let (_dir, path) = write_config("");

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.log_level, None);
    assert_eq!(cfg.launch.error_policy, ErrorPolicyKind::Propagate);
    assert!(cfg.launch.inherit_handles);
    assert!(!cfg.launch.clear_env);
    assert!(cfg.launch.env.is_empty());
    assert_eq!(cfg.launch.stdout, StdioTarget::Inherit);
    Ok(())
}

#[test]
fn invalid_env_key_is_rejected() {
    expect_config_error(
        r#"
[launch.env]
"A=B" = "x"
"#,
        "[launch.env]",
    );
}

#[test]
fn unknown_log_level_is_rejected() {
    expect_config_error(
        r#"
[logging]
level = "loud"
"#,
        "[logging].level",
    );
}

#[test]
fn stdin_append_is_rejected() {
    expect_config_error(
        r#"
[launch]
stdin = ">>/tmp/in"
"#,
        "[launch].stdin",
    );
}

#[test]
fn empty_working_dir_is_rejected() {
    expect_config_error(
        r#"
[launch]
working_dir = ""
"#,
        "working_dir",
    );
}

#[test]
fn unknown_error_policy_fails_to_deserialize() {
    let (_dir, path) = write_config(
        r#"
[launch]
error_policy = "ignore"
"#,
    );

    assert!(matches!(
        load_and_validate(&path),
        Err(LaunchseqError::TomlError(_))
    ));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(matches!(
        load_or_default(Some(&missing)),
        Err(LaunchseqError::IoError(_))
    ));
}

#[test]
fn compose_orders_components_from_flags_and_defaults() -> TestResult {
    let args = CliArgs::try_parse_from([
        "launchseq",
        "--cwd",
        "/tmp",
        "--env",
        "A=1",
        "--",
        "/bin/echo",
        "-n",
        "hi",
    ])?;
    assert_eq!(args.program, PathBuf::from("/bin/echo"));
    assert_eq!(args.args, vec!["-n".to_string(), "hi".to_string()]);
    assert_eq!(args.env, vec![("A".to_string(), "1".to_string())]);

    let defaults = LaunchDefaults {
        stdout: StdioTarget::Null,
        new_process_group: true,
        ..LaunchDefaults::default()
    };
    let seq = launchseq::compose(&args, &defaults);

    assert_eq!(
        seq.names(),
        vec![
            "trace",
            "exe",
            "args",
            "inherit_handles",
            "start_dir",
            "env",
            "redirect_stdout",
            "creation_flags",
        ]
    );
    Ok(())
}

#[test]
fn compose_skips_optional_components() -> TestResult {
    let args = CliArgs::try_parse_from(["launchseq", "/bin/true"])?;

    let seq = launchseq::compose(&args, &ConfigFile::default().launch);

    assert_eq!(
        seq.names(),
        vec!["trace", "exe", "args", "inherit_handles", "env"]
    );
    Ok(())
}

#[test]
fn malformed_env_flag_is_rejected_by_cli() {
    assert!(CliArgs::try_parse_from(["launchseq", "--env", "=x", "/bin/true"]).is_err());
    assert!(CliArgs::try_parse_from(["launchseq", "--env", "novalue", "/bin/true"]).is_err());
}
