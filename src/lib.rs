// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod init;
pub mod logging;
pub mod process;
pub mod seq;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, LaunchDefaults};
use crate::exec::StdioTarget;
use crate::init::{
    Args, Env, ErrorSink, Exe, Flags, InheritHandles, Redirect, StartDir, Stream, Trace,
};
use crate::process::spawn_waiter;
use crate::seq::Sequence;
use crate::types::ErrorPolicyKind;

pub use crate::exec::{Executor, Launch, LaunchRequest};
pub use crate::process::{ExitState, ExitStatusCell, ProcessHandle};
pub use crate::seq::{Initializer, Propagating, Recoverable, Recovered};

/// Exit code of the driver when a launch fails under the recoverable policy.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 127;

/// High-level entry point used by `main.rs`.
///
/// Composes the launch sequence from CLI flags and config defaults, launches
/// the program under the selected error policy, then waits for it. Returns
/// the exit code the driver should exit with.
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<i32> {
    let recover = args.recover || cfg.launch.error_policy == ErrorPolicyKind::Recover;
    let seq = compose(&args, &cfg.launch);

    if args.dry_run {
        print_dry_run(&args, &cfg.launch, &seq, recover);
        return Ok(0);
    }

    let handle = if recover {
        let sink = ErrorSink::new();
        let mut seq = seq.with_error_sink(sink.clone());
        let recovered = exec::spawn(&mut seq);
        if let Some(err) = sink.error() {
            error!(program = %args.program.display(), error = %err, "launch failed");
            eprintln!("launchseq: {err}");
            return Ok(LAUNCH_FAILURE_EXIT_CODE);
        }
        recovered.handle
    } else {
        let mut seq = seq;
        exec::spawn(&mut seq)
            .with_context(|| format!("launching {}", args.program.display()))?
    };

    let pid = handle.id().unwrap_or_default();
    if args.no_wait {
        info!(pid, "not waiting for process");
        println!("{pid}");
        return Ok(0);
    }

    let code = spawn_waiter(handle)
        .await
        .context("waiter task failed")??;
    debug!(pid, exit_code = code, "driver finished");
    Ok(code)
}

/// Build the driver's launch sequence. CLI flags win over config defaults.
pub fn compose(args: &CliArgs, defaults: &LaunchDefaults) -> Sequence<'static> {
    let mut seq = Sequence::new()
        .with(Trace::new(args.program.display().to_string()))
        .with(Exe::new(&args.program))
        .with(Args::new(&args.args))
        .with(InheritHandles(defaults.inherit_handles));

    if let Some(dir) = args.cwd.as_ref().or(defaults.working_dir.as_ref()) {
        seq.push(StartDir::new(dir));
    }

    let mut env = if defaults.clear_env {
        Env::empty()
    } else {
        Env::inherit()
    };
    for key in &defaults.unset_env {
        env = env.remove(key);
    }
    for (key, value) in defaults.env.iter().chain(args.env.iter().map(|(k, v)| (k, v))) {
        env = env.set(key, value);
    }
    seq.push(env);

    let streams = [
        (Stream::Stdin, &defaults.stdin),
        (Stream::Stdout, &defaults.stdout),
        (Stream::Stderr, &defaults.stderr),
    ];
    for (stream, target) in streams {
        if *target != StdioTarget::Inherit {
            seq.push(Redirect::new(stream, target.clone()));
        }
    }

    if defaults.new_process_group {
        seq.push(Flags::new_process_group());
    }

    seq
}

fn print_dry_run(args: &CliArgs, defaults: &LaunchDefaults, seq: &Sequence<'_>, recover: bool) {
    println!("launchseq dry-run");
    println!("  program = {}", args.program.display());
    if !args.args.is_empty() {
        println!("  args = {:?}", args.args);
    }
    println!(
        "  error_policy = {}",
        if recover { "recover" } else { "propagate" }
    );
    println!("  inherit_handles = {}", defaults.inherit_handles);
    println!();

    println!("components ({}):", seq.len());
    for name in seq.names() {
        println!("  - {name}");
    }

    debug!("dry-run complete (nothing launched)");
}
