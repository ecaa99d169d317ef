use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use launchseq::errors::LaunchError;
use launchseq::exec::{CreationFlags, Executor, StdioTarget};
use launchseq::init::{
    Args, Env, Exe, Flags, InheritHandles, Redirect, StartDir, on_setup, on_success,
};
use launchseq::seq::Sequence;
use launchseq_test_utils::fake_creator::FakeCreator;
use launchseq_test_utils::init_tracing;
use launchseq_test_utils::recorder::{CallLog, Hooks, Phase, Recorder};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_setup_then_success_in_sequence_order() {
    init_tracing();
    let log = CallLog::new();
    let mut seq = Sequence::new()
        .with(Recorder::new("a", &log))
        .with(Recorder::new("b", &log))
        .with(Recorder::new("c", &log));
    let mut creator = FakeCreator::succeeding(42, 0).logging_to(&log);

    let handle = Executor::with_creator(&mut seq, &mut creator)
        .run()
        .expect("launch should succeed");

    assert!(handle.is_valid());
    assert_eq!(handle.id(), Some(42));
    assert_eq!(creator.calls(), 1);
    assert_eq!(log.names_for(Phase::Setup), names(&["a", "b", "c"]));
    assert_eq!(log.names_for(Phase::Success), names(&["a", "b", "c"]));
    assert_eq!(log.count(Phase::Error), 0);

    // setup (3) -> native call -> success (3)
    assert_eq!(log.position("create_process", Phase::Create), Some(3));
    assert_eq!(log.position("a", Phase::Success), Some(4));
}

#[test]
fn test_setup_error_does_not_short_circuit_setup() {
    init_tracing();
    let log = CallLog::new();
    let err = LaunchError::invalid_argument("bad value");
    let mut seq = Sequence::new()
        .with(Recorder::new("a", &log))
        .with(Recorder::new("b", &log).failing_setup(err.clone()))
        .with(Recorder::new("c", &log));
    let mut creator = FakeCreator::succeeding(1, 0);

    let result = Executor::with_creator(&mut seq, &mut creator).run();

    assert_eq!(result.unwrap_err(), err);
    assert_eq!(creator.calls(), 0, "native call must be skipped");
    assert_eq!(log.names_for(Phase::Setup), names(&["a", "b", "c"]));
    assert_eq!(log.names_for(Phase::Error), names(&["a", "b", "c"]));
    assert_eq!(log.count(Phase::Success), 0);
}

#[test]
fn test_launch_error_runs_error_hooks_in_order() {
    init_tracing();
    let log = CallLog::new();
    let mut seq = Sequence::new()
        .with(Recorder::new("first", &log))
        .with(Recorder::new("second", &log));
    let mut creator = FakeCreator::failing(libc::ENOENT).logging_to(&log);

    let err = Executor::with_creator(&mut seq, &mut creator)
        .run()
        .unwrap_err();

    assert!(!err.is_setup());
    assert_eq!(err.code(), libc::ENOENT);
    assert_eq!(log.names_for(Phase::Error), names(&["first", "second"]));
    assert_eq!(log.count(Phase::Success), 0);
    assert!(log.position("create_process", Phase::Create) < log.position("first", Phase::Error));
}

#[test]
fn test_setup_only_loggers_run_once_before_native_call() {
    init_tracing();
    let log = CallLog::new();
    let mut seq = Sequence::new()
        .with(Recorder::new("logger-1", &log).with_hooks(Hooks::SETUP_ONLY))
        .with(Recorder::new("logger-2", &log).with_hooks(Hooks::SETUP_ONLY));
    let mut creator = FakeCreator::succeeding(7, 0).logging_to(&log);

    let handle = Executor::with_creator(&mut seq, &mut creator).run().unwrap();

    assert!(handle.is_valid());
    let entries = log.entries();
    assert_eq!(
        entries,
        vec![
            ("logger-1".to_string(), Phase::Setup),
            ("logger-2".to_string(), Phase::Setup),
            ("create_process".to_string(), Phase::Create),
        ]
    );
}

#[test]
fn test_borrowed_component_can_be_inspected_after_launch() {
    let log = CallLog::new();
    let mut recorder = Recorder::new("borrowed", &log);
    {
        let mut seq = Sequence::new().with(&mut recorder);
        let mut creator = FakeCreator::failing(libc::EACCES);
        let _ = Executor::with_creator(&mut seq, &mut creator).run();
    }

    assert_eq!(recorder.seen_errors().len(), 1);
    assert_eq!(recorder.seen_errors()[0].code(), libc::EACCES);
}

#[test]
fn test_success_hooks_see_pid_and_cleared_slot() {
    let mut seen: Option<(Option<u32>, bool)> = None;
    {
        let mut seq = Sequence::new().with(on_success(|launch| {
            seen = Some((launch.pid(), launch.has_error()));
        }));
        let mut creator = FakeCreator::succeeding(99, 0);
        Executor::with_creator(&mut seq, &mut creator).run().unwrap();
    }
    assert_eq!(seen, Some((Some(99), false)));
}

#[test]
fn test_error_recorded_by_success_hook_fails_launch() {
    init_tracing();
    let log = CallLog::new();
    let mut seq = Sequence::new()
        .with(Recorder::new("before", &log))
        .with(on_success(|launch| {
            launch.set_error(LaunchError::launch(libc::EIO, "late complaint"));
        }))
        .with(Recorder::new("after", &log));
    let mut creator = FakeCreator::succeeding(5, 0);
    let state = creator.child_state();

    let err = Executor::with_creator(&mut seq, &mut creator)
        .run()
        .unwrap_err();

    assert_eq!(err.code(), libc::EIO);
    assert!(!err.is_setup());
    // The success pass completes, then every component sees the failure.
    assert_eq!(log.names_for(Phase::Success), names(&["before", "after"]));
    assert_eq!(log.names_for(Phase::Error), names(&["before", "after"]));
    assert!(log.position("after", Phase::Success) < log.position("before", Phase::Error));
    assert!(state.killed.load(Ordering::SeqCst), "process is torn down");
    assert_eq!(state.waits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_builtin_components_fill_request() {
    let mut seq = Sequence::new()
        .with(Exe::new("/bin/echo"))
        .with(Args::new(["hello", "world"]))
        .with(StartDir::new("/tmp"))
        .with(Env::empty().set("A", "1").set("B", "2").remove("B"))
        .with(Redirect::stdout_to("/tmp/out.log"))
        .with(Flags::new_process_group());
    let mut creator = FakeCreator::succeeding(3, 0);

    Executor::with_creator(&mut seq, &mut creator).run().unwrap();

    let request = creator.last_request().expect("creator saw a request");
    assert_eq!(request.executable, Some(PathBuf::from("/bin/echo")));
    assert_eq!(
        request.args,
        vec![OsString::from("hello"), OsString::from("world")]
    );
    assert_eq!(request.working_dir, Some(PathBuf::from("/tmp")));

    let env = request.environment.as_ref().expect("environment block");
    assert_eq!(env.len(), 1);
    assert_eq!(env.get("A").and_then(|v| v.to_str()), Some("1"));
    assert!(env.get("B").is_none());

    assert_eq!(
        request.startup.stdout,
        StdioTarget::File(PathBuf::from("/tmp/out.log"))
    );
    assert_eq!(request.startup.stdin, StdioTarget::Inherit);
    assert!(!request.inherit_handles, "redirect leaves inheritance alone");
    assert!(request.creation_flags.contains(CreationFlags::NEW_PROCESS_GROUP));
}

#[test]
fn test_later_component_sees_earlier_writes() {
    let mut observed = None;
    {
        let mut seq = Sequence::new()
            .with(Exe::new("/bin/true"))
            .with(on_setup(|launch| {
                observed = launch.request.executable.clone();
            }));
        let mut creator = FakeCreator::succeeding(1, 0);
        Executor::with_creator(&mut seq, &mut creator).run().unwrap();
    }
    assert_eq!(observed, Some(PathBuf::from("/bin/true")));
}

#[test]
fn test_invalid_env_key_is_setup_error() {
    let mut seq = Sequence::new()
        .with(Exe::new("/bin/true"))
        .with(Env::inherit().set("BAD=KEY", "x"));
    let mut creator = FakeCreator::succeeding(1, 0);

    let err = Executor::with_creator(&mut seq, &mut creator)
        .run()
        .unwrap_err();

    assert!(err.is_setup());
    assert_eq!(err.code(), libc::EINVAL);
    assert_eq!(creator.calls(), 0);
}

#[test]
fn test_redirect_keeps_other_streams_closed_without_inheritance() {
    let mut seq = Sequence::new()
        .with(Exe::new("/bin/true"))
        .with(InheritHandles(false))
        .with(Redirect::stdout(StdioTarget::Null));
    let mut creator = FakeCreator::succeeding(1, 0);

    Executor::with_creator(&mut seq, &mut creator).run().unwrap();

    let request = creator.last_request().unwrap();
    assert!(!request.inherit_handles);
    assert_eq!(request.startup.stdout, StdioTarget::Null);
    assert_eq!(request.startup.stdin, StdioTarget::Inherit);
    assert_eq!(request.startup.stderr, StdioTarget::Inherit);
}
