use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use launchseq::errors::LaunchseqError;
use launchseq::exec::Executor;
use launchseq::process::{
    ExitState, ExitStatusCell, ProcessHandle, STILL_ACTIVE, poll, spawn_waiter, wait_blocking,
};
use launchseq::seq::Sequence;
use launchseq_test_utils::fake_creator::FakeCreator;
use launchseq_test_utils::with_timeout;

fn launch_fake(pid: u32, exit_code: i32) -> (ProcessHandle, FakeCreator) {
    let mut seq = Sequence::new();
    let mut creator = FakeCreator::succeeding(pid, exit_code);
    let handle = Executor::with_creator(&mut seq, &mut creator)
        .run()
        .expect("fake launch succeeds");
    (handle, creator)
}

#[test]
fn test_fresh_cell_reads_running() {
    let cell = ExitStatusCell::new();
    assert_eq!(cell.load(), ExitState::Running);
    assert!(cell.is_running());
    assert_eq!(cell.load().code(), None);
}

#[test]
fn test_publish_is_write_once() {
    let cell = ExitStatusCell::new();
    cell.publish(3).expect("first publish wins");
    assert_eq!(cell.load(), ExitState::Exited(3));

    match cell.publish(4) {
        Err(LaunchseqError::StatusAlreadyPublished(existing)) => assert_eq!(existing, 3),
        other => panic!("expected StatusAlreadyPublished, got {:?}", other),
    }
    assert_eq!(cell.load(), ExitState::Exited(3));
}

#[test]
fn test_sentinel_cannot_be_published() {
    let cell = ExitStatusCell::new();
    assert!(matches!(
        cell.publish(STILL_ACTIVE),
        Err(LaunchseqError::ReservedExitCode(_))
    ));
    assert!(cell.is_running());
}

#[test]
fn test_clones_share_one_cell() {
    let cell = ExitStatusCell::new();
    let other = cell.clone();
    assert!(cell.same_cell(&other));
    assert!(!cell.same_cell(&ExitStatusCell::new()));

    other.publish(0).unwrap();
    assert_eq!(cell.load(), ExitState::Exited(0));
}

#[test]
fn test_concurrent_readers_see_only_sentinel_or_final_code() {
    let cell = ExitStatusCell::new();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cell = cell.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut saw_final = false;
                while !done.load(Ordering::SeqCst) || !saw_final {
                    match cell.load() {
                        ExitState::Running => assert!(!saw_final, "went back to running"),
                        ExitState::Exited(code) => {
                            assert_eq!(code, 42);
                            saw_final = true;
                        }
                        ExitState::Invalid => panic!("cell never reads invalid"),
                    }
                }
            })
        })
        .collect();

    thread::sleep(std::time::Duration::from_millis(10));
    cell.publish(42).unwrap();
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

#[test]
fn test_empty_handle_is_inert() {
    let mut handle = ProcessHandle::default();
    assert!(!handle.is_valid());
    assert_eq!(handle.id(), None);
    assert_eq!(handle.status(), ExitState::Invalid);
    assert!(handle.status_cell().is_none());
    assert!(handle.kill().is_err());
    assert!(matches!(
        wait_blocking(&mut handle),
        Err(LaunchseqError::EmptyHandle)
    ));
    assert!(matches!(poll(&mut handle), Err(LaunchseqError::EmptyHandle)));
}

#[test]
fn test_new_handle_reads_running_until_waiter_publishes() {
    let (mut handle, _creator) = launch_fake(10, 5);
    let cell = handle.status_cell().expect("live handle has a cell");

    assert_eq!(handle.status(), ExitState::Running);
    assert_eq!(poll(&mut handle).unwrap(), ExitState::Running);
    assert_eq!(cell.load(), ExitState::Running);

    assert_eq!(wait_blocking(&mut handle).unwrap(), 5);
    assert_eq!(handle.status(), ExitState::Exited(5));
    assert_eq!(cell.load(), ExitState::Exited(5));

    // Waiting again returns the stored code without touching the process.
    assert_eq!(wait_blocking(&mut handle).unwrap(), 5);
}

#[test]
fn test_poll_publishes_once_process_exits() {
    let (mut handle, creator) = launch_fake(12, 9);
    let state = creator.child_state();

    assert_eq!(poll(&mut handle).unwrap(), ExitState::Running);
    state.exited.store(true, Ordering::SeqCst);
    assert_eq!(poll(&mut handle).unwrap(), ExitState::Exited(9));
    assert_eq!(handle.status(), ExitState::Exited(9));
    assert_eq!(state.waits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_spawn_waiter_publishes_to_shared_cell() {
    let (handle, _creator) = launch_fake(20, 17);
    let cell = handle.status_cell().unwrap();
    assert!(cell.is_running());

    let code = with_timeout(spawn_waiter(handle))
        .await
        .expect("waiter task panicked")
        .expect("wait failed");

    assert_eq!(code, 17);
    assert_eq!(cell.load(), ExitState::Exited(17));
}

#[cfg(unix)]
#[test]
fn test_exit_code_never_collides_with_sentinel() {
    use launchseq::exec::native::exit_code;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    assert_eq!(exit_code(ExitStatus::from_raw(libc::SIGKILL)), 128 + libc::SIGKILL);
    for raw in [0, 255 << 8, libc::SIGTERM, libc::SIGSEGV] {
        assert_ne!(exit_code(ExitStatus::from_raw(raw)), STILL_ACTIVE);
    }
}
