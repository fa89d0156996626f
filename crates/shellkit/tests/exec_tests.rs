//! End-to-end dispatch tests: real forks, real programs.
//!
//! These share the process-wide foreground atomics and fork from a test
//! process, so they run serialized.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serial_test::serial;
use shellkit::{ForegroundStatus, JobCompletion, LineOutcome, Shell};

/// Poll the reap pass until at least `count` completions have surfaced.
fn reap_until(shell: &mut Shell, count: usize) -> Vec<JobCompletion> {
    let mut records = Vec::new();
    for _ in 0..250 {
        records.extend(shell.reap_background());
        if records.len() >= count {
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }
    records
}

#[test]
#[serial]
fn foreground_exit_codes_are_recorded() {
    let mut shell = Shell::new();

    assert_eq!(shell.run_line("true").unwrap(), LineOutcome::Continue);
    assert_eq!(shell.status(), ForegroundStatus::Exited(0));

    shell.run_line("false").unwrap();
    assert_eq!(shell.status(), ForegroundStatus::Exited(1));
}

#[test]
#[serial]
fn output_redirection_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let mut shell = Shell::new();
    shell
        .run_line(&format!("echo hi > {}", out.display()))
        .unwrap();

    assert_eq!(shell.status(), ForegroundStatus::Exited(0));
    assert_eq!(fs::read_to_string(&out).unwrap(), "hi\n");
}

#[test]
#[serial]
fn input_and_output_redirection_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "hello\n").unwrap();

    let mut shell = Shell::new();
    shell
        .run_line(&format!("cat < {} > {}", input.display(), output.display()))
        .unwrap();

    assert_eq!(shell.status(), ForegroundStatus::Exited(0));
    assert_eq!(fs::read_to_string(&output).unwrap(), "hello\n");
}

#[test]
#[serial]
fn missing_program_reports_exit_value_one() {
    let mut shell = Shell::new();
    shell.run_line("definitely_not_a_real_program_xyz").unwrap();

    assert_eq!(shell.status(), ForegroundStatus::Exited(1));
    assert_eq!(shell.status().to_string(), "exit value 1");
}

#[test]
#[serial]
fn unopenable_input_fails_the_child() {
    let mut shell = Shell::new();
    shell
        .run_line("cat < /definitely/missing/input.txt")
        .unwrap();

    assert_eq!(shell.status(), ForegroundStatus::Exited(1));
}

#[test]
#[serial]
fn signal_death_is_reported_as_such() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("die.sh");
    fs::write(&script, "#!/bin/sh\nkill -TERM $$\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let mut shell = Shell::new();
    shell.run_line(&script.display().to_string()).unwrap();

    assert_eq!(shell.status(), ForegroundStatus::Signaled(15));
    assert_eq!(shell.status().to_string(), "terminated by signal 15");
}

#[test]
#[serial]
fn background_job_is_reaped_between_prompts() {
    let mut shell = Shell::new();

    assert_eq!(shell.run_line("true &").unwrap(), LineOutcome::Continue);
    assert_eq!(shell.background_jobs(), 1);

    let records = reap_until(&mut shell, 1);
    assert_eq!(records.len(), 1);
    assert!(matches!(records[0], JobCompletion::Exited { code: 0, .. }));

    let message = records[0].to_string();
    assert!(message.starts_with("background pid "), "{message}");
    assert!(message.ends_with("is done: exit value 0"), "{message}");
    assert_eq!(shell.background_jobs(), 0);
}

#[test]
#[serial]
fn occupancy_tracks_spawns_minus_reaps() {
    let mut shell = Shell::new();

    shell.run_line("true &").unwrap();
    shell.run_line("true &").unwrap();
    shell.run_line("sleep 30 &").unwrap();
    assert_eq!(shell.background_jobs(), 3);

    let records = reap_until(&mut shell, 2);
    assert_eq!(records.len(), 2);
    assert_eq!(shell.background_jobs(), 1);

    // Shutdown kills the straggler without waiting on it.
    shell.shutdown();
    assert_eq!(shell.background_jobs(), 0);
}

#[test]
#[serial]
fn background_spawn_does_not_block() {
    let mut shell = Shell::new();

    let started = std::time::Instant::now();
    shell.run_line("sleep 5 &").unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));

    shell.shutdown();
}
