//! Process runner tests
//!
//! Exercises the real child-process runner with `sh` standing in for `dog`.

use sheepdog_exporter::error::ExporterError;
use sheepdog_exporter::sheepdog::{CommandRunner, ProcessRunner};
use std::time::Duration;

fn text(lines: Vec<Vec<u8>>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| String::from_utf8(line).expect("test output is UTF-8"))
        .collect()
}

#[tokio::test]
async fn test_captures_all_lines_in_order() {
    // Given: A command printing three lines
    let runner = ProcessRunner::new("sh");

    // When: Running it
    let lines = runner
        .run(&["-c", "echo one; echo two; echo three"])
        .await
        .map(text)
        .expect("command should succeed");

    // Then: Every line is captured, in order, without newlines
    assert_eq!(lines, ["one", "two", "three"]);
}

#[tokio::test]
async fn test_output_written_just_before_exit_is_not_lost() {
    // Given: A command that writes its last line right before exiting
    let runner = ProcessRunner::new("sh");

    // When: Running it repeatedly
    for _ in 0..20 {
        let lines = runner
            .run(&["-c", "i=0; while [ $i -lt 200 ]; do echo line$i; i=$((i+1)); done"])
            .await
            .map(text)
            .unwrap();

        // Then: Capture is complete every time
        assert_eq!(lines.len(), 200);
        assert_eq!(lines.last().map(String::as_str), Some("line199"));
    }
}

#[tokio::test]
async fn test_empty_output() {
    let runner = ProcessRunner::new("sh");

    let lines = runner.run(&["-c", "true"]).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_last_line_without_newline() {
    let runner = ProcessRunner::new("sh");

    let lines = runner.run(&["-c", "printf 'a\\nb'"]).await.map(text).unwrap();
    assert_eq!(lines, ["a", "b"]);
}

#[tokio::test]
async fn test_crlf_terminators_are_stripped() {
    let runner = ProcessRunner::new("sh");

    let lines = runner.run(&["-c", "printf 'a\\r\\nb\\r\\n'"]).await.map(text).unwrap();
    assert_eq!(lines, ["a", "b"]);
}

#[tokio::test]
async fn test_non_utf8_output_is_captured_verbatim() {
    // Given: A command that exits 0 but prints a byte that is not UTF-8
    let runner = ProcessRunner::new("sh");

    // When: Running it
    let lines = runner
        .run(&["-c", "printf '0 0 100 10 90 10%% /data\\377\\nnext\\n'"])
        .await
        .expect("undecodable output is not a command failure");

    // Then: The raw bytes come back untouched, later lines included
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], b"0 0 100 10 90 10% /data\xff".to_vec());
    assert_eq!(lines[1], b"next".to_vec());
}

#[tokio::test]
async fn test_non_utf8_output_still_checks_exit_status() {
    let runner = ProcessRunner::new("sh");

    let result = runner.run(&["-c", "printf '\\377\\n'; exit 2"]).await;

    match result {
        Err(ExporterError::CommandFailed { reason, .. }) => {
            assert!(reason.contains("exited with"), "reason: {}", reason)
        }
        other => panic!("expected command failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_zero_exit_is_command_failure() {
    // Given: A command that prints output but exits with an error
    let runner = ProcessRunner::new("sh");

    // When: Running it
    let result = runner.run(&["-c", "echo partial; exit 3"]).await;

    // Then: Output is discarded and the failure is reported
    match result {
        Err(ExporterError::CommandFailed { command, reason }) => {
            assert!(command.starts_with("sh -c"));
            assert!(reason.contains("exited with"), "reason: {}", reason);
        }
        other => panic!("expected command failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_binary_is_command_failure() {
    let runner = ProcessRunner::new("/nonexistent/sheepdog/dog");

    let result = runner.run(&["node", "stat", "-r"]).await;

    match result {
        Err(ExporterError::CommandFailed { command, reason }) => {
            assert_eq!(command, "/nonexistent/sheepdog/dog node stat -r");
            assert!(reason.contains("failed to spawn"), "reason: {}", reason);
        }
        other => panic!("expected command failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stderr_is_not_captured() {
    let runner = ProcessRunner::new("sh");

    let lines = runner
        .run(&["-c", "echo out; echo err >&2"])
        .await
        .map(text)
        .unwrap();
    assert_eq!(lines, ["out"]);
}

#[tokio::test]
async fn test_timeout_kills_slow_command() {
    // Given: A runner with a wait bound shorter than the command
    let runner = ProcessRunner::new("sh").with_timeout(Some(Duration::from_millis(200)));

    // When: Running a command that sleeps
    let started = std::time::Instant::now();
    let result = runner.run(&["-c", "sleep 5"]).await;

    // Then: It fails promptly
    assert!(started.elapsed() < Duration::from_secs(4));
    match result {
        Err(ExporterError::CommandFailed { reason, .. }) => {
            assert!(reason.contains("did not finish"), "reason: {}", reason)
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_does_not_affect_fast_command() {
    let runner = ProcessRunner::new("sh").with_timeout(Some(Duration::from_secs(10)));

    let lines = runner.run(&["-c", "echo fast"]).await.map(text).unwrap();
    assert_eq!(lines, ["fast"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_invocations_do_not_share_output() {
    // Given: Two runs producing distinct output at the same time
    let runner = ProcessRunner::new("sh");
    let script_a = "for i in 1 2 3 4 5; do echo A$i; sleep 0.01; done";
    let script_b = "for i in 1 2 3 4 5; do echo B$i; sleep 0.01; done";

    // When: Running them concurrently
    let args_a = ["-c", script_a];
    let args_b = ["-c", script_b];
    let (a, b) = tokio::join!(runner.run(&args_a), runner.run(&args_b));

    // Then: Each sees only its own lines
    assert_eq!(text(a.unwrap()), ["A1", "A2", "A3", "A4", "A5"]);
    assert_eq!(text(b.unwrap()), ["B1", "B2", "B3", "B4", "B5"]);
}
