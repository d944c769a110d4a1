use sheepdog_exporter::error::ExporterError;
use sheepdog_exporter::process::read_pid;
use std::path::PathBuf;

fn temp_pid_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "sheepdog-exporter-{}-{}.pid",
        name,
        std::process::id()
    ));
    std::fs::write(&path, content).expect("Failed to write pid file");
    path
}

#[test]
fn test_read_pid_trims_whitespace() {
    let path = temp_pid_file("trim", "  4242\n");

    let pid = read_pid(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(pid.unwrap(), 4242);
}

#[test]
fn test_read_pid_rejects_garbage() {
    let path = temp_pid_file("garbage", "sheep\n");

    let pid = read_pid(&path);
    std::fs::remove_file(&path).ok();

    match pid {
        Err(ExporterError::Config(msg)) => assert!(msg.contains("can't parse pid file")),
        other => panic!("expected parse failure, got {:?}", other),
    }
}

#[test]
fn test_read_pid_rejects_non_positive() {
    let path = temp_pid_file("zero", "0");

    let pid = read_pid(&path);
    std::fs::remove_file(&path).ok();

    assert!(pid.is_err());
}

#[test]
fn test_read_pid_missing_file() {
    let result = read_pid(&PathBuf::from("/nonexistent/sheep.pid"));

    match result {
        Err(ExporterError::Config(msg)) => assert!(msg.contains("can't read pid file")),
        other => panic!("expected read failure, got {:?}", other),
    }
}
