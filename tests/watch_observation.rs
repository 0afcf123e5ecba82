//! Attaches a real filesystem watcher to the container and checks that the
//! simulated writes surface as change events for both keys, first key first.
//!
//! Runs on the real clock against the platform's notify backend (inotify,
//! FSEvents or ReadDirectoryChangesW), so event delivery latency depends on
//! the host. Events are collected for up to five seconds after the run.

use change_simulator::{ChangeSimulator, FileSystemSink, Settings, SimulationConfig};
use notify::{EventKind, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::fs;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[tokio::test]
async fn watcher_sees_changes_for_both_keys_in_order() {
    let temp = TempDir::new().unwrap();
    let container = temp.path().join("my-container");
    fs::create_dir(&container).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })
    .unwrap();
    watcher
        .watch(&container, RecursiveMode::NonRecursive)
        .unwrap();

    let settings = Settings::with_overrides([
        ("simulation.base_dir", temp.path().display().to_string()),
        ("simulation.warmup_ms", "200".to_string()),
        ("simulation.inter_write_ms", "50".to_string()),
    ])
    .unwrap();
    let config = SimulationConfig::from_settings(&settings.simulation, |_| None).unwrap();
    let mut simulator = ChangeSimulator::new(config, FileSystemSink::new());
    simulator.run().await.unwrap();

    let mut touched: Vec<OsString> = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(event) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    touched.extend(
                        event
                            .paths
                            .iter()
                            .filter_map(|p| p.file_name())
                            .map(|n| n.to_os_string()),
                    );
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) if touched.len() >= 2 => break,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    let first = touched.iter().position(|n| n == "my-key");
    let second = touched.iter().position(|n| n == "my-key2");
    assert!(first.is_some(), "no event for my-key: {touched:?}");
    assert!(second.is_some(), "no event for my-key2: {touched:?}");
    assert!(first < second, "my-key2 changed before my-key: {touched:?}");
}
