//! File lock metrics regression tests

use super::helpers::*;
use runner_sync_filelock::FileLock;
use serial_test::serial;

#[test]
#[serial]
fn filelock_metrics_exist() {
    init_recorder();

    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder()
        .name("test_lock")
        .base_dir(dir.path())
        .build();

    let guard = lock.acquire("metrics.lock").unwrap();
    assert!(lock.try_acquire("metrics.lock").is_err());
    guard.release().unwrap();

    assert_counter_exists("filelock_acquisitions_total");
    assert_metric_has_label("filelock_acquisitions_total", "lock", "test_lock");
    assert_metric_has_label("filelock_acquisitions_total", "result", "acquired");
    assert_metric_has_label("filelock_acquisitions_total", "result", "unavailable");

    assert_counter_exists("filelock_releases_total");
    assert_metric_has_label("filelock_releases_total", "lock", "test_lock");
}
