//! Lifecycle test for the global exactly-once entry point.
//!
//! The global latch and watch session are per-process state, so the whole
//! lifecycle runs in a single test: concurrent init, hot reload against the
//! real process environment, and idempotent shutdown.

use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use serial_test::serial;

use envreload::{ReloadCallbacks, Settings};

fn wait_for(timeout: Duration, predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    predicate()
}

#[test]
#[serial]
fn global_init_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "ENVRELOAD_INIT_TEST_A=1\n").unwrap();

    let settings = Settings::new()
        .file_path(&path)
        .hot_reload(true)
        .reload_delay(Duration::from_millis(100));

    // Concurrent callers must all observe the first outcome.
    let racers: Vec<_> = (0..4)
        .map(|_| {
            let settings = settings.clone();
            thread::spawn(move || envreload::init(settings, ReloadCallbacks::new()))
        })
        .collect();

    let first = envreload::init(settings, ReloadCallbacks::new());
    assert!(first.is_ok());
    for racer in racers {
        assert!(racer.join().unwrap().is_ok());
    }

    // The first load wrote into the real process environment.
    assert_eq!(
        std::env::var("ENVRELOAD_INIT_TEST_A").as_deref(),
        Ok("1")
    );

    fs::write(&path, "ENVRELOAD_INIT_TEST_A=2\nENVRELOAD_INIT_TEST_B=3\n").unwrap();
    assert!(
        wait_for(Duration::from_secs(5), || {
            std::env::var("ENVRELOAD_INIT_TEST_A").as_deref() == Ok("2")
        }),
        "hot reload did not update the process environment"
    );
    assert_eq!(
        std::env::var("ENVRELOAD_INIT_TEST_B").as_deref(),
        Ok("3")
    );

    // Re-running init is a no-op replaying the first outcome.
    assert!(
        envreload::init(Settings::new().file_path("does-not-exist"), ReloadCallbacks::new())
            .is_ok()
    );

    // Shutdown is idempotent.
    envreload::shutdown();
    envreload::shutdown();

    // After shutdown no further reloads fire.
    fs::write(&path, "ENVRELOAD_INIT_TEST_A=4\n").unwrap();
    thread::sleep(Duration::from_millis(400));
    assert_eq!(
        std::env::var("ENVRELOAD_INIT_TEST_A").as_deref(),
        Ok("2")
    );
}
