use radiance_session::core::progress::*;

use std::sync::Arc;
use std::thread;

#[test]
fn progress_sample_is_monotonic_across_threads() {
    let progress = Arc::new(Progress::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let progress = progress.clone();
            thread::spawn(move || {
                for i in 0..100u32 {
                    // interleaved, out-of-order writers
                    let s = if t % 2 == 0 { i } else { 99 - i };
                    progress.set_sample(s);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(progress.get_sample(), 99);
    progress.set_sample(3);
    assert_eq!(progress.get_sample(), 99);
}

#[test]
fn progress_first_cancel_wins() {
    let progress = Arc::new(Progress::new());
    progress.set_cancel("first");
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let progress = progress.clone();
            thread::spawn(move || progress.set_cancel(&format!("late {}", i)))
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert!(progress.get_cancel());
    assert_eq!(progress.get_cancel_message(), "first");

    progress.set_error("boom");
    assert!(progress.get_error());
    assert_eq!(progress.get_error_message(), "boom");
    assert_eq!(progress.get_cancel_message(), "first");
}

#[test]
fn progress_reset_keeps_callback() {
    let progress = Progress::new();
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    {
        let calls = calls.clone();
        progress.set_update_callback(move || {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
    }
    progress.set_sample(5);
    progress.set_cancel("x");
    progress.set_status("Rendering", "tile 1");
    progress.reset();
    assert_eq!(progress.get_sample(), 0);
    assert!(!progress.get_cancel());
    assert_eq!(progress.get_status(), (String::new(), String::new()));

    progress.set_update();
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    progress.clear_update_callback();
    progress.set_update();
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}
