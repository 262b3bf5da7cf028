/*!
 * Tests for the progress tracker
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use epubtrans::translation::progress::ProgressTracker;

#[test]
fn test_tracker_withCompletions_shouldCountAndComputePercent() {
    let tracker = ProgressTracker::new(4);
    assert_eq!(tracker.total(), 4);
    assert_eq!(tracker.completed(), 0);
    assert_eq!(tracker.percent(), 0);

    tracker.fragment_done();
    assert_eq!(tracker.completed(), 1);
    assert_eq!(tracker.percent(), 25);

    tracker.fragments_done(3);
    assert_eq!(tracker.completed(), 4);
    assert_eq!(tracker.percent(), 100);
}

#[test]
fn test_tracker_withUnchangedPercent_shouldNotRedraw() {
    // With 200 fragments, single completions move the percentage only every
    // other time: 0, 1, 1, 2 -> three distinct values
    let redraws = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&redraws);
    let tracker = ProgressTracker::with_redraw(200, move |_percent, _completed, _total| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tracker.fragment_done();
    tracker.fragment_done();
    tracker.fragment_done();
    tracker.fragment_done();

    assert_eq!(redraws.load(Ordering::SeqCst), 3);
}

#[test]
fn test_tracker_withZeroCount_shouldDoNothing() {
    let redraws = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&redraws);
    let tracker = ProgressTracker::with_redraw(10, move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tracker.fragments_done(0);
    assert_eq!(tracker.completed(), 0);
    assert_eq!(redraws.load(Ordering::SeqCst), 0);
}

#[test]
fn test_tracker_withZeroTotal_shouldReportFullCompletion() {
    let tracker = ProgressTracker::new(0);
    assert_eq!(tracker.percent(), 100);
}

#[test]
fn test_tracker_withOvershoot_shouldClampAtHundred() {
    let tracker = ProgressTracker::new(2);
    tracker.fragments_done(5);
    assert_eq!(tracker.percent(), 100);
}

#[test]
fn test_tracker_withConcurrentWorkers_shouldCountEveryCompletion() {
    let tracker = Arc::new(ProgressTracker::new(400));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    tracker.fragment_done();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tracker.completed(), 400);
    assert_eq!(tracker.percent(), 100);
}
