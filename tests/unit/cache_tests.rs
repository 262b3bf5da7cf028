/*!
 * Tests for the pending result cache
 */

use std::sync::Arc;

use epubtrans::translation::cache::PendingCache;

#[test]
fn test_cache_withInsert_shouldReportContents() {
    let cache = PendingCache::new();
    assert!(cache.is_empty());

    cache.insert("ch1.xhtml", b"<p>done</p>".to_vec());
    assert!(cache.contains("ch1.xhtml"));
    assert!(!cache.contains("ch2.xhtml"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_drain_shouldReturnEverythingAndEmptyTheCache() {
    let cache = PendingCache::new();
    cache.insert("a", vec![1]);
    cache.insert("b", vec![2]);

    let drained = cache.drain();
    assert_eq!(drained.len(), 2);
    assert_eq!(drained.get("a"), Some(&vec![1]));
    assert_eq!(drained.get("b"), Some(&vec![2]));
    assert!(cache.is_empty());
}

#[test]
fn test_discard_shouldDropEverything() {
    let cache = PendingCache::new();
    cache.insert("a", vec![1]);
    cache.insert("b", vec![2]);

    cache.discard();
    assert!(cache.is_empty());
    assert!(cache.drain().is_empty());
}

#[test]
fn test_cache_withConcurrentDistinctKeys_shouldKeepEveryEntry() {
    let cache = Arc::new(PendingCache::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for item in 0..50 {
                    cache.insert(&format!("res-{}-{}", worker, item), vec![worker as u8]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 400);
}
