/*!
 * Tests for batch dispatch, correlation and fallback
 */

use epubtrans::app_config::CorrectionRule;
use epubtrans::markup_processor::Fragment;
use epubtrans::providers::mock::MockBackend;
use epubtrans::translation::batching::{Batch, BatchBuilder};
use epubtrans::translation::core::RequestKind;
use epubtrans::translation::corrector::TermCorrector;
use epubtrans::translation::dispatcher::BatchDispatcher;
use epubtrans::translation::progress::ProgressTracker;

const DELIMITER: &str = " ||| ";

fn fragments(texts: &[&str]) -> Vec<Fragment> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Fragment {
            leaf_index: index,
            text: text.to_string(),
        })
        .collect()
}

fn one_batch(texts: &[&str]) -> Batch {
    let mut batches = BatchBuilder::new(10_000, DELIMITER).build(fragments(texts));
    assert_eq!(batches.len(), 1, "test batch should not split");
    batches.remove(0)
}

#[tokio::test]
async fn test_dispatch_withMatchingSegmentCount_shouldAssignPositionally() {
    let backend =
        MockBackend::working(DELIMITER).with_lookup(&[("Hello", "Привет"), ("world", "мир")]);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(2);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["Hello", " world"]);
    let results = dispatcher.dispatch(&batch).await;

    assert_eq!(results, vec!["Привет".to_string(), " мир".to_string()]);
    assert_eq!(backend.call_count(), 1);
    assert_eq!(tracker.completed(), 2);
}

#[tokio::test]
async fn test_dispatch_withLostDelimiter_shouldFallBackToIndividualCalls() {
    let backend = MockBackend::delimiter_lost(DELIMITER)
        .with_lookup(&[("Hello", "Привет"), ("world", "мир")]);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(2);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["Hello", " world"]);
    let results = dispatcher.dispatch(&batch).await;

    assert_eq!(results, vec!["Привет".to_string(), " мир".to_string()]);

    // One failed batch call plus one call per fragment
    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, RequestKind::Batch);
    assert_eq!(calls[1].0, RequestKind::Single);
    assert_eq!(calls[2].0, RequestKind::Single);
    assert_eq!(tracker.completed(), 2);
}

#[tokio::test]
async fn test_dispatch_withFailingBackend_shouldKeepOriginalText() {
    let backend = MockBackend::failing(DELIMITER);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(2);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["Hello", " world"]);
    let results = dispatcher.dispatch(&batch).await;

    // Nothing translated, nothing dropped
    assert_eq!(results, vec!["Hello".to_string(), " world".to_string()]);
    assert_eq!(tracker.completed(), 2);
}

#[tokio::test]
async fn test_dispatch_withFailedBatchButWorkingSingles_shouldRecover() {
    let backend = MockBackend::fail_first(1, DELIMITER)
        .with_lookup(&[("Hello", "Привет"), ("world", "мир")]);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(2);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["Hello", " world"]);
    let results = dispatcher.dispatch(&batch).await;

    assert_eq!(results, vec!["Привет".to_string(), " мир".to_string()]);
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test]
async fn test_dispatch_withEmptyResponse_shouldKeepOriginalText() {
    let backend = MockBackend::empty(DELIMITER);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(2);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["Hello", " world"]);
    let results = dispatcher.dispatch(&batch).await;

    assert_eq!(results, vec!["Hello".to_string(), " world".to_string()]);
}

#[tokio::test]
async fn test_dispatch_shouldApplyCorrectionRulesToSegments() {
    let backend = MockBackend::working(DELIMITER).with_lookup(&[("John", "Джон")]);
    let corrector = TermCorrector::new(vec![CorrectionRule::new("Джон", "Іван")]);
    let tracker = ProgressTracker::new(1);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = one_batch(&["John"]);
    let results = dispatcher.dispatch(&batch).await;

    assert_eq!(results, vec!["Іван".to_string()]);
}

#[tokio::test]
async fn test_dispatch_withEmptyBatch_shouldReturnNothing() {
    let backend = MockBackend::working(DELIMITER);
    let corrector = TermCorrector::new(Vec::new());
    let tracker = ProgressTracker::new(0);
    let dispatcher = BatchDispatcher::new(&backend, &corrector, DELIMITER, &tracker);

    let batch = Batch {
        fragments: Vec::new(),
        text: String::new(),
    };
    assert!(dispatcher.dispatch(&batch).await.is_empty());
    assert_eq!(backend.call_count(), 0);
}
