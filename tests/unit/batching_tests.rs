/*!
 * Tests for the size-bounded batch builder
 */

use epubtrans::markup_processor::Fragment;
use epubtrans::translation::batching::BatchBuilder;

/// Build a fragment list with consecutive leaf ordinals
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

#[test]
fn test_build_withEmptyInput_shouldReturnNoBatches() {
    let builder = BatchBuilder::new(100, " | ");
    assert!(builder.build(Vec::new()).is_empty());
}

#[test]
fn test_build_withGenerousBudget_shouldPackEverythingIntoOneBatch() {
    let builder = BatchBuilder::new(1000, " | ");
    let batches = builder.build(fragments(&["one", "two", "three"]));

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert_eq!(batches[0].text, "one | two | three");
}

#[test]
fn test_build_withTightBudget_shouldSplitAtTheBoundary() {
    // "abcd|efgh" is 9 chars, adding "|ijkl" would make 14 > 10
    let builder = BatchBuilder::new(10, "|");
    let batches = builder.build(fragments(&["abcd", "efgh", "ijkl"]));

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].text, "abcd|efgh");
    assert_eq!(batches[1].text, "ijkl");
}

#[test]
fn test_build_withExactFit_shouldKeepFragmentInBatch() {
    // 4 + 1 + 5 == 10 is not over the budget of 10
    let builder = BatchBuilder::new(10, "|");
    let batches = builder.build(fragments(&["abcd", "efghi"]));

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].text, "abcd|efghi");
}

#[test]
fn test_build_withOversizedFragment_shouldGiveItItsOwnBatch() {
    let builder = BatchBuilder::new(5, "|");
    let batches = builder.build(fragments(&["ab", "this one is far too long", "cd"]));

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].text, "ab");
    assert_eq!(batches[1].text, "this one is far too long");
    assert_eq!(batches[2].text, "cd");
}

#[test]
fn test_build_withAnyBudget_shouldPartitionWithoutLossOrReorder() {
    let texts = [
        "Hello", " world", "a longer fragment of text", "x", "another one", " tail",
    ];

    for budget in [6, 10, 20, 50, 1000] {
        let builder = BatchBuilder::new(budget, " | ");
        let batches = builder.build(fragments(&texts));

        let flattened: Vec<String> = batches
            .iter()
            .flat_map(|batch| batch.fragments.iter().map(|f| f.text.clone()))
            .collect();
        assert_eq!(
            flattened,
            texts.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            "budget {} lost or reordered fragments",
            budget
        );

        let indices: Vec<usize> = batches
            .iter()
            .flat_map(|batch| batch.fragments.iter().map(|f| f.leaf_index))
            .collect();
        assert_eq!(indices, (0..texts.len()).collect::<Vec<_>>());
    }
}

#[test]
fn test_build_withMultibyteText_shouldCountCharactersNotBytes() {
    // "привет" is 6 chars but 12 bytes; a byte-counting budget of 13 would
    // already overflow on the first fragment pair
    let builder = BatchBuilder::new(13, " | ");
    let batches = builder.build(fragments(&["привет", "мир"]));

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].text, "привет | мир");
}
