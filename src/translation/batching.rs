/*!
 * Size-bounded batch construction.
 *
 * Packs an ordered fragment list into batches whose delimiter-joined payload
 * stays inside a character budget, without reordering, duplicating or
 * dropping a fragment.
 */

use log::{debug, error};

use crate::markup_processor::Fragment;

/// A size-bounded group of fragments sent to the backend as one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Member fragments in document order
    pub fragments: Vec<Fragment>,

    /// Delimiter-joined request payload
    pub text: String,
}

impl Batch {
    /// Number of fragments in this batch
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the batch carries no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Greedy single-pass batch packer.
pub struct BatchBuilder {
    /// Character budget per batch payload (Unicode scalars, not bytes)
    char_budget: usize,

    /// Join delimiter, boundary padding included
    delimiter: String,
}

impl BatchBuilder {
    /// Create a builder for the given budget and delimiter
    pub fn new(char_budget: usize, delimiter: impl Into<String>) -> Self {
        Self {
            char_budget,
            delimiter: delimiter.into(),
        }
    }

    /// Pack fragments into batches.
    ///
    /// Batches partition the input: every fragment lands in exactly one batch
    /// and order is preserved. A fragment longer than the whole budget still
    /// gets a batch of its own rather than being dropped.
    pub fn build(&self, fragments: Vec<Fragment>) -> Vec<Batch> {
        if fragments.is_empty() {
            return Vec::new();
        }

        let total = fragments.len();
        let delimiter_chars = self.delimiter.chars().count();

        let mut batches = Vec::new();
        let mut members: Vec<Fragment> = Vec::new();
        let mut payload = String::new();
        let mut payload_chars = 0usize;

        for fragment in fragments {
            let fragment_chars = fragment.text.chars().count();

            if !members.is_empty()
                && payload_chars + fragment_chars + delimiter_chars > self.char_budget
            {
                batches.push(Batch {
                    fragments: std::mem::take(&mut members),
                    text: std::mem::take(&mut payload),
                });
                payload_chars = 0;
            }

            if !members.is_empty() {
                payload.push_str(&self.delimiter);
                payload_chars += delimiter_chars;
            }
            payload.push_str(&fragment.text);
            payload_chars += fragment_chars;
            members.push(fragment);
        }

        if !members.is_empty() {
            batches.push(Batch {
                fragments: members,
                text: payload,
            });
        }

        // Guard against accidental fragment loss, mirroring the count taken
        // before packing
        let packed: usize = batches.iter().map(|batch| batch.len()).sum();
        if packed != total {
            error!(
                "CRITICAL ERROR: Lost fragments during batching! Original: {}, After batching: {}",
                total, packed
            );
        } else {
            debug!("Packed {} fragments into {} batches", total, batches.len());
        }

        batches
    }
}
