/*!
 * Batch dispatch, response correlation and fallback.
 *
 * The common path sends one joined payload and maps the returned delimiter
 * segments back onto the batch positionally. When the backend drops, merges
 * or duplicates the delimiter, positional assignment is abandoned and every
 * fragment is re-sent on its own; a fragment whose individual request also
 * fails keeps its original text so the document stays complete.
 */

use log::{debug, warn};

use super::batching::Batch;
use super::core::{RequestKind, TextTranslator};
use super::corrector::TermCorrector;
use super::formatting::FormatPreserver;
use super::progress::ProgressTracker;
use crate::markup_processor::Fragment;

/// Dispatches batches against a backend and yields per-fragment text.
pub struct BatchDispatcher<'a> {
    /// Backend to dispatch against
    backend: &'a dyn TextTranslator,

    /// Terminology rules applied to every translated segment
    corrector: &'a TermCorrector,

    /// Join delimiter, padding included
    delimiter: &'a str,

    /// Job-wide fragment completion counter
    progress: &'a ProgressTracker,
}

impl<'a> BatchDispatcher<'a> {
    /// Create a dispatcher over the given backend
    pub fn new(
        backend: &'a dyn TextTranslator,
        corrector: &'a TermCorrector,
        delimiter: &'a str,
        progress: &'a ProgressTracker,
    ) -> Self {
        Self {
            backend,
            corrector,
            delimiter,
            progress,
        }
    }

    /// Delimiter token as it must survive the backend round trip
    fn delimiter_token(&self) -> &str {
        self.delimiter.trim()
    }

    /// Translate one batch, returning exactly one string per fragment in
    /// batch order.
    ///
    /// This never fails: fragments that cannot be translated keep their
    /// original text.
    pub async fn dispatch(&self, batch: &Batch) -> Vec<String> {
        if batch.is_empty() {
            return Vec::new();
        }

        match self.backend.translate(&batch.text, RequestKind::Batch).await {
            Ok(response) => {
                // Literal split on the token; the delimiter is data here,
                // never a pattern
                let segments: Vec<&str> = response.split(self.delimiter_token()).collect();

                if segments.len() == batch.len() {
                    debug!(
                        "Correlated {} segments positionally onto the batch",
                        segments.len()
                    );
                    let finished = segments
                        .iter()
                        .zip(&batch.fragments)
                        .map(|(segment, fragment)| self.finish(fragment, segment))
                        .collect();
                    self.progress.fragments_done(batch.len());
                    finished
                } else {
                    warn!(
                        "Segment count mismatch: sent {} fragments, got {} segments; \
                         retrying every fragment individually",
                        batch.len(),
                        segments.len()
                    );
                    self.dispatch_individually(&batch.fragments).await
                }
            }
            Err(e) => {
                warn!(
                    "Batch request failed: {}; retrying every fragment individually",
                    e
                );
                self.dispatch_individually(&batch.fragments).await
            }
        }
    }

    /// Fallback path: one backend call per fragment, in document order.
    async fn dispatch_individually(&self, fragments: &[Fragment]) -> Vec<String> {
        let mut results = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            let text = match self
                .backend
                .translate(&fragment.text, RequestKind::Single)
                .await
            {
                Ok(translated) => self.finish(fragment, &translated),
                Err(e) => {
                    warn!(
                        "Fragment translation failed permanently, keeping original text: {}",
                        e
                    );
                    fragment.text.clone()
                }
            };
            results.push(text);
            self.progress.fragment_done();
        }

        results
    }

    /// Trim, correct and restore boundary whitespace for one fragment.
    ///
    /// A segment that comes back blank keeps the original text; the document
    /// must never lose content.
    fn finish(&self, fragment: &Fragment, raw_segment: &str) -> String {
        let corrected = self.corrector.apply(raw_segment.trim());

        if corrected.trim().is_empty() {
            return fragment.text.clone();
        }

        FormatPreserver::restore_leading_space(&fragment.text, &corrected)
    }
}
