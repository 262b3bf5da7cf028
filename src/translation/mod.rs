/*!
 * The batch translation pipeline.
 *
 * This module contains the machinery that turns an ordered list of text
 * fragments into a small number of size-bounded backend requests and safely
 * reconstitutes per-fragment translations from the combined responses. It is
 * split into several submodules:
 *
 * - `core`: Translation service, retry policy and the backend seam
 * - `batching`: Size-bounded batch construction
 * - `dispatcher`: Request dispatch, response correlation and fallback
 * - `corrector`: Terminology post-correction
 * - `formatting`: Boundary whitespace preservation
 * - `cache`: Pending per-resource results awaiting the final commit
 * - `progress`: Fragment-completion progress tracking
 */

// Re-export main types for easier usage
pub use self::batching::{Batch, BatchBuilder};
pub use self::cache::PendingCache;
pub use self::core::{RequestKind, TextTranslator, TranslationService};
pub use self::corrector::TermCorrector;
pub use self::dispatcher::BatchDispatcher;
pub use self::progress::ProgressTracker;

// Submodules
pub mod batching;
pub mod cache;
pub mod core;
pub mod corrector;
pub mod dispatcher;
pub mod formatting;
pub mod progress;
