/*!
 * # epubtrans - Markup archive translator
 *
 * A Rust library for translating the textual content of structured markup
 * archives (EPUB-style document collections) while preserving the markup
 * itself.
 *
 * ## Features
 *
 * - Collects translatable text fragments from parsed markup documents
 * - Packs fragments into size-bounded, delimiter-joined batches
 * - Correlates batched responses back to fragments positionally, with a
 *   per-fragment fallback when the backend mangles the delimiter
 * - Post-corrects recurring terminology mistakes with an ordered rule set
 * - Translates many resources concurrently without mutating the archive
 *   until the whole job has finished
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `container`: Archive resource types and the container service interface
 * - `markup_processor`: Markup tree model, fragment collection and reinsertion
 * - `translation`: The batch translation pipeline:
 *   - `translation::core`: Translation service and backend seam
 *   - `translation::batching`: Size-bounded batch construction
 *   - `translation::dispatcher`: Request dispatch, correlation and fallback
 *   - `translation::corrector`: Terminology post-correction
 *   - `translation::formatting`: Boundary whitespace preservation
 *   - `translation::cache`: Pending results awaiting the final commit
 *   - `translation::progress`: Fragment-completion progress tracking
 * - `app_controller`: Job coordinator and per-resource workers
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for translation backends:
 *   - `providers::chat`: Conversational (chat completion) backend
 *   - `providers::translate_api`: Single-string translate endpoint backend
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod container;
pub mod errors;
pub mod language_utils;
pub mod markup_processor;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, CorrectionRule};
pub use app_controller::{Controller, JobSummary};
pub use container::{ContainerService, Resource};
pub use errors::{AppError, ProviderError, TranslationError};
pub use markup_processor::{Fragment, MarkupCodec, MarkupDocument, MarkupNode};
pub use translation::TranslationService;
