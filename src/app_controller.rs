use anyhow::Result;
use futures::future;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::app_config::Config;
use crate::container::{ContainerService, Resource};
use crate::errors::AppError;
use crate::language_utils;
use crate::markup_processor::MarkupCodec;
use crate::translation::batching::BatchBuilder;
use crate::translation::cache::PendingCache;
use crate::translation::core::{TextTranslator, TranslationService};
use crate::translation::corrector::TermCorrector;
use crate::translation::dispatcher::BatchDispatcher;
use crate::translation::progress::ProgressTracker;

// @module: Job coordinator and per-resource document workers

/// Outcome report for one completed translation job
#[derive(Debug, Clone)]
pub struct JobSummary {
    /// Resources in the archive
    pub resources_total: usize,

    /// Markup resources translated and committed
    pub resources_translated: usize,

    /// Markup resources that failed and kept their original bytes
    pub resources_failed: usize,

    /// Non-markup resources passed through untouched
    pub resources_skipped: usize,

    /// Translatable fragments counted by the pre-scan
    pub fragments_total: usize,

    /// Wall-clock duration of the job
    pub elapsed: Duration,
}

impl JobSummary {
    /// Generate a one-line completion report
    pub fn summary(&self) -> String {
        format!(
            "Job finished in {:.1}s: {} of {} resources translated ({} failed, {} skipped), {} fragments",
            self.elapsed.as_secs_f64(),
            self.resources_translated,
            self.resources_total,
            self.resources_failed,
            self.resources_skipped,
            self.fragments_total
        )
    }
}

/// Main application controller for archive translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run a translation job against the configured backend.
    ///
    /// Opens the resource list, translates every markup resource, and asks the
    /// container to persist the result. Nothing in the container changes if
    /// the job misses its deadline.
    pub async fn run_job(
        &self,
        container: &mut dyn ContainerService,
        codec: Arc<dyn MarkupCodec>,
    ) -> Result<JobSummary, AppError> {
        let service = TranslationService::new(
            self.config.translation.clone(),
            &self.config.source_language,
            &self.config.target_language,
        )
        .map_err(AppError::from)?;

        self.run_job_with_backend(container, codec, Arc::new(service))
            .await
    }

    /// Run a translation job against an explicit backend instance.
    pub async fn run_job_with_backend(
        &self,
        container: &mut dyn ContainerService,
        codec: Arc<dyn MarkupCodec>,
        backend: Arc<dyn TextTranslator>,
    ) -> Result<JobSummary, AppError> {
        let start_time = Instant::now();

        if language_utils::language_codes_match(
            &self.config.source_language,
            &self.config.target_language,
        ) {
            warn!(
                "Source and target language are the same ({})",
                self.config.source_language
            );
        }

        let mut resources = container.list_resources();
        let translatable: Vec<usize> = resources
            .iter()
            .enumerate()
            .filter(|(_, resource)| resource.is_markup())
            .map(|(index, _)| index)
            .collect();
        let resources_skipped = resources.len() - translatable.len();

        info!(
            "Translating {} of {} resources ({} -> {})",
            translatable.len(),
            resources.len(),
            self.config.source_language,
            self.config.target_language
        );

        // Dry pre-scan: the fragment total drives the progress indicator.
        // Resources that fail to parse here are counted as zero; the worker
        // owns reporting the actual failure.
        let mut fragments_total = 0usize;
        for &index in &translatable {
            let resource = &resources[index];
            match codec.parse(&resource.data, resource.encoding()) {
                Ok(document) => fragments_total += document.collect_fragments().len(),
                Err(e) => debug!("Pre-scan could not parse {}: {}", resource.id, e),
            }
        }

        let progress_bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {percent}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let tracker = Arc::new(ProgressTracker::with_redraw(
            fragments_total,
            move |percent, _completed, _total| {
                pb.set_position(percent);
            },
        ));

        let cache = Arc::new(PendingCache::new());
        let corrector = Arc::new(TermCorrector::new(self.config.corrections.clone()));
        let semaphore = Arc::new(Semaphore::new(self.config.job.concurrent_resources));
        let delimiter = self.config.translation.common.delimiter.clone();
        let char_budget = self.config.translation.get_batch_char_budget();

        let total_markup = translatable.len();
        let mut handles = Vec::with_capacity(total_markup);

        for (ordinal, &index) in translatable.iter().enumerate() {
            let resource = resources[index].clone();
            let codec = Arc::clone(&codec);
            let backend = Arc::clone(&backend);
            let corrector = Arc::clone(&corrector);
            let cache = Arc::clone(&cache);
            let tracker = Arc::clone(&tracker);
            let semaphore = Arc::clone(&semaphore);
            let delimiter = delimiter.clone();

            handles.push(tokio::spawn(async move {
                // One pool slot per resource for its full lifetime
                let _permit = semaphore.acquire().await.unwrap();

                info!(
                    "--- Translating resource [{}/{}]: {} ---",
                    ordinal + 1,
                    total_markup,
                    resource.id
                );

                match translate_resource(
                    &resource,
                    codec.as_ref(),
                    backend.as_ref(),
                    corrector.as_ref(),
                    &delimiter,
                    char_budget,
                    tracker.as_ref(),
                )
                .await
                {
                    Ok(bytes) => {
                        cache.insert(&resource.id, bytes);
                        true
                    }
                    Err(e) => {
                        // Failure stays inside this worker; the archive keeps
                        // the resource's original bytes
                        error!("Resource {} failed: {}", resource.id, e);
                        false
                    }
                }
            }));
        }

        let deadline = Duration::from_secs(self.config.job.deadline_secs);
        let joined = tokio::time::timeout(deadline, future::join_all(handles)).await;
        progress_bar.finish_and_clear();

        let results = match joined {
            Ok(results) => results,
            Err(_) => {
                // In-flight backend calls are left to run out on their own;
                // their results are simply never committed
                cache.discard();
                error!(
                    "Job deadline of {}s exceeded, discarding all cached work",
                    self.config.job.deadline_secs
                );
                return Err(AppError::DeadlineExceeded(self.config.job.deadline_secs));
            }
        };

        let mut resources_translated = 0usize;
        let mut resources_failed = 0usize;
        for result in results {
            match result {
                Ok(true) => resources_translated += 1,
                Ok(false) => resources_failed += 1,
                Err(e) => {
                    error!("Worker task aborted: {}", e);
                    resources_failed += 1;
                }
            }
        }

        // Commit point: the live resource list changes only now, after every
        // worker has finished inside the deadline
        let mut finished = cache.drain();
        for resource in resources.iter_mut() {
            if let Some(bytes) = finished.remove(&resource.id) {
                resource.data = bytes;
            }
        }

        container.save(&resources)?;

        let summary = JobSummary {
            resources_total: resources.len(),
            resources_translated,
            resources_failed,
            resources_skipped,
            fragments_total,
            elapsed: start_time.elapsed(),
        };
        info!("{}", summary.summary());

        Ok(summary)
    }
}

/// Translate one resource from bytes to bytes.
///
/// Runs the full per-resource pipeline: parse, collect, batch, dispatch,
/// reinsert, serialize. Never touches shared state; the caller parks the
/// returned bytes in the pending cache.
async fn translate_resource(
    resource: &Resource,
    codec: &dyn MarkupCodec,
    backend: &dyn TextTranslator,
    corrector: &TermCorrector,
    delimiter: &str,
    char_budget: usize,
    tracker: &ProgressTracker,
) -> Result<Vec<u8>, AppError> {
    let mut document = codec.parse(&resource.data, resource.encoding())?;

    let fragments = document.collect_fragments();
    if fragments.is_empty() {
        debug!("Resource {} has no translatable text", resource.id);
        return Ok(resource.data.clone());
    }

    let builder = BatchBuilder::new(char_budget, delimiter);
    let batches = builder.build(fragments);
    debug!(
        "Resource {}: {} fragments in {} batches",
        resource.id,
        batches.iter().map(|b| b.len()).sum::<usize>(),
        batches.len()
    );

    let dispatcher = BatchDispatcher::new(backend, corrector, delimiter, tracker);
    let mut replacements: HashMap<usize, String> = HashMap::new();

    for (batch_index, batch) in batches.iter().enumerate() {
        let preview: String = batch.text.chars().take(100).collect();
        debug!(
            "[{}] Sending batch #{} ({} chars): {}...",
            resource.id,
            batch_index + 1,
            batch.text.chars().count(),
            preview.replace('\n', " ")
        );

        let translated = dispatcher.dispatch(batch).await;
        for (fragment, text) in batch.fragments.iter().zip(translated) {
            replacements.insert(fragment.leaf_index, text);
        }
    }

    document.replace_text_leaves(&replacements);

    codec.serialize(&document).map_err(AppError::from)
}
