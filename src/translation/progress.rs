/*!
 * Fragment-completion progress tracking.
 *
 * Workers from several resources report completions concurrently; the
 * tracker recomputes the integer percentage under a mutex and invokes the
 * redraw sink only when the displayed value actually changes, so concurrent
 * workers never interleave redundant redraws.
 */

use parking_lot::Mutex;

type RedrawFn = Box<dyn Fn(u64, usize, usize) + Send + Sync>;

struct ProgressState {
    total: usize,
    completed: usize,
    last_percent: Option<u64>,
}

/// Thread-safe fragment-completion counter with redraw-on-change semantics.
pub struct ProgressTracker {
    state: Mutex<ProgressState>,
    redraw: Option<RedrawFn>,
}

impl ProgressTracker {
    /// Create a tracker for the given fragment total, without a redraw sink
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                total,
                completed: 0,
                last_percent: None,
            }),
            redraw: None,
        }
    }

    /// Create a tracker that invokes `redraw(percent, completed, total)`
    /// whenever the integer percentage changes
    pub fn with_redraw(
        total: usize,
        redraw: impl Fn(u64, usize, usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                total,
                completed: 0,
                last_percent: None,
            }),
            redraw: Some(Box::new(redraw)),
        }
    }

    /// Total fragment count from the pre-scan
    pub fn total(&self) -> usize {
        self.state.lock().total
    }

    /// Fragments completed so far
    pub fn completed(&self) -> usize {
        self.state.lock().completed
    }

    /// Current integer percentage
    pub fn percent(&self) -> u64 {
        let state = self.state.lock();
        Self::percent_of(state.completed, state.total)
    }

    /// Record a single completed fragment
    pub fn fragment_done(&self) {
        self.fragments_done(1);
    }

    /// Record several completed fragments at once.
    ///
    /// The whole read-modify-redraw sequence runs under the lock so two
    /// workers can never both observe the same stale percentage.
    pub fn fragments_done(&self, count: usize) {
        if count == 0 {
            return;
        }

        let mut state = self.state.lock();
        state.completed += count;
        let percent = Self::percent_of(state.completed, state.total);
        if state.last_percent != Some(percent) {
            state.last_percent = Some(percent);
            if let Some(redraw) = &self.redraw {
                redraw(percent, state.completed, state.total);
            }
        }
    }

    fn percent_of(completed: usize, total: usize) -> u64 {
        if total == 0 {
            return 100;
        }
        (completed.min(total) * 100 / total) as u64
    }
}
