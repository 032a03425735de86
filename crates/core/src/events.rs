//! Events emitted by a queue run.
//!
//! All observable effects of the engine are delivered through this type over
//! an `mpsc` channel, in production order. A run emits exactly one
//! [`Event::Finished`], always last.

/// One observable effect of a queue run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A diagnostic line from the child process, or an engine notice.
    Log(String),

    /// Completion estimate for the command currently executing.
    Progress {
        /// 1-based position of the command in the queue
        index: usize,
        /// Total number of commands in the queue
        total: usize,
        /// Completion percentage in `[0, 100]`
        percent: f64,
    },

    /// A non-fatal or run-aborting failure description.
    Failure(String),

    /// Terminal event: the run is over. `0` signals full success.
    Finished(i32),
}
