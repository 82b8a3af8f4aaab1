//! Observer trait for progress reporting and data collection.

use tf_core::Tick;

use crate::sim::{RunOutcome, TickStats};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl TrafficObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: +{} cars, -{} cars", stats.admitted, stats.retired);
///         }
///     }
/// }
/// ```
pub trait TrafficObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each completed tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called once when the run finishes (all cars retired, or the
    /// scheduler deadlocked with `deadlock_fatal` off).
    fn on_sim_end(&mut self, _outcome: &RunOutcome) {}
}

/// A [`TrafficObserver`] that does nothing.  Use when you need to call `run`
/// but don't want progress callbacks.
pub struct NoopObserver;

impl TrafficObserver for NoopObserver {}
