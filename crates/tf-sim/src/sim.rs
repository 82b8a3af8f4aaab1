//! The `Sim` struct and its tick loop.

use tf_core::{SimOptions, Tick};
use tf_flow::{admit_tick, advance_full, WaitLedger, World};
use tf_net::Network;
use tf_plan::{DepartQueue, PlanSet};

use crate::observer::TrafficObserver;
use crate::scheduler::{resolve_intersections, Quiescence, ResolveStats};
use crate::SimResult;

// ── Per-tick and per-run reporting ────────────────────────────────────────────

/// What happened during one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Cars placed on their starting road this tick.
    pub admitted: u32,
    /// Cars whose admission was pushed to the next tick.
    pub deferred: u32,
    /// Cars that reached their destination this tick.
    pub retired: u32,
    /// Intersection crossings this tick.
    pub crossed: u32,
}

/// The result of a completed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// The scheduling score: the tick of the last retirement (or, for a
    /// deadlocked run, the tick at which the scheduler stalled).
    pub ticks: u64,
    pub admitted: u64,
    pub retired: u64,
    /// `true` when the run ended in gridlock with `deadlock_fatal` off.
    pub deadlocked: bool,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

enum TickOutcome {
    Continue,
    Done,
    Deadlocked,
}

/// The main simulation runner.
///
/// Holds all live state and drives the per-tick sequence: phase A, the
/// intersection scheduler, then admission.  Create via
/// [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim {
    pub net: Network,
    pub plans: PlanSet,
    pub options: SimOptions,

    /// Lanes and cars.
    pub world: World,
    /// Cars not yet admitted.
    pub queue: DepartQueue,
    /// Per-tick Waiting disposition; empty between ticks.
    pub ledger: WaitLedger,
    /// The tick about to be (or being) processed.
    pub now: Tick,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every car has retired (or the scheduler deadlocks).
    pub fn run<O: TrafficObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        loop {
            match self.process_tick(observer)? {
                TickOutcome::Continue => {}
                TickOutcome::Done => return Ok(self.finish(false, observer)),
                TickOutcome::Deadlocked => return Ok(self.finish(true, observer)),
            }
        }
    }

    /// Run at most `n` ticks from the current position.
    ///
    /// Returns `Some(outcome)` if the run finished within those ticks.
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: TrafficObserver>(
        &mut self,
        n: u64,
        observer: &mut O,
    ) -> SimResult<Option<RunOutcome>> {
        for _ in 0..n {
            match self.process_tick(observer)? {
                TickOutcome::Continue => {}
                TickOutcome::Done => return Ok(Some(self.finish(false, observer))),
                TickOutcome::Deadlocked => return Ok(Some(self.finish(true, observer))),
            }
        }
        Ok(None)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: TrafficObserver>(&mut self, observer: &mut O) -> SimResult<TickOutcome> {
        let now = self.now;
        observer.on_tick_start(now);
        let retired_before = self.world.retired.len();

        // ── Phase A: advance every lane ───────────────────────────────────
        advance_full(&mut self.world, &self.plans, &mut self.ledger, now);

        // World and queue both empty: every car has retired.
        if self.world.is_empty() && self.queue.is_empty() {
            observer.on_tick_end(
                now,
                &TickStats {
                    retired: (self.world.retired.len() - retired_before) as u32,
                    ..TickStats::default()
                },
            );
            return Ok(TickOutcome::Done);
        }

        // ── Intersection scheduling until quiescent ───────────────────────
        let (quiescence, resolved) = if self.ledger.is_empty() {
            (Quiescence::Clear, ResolveStats::default())
        } else {
            resolve_intersections(
                &mut self.world,
                &self.net,
                &self.plans,
                &mut self.ledger,
                now,
                &self.options,
            )?
        };
        if quiescence == Quiescence::Deadlocked {
            return Ok(TickOutcome::Deadlocked);
        }
        debug_assert!(self.ledger.is_empty(), "waiting cars left after scheduling");

        // ── Admission for this tick ───────────────────────────────────────
        let admit = admit_tick(&mut self.world, &self.net, &mut self.plans, &mut self.queue, now);

        observer.on_tick_end(
            now,
            &TickStats {
                admitted: admit.admitted,
                deferred: admit.deferred,
                retired: (self.world.retired.len() - retired_before) as u32,
                crossed: resolved.crossed,
            },
        );

        #[cfg(debug_assertions)]
        if let Err(msg) = self.world.check_invariants(&self.net, &self.plans) {
            panic!("invariant violated after {now}: {msg}");
        }

        self.now = now + 1;
        Ok(TickOutcome::Continue)
    }

    fn finish<O: TrafficObserver>(&mut self, deadlocked: bool, observer: &mut O) -> RunOutcome {
        let outcome = RunOutcome {
            ticks: if deadlocked {
                self.now.0
            } else {
                self.world.retired.last().map_or(0, |&(_, t)| t.0)
            },
            admitted: self.world.admitted,
            retired: self.world.retired.len() as u64,
            deadlocked,
        };
        observer.on_sim_end(&outcome);
        outcome
    }
}
