//! In-process counters for flow calls, kept per flow.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::{FlowKind, FlowOutcome};

/// Point-in-time copy of one flow's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowCounts {
	/// Calls started.
	pub attempts: u64,
	/// Calls that produced a successful outcome.
	pub successes: u64,
	/// Calls that produced a failed outcome.
	pub failures: u64,
}
impl FlowCounts {
	/// Calls that have started but not finished yet.
	pub fn in_flight(&self) -> u64 {
		self.attempts.saturating_sub(self.successes + self.failures)
	}
}

#[derive(Debug, Default)]
struct Counters {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
}

/// Per-flow counters shared by every call of a provider.
#[derive(Debug, Default)]
pub struct FlowMetrics {
	flows: [Counters; FlowKind::ALL.len()],
}
impl FlowMetrics {
	/// Returns the counters of one flow.
	pub fn flow(&self, kind: FlowKind) -> FlowCounts {
		let counters = self.counters(kind);

		FlowCounts {
			attempts: counters.attempts.load(Ordering::Relaxed),
			successes: counters.successes.load(Ordering::Relaxed),
			failures: counters.failures.load(Ordering::Relaxed),
		}
	}

	/// Sums the counters of every flow.
	pub fn total(&self) -> FlowCounts {
		FlowKind::ALL.into_iter().map(|kind| self.flow(kind)).fold(
			FlowCounts::default(),
			|acc, counts| FlowCounts {
				attempts: acc.attempts + counts.attempts,
				successes: acc.successes + counts.successes,
				failures: acc.failures + counts.failures,
			},
		)
	}

	pub(crate) fn record(&self, kind: FlowKind, outcome: FlowOutcome) {
		let counters = self.counters(kind);
		let counter = match outcome {
			FlowOutcome::Attempt => &counters.attempts,
			FlowOutcome::Success => &counters.successes,
			FlowOutcome::Failure => &counters.failures,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}

	fn counters(&self, kind: FlowKind) -> &Counters {
		&self.flows[kind.index()]
	}
}
