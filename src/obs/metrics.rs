// std
use std::time::Duration;
// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counts flow calls started, labeled by `flow`.
pub fn record_flow_attempt(kind: FlowKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"owin_token_auth_flow_total",
			"flow" => kind.as_str(),
			"outcome" => FlowOutcome::Attempt.as_str(),
			"reason" => "none"
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}

/// Records a finished flow call.
///
/// The counter carries `reason` (e.g. `server`, `forced`) so failed logins caused by bad
/// credentials can be told apart from an unreachable backend; the histogram
/// `owin_token_auth_flow_duration_seconds` tracks how long the backend took.
pub fn record_flow_completion(
	kind: FlowKind,
	outcome: FlowOutcome,
	reason: Option<&'static str>,
	elapsed: Duration,
) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"owin_token_auth_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str(),
			"reason" => reason.unwrap_or("none")
		)
		.increment(1);
		metrics::histogram!(
			"owin_token_auth_flow_duration_seconds",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome, reason, elapsed);
	}
}
