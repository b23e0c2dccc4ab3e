//! Optional observability helpers for auth flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `owin_token_auth.flow` with
//!   the `flow` and `stage` fields, plus warnings when a token cannot be extracted.
//! - Enable `metrics` to increment the `owin_token_auth_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow`, `outcome`, and the failure `reason`, and to
//!   record call latency in `owin_token_auth_flow_duration_seconds`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Auth flows exposed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowKind {
	/// Password-grant login.
	Login,
	/// Account registration.
	Register,
	/// Request a password reset email.
	RequestPassword,
	/// Complete a password reset with the emailed token.
	ResetPassword,
	/// Sign out.
	Logout,
}
impl FlowKind {
	/// Every flow, in declaration order.
	pub const ALL: [FlowKind; 5] = [
		FlowKind::Login,
		FlowKind::Register,
		FlowKind::RequestPassword,
		FlowKind::ResetPassword,
		FlowKind::Logout,
	];

	/// Position of the flow in [`FlowKind::ALL`].
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Register => "register",
			FlowKind::RequestPassword => "request_password",
			FlowKind::ResetPassword => "reset_password",
			FlowKind::Logout => "logout",
		}
	}

	/// Returns the section name used for this flow in the configuration tree.
	pub const fn config_key(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Register => "register",
			FlowKind::RequestPassword => "requestPass",
			FlowKind::ResetPassword => "resetPass",
			FlowKind::Logout => "logout",
		}
	}

	/// Login and registration are the only flows that must yield a token.
	pub const fn issues_token(self) -> bool {
		matches!(self, FlowKind::Login | FlowKind::Register)
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
