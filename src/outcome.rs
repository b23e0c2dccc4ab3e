//! Uniform result returned by every flow call.

// self
use crate::{_prelude::*, auth::TokenSecret, error::FlowError, http::ResponseEnvelope};

/// What produced an [`AuthOutcome`].
#[derive(Debug)]
pub enum OutcomeSource {
	/// The successful response from the backend.
	Response(ResponseEnvelope),
	/// The reason a call failed.
	Failure {
		/// Why the call failed.
		error: FlowError,
		/// Response received (server error, missing token) or synthesized (forced failure).
		response: Option<ResponseEnvelope>,
	},
	/// No request was sent (logout without an endpoint).
	Skipped,
}
impl OutcomeSource {
	/// Returns the response envelope, when there is one.
	pub fn response(&self) -> Option<&ResponseEnvelope> {
		match self {
			OutcomeSource::Response(response) => Some(response),
			OutcomeSource::Failure { response, .. } => response.as_ref(),
			OutcomeSource::Skipped => None,
		}
	}

	/// Returns the failure reason, when there is one.
	pub fn error(&self) -> Option<&FlowError> {
		match self {
			OutcomeSource::Failure { error, .. } => Some(error),
			_ => None,
		}
	}
}

/// Normalized result of a flow call, consumed by the UI to navigate and display feedback.
#[derive(Debug)]
pub struct AuthOutcome {
	success: bool,
	source: OutcomeSource,
	redirect: Option<String>,
	errors: Vec<String>,
	messages: Vec<String>,
	token: Option<TokenSecret>,
}
impl AuthOutcome {
	/// Builds a successful outcome.
	pub fn success(
		source: OutcomeSource,
		redirect: Option<String>,
		messages: Vec<String>,
		token: Option<TokenSecret>,
	) -> Self {
		Self { success: true, source, redirect, errors: Vec::new(), messages, token }
	}

	/// Builds a failed outcome.
	pub fn failure(source: OutcomeSource, redirect: Option<String>, errors: Vec<String>) -> Self {
		Self { success: false, source, redirect, errors, messages: Vec::new(), token: None }
	}

	/// Whether the flow succeeded.
	pub fn is_success(&self) -> bool {
		self.success
	}

	/// Whether the flow failed.
	pub fn is_failure(&self) -> bool {
		!self.success
	}

	/// Where the UI should navigate next, if anywhere.
	pub fn redirect(&self) -> Option<&str> {
		self.redirect.as_deref()
	}

	/// Error messages, in display order. Empty on success.
	pub fn errors(&self) -> &[String] {
		&self.errors
	}

	/// Success messages, in display order. Empty on failure.
	pub fn messages(&self) -> &[String] {
		&self.messages
	}

	/// Token issued by login or registration.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.token.as_ref()
	}

	/// Response or error that produced this outcome.
	pub fn source(&self) -> &OutcomeSource {
		&self.source
	}

	/// Consumes the outcome, yielding its source.
	pub fn into_source(self) -> OutcomeSource {
		self.source
	}
}
