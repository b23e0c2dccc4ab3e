//! Crate-level error types shared by the configuration resolver, transports, and flows.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Only configuration loading returns it; flow calls fold their failures into an
/// [`AuthOutcome`](crate::outcome::AuthOutcome) instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Overrides must be a JSON object so they can be merged key by key.
	#[error("Configuration overrides must be a JSON object, found {found}.")]
	InvalidOverrides {
		/// JSON type name of the rejected value.
		found: &'static str,
	},
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	ReadFile {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration text is not valid JSON.
	#[error("Configuration is not valid JSON.")]
	Parse(#[source] serde_json::Error),
	/// A flow section does not match the expected shape.
	#[error("Settings for `{flow}` are invalid.")]
	InvalidFlowSettings {
		/// Flow key (e.g. `login`).
		flow: &'static str,
		/// Structured decoding failure pointing at the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The configured HTTP method is not a valid token.
	#[error("Flow `{flow}` is configured with an invalid HTTP method `{method}`.")]
	InvalidMethod {
		/// Flow key (e.g. `login`).
		flow: &'static str,
		/// Offending method string.
		method: String,
	},
	/// The resolved endpoint is not a valid request URI.
	#[error("Flow `{flow}` resolved to an invalid endpoint URI `{url}`.")]
	InvalidEndpoint {
		/// Flow key (e.g. `login`).
		flow: &'static str,
		/// Resolved `baseEndpoint + endpoint` value.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: oauth2::http::uri::InvalidUri,
	},
	/// A flow that must contact the backend has no endpoint.
	#[error("Flow `{flow}` has no endpoint configured.")]
	MissingEndpoint {
		/// Flow key (e.g. `login`).
		flow: &'static str,
	},
	/// Request payload has to be an object for fields to be injected.
	#[error("Flow `{flow}` expects an object payload, found {found}.")]
	PayloadNotObject {
		/// Flow key (e.g. `login`).
		flow: &'static str,
		/// JSON type name of the rejected payload.
		found: &'static str,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be encoded.")]
	Encode(#[source] serde_json::Error),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the auth endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the auth endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Reasons a flow call ends in failure.
///
/// Callers only ever see these inside a failed [`AuthOutcome`](crate::outcome::AuthOutcome);
/// the variant decides whether the errors extractor runs or the generic message is used.
#[derive(Debug, ThisError)]
pub enum FlowError {
	/// Configuration demanded a failure (`{flow}.alwaysFail`).
	#[error("Flow is configured to always fail.")]
	Forced,
	/// The request never produced a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The backend answered with a non-success status.
	#[error("Auth endpoint responded with status {status}.")]
	Server {
		/// HTTP status code.
		status: u16,
	},
	/// The response did not carry a token under the configured key.
	#[error("Could not extract token from the response under `{key}` using `{getter}`.")]
	TokenMissing {
		/// Configured `token.key` path.
		key: String,
		/// Name of the extraction strategy that was consulted.
		getter: String,
	},
	/// The request could not be assembled from configuration.
	#[error(transparent)]
	Request(#[from] ConfigError),
}
impl FlowError {
	/// Stable label for metrics and logs.
	pub const fn reason(&self) -> &'static str {
		match self {
			FlowError::Forced => "forced",
			FlowError::Transport(_) => "transport",
			FlowError::Server { .. } => "server",
			FlowError::TokenMissing { .. } => "token_missing",
			FlowError::Request(_) => "request",
		}
	}
}
