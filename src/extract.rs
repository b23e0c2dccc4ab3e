//! Extraction strategies that pull tokens, errors, and messages out of responses.
//!
//! Backends wrap their payloads differently, so flows never parse bodies themselves. They ask
//! the [`ExtractionStrategy`] registered for the flow, and the default strategy walks the
//! dotted paths configured under `token.key`, `errors.key`, and `messages.key`, falling back to
//! the flow's `defaultErrors` / `defaultMessages` lists when a path is absent.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{AuthConfig, path},
	http::ResponseEnvelope,
	obs::FlowKind,
};

/// Strategy hook that adapts the crate to a backend's response envelope.
///
/// Implementors are required to be `Send + Sync` because one strategy serves every concurrent
/// call of the flows it is registered for.
pub trait ExtractionStrategy: Send + Sync {
	/// Extracts the token from a successful login/registration response.
	fn token(
		&self,
		kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
	) -> Option<TokenSecret>;

	/// Extracts error messages from a non-success response.
	fn errors(&self, kind: FlowKind, response: &ResponseEnvelope, config: &AuthConfig)
	-> Vec<String>;

	/// Extracts success messages from a successful response.
	fn messages(
		&self,
		kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
	) -> Vec<String>;

	/// Identifies the strategy in diagnostics.
	fn name(&self) -> &str {
		"custom-extraction-strategy"
	}
}

/// Default strategy: dotted-path lookups into the response body with per-flow fallbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExtractionStrategy;
impl DefaultExtractionStrategy {
	fn lookup_or_default(
		kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
		key_path: &str,
		fallback: &str,
	) -> Vec<String> {
		config
			.str_at(key_path)
			.and_then(|key| path::get_deep(&response.body, key))
			.map(path::to_strings)
			.unwrap_or_else(|| config.strings_at(&format!("{}.{fallback}", kind.config_key())))
	}
}
impl Display for DefaultExtractionStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.name())
	}
}
impl ExtractionStrategy for DefaultExtractionStrategy {
	fn token(
		&self,
		_kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
	) -> Option<TokenSecret> {
		let key = config.str_at("token.key")?;

		match path::get_deep(&response.body, key)? {
			Value::String(token) if !token.is_empty() => Some(TokenSecret::new(token.clone())),
			Value::Number(token) if token.as_f64() != Some(0.0) =>
				Some(TokenSecret::new(token.to_string())),
			_ => None,
		}
	}

	fn errors(
		&self,
		kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
	) -> Vec<String> {
		Self::lookup_or_default(kind, response, config, "errors.key", "defaultErrors")
	}

	fn messages(
		&self,
		kind: FlowKind,
		response: &ResponseEnvelope,
		config: &AuthConfig,
	) -> Vec<String> {
		Self::lookup_or_default(kind, response, config, "messages.key", "defaultMessages")
	}

	fn name(&self) -> &str {
		"default-extraction-strategy"
	}
}

/// Per-flow strategy table injected into the provider.
///
/// Flows without an explicit entry use the fallback strategy.
#[derive(Clone)]
pub struct Extractors {
	fallback: Arc<dyn ExtractionStrategy>,
	per_flow: BTreeMap<FlowKind, Arc<dyn ExtractionStrategy>>,
}
impl Extractors {
	/// Uses `fallback` for every flow.
	pub fn new(fallback: Arc<dyn ExtractionStrategy>) -> Self {
		Self { fallback, per_flow: BTreeMap::new() }
	}

	/// Registers a dedicated strategy for one flow.
	pub fn with_flow(mut self, kind: FlowKind, strategy: Arc<dyn ExtractionStrategy>) -> Self {
		self.per_flow.insert(kind, strategy);

		self
	}

	/// Returns the strategy responsible for `kind`.
	pub fn for_flow(&self, kind: FlowKind) -> &dyn ExtractionStrategy {
		self.per_flow.get(&kind).unwrap_or(&self.fallback).as_ref()
	}
}
impl Default for Extractors {
	fn default() -> Self {
		Self::new(Arc::new(DefaultExtractionStrategy))
	}
}
impl Debug for Extractors {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let overrides: BTreeMap<_, _> =
			self.per_flow.iter().map(|(kind, strategy)| (kind.as_str(), strategy.name())).collect();

		f.debug_struct("Extractors")
			.field("fallback", &self.fallback.name())
			.field("per_flow", &overrides)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http::HeaderMap;
	use serde_json::json;
	// self
	use super::*;

	fn envelope(status: u16, body: Value) -> ResponseEnvelope {
		ResponseEnvelope { status, headers: HeaderMap::new(), body }
	}

	#[test]
	fn default_token_reads_configured_path() {
		let config = AuthConfig::default();
		let strategy = DefaultExtractionStrategy;
		let token = strategy
			.token(FlowKind::Login, &envelope(200, json!({ "data": { "token": "T1" } })), &config)
			.expect("Token should be extracted from data.token.");

		assert_eq!(token.expose(), "T1");
		assert!(
			strategy
				.token(FlowKind::Login, &envelope(200, json!({ "access_token": "T1" })), &config)
				.is_none()
		);
		assert!(
			strategy
				.token(FlowKind::Register, &envelope(200, json!({ "data": { "token": "" } })), &config)
				.is_none()
		);
	}

	#[test]
	fn zero_tokens_are_rejected() {
		let config = AuthConfig::default();
		let strategy = DefaultExtractionStrategy;

		for zero in [json!(0), json!(0.0), json!(-0.0)] {
			let body = json!({ "data": { "token": zero } });

			assert!(strategy.token(FlowKind::Login, &envelope(200, body), &config).is_none());
		}

		let token = strategy
			.token(FlowKind::Login, &envelope(200, json!({ "data": { "token": 42 } })), &config)
			.expect("Non-zero numeric tokens should be accepted.");

		assert_eq!(token.expose(), "42");
	}

	#[test]
	fn token_key_override_targets_owin_shape() {
		let config = AuthConfig::with_overrides(json!({ "token": { "key": "access_token" } }))
			.expect("Overrides should merge.");
		let body = json!({ "access_token": "owin", "token_type": "bearer", "expires_in": 1209599 });
		let token = DefaultExtractionStrategy
			.token(FlowKind::Login, &envelope(200, body), &config)
			.expect("Token should be extracted from access_token.");

		assert_eq!(token.expose(), "owin");
	}

	#[test]
	fn errors_fall_back_to_flow_defaults() {
		let config = AuthConfig::default();
		let strategy = DefaultExtractionStrategy;
		let found = strategy.errors(
			FlowKind::Register,
			&envelope(400, json!({ "data": { "errors": ["Email is taken."] } })),
			&config,
		);

		assert_eq!(found, ["Email is taken."]);

		let fallback = strategy.errors(
			FlowKind::Login,
			&envelope(400, json!({ "error": "invalid_grant" })),
			&config,
		);

		assert_eq!(fallback, ["Login/Email combination is not correct, please try again."]);

		let text_body = strategy.errors(FlowKind::ResetPassword, &envelope(500, json!("oops")), &config);

		assert_eq!(text_body, ["Something went wrong, please try again."]);
	}

	#[test]
	fn messages_fall_back_to_flow_defaults() {
		let config = AuthConfig::default();
		let strategy = DefaultExtractionStrategy;

		assert_eq!(
			strategy.messages(
				FlowKind::RequestPassword,
				&envelope(200, json!({ "data": { "messages": "Check your inbox." } })),
				&config,
			),
			["Check your inbox."]
		);
		assert_eq!(strategy.messages(FlowKind::Logout, &envelope(204, Value::Null), &config), [
			"You have been successfully logged out."
		]);
	}

	#[test]
	fn per_flow_strategies_override_the_fallback() {
		struct DescriptionErrors;
		impl ExtractionStrategy for DescriptionErrors {
			fn token(
				&self,
				_kind: FlowKind,
				_response: &ResponseEnvelope,
				_config: &AuthConfig,
			) -> Option<TokenSecret> {
				None
			}

			fn errors(
				&self,
				_kind: FlowKind,
				response: &ResponseEnvelope,
				_config: &AuthConfig,
			) -> Vec<String> {
				path::get_deep(&response.body, "error_description")
					.map(path::to_strings)
					.unwrap_or_default()
			}

			fn messages(
				&self,
				_kind: FlowKind,
				_response: &ResponseEnvelope,
				_config: &AuthConfig,
			) -> Vec<String> {
				Vec::new()
			}

			fn name(&self) -> &str {
				"description-errors"
			}
		}

		let extractors =
			Extractors::default().with_flow(FlowKind::Login, Arc::new(DescriptionErrors));
		let body = json!({ "error": "invalid_grant", "error_description": "Bad password." });
		let config = AuthConfig::default();

		assert_eq!(extractors.for_flow(FlowKind::Login).name(), "description-errors");
		assert_eq!(extractors.for_flow(FlowKind::Register).name(), "default-extraction-strategy");
		assert_eq!(
			extractors.for_flow(FlowKind::Login).errors(
				FlowKind::Login,
				&envelope(400, body),
				&config
			),
			["Bad password."]
		);
		assert!(format!("{extractors:?}").contains("description-errors"));
	}
}
