//! Configuration resolver: default tree, deep-merged overrides, and dotted-path lookups.
//!
//! The tree is plain JSON so deployments can ship overrides as a file or inline value and change
//! only what differs from the defaults (usually `baseEndpoint` and the endpoint paths).
//! [`AuthConfig`] is immutable once built and cheap to clone, so any number of concurrent flow
//! calls can read it without coordination.

pub mod path;
pub mod settings;

pub use settings::*;

// std
use std::path::Path;
// crates.io
use serde_json::json;
// self
use crate::{_prelude::*, error::ConfigError, obs::FlowKind};

/// Message used when a failure carries no structured server error body.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Merged configuration tree consulted by every flow call.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthConfig {
	tree: Arc<Value>,
}
impl AuthConfig {
	/// Builds a configuration from the defaults with `overrides` deep-merged on top.
	pub fn with_overrides(overrides: Value) -> Result<Self> {
		Self::default().merged(overrides)
	}

	/// Parses JSON overrides and merges them onto the defaults.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let overrides = serde_json::from_str(raw).map_err(ConfigError::Parse)?;

		Self::with_overrides(overrides)
	}

	/// Reads JSON overrides from `path` and merges them onto the defaults.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
			path: path.display().to_string(),
			source,
		})?;

		Self::from_json_str(&raw)
	}

	/// Returns a copy of this configuration with `overrides` deep-merged on top.
	pub fn merged(self, overrides: Value) -> Result<Self> {
		if !overrides.is_object() {
			return Err(ConfigError::InvalidOverrides { found: path::type_name(&overrides) }.into());
		}

		let mut tree = Arc::unwrap_or_clone(self.tree);

		path::deep_merge(&mut tree, overrides);

		Ok(Self { tree: Arc::new(tree) })
	}

	/// Exposes the merged tree.
	pub fn tree(&self) -> &Value {
		&self.tree
	}

	/// Resolves a dotted path (e.g. `login.endpoint`); absent or `null` values yield `None`.
	pub fn resolve(&self, path: &str) -> Option<&Value> {
		path::get_deep(&self.tree, path)
	}

	/// Resolves a string leaf.
	pub fn str_at(&self, path: &str) -> Option<&str> {
		self.resolve(path).and_then(Value::as_str)
	}

	/// Resolves a boolean flag; anything but `true` reads as `false`.
	pub fn bool_at(&self, path: &str) -> bool {
		self.resolve(path).and_then(Value::as_bool).unwrap_or(false)
	}

	/// Resolves a message list (a single string counts as a one-item list).
	pub fn strings_at(&self, path: &str) -> Vec<String> {
		self.resolve(path).map(path::to_strings).unwrap_or_default()
	}

	/// Resolves a value under a flow's section, e.g. `redirect.success` under `login`.
	pub fn flow_value(&self, kind: FlowKind, key: &str) -> Option<&Value> {
		self.resolve(&format!("{}.{key}", kind.config_key()))
	}

	/// Builds `baseEndpoint + {flow}.endpoint`, or `None` when the flow has no endpoint.
	pub fn action_endpoint(&self, kind: FlowKind) -> Option<String> {
		let endpoint = self
			.flow_value(kind, "endpoint")
			.and_then(Value::as_str)
			.filter(|endpoint| !endpoint.is_empty())?;
		let base = self.str_at("baseEndpoint").unwrap_or_default();

		Some(format!("{base}{endpoint}"))
	}

	/// Decodes the typed settings for one flow.
	pub fn flow(&self, kind: FlowKind) -> Result<FlowSettings, ConfigError> {
		let section = self.resolve(kind.config_key()).cloned().unwrap_or(Value::Null);

		serde_path_to_error::deserialize(section)
			.map_err(|source| ConfigError::InvalidFlowSettings { flow: kind.config_key(), source })
	}
}
impl Default for AuthConfig {
	fn default() -> Self {
		Self { tree: Arc::new(default_tree()) }
	}
}

/// Default configuration tree for an OWIN-style backend.
pub fn default_tree() -> Value {
	json!({
		"baseEndpoint": "",
		"login": {
			"alwaysFail": false,
			"rememberMe": true,
			"endpoint": "/api/auth/login",
			"method": "post",
			"redirect": { "success": "/", "failure": null },
			"defaultErrors": ["Login/Email combination is not correct, please try again."],
			"defaultMessages": ["You have been successfully logged in."],
		},
		"register": {
			"alwaysFail": false,
			"rememberMe": true,
			"endpoint": "/api/auth/register",
			"method": "post",
			"redirect": { "success": "/", "failure": null },
			"defaultErrors": ["Something went wrong, please try again."],
			"defaultMessages": ["You have been successfully registered."],
		},
		"logout": {
			"alwaysFail": false,
			"endpoint": "/api/auth/logout",
			"method": "delete",
			"redirect": { "success": "/", "failure": null },
			"defaultErrors": ["Something went wrong, please try again."],
			"defaultMessages": ["You have been successfully logged out."],
		},
		"requestPass": {
			"endpoint": "/api/auth/request-pass",
			"method": "post",
			"redirect": { "success": "/", "failure": null },
			"defaultErrors": ["Something went wrong, please try again."],
			"defaultMessages": ["Reset password instructions have been sent to your email."],
		},
		"resetPass": {
			"endpoint": "/api/auth/reset-pass",
			"method": "put",
			"redirect": { "success": "/", "failure": null },
			"resetPasswordTokenKey": "reset_password_token",
			"defaultErrors": ["Something went wrong, please try again."],
			"defaultMessages": ["Your password has been successfully changed."],
		},
		"token": { "key": "data.token" },
		"errors": { "key": "data.errors" },
		"messages": { "key": "data.messages" },
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_resolve_by_path() {
		let config = AuthConfig::default();

		assert_eq!(config.str_at("login.endpoint"), Some("/api/auth/login"));
		assert_eq!(config.str_at("token.key"), Some("data.token"));
		assert_eq!(config.str_at("resetPass.resetPasswordTokenKey"), Some("reset_password_token"));
		assert_eq!(config.str_at("login.redirect.failure"), None);
		assert!(!config.bool_at("login.alwaysFail"));
		assert!(config.bool_at("register.rememberMe"));
	}

	#[test]
	fn missing_intermediate_keys_resolve_to_none() {
		let config = AuthConfig::default();

		assert_eq!(config.resolve("login.nothing.here"), None);
		assert_eq!(config.resolve("unknown"), None);
		assert!(config.strings_at("unknown.defaultErrors").is_empty());
	}

	#[test]
	fn overrides_keep_untouched_defaults() {
		let config = AuthConfig::with_overrides(json!({
			"baseEndpoint": "http://localhost:50488",
			"token": { "key": "access_token" },
			"login": { "endpoint": "/Token" },
		}))
		.expect("Overrides should merge.");

		assert_eq!(config.str_at("token.key"), Some("access_token"));
		assert_eq!(config.str_at("login.method"), Some("post"));
		assert_eq!(config.strings_at("login.defaultMessages"), [
			"You have been successfully logged in."
		]);
		assert_eq!(
			config.action_endpoint(FlowKind::Login).as_deref(),
			Some("http://localhost:50488/Token")
		);
	}

	#[test]
	fn overrides_replace_lists_wholesale() {
		let config = AuthConfig::with_overrides(json!({
			"register": { "defaultErrors": ["Registration is closed."] },
		}))
		.expect("Overrides should merge.");

		assert_eq!(config.strings_at("register.defaultErrors"), ["Registration is closed."]);
	}

	#[test]
	fn non_object_overrides_are_rejected() {
		let err = AuthConfig::with_overrides(json!(["login"]))
			.expect_err("Array overrides should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidOverrides { found: "an array" })));
	}

	#[test]
	fn blank_endpoints_disable_the_action() {
		let config = AuthConfig::with_overrides(json!({ "logout": { "endpoint": "" } }))
			.expect("Overrides should merge.");

		assert_eq!(config.action_endpoint(FlowKind::Logout), None);

		let config = AuthConfig::with_overrides(json!({ "logout": { "endpoint": null } }))
			.expect("Overrides should merge.");

		assert_eq!(config.action_endpoint(FlowKind::Logout), None);
	}

	#[test]
	fn json_text_overrides_are_parsed() {
		let config = AuthConfig::from_json_str(r#"{ "resetPass": { "method": "post" } }"#)
			.expect("JSON overrides should parse.");

		assert_eq!(config.str_at("resetPass.method"), Some("post"));
		assert!(matches!(
			AuthConfig::from_json_str("{ not json"),
			Err(Error::Config(ConfigError::Parse(_)))
		));
	}

	#[test]
	fn missing_files_report_the_path() {
		let err = AuthConfig::from_path("/definitely/not/here/auth.json")
			.expect_err("Missing files should fail to load.");

		match err {
			Error::Config(ConfigError::ReadFile { path, .. }) =>
				assert_eq!(path, "/definitely/not/here/auth.json"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
