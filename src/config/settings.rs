//! Typed view over one flow's configuration section.

// crates.io
use oauth2::http::Method;
use serde::Deserializer;
// self
use crate::{_prelude::*, error::ConfigError, obs::FlowKind};

/// Where the UI should navigate after a flow completes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectSettings {
	/// Target after success.
	pub success: Option<String>,
	/// Target after failure.
	pub failure: Option<String>,
}

/// Settings for a single flow (`login`, `register`, `requestPass`, `resetPass`, `logout`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowSettings {
	/// Path appended to `baseEndpoint`.
	pub endpoint: Option<String>,
	/// HTTP method, case-insensitive.
	pub method: Option<String>,
	/// Fail every call regardless of what the backend says.
	pub always_fail: bool,
	/// Whether the UI should offer to persist the session.
	pub remember_me: bool,
	/// Redirect targets.
	pub redirect: RedirectSettings,
	/// Fallback error messages; a single string counts as a one-item list.
	#[serde(deserialize_with = "one_or_many")]
	pub default_errors: Vec<String>,
	/// Fallback success messages; a single string counts as a one-item list.
	#[serde(deserialize_with = "one_or_many")]
	pub default_messages: Vec<String>,
	/// Query/body field carrying the reset token (`resetPass` only).
	pub reset_password_token_key: Option<String>,
}
impl FlowSettings {
	/// Parses the configured method, defaulting to `POST` when none is set.
	pub fn http_method(&self, kind: FlowKind) -> Result<Method, ConfigError> {
		let Some(raw) = self.method.as_deref() else {
			return Ok(Method::POST);
		};

		Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
			ConfigError::InvalidMethod { flow: kind.config_key(), method: raw.to_owned() }
		})
	}
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum OneOrMany {
		One(String),
		Many(Vec<String>),
	}

	Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
		None => Vec::new(),
		Some(OneOrMany::One(message)) => vec![message],
		Some(OneOrMany::Many(messages)) => messages,
	})
}
