//! Shared request/response pipeline behind every flow.
//!
//! Each call walks the same stages: resolve settings and endpoint, build the request, send it,
//! classify the response, then fold the result into an [`AuthOutcome`]. Failures never escape
//! as errors; they pick the failure redirect and either the extracted server errors (non-2xx
//! responses) or [`GENERIC_FAILURE_MESSAGE`].

// std
use std::{borrow::Cow, time::Instant};
// crates.io
use oauth2::{
	HttpRequest,
	http::{
		Method, Request, Uri,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use serde_json::Map;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	config::{FlowSettings, GENERIC_FAILURE_MESSAGE, path},
	error::{ConfigError, FlowError},
	extract::ExtractionStrategy,
	flows::AuthProvider,
	http::{self, AuthHttpClient, ResponseEnvelope},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	outcome::{AuthOutcome, OutcomeSource},
};

/// Content type of the login request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Content type of every other request with a body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body of one outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	Empty,
	/// URL-encoded form.
	Form(String),
	/// Serialized JSON.
	Json(Vec<u8>),
}
impl RequestBody {
	/// Serializes `payload` as JSON; `null` becomes an empty body.
	pub fn json(payload: &Value) -> Result<Self, ConfigError> {
		if payload.is_null() {
			return Ok(Self::Empty);
		}

		serde_json::to_vec(payload).map(Self::Json).map_err(ConfigError::Encode)
	}

	/// Encodes `fields` as `key=value` pairs joined by `&`.
	pub fn form(fields: &Map<String, Value>) -> Self {
		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in fields {
			serializer.append_pair(key, &form_value(value));
		}

		Self::Form(serializer.finish())
	}

	fn content_type(&self) -> Option<&'static str> {
		match self {
			RequestBody::Empty => None,
			RequestBody::Form(_) => Some(FORM_CONTENT_TYPE),
			RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
		}
	}

	fn into_bytes(self) -> Vec<u8> {
		match self {
			RequestBody::Empty => Vec::new(),
			RequestBody::Form(form) => form.into_bytes(),
			RequestBody::Json(bytes) => bytes,
		}
	}
}

enum Settled {
	Sent(ResponseEnvelope),
	Skipped,
}

struct Failed {
	error: FlowError,
	response: Option<ResponseEnvelope>,
}
impl From<FlowError> for Failed {
	fn from(error: FlowError) -> Self {
		Self { error, response: None }
	}
}
impl From<ConfigError> for Failed {
	fn from(error: ConfigError) -> Self {
		FlowError::Request(error).into()
	}
}

impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Runs one flow call; `build_body` turns the flow's settings into its request body.
	pub(crate) async fn run<B>(&self, kind: FlowKind, build_body: B) -> AuthOutcome
	where
		B: Send + FnOnce(&FlowSettings) -> Result<RequestBody, ConfigError>,
	{
		let span = FlowSpan::new(kind, "run");
		let started = Instant::now();

		obs::record_flow_attempt(kind);
		self.metrics.record(kind, FlowOutcome::Attempt);

		let outcome = span.instrument(self.settle(kind, build_body)).await;
		let finished = if outcome.is_success() { FlowOutcome::Success } else { FlowOutcome::Failure };

		obs::record_flow_completion(
			kind,
			finished,
			outcome.source().error().map(FlowError::reason),
			started.elapsed(),
		);
		self.metrics.record(kind, finished);

		outcome
	}

	async fn settle<B>(&self, kind: FlowKind, build_body: B) -> AuthOutcome
	where
		B: Send + FnOnce(&FlowSettings) -> Result<RequestBody, ConfigError>,
	{
		let strategy = self.extractors.for_flow(kind);

		match self.dispatch(kind, build_body).await {
			Ok(Settled::Sent(response)) => self.accept(kind, strategy, response),
			Ok(Settled::Skipped) => {
				let messages = strategy.messages(kind, &ResponseEnvelope::local(), &self.config);

				AuthOutcome::success(OutcomeSource::Skipped, self.redirect(kind, true), messages, None)
			},
			Err(failed) => self.reject(kind, strategy, failed),
		}
	}

	async fn dispatch<B>(&self, kind: FlowKind, build_body: B) -> Result<Settled, Failed>
	where
		B: Send + FnOnce(&FlowSettings) -> Result<RequestBody, ConfigError>,
	{
		let settings = self.config.flow(kind)?;
		let Some(url) = self.config.action_endpoint(kind) else {
			if kind == FlowKind::Logout {
				return Ok(Settled::Skipped);
			}

			return Err(ConfigError::MissingEndpoint { flow: kind.config_key() }.into());
		};
		let method = settings.http_method(kind)?;
		let body = build_body(&settings)?;
		let request = build_request(kind, method, &url, body)?;
		let response =
			http::send(self.http_client.as_ref(), request).await.map_err(FlowError::from)?;

		if !response.is_success() {
			return Err(Failed {
				error: FlowError::Server { status: response.status },
				response: Some(response),
			});
		}
		if settings.always_fail {
			return Err(Failed {
				error: FlowError::Forced,
				response: Some(ResponseEnvelope::forced_failure()),
			});
		}

		Ok(Settled::Sent(response))
	}

	fn accept(
		&self,
		kind: FlowKind,
		strategy: &dyn ExtractionStrategy,
		response: ResponseEnvelope,
	) -> AuthOutcome {
		let token = if kind.issues_token() {
			let Some(token) = strategy.token(kind, &response, &self.config) else {
				let key = self.config.str_at("token.key").unwrap_or_default().to_owned();

				obs::warn_missing_token(kind, &key, strategy.name());

				let error = FlowError::TokenMissing { key, getter: strategy.name().to_owned() };

				return self.reject(kind, strategy, Failed { error, response: Some(response) });
			};

			Some(token)
		} else {
			None
		};
		let messages = strategy.messages(kind, &response, &self.config);

		AuthOutcome::success(
			OutcomeSource::Response(response),
			self.redirect(kind, true),
			messages,
			token,
		)
	}

	fn reject(
		&self,
		kind: FlowKind,
		strategy: &dyn ExtractionStrategy,
		failed: Failed,
	) -> AuthOutcome {
		let Failed { error, response } = failed;

		obs::debug_flow_failure(kind, &error);

		let errors = match (&error, &response) {
			(FlowError::Server { .. }, Some(response)) =>
				strategy.errors(kind, response, &self.config),
			_ => vec![GENERIC_FAILURE_MESSAGE.to_owned()],
		};

		AuthOutcome::failure(
			OutcomeSource::Failure { error, response },
			self.redirect(kind, false),
			errors,
		)
	}

	fn redirect(&self, kind: FlowKind, success: bool) -> Option<String> {
		let key = if success { "redirect.success" } else { "redirect.failure" };

		self.config.flow_value(kind, key).and_then(Value::as_str).map(str::to_owned)
	}
}

/// Serializes caller data into a JSON payload.
pub(crate) fn to_payload<T>(data: &T) -> Result<Value, ConfigError>
where
	T: ?Sized + Serialize,
{
	serde_json::to_value(data).map_err(ConfigError::Encode)
}

/// Opens a payload for field injection; `null` counts as an empty object.
pub(crate) fn payload_object(
	kind: FlowKind,
	payload: Value,
) -> Result<Map<String, Value>, ConfigError> {
	match payload {
		Value::Object(fields) => Ok(fields),
		Value::Null => Ok(Map::new()),
		other => Err(ConfigError::PayloadNotObject {
			flow: kind.config_key(),
			found: path::type_name(&other),
		}),
	}
}

/// Assembles the HTTP request for one call.
///
/// `url` is sent as resolved, so an empty `baseEndpoint` yields a path-only URI that the
/// transport has to place against its own origin.
pub(crate) fn build_request(
	kind: FlowKind,
	method: Method,
	url: &str,
	body: RequestBody,
) -> Result<HttpRequest, ConfigError> {
	let uri = url.parse::<Uri>().map_err(|source| ConfigError::InvalidEndpoint {
		flow: kind.config_key(),
		url: url.to_owned(),
		source,
	})?;
	let mut builder = Request::builder().method(method).uri(uri).header(ACCEPT, JSON_CONTENT_TYPE);

	if let Some(content_type) = body.content_type() {
		builder = builder.header(CONTENT_TYPE, content_type);
	}

	Ok(builder.body(body.into_bytes())?)
}

fn form_value(value: &Value) -> Cow<'_, str> {
	match value {
		Value::String(text) => Cow::Borrowed(text.as_str()),
		other => Cow::Owned(other.to_string()),
	}
}
