//! Account registration.

// self
use crate::{
	_prelude::*,
	flows::{
		AuthProvider,
		common::{self, RequestBody},
	},
	http::AuthHttpClient,
	obs::FlowKind,
	outcome::AuthOutcome,
};

impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Registers an account, sending `data` as JSON.
	///
	/// Like login, a successful registration must return a token under `token.key`.
	pub async fn register<T>(&self, data: &T) -> AuthOutcome
	where
		T: ?Sized + Serialize,
	{
		let payload = common::to_payload(data);

		self.run(FlowKind::Register, move |_| RequestBody::json(&payload?)).await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use crate::{
		_preludet::*,
		config::GENERIC_FAILURE_MESSAGE,
		error::FlowError,
		flows::common::JSON_CONTENT_TYPE,
	};

	#[tokio::test]
	async fn register_sends_payload_as_is() {
		let client = RecordingHttpClient::respond(200, json!({ "data": { "token": "R1" } }));
		let provider = build_recording_provider(client.clone(), json!({}));
		let payload = json!({
			"fullName": "Ada",
			"email": "ada@example.com",
			"password": "x",
			"confirmPassword": "x",
			"terms": true,
		});
		let outcome = provider.register(&payload).await;

		assert!(outcome.is_success());
		assert_eq!(outcome.token().map(|token| token.expose()), Some("R1"));
		assert_eq!(outcome.messages(), ["You have been successfully registered."]);

		let requests = client.requests();

		assert_eq!(requests[0].uri, "http://auth.test/api/auth/register");
		assert_eq!(requests[0].content_type.as_deref(), Some(JSON_CONTENT_TYPE));
		assert_eq!(requests[0].body_json(), payload);
	}

	#[tokio::test]
	async fn always_fail_yields_failure_redirect_and_generic_error() {
		let client = RecordingHttpClient::respond(200, json!({ "data": { "token": "R1" } }));
		let provider =
			build_recording_provider(client.clone(), json!({ "register": { "alwaysFail": true } }));
		let outcome = provider.register(&json!({ "email": "ada@example.com" })).await;

		assert!(outcome.is_failure());
		assert_eq!(outcome.redirect(), None);
		assert_eq!(outcome.errors(), [GENERIC_FAILURE_MESSAGE]);
		assert!(matches!(outcome.source().error(), Some(FlowError::Forced)));
		assert_eq!(client.calls(), 1);
	}

	#[tokio::test]
	async fn register_without_token_fails() {
		let client =
			RecordingHttpClient::respond(200, json!({ "data": { "messages": ["Check email."] } }));
		let provider = build_recording_provider(client, json!({}));
		let outcome = provider.register(&json!({ "email": "ada@example.com" })).await;

		assert!(outcome.is_failure());
		assert!(matches!(outcome.source().error(), Some(FlowError::TokenMissing { .. })));
	}

	#[tokio::test]
	async fn register_surfaces_server_validation_errors() {
		let client = RecordingHttpClient::respond(
			422,
			json!({ "data": { "errors": ["Email is taken.", "Password is too short."] } }),
		);
		let provider = build_recording_provider(client, json!({}));
		let outcome = provider.register(&json!({ "email": "ada@example.com" })).await;

		assert_eq!(outcome.errors(), ["Email is taken.", "Password is too short."]);
	}
}
