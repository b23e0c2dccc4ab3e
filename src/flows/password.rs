//! Password recovery: requesting a reset email and submitting the new password.

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

/// Query/body field used when `resetPass.resetPasswordTokenKey` is unset.
pub const DEFAULT_RESET_TOKEN_KEY: &str = "reset_password_token";

impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Asks the backend to email password reset instructions.
	pub async fn request_password<T>(&self, data: &T) -> AuthOutcome
	where
		T: ?Sized + Serialize,
	{
		let payload = common::to_payload(data);

		self.run(FlowKind::RequestPassword, move |_| RequestBody::json(&payload?)).await
	}

	/// Submits a new password.
	///
	/// When the current route carries the reset token (under `resetPass.resetPasswordTokenKey`),
	/// it is copied into the body under the same key, replacing any value the caller set.
	pub async fn reset_password<T>(&self, data: &T) -> AuthOutcome
	where
		T: ?Sized + Serialize,
	{
		let payload = common::to_payload(data);
		let route = self.route.clone();

		self.run(FlowKind::ResetPassword, move |settings| {
			let key = settings.reset_password_token_key.as_deref().unwrap_or(DEFAULT_RESET_TOKEN_KEY);
			let mut fields = common::payload_object(FlowKind::ResetPassword, payload?)?;

			if let Some(token) = route.as_deref().and_then(|route| route.query_param(key)) {
				fields.insert(key.to_owned(), Value::String(token));
			}

			RequestBody::json(&Value::Object(fields))
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use crate::{_preludet::*, config::GENERIC_FAILURE_MESSAGE, error::FlowError};

	#[tokio::test]
	async fn request_password_sends_json_and_reports_messages() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(client.clone(), json!({}));
		let outcome = provider.request_password(&json!({ "email": "a@b.com" })).await;

		assert!(outcome.is_success());
		assert!(outcome.token().is_none());
		assert_eq!(outcome.redirect(), Some("/"));
		assert_eq!(outcome.messages(), [
			"Reset password instructions have been sent to your email."
		]);

		let requests = client.requests();

		assert_eq!(requests[0].method, "POST");
		assert_eq!(requests[0].uri, "http://auth.test/api/auth/request-pass");
		assert_eq!(requests[0].body_json(), json!({ "email": "a@b.com" }));
	}

	#[tokio::test]
	async fn request_password_prefers_server_messages() {
		let client =
			RecordingHttpClient::respond(200, json!({ "data": { "messages": ["Email sent."] } }));
		let provider = build_recording_provider(client, json!({}));
		let outcome = provider.request_password(&json!({ "email": "a@b.com" })).await;

		assert_eq!(outcome.messages(), ["Email sent."]);
	}

	#[tokio::test]
	async fn reset_password_copies_the_route_token() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(client.clone(), json!({}))
			.with_route(route("http://app.test/auth/reset-password?reset_password_token=abc"));
		let outcome = provider
			.reset_password(&json!({ "password": "new", "confirmPassword": "new" }))
			.await;

		assert!(outcome.is_success());
		assert_eq!(outcome.messages(), ["Your password has been successfully changed."]);

		let requests = client.requests();

		assert_eq!(requests[0].method, "PUT");
		assert_eq!(requests[0].uri, "http://auth.test/api/auth/reset-pass");
		assert_eq!(
			requests[0].body_json(),
			json!({ "password": "new", "confirmPassword": "new", "reset_password_token": "abc" })
		);
	}

	#[tokio::test]
	async fn reset_password_omits_the_token_when_the_route_lacks_it() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(client.clone(), json!({}))
			.with_route(route("http://app.test/auth/reset-password"));

		provider.reset_password(&json!({ "password": "new" })).await;

		assert_eq!(client.requests()[0].body_json(), json!({ "password": "new" }));

		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(client.clone(), json!({}));

		provider.reset_password(&json!({ "password": "new" })).await;

		assert_eq!(client.requests()[0].body_json(), json!({ "password": "new" }));
	}

	#[tokio::test]
	async fn reset_password_honors_a_custom_token_key() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(
			client.clone(),
			json!({ "resetPass": { "resetPasswordTokenKey": "code", "method": "post" } }),
		)
		.with_route(route("http://app.test/reset?code=xyz&reset_password_token=ignored"));

		provider.reset_password(&json!({ "password": "new", "code": "stale" })).await;

		let requests = client.requests();

		assert_eq!(requests[0].method, "POST");
		assert_eq!(requests[0].body_json(), json!({ "password": "new", "code": "xyz" }));
	}

	#[tokio::test]
	async fn reset_password_always_fail_reports_generic_error() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(
			client.clone(),
			json!({ "resetPass": { "alwaysFail": true, "redirect": { "failure": "/auth/reset" } } }),
		)
		.with_route(route("http://app.test/reset?reset_password_token=abc"));
		let outcome = provider.reset_password(&json!({ "password": "new" })).await;

		assert!(outcome.is_failure());
		assert_eq!(outcome.redirect(), Some("/auth/reset"));
		assert_eq!(outcome.errors(), [GENERIC_FAILURE_MESSAGE]);
		assert!(matches!(outcome.source().error(), Some(FlowError::Forced)));
		assert_eq!(client.calls(), 1);
	}

	#[tokio::test]
	async fn reset_password_rejects_scalar_payloads() {
		let client = RecordingHttpClient::respond(200, json!({}));
		let provider = build_recording_provider(client.clone(), json!({}));
		let outcome = provider.reset_password(&json!("new")).await;

		assert!(outcome.is_failure());
		assert!(matches!(outcome.source().error(), Some(FlowError::Request(_))));
		assert_eq!(client.calls(), 0);
	}
}
