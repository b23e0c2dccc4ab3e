//! Password-grant login against an OWIN-style token endpoint.
//!
//! The token endpoint expects a URL-encoded form with `grant_type=password` and a `username`
//! field, while the login form collects an `email`. [`AuthProvider::authenticate`] bridges the
//! two: it copies `email` into `username`, adds the grant type, and form-encodes every field.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::{
		AuthProvider,
		common::{self, RequestBody},
	},
	http::AuthHttpClient,
	obs::FlowKind,
	outcome::AuthOutcome,
};

const PASSWORD_GRANT: &str = "password";

impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Logs in with the password grant.
	///
	/// `data` is usually `{ "email": .., "password": .. }`; any extra fields are sent along. A
	/// successful outcome carries the token found under `token.key`; a response without one is
	/// a failure.
	pub async fn authenticate<T>(&self, data: &T) -> AuthOutcome
	where
		T: ?Sized + Serialize,
	{
		let payload = common::to_payload(data);

		self.run(FlowKind::Login, move |_| login_form(payload?)).await
	}
}

fn login_form(payload: Value) -> Result<RequestBody, ConfigError> {
	if payload.is_null() {
		return Ok(RequestBody::Form(String::new()));
	}

	let mut fields = common::payload_object(FlowKind::Login, payload)?;

	fields.insert("grant_type".into(), PASSWORD_GRANT.into());

	if let Some(email) = fields.get("email").cloned() {
		fields.insert("username".into(), email);
	}

	Ok(RequestBody::form(&fields))
}
