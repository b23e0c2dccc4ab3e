//! Demonstrates logging in and out of an OWIN token endpoint with the default reqwest transport,
//! using the endpoint layout of an ASP.NET Web API backend.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde_json::json;
// self
use owin_token_auth::{config::AuthConfig, flows::AuthProvider};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/Token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "password");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":1209599}",
			);
		})
		.await;
	let sign_out_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/sign-out");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let config = AuthConfig::with_overrides(json!({
		"baseEndpoint": server.base_url(),
		"token": { "key": "access_token" },
		"login": { "endpoint": "/Token" },
		"register": { "endpoint": "/api/Account/Register" },
		"logout": { "endpoint": "/auth/sign-out", "method": "post" },
		"requestPass": { "endpoint": "/auth/request-pass", "method": "post" },
		"resetPass": { "endpoint": "/auth/reset-pass", "method": "post" },
	}))?;
	let provider = AuthProvider::new(config);
	let login = provider
		.authenticate(&json!({ "email": "ada@example.com", "password": "Secret1!" }))
		.await;
	let token = login.token().ok_or_else(|| eyre!("Login failed: {:?}.", login.errors()))?;

	println!("Logged in with token {}; next stop {:?}.", token.expose(), login.redirect());

	let logout = provider.logout().await;

	println!("Logout messages: {:?}.", logout.messages());

	token_mock.assert_async().await;
	sign_out_mock.assert_async().await;

	Ok(())
}
