//! Password-grant auth provider for OWIN-style token backends, with configurable endpoints,
//! pluggable token/error/message extraction, and uniform outcomes for every auth flow a UI needs.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod flows;
pub mod http;
pub mod navigation;
pub mod obs;
pub mod outcome;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
	// self
	use crate::{
		config::AuthConfig,
		flows::AuthProvider,
		http::AuthHttpClient,
		navigation::{CurrentRoute, QueryParams},
	};

	/// Provider type alias used by tests that drive the recording transport.
	pub type RecordingProvider = AuthProvider<RecordingHttpClient>;

	/// Error emitted by [`RecordingHttpClient`] when it is told to drop the connection.
	#[derive(Debug)]
	pub struct ConnectionRefused;
	impl Display for ConnectionRefused {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Connection refused.")
		}
	}
	impl StdError for ConnectionRefused {}

	#[derive(Clone, Debug)]
	enum Reply {
		Respond { status: u16, body: String },
		Refuse,
	}

	/// Request captured by [`RecordingHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// Upper-case HTTP method.
		pub method: String,
		/// Absolute request URI.
		pub uri: String,
		/// `Content-Type` header, when present.
		pub content_type: Option<String>,
		/// Raw request body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Returns the body as UTF-8 text.
		pub fn body_text(&self) -> String {
			String::from_utf8_lossy(&self.body).into_owned()
		}

		/// Parses the body as JSON.
		pub fn body_json(&self) -> serde_json::Value {
			serde_json::from_slice(&self.body).expect("Recorded body should contain JSON.")
		}
	}

	/// In-memory transport that answers every request with a canned reply and records what it
	/// was asked to send.
	#[derive(Clone, Debug)]
	pub struct RecordingHttpClient {
		reply: Reply,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl RecordingHttpClient {
		/// Answers every request with `status` and a JSON `body`.
		pub fn respond(status: u16, body: serde_json::Value) -> Self {
			Self::respond_raw(status, body.to_string())
		}

		/// Answers every request with `status` and a verbatim body.
		pub fn respond_raw(status: u16, body: impl Into<String>) -> Self {
			Self { reply: Reply::Respond { status, body: body.into() }, requests: Default::default() }
		}

		/// Fails every request at the transport level.
		pub fn refuse() -> Self {
			Self { reply: Reply::Refuse, requests: Default::default() }
		}

		/// Returns every request seen so far.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		/// Returns the number of requests seen so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}
	}
	impl AuthHttpClient for RecordingHttpClient {
		type Handle = RecordingHandle;
		type TransportError = ConnectionRefused;

		fn handle(&self) -> Self::Handle {
			RecordingHandle(self.clone())
		}
	}

	/// Handle returned by [`RecordingHttpClient`].
	pub struct RecordingHandle(RecordingHttpClient);
	impl<'c> AsyncHttpClient<'c> for RecordingHandle {
		type Error = HttpClientError<ConnectionRefused>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			let client = self.0.clone();

			Box::pin(async move {
				let content_type = request
					.headers()
					.get(oauth2::http::header::CONTENT_TYPE)
					.and_then(|value| value.to_str().ok())
					.map(str::to_owned);

				client.requests.lock().push(RecordedRequest {
					method: request.method().as_str().to_owned(),
					uri: request.uri().to_string(),
					content_type,
					body: request.body().clone(),
				});

				match client.reply {
					Reply::Respond { status, body } => {
						let mut response = HttpResponse::new(body.into_bytes());

						*response.status_mut() = oauth2::http::StatusCode::from_u16(status)
							.expect("Canned status should be a valid HTTP status.");

						Ok(response)
					},
					Reply::Refuse => Err(HttpClientError::Reqwest(Box::new(ConnectionRefused))),
				}
			})
		}
	}

	/// Builds a provider over `client` with the default extractors, merging `overrides` onto the
	/// default configuration with `http://auth.test` as the base endpoint.
	pub fn build_recording_provider(
		client: RecordingHttpClient,
		overrides: serde_json::Value,
	) -> RecordingProvider {
		let config = AuthConfig::with_overrides(serde_json::json!({
			"baseEndpoint": "http://auth.test"
		}))
		.and_then(|config| config.merged(overrides))
		.expect("Test overrides should merge into the default configuration.");

		AuthProvider::with_http_client(config, client)
	}

	/// Builds a route source pointing at `url`.
	pub fn route(url: &str) -> Arc<dyn QueryParams> {
		Arc::new(CurrentRoute::new(Url::parse(url).expect("Test route should be a valid URL.")))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
