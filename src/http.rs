//! Transport primitives for auth requests.
//!
//! The module exposes [`AuthHttpClient`], the crate's only dependency on an HTTP stack, and
//! [`ResponseEnvelope`], the full response (status, headers, decoded body) handed to the
//! extractors. Requests and responses use the `oauth2` crate's [`HttpRequest`] /
//! [`HttpResponse`] aliases over the `http` types, so any [`AsyncHttpClient`] can be plugged in.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{HeaderMap, StatusCode},
};
// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports capable of executing auth requests.
///
/// Implementations must be `Send + Sync + 'static` so a provider can be shared across tasks,
/// and the handles they return must own whatever state is required so their request futures
/// remain `Send` for the lifetime of the in-flight call. Concurrent calls each take their own
/// handle; a transport is expected to serve any number of them at once.
///
/// Non-success statuses are regular responses: only failures that prevent a response from
/// arriving should surface as errors.
pub trait AuthHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for one outbound request.
	fn handle(&self) -> Self::Handle;
}

/// Full response observed by a flow, success or not.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Decoded body: JSON when it parses, the raw text otherwise, `null` when empty.
	pub body: Value,
}
impl ResponseEnvelope {
	/// Status used for synthesized forced failures.
	pub const FORCED_FAILURE_STATUS: u16 = 401;

	/// Decodes a transport response.
	pub fn from_http(response: HttpResponse) -> Self {
		let status = response.status().as_u16();
		let (parts, bytes) = response.into_parts();

		Self { status, headers: parts.headers, body: decode_body(&bytes) }
	}

	/// Envelope standing in for a response when configuration forces a failure.
	pub fn forced_failure() -> Self {
		Self {
			status: Self::FORCED_FAILURE_STATUS,
			headers: HeaderMap::new(),
			body: Value::Object(Default::default()),
		}
	}

	/// Envelope standing in for a call that was never sent.
	pub fn local() -> Self {
		Self { status: 200, headers: HeaderMap::new(), body: Value::Object(Default::default()) }
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		StatusCode::from_u16(self.status).map(|status| status.is_success()).unwrap_or(false)
	}

	/// Returns a header value when it is valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Sends `request` through `client` and decodes whatever comes back.
pub(crate) async fn send<C>(
	client: &C,
	request: HttpRequest,
) -> Result<ResponseEnvelope, TransportError>
where
	C: ?Sized + AuthHttpClient,
{
	let handle = client.handle();
	let response = handle.call(request).await.map_err(map_client_error)?;

	Ok(ResponseEnvelope::from_http(response))
}

fn map_client_error<E>(err: HttpClientError<E>) -> TransportError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		other => TransportError::network(other),
	}
}

fn decode_body(bytes: &[u8]) -> Value {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Value::Null;
	}

	serde_json::from_slice(bytes)
		.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AuthHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that satisfies [`AuthHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
