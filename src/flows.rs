//! Auth flow orchestrators: login, registration, password reset, and logout.

pub mod common;
pub mod metrics;

mod login;
mod logout;
mod password;
mod register;

pub use metrics::{FlowCounts, FlowMetrics};
pub use password::DEFAULT_RESET_TOKEN_KEY;

// self
use crate::{
	_prelude::*, config::AuthConfig, extract::Extractors, http::AuthHttpClient,
	navigation::QueryParams,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport.
pub type ReqwestAuthProvider = AuthProvider<ReqwestHttpClient>;

/// Runs auth flows against one backend.
///
/// The provider owns the HTTP client, the merged configuration, the extraction strategies, and
/// the route source so each flow implementation only decides how its request body looks. All
/// state is read-only after construction; calls are independent and may run concurrently.
#[derive(Clone)]
pub struct AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Merged configuration tree.
	pub config: AuthConfig,
	/// Extraction strategies, per flow.
	pub extractors: Extractors,
	/// Source of the current page's query parameters (password reset only).
	pub route: Option<Arc<dyn QueryParams>>,
	/// Shared counters for flow outcomes.
	pub metrics: Arc<FlowMetrics>,
}
impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Creates a provider that reuses the caller-provided transport.
	pub fn with_http_client(config: AuthConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			config,
			extractors: Extractors::default(),
			route: None,
			metrics: Default::default(),
		}
	}

	/// Replaces the extraction strategies.
	pub fn with_extractors(mut self, extractors: Extractors) -> Self {
		self.extractors = extractors;

		self
	}

	/// Attaches the source used to read the password reset token.
	pub fn with_route(mut self, route: Arc<dyn QueryParams>) -> Self {
		self.route = Some(route);

		self
	}
}
#[cfg(feature = "reqwest")]
impl AuthProvider<ReqwestHttpClient> {
	/// Creates a provider backed by a default reqwest client.
	pub fn new(config: AuthConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthProvider")
			.field("base_endpoint", &self.config.str_at("baseEndpoint"))
			.field("extractors", &self.extractors)
			.field("route_set", &self.route.is_some())
			.finish()
	}
}
