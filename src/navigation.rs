//! Query-parameter sources for flows that read routing state.
//!
//! Only the password reset flow needs this: the emailed link lands on a page whose query string
//! carries the reset token, and the flow copies it into the request body.

// self
use crate::_prelude::*;

/// Read access to the query parameters of the page the user is on.
pub trait QueryParams
where
	Self: Send + Sync,
{
	/// Returns the first value of the named parameter.
	fn query_param(&self, name: &str) -> Option<String>;
}
impl QueryParams for Url {
	fn query_param(&self, name: &str) -> Option<String> {
		self.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
	}
}
impl QueryParams for BTreeMap<String, String> {
	fn query_param(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}
impl QueryParams for HashMap<String, String> {
	fn query_param(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}

/// Snapshot of the current page URL, updated by the router as navigation happens.
///
/// Clones share the same snapshot, so the router and the provider can each hold one.
#[derive(Clone, Debug, Default)]
pub struct CurrentRoute(Arc<RwLock<Option<Url>>>);
impl CurrentRoute {
	/// Starts at `url`.
	pub fn new(url: Url) -> Self {
		Self(Arc::new(RwLock::new(Some(url))))
	}

	/// Records a navigation to `url`.
	pub fn navigate(&self, url: Url) {
		*self.0.write() = Some(url);
	}

	/// Returns the current URL, if any navigation happened yet.
	pub fn url(&self) -> Option<Url> {
		self.0.read().clone()
	}
}
impl QueryParams for CurrentRoute {
	fn query_param(&self, name: &str) -> Option<String> {
		self.0.read().as_ref().and_then(|url| url.query_param(name))
	}
}
