//! Server-side logout.

// self
use crate::{
	flows::{AuthProvider, common::RequestBody},
	http::AuthHttpClient,
	obs::FlowKind,
	outcome::AuthOutcome,
};

impl<C> AuthProvider<C>
where
	C: ?Sized + AuthHttpClient,
{
	/// Ends the session.
	///
	/// Without a configured `logout.endpoint` nothing is sent and the call succeeds immediately,
	/// leaving the UI to drop its local token.
	pub async fn logout(&self) -> AuthOutcome {
		self.run(FlowKind::Logout, |_| Ok(RequestBody::Empty)).await
	}
}
