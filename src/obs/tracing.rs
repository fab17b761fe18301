// self
use crate::{
	_prelude::*,
	error::Rejection,
	registry::{GrantType, Registry},
};

/// Span wrapping a single authorization.
#[derive(Clone, Debug)]
pub struct AuthorizeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AuthorizeSpan {
	/// Creates a new span tagged with the grant and the presented client identifier.
	pub fn new(grant: GrantType, client: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oidc_gatekeeper.authorize", grant = grant.as_str(), client);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (grant, client);

			Self {}
		}
	}

	/// Enters the span for the rest of the synchronous decision.
	pub fn entered(self) -> AuthorizeSpanGuard {
		#[cfg(feature = "tracing")]
		{
			AuthorizeSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			AuthorizeSpanGuard {}
		}
	}
}

/// RAII guard returned by [`AuthorizeSpan::entered`].
pub struct AuthorizeSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for AuthorizeSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthorizeSpanGuard(..)")
	}
}

/// Emits a `debug` event naming the stage that rejected the request.
pub fn rejected(stage: &'static str, rejection: &Rejection) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage, code = rejection.code(), reason = %rejection, "Authorization rejected.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, rejection);
	}
}

/// Emits an `info` event with the entity counts of a freshly loaded snapshot.
pub fn registry_loaded(registry: &Registry) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(
			clients = registry.clients().count(),
			api_scopes = registry.api_scopes().count(),
			api_resources = registry.api_resources().count(),
			identity_resources = registry.identity_resources().count(),
			"Registry loaded."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = registry;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authorize_span_guard_exists_with_or_without_tracing() {
		let guard = AuthorizeSpan::new(GrantType::ClientCredentials, "m2m.client").entered();

		assert_eq!(format!("{guard:?}"), "AuthorizeSpanGuard(..)");
	}

	#[test]
	fn events_accept_any_rejection() {
		rejected("grant_type_checked", &Rejection::NoValidScopes);
		registry_loaded(&crate::_preludet::demo_registry());
	}
}
