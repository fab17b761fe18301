// self
use crate::{
	_prelude::*,
	auth::SubjectId,
	authorize::ConsentPrompt,
	error::Rejection,
	registry::{Client, GrantType},
	resolve::ResolvedScopes,
};

/// Approved request, ready for claim assembly and token issuance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationDecision<'r> {
	/// Authenticated client, borrowed from the registry snapshot.
	pub client: &'r Client,
	/// Grant the tokens are issued for.
	pub grant: GrantType,
	/// End-user, for grants acting on one.
	pub subject: Option<SubjectId>,
	/// Validated redirect URI, for interactive grants.
	pub redirect_uri: Option<String>,
	/// Scopes that survived filtering, resolved.
	pub scopes: ResolvedScopes,
}
impl AuthorizationDecision<'_> {
	/// Token audiences.
	pub fn audiences(&self) -> &BTreeSet<String> {
		&self.scopes.audiences
	}

	/// Granted scope names in request order.
	pub fn granted_scopes(&self) -> &[String] {
		&self.scopes.granted
	}

	/// Returns true if a refresh token may be issued.
	pub fn offline_access(&self) -> bool {
		self.scopes.offline_access
	}
}

/// Terminal result of [`GrantAuthorizer::authorize`](super::GrantAuthorizer::authorize).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<'r> {
	/// Every check passed.
	Approved(AuthorizationDecision<'r>),
	/// The user must consent first; resubmit with a consent record afterwards.
	ConsentRequired(ConsentPrompt),
	/// A check failed.
	Rejected(Rejection),
}
impl<'r> Outcome<'r> {
	/// Returns true for [`Outcome::Approved`].
	pub fn is_approved(&self) -> bool {
		matches!(self, Self::Approved(_))
	}

	/// The decision, if approved.
	pub fn approved(self) -> Option<AuthorizationDecision<'r>> {
		match self {
			Self::Approved(decision) => Some(decision),
			_ => None,
		}
	}

	/// The consent prompt, if consent is required.
	pub fn consent_prompt(&self) -> Option<&ConsentPrompt> {
		match self {
			Self::ConsentRequired(prompt) => Some(prompt),
			_ => None,
		}
	}

	/// The rejection, if rejected.
	pub fn rejection(&self) -> Option<&Rejection> {
		match self {
			Self::Rejected(rejection) => Some(rejection),
			_ => None,
		}
	}
}
