// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, RequestedScopes, SubjectId},
	authorize::ConsentRecord,
	client::{CodeChallenge, Credential, PkcePair},
	registry::GrantType,
};

/// Authorization or token request as seen by the core, after the hosting layer parsed it.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// Presented client identifier.
	pub client_id: String,
	/// Requested grant.
	pub grant: GrantType,
	/// Presented credential material.
	pub credential: Credential,
	/// Presented redirect URI; required for interactive grants.
	pub redirect_uri: Option<String>,
	/// Requested scopes in request order.
	pub scopes: RequestedScopes,
	/// Authenticated end-user, if any.
	pub subject: Option<SubjectId>,
	/// Consent the caller already holds for this client and subject.
	pub consent: Option<ConsentRecord>,
}
impl AuthorizationRequest {
	/// Starts a request for the client and grant with nothing else attached.
	pub fn new(client_id: impl Into<String>, grant: GrantType) -> Self {
		Self {
			client_id: client_id.into(),
			grant,
			credential: Credential::default(),
			redirect_uri: None,
			scopes: RequestedScopes::default(),
			subject: None,
			consent: None,
		}
	}

	/// Replaces the credential.
	pub fn with_credential(mut self, credential: Credential) -> Self {
		self.credential = credential;

		self
	}

	/// Attaches a client secret.
	pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
		self.credential.secret = Some(ClientSecret::new(secret));

		self
	}

	/// Attaches a PKCE verifier.
	pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.credential.code_verifier = Some(verifier.into());

		self
	}

	/// Attaches the PKCE challenge recorded earlier.
	pub fn with_code_challenge(mut self, challenge: CodeChallenge) -> Self {
		self.credential.code_challenge = Some(challenge);

		self
	}

	/// Attaches both halves of a PKCE pair.
	pub fn with_pkce(mut self, pair: &PkcePair) -> Self {
		self.credential = self.credential.with_pkce(pair);

		self
	}

	/// Sets the presented redirect URI.
	pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Sets the requested scopes.
	pub fn with_scopes(mut self, scopes: RequestedScopes) -> Self {
		self.scopes = scopes;

		self
	}

	/// Sets the authenticated end-user.
	pub fn with_subject(mut self, subject: SubjectId) -> Self {
		self.subject = Some(subject);

		self
	}

	/// Supplies a consent record held by the caller.
	pub fn with_consent(mut self, consent: ConsentRecord) -> Self {
		self.consent = Some(consent);

		self
	}
}
