//! Per-request authorization state machine.
//!
//! A request moves through the [`AuthorizationStage`]s in order and stops at the first failing
//! check. Rejections are values ([`Outcome::Rejected`]), never retried; only collaborator
//! failures come back as `Err`.

/// Consent records and prompts.
pub mod consent;
/// Approved decisions and terminal outcomes.
pub mod decision;
/// Request inputs for the authorizer.
pub mod request;

pub use consent::*;
pub use decision::*;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::{OFFLINE_ACCESS, RequestedScopes, SubjectId},
	client::ClientValidator,
	error::Rejection,
	obs::{self, AuthorizeSpan, DecisionOutcome},
	registry::{Client, GrantType, Registry},
	resolve::{ResolvedScopes, ScopeResolver},
	store::{ConsentStore, SecretStore},
};

/// Checkpoints a request passes on its way to approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthorizationStage {
	/// Nothing checked yet.
	ReceivedRequest,
	/// Client found, enabled, and its credential verified.
	ClientAuthenticated,
	/// Grant allowed for the client.
	GrantTypeChecked,
	/// Redirect URI matched and subject present (interactive grants only).
	RedirectValidated,
	/// Requested scopes filtered against the client's allowance.
	ScopesValidated,
	/// Consent requirement satisfied.
	ConsentChecked,
	/// Terminal success.
	Approved,
}
impl AuthorizationStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthorizationStage::ReceivedRequest => "received_request",
			AuthorizationStage::ClientAuthenticated => "client_authenticated",
			AuthorizationStage::GrantTypeChecked => "grant_type_checked",
			AuthorizationStage::RedirectValidated => "redirect_validated",
			AuthorizationStage::ScopesValidated => "scopes_validated",
			AuthorizationStage::ConsentChecked => "consent_checked",
			AuthorizationStage::Approved => "approved",
		}
	}
}
impl Display for AuthorizationStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Orchestrates client, grant, redirect, scope, and consent checks for one registry snapshot.
#[derive(Clone, Copy)]
pub struct GrantAuthorizer<'r> {
	registry: &'r Registry,
	consents: Option<&'r dyn ConsentStore>,
	secrets: Option<&'r dyn SecretStore>,
}
impl<'r> GrantAuthorizer<'r> {
	/// Authorizer without collaborators: consent only comes from the request itself.
	pub fn new(registry: &'r Registry) -> Self {
		Self { registry, consents: None, secrets: None }
	}

	/// Consults `store` for prior consent.
	pub fn with_consent_store(mut self, store: &'r dyn ConsentStore) -> Self {
		self.consents = Some(store);

		self
	}

	/// Verifies client secrets through `store`.
	pub fn with_secret_store(mut self, store: &'r dyn SecretStore) -> Self {
		self.secrets = Some(store);

		self
	}

	/// Runs every check against the current instant.
	pub fn authorize(&self, request: &AuthorizationRequest) -> Result<Outcome<'r>> {
		self.authorize_at(request, OffsetDateTime::now_utc())
	}

	/// Runs every check; `now` decides secret expiry.
	pub fn authorize_at(
		&self,
		request: &AuthorizationRequest,
		now: OffsetDateTime,
	) -> Result<Outcome<'r>> {
		let grant = request.grant;
		let _guard = AuthorizeSpan::new(grant, &request.client_id).entered();
		let outcome = self.run(request, now)?;
		let label = match &outcome {
			Outcome::Approved(_) => DecisionOutcome::Approved,
			Outcome::ConsentRequired(_) => DecisionOutcome::ConsentRequired,
			Outcome::Rejected(_) => DecisionOutcome::Rejected,
		};

		obs::record_decision(grant, label);

		Ok(outcome)
	}

	fn run(&self, request: &AuthorizationRequest, now: OffsetDateTime) -> Result<Outcome<'r>> {
		let grant = request.grant;
		let mut validator = ClientValidator::new(self.registry);

		if let Some(store) = self.secrets {
			validator = validator.with_secret_store(store);
		}

		let authenticated =
			validator.authenticate_at(&request.client_id, &request.credential, grant, now);
		let client = match authenticated {
			Ok(client) => client,
			Err(Error::Rejected(rejection)) =>
				return Ok(reject(AuthorizationStage::ReceivedRequest, rejection)),
			Err(e) => return Err(e),
		};

		if let Err(rejection) = check_grant(client, grant) {
			return Ok(reject(AuthorizationStage::ClientAuthenticated, rejection));
		}

		let subject = if grant.is_interactive() {
			let redirect_uri = request.redirect_uri.as_deref().unwrap_or_default();

			if !client.allows_redirect_uri(redirect_uri) {
				return Ok(reject(
					AuthorizationStage::GrantTypeChecked,
					Rejection::InvalidRedirectUri { redirect_uri: redirect_uri.into() },
				));
			}

			match &request.subject {
				Some(subject) => Some(subject.clone()),
				None =>
					return Ok(reject(AuthorizationStage::GrantTypeChecked, Rejection::LoginRequired)),
			}
		} else if grant.has_subject() {
			request.subject.clone()
		} else {
			None
		};
		let scopes = self.filter_scopes(client, grant, &request.scopes);

		if scopes.is_empty() {
			return Ok(reject(AuthorizationStage::RedirectValidated, Rejection::NoValidScopes));
		}

		let resolved = ScopeResolver::new(self.registry).resolve(&scopes);

		if let Some(subject) = &subject
			&& client.require_consent
			&& grant.is_interactive()
			&& !self.has_consent(client, subject, request, &resolved)?
		{
			return Ok(Outcome::ConsentRequired(ConsentPrompt::new(client, subject.clone(), resolved)));
		}

		Ok(Outcome::Approved(AuthorizationDecision {
			client,
			grant,
			subject,
			redirect_uri: if grant.is_interactive() { request.redirect_uri.clone() } else { None },
			scopes: resolved,
		}))
	}

	// Drops what the client may not receive. `offline_access` needs the client flag and a user;
	// identity scopes need a user. An `offline_access` left alone does not count as valid.
	fn filter_scopes(
		&self,
		client: &Client,
		grant: GrantType,
		requested: &RequestedScopes,
	) -> RequestedScopes {
		let kept = requested.retain(|scope| {
			if scope == OFFLINE_ACCESS {
				return client.allow_offline_access && grant.has_subject();
			}

			client.allowed_scopes.contains(scope)
				&& (grant.has_subject() || self.registry.find_identity_resource(scope).is_none())
		});

		if kept.iter().all(|scope| scope == OFFLINE_ACCESS) { RequestedScopes::default() } else { kept }
	}

	fn has_consent(
		&self,
		client: &Client,
		subject: &SubjectId,
		request: &AuthorizationRequest,
		resolved: &ResolvedScopes,
	) -> Result<bool> {
		let scopes = resolved.scope_set();

		if request.consent.as_ref().is_some_and(|record| record.covers(&client.id, subject, &scopes)) {
			return Ok(true);
		}

		match self.consents {
			Some(store) => Ok(store.has_consented(&client.id, subject, &scopes)?),
			None => Ok(false),
		}
	}
}
impl Debug for GrantAuthorizer<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantAuthorizer")
			.field("clients", &self.registry.clients().count())
			.field("consent_store", &self.consents.is_some())
			.field("secret_store", &self.secrets.is_some())
			.finish()
	}
}

fn check_grant(client: &Client, grant: GrantType) -> Result<(), Rejection> {
	if !ClientValidator::supports_grant(client, grant) {
		return Err(Rejection::UnsupportedGrantType { grant });
	}
	if grant.delivers_tokens_via_browser() && !client.allow_access_tokens_via_browser {
		return Err(Rejection::AccessTokensViaBrowserNotAllowed);
	}

	Ok(())
}

// `reached` is the last stage the request passed.
fn reject<'r>(reached: AuthorizationStage, rejection: Rejection) -> Outcome<'r> {
	obs::rejected(reached.as_str(), &rejection);

	Outcome::Rejected(rejection)
}
