//! Client authentication: secret and PKCE checks plus grant eligibility.

pub mod pkce;

pub use pkce::*;

// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	error::Rejection,
	registry::{Client, GrantType, Registry},
	store::SecretStore,
};

/// Credential material presented alongside a request.
#[derive(Clone, Default)]
pub struct Credential {
	/// Client secret, for confidential clients.
	pub secret: Option<ClientSecret>,
	/// PKCE code verifier.
	pub code_verifier: Option<String>,
	/// PKCE challenge recorded with the authorization request, when known.
	pub code_challenge: Option<CodeChallenge>,
}
impl Credential {
	/// Credential carrying nothing.
	pub fn none() -> Self {
		Self::default()
	}

	/// Credential carrying only a secret.
	pub fn secret(secret: impl Into<String>) -> Self {
		Self::default().with_secret(ClientSecret::new(secret))
	}

	/// Attaches a secret.
	pub fn with_secret(mut self, secret: ClientSecret) -> Self {
		self.secret = Some(secret);

		self
	}

	/// Attaches a PKCE code verifier.
	pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
		self.code_verifier = Some(verifier.into());

		self
	}

	/// Attaches the PKCE challenge the verifier must match.
	pub fn with_code_challenge(mut self, challenge: CodeChallenge) -> Self {
		self.code_challenge = Some(challenge);

		self
	}

	/// Attaches both halves of a generated pair.
	pub fn with_pkce(self, pair: &PkcePair) -> Self {
		self.with_code_verifier(pair.verifier.clone()).with_code_challenge(pair.challenge.clone())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("secret", &self.secret)
			.field("code_verifier", &self.code_verifier.as_ref().map(|_| "<redacted>"))
			.field("code_challenge", &self.code_challenge)
			.finish()
	}
}

/// Authenticates clients against a registry snapshot.
#[derive(Clone, Copy)]
pub struct ClientValidator<'r> {
	registry: &'r Registry,
	secrets: Option<&'r dyn SecretStore>,
}
impl<'r> ClientValidator<'r> {
	/// Validator using the secrets embedded in the registry.
	pub fn new(registry: &'r Registry) -> Self {
		Self { registry, secrets: None }
	}

	/// Verifies secrets through `store` instead of the embedded hashes.
	pub fn with_secret_store(mut self, store: &'r dyn SecretStore) -> Self {
		self.secrets = Some(store);

		self
	}

	/// Authenticates the client for `grant` at the current instant.
	///
	/// Rejections surface as [`Error::Rejected`]; only secret store failures surface as
	/// [`Error::Storage`].
	pub fn authenticate(
		&self,
		client_id: &str,
		credential: &Credential,
		grant: GrantType,
	) -> Result<&'r Client> {
		self.authenticate_at(client_id, credential, grant, OffsetDateTime::now_utc())
	}

	/// Same as [`authenticate`](Self::authenticate) with an explicit clock for secret expiry.
	pub fn authenticate_at(
		&self,
		client_id: &str,
		credential: &Credential,
		grant: GrantType,
		now: OffsetDateTime,
	) -> Result<&'r Client> {
		let client = self
			.registry
			.find_client(client_id)
			.ok_or_else(|| Rejection::ClientNotFound { client_id: client_id.into() })?;

		if !client.enabled {
			return Err(Rejection::ClientDisabled { client_id: client_id.into() }.into());
		}
		if client.require_client_secret {
			self.check_secret(client, credential.secret.as_ref(), now)?;
		}

		check_pkce(client, credential, grant)?;

		Ok(client)
	}

	/// Returns true iff `grant` is one of the client's allowed grants.
	pub fn supports_grant(client: &Client, grant: GrantType) -> bool {
		client.supports(grant)
	}

	fn check_secret(
		&self,
		client: &Client,
		presented: Option<&ClientSecret>,
		now: OffsetDateTime,
	) -> Result<()> {
		let presented =
			presented.ok_or_else(|| Rejection::invalid_credential("client secret is missing"))?;
		let verified = match self.secrets {
			Some(store) => store.verify(&client.id, presented)?,
			// No short-circuit: every active secret is compared.
			None => client
				.active_secrets_at(now)
				.fold(false, |matched, secret| secret.verify(presented) | matched),
		};

		if verified {
			Ok(())
		} else {
			Err(Rejection::invalid_credential("client secret does not match").into())
		}
	}
}
impl Debug for ClientValidator<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientValidator")
			.field("clients", &self.registry.clients().count())
			.field("secret_store", &self.secrets.is_some())
			.finish()
	}
}

fn check_pkce(client: &Client, credential: &Credential, grant: GrantType) -> Result<(), Rejection> {
	let Some(verifier) = credential.code_verifier.as_deref() else {
		return if client.pkce_required_for(grant) {
			Err(Rejection::invalid_credential("PKCE code verifier is missing"))
		} else {
			Ok(())
		};
	};
	let pkce_failed =
		|e: PkceError| Rejection::invalid_credential(e.to_string().trim_end_matches('.'));

	pkce::validate_verifier(verifier).map_err(pkce_failed)?;

	if let Some(challenge) = &credential.code_challenge {
		if challenge.method == PkceMethod::Plain && !client.allow_plain_text_pkce {
			return Err(pkce_failed(PkceError::PlainNotAllowed));
		}

		challenge.verify(verifier).map_err(pkce_failed)?;
	}

	Ok(())
}
