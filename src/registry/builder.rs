// std
use std::iter::IntoIterator;
// self
use crate::registry::{ClientClaim, ClientSource, GrantType, SecretSource};

/// Fluent builder for [`ClientSource`] records, for registries defined in code.
///
/// The builder performs no validation; cross-references and URIs are checked by
/// [`Registry::load`](super::Registry::load).
#[derive(Debug)]
pub struct ClientSourceBuilder {
	source: ClientSource,
}
impl ClientSourceBuilder {
	/// Creates a builder with default flags.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { source: ClientSource::new(client_id) }
	}

	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.source.client_name = Some(name.into());

		self
	}

	/// Sets the client home page.
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.source.client_uri = Some(uri.into());

		self
	}

	/// Enables or disables the client.
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.source.enabled = enabled;

		self
	}

	/// Allows a single grant.
	pub fn grant(mut self, grant: GrantType) -> Self {
		self.source.allowed_grant_types.push(grant);

		self
	}

	/// Allows multiple grants.
	pub fn grants<I>(mut self, grants: I) -> Self
	where
		I: IntoIterator<Item = GrantType>,
	{
		self.source.allowed_grant_types.extend(grants);

		self
	}

	/// Adds a secret.
	pub fn secret(mut self, secret: SecretSource) -> Self {
		self.source.client_secrets.push(secret);

		self
	}

	/// Sets whether a secret must be presented.
	pub fn require_client_secret(mut self, required: bool) -> Self {
		self.source.require_client_secret = required;

		self
	}

	/// Sets whether code grants need PKCE.
	pub fn require_pkce(mut self, required: bool) -> Self {
		self.source.require_pkce = required;

		self
	}

	/// Accepts the `plain` PKCE method.
	pub fn allow_plain_text_pkce(mut self, allowed: bool) -> Self {
		self.source.allow_plain_text_pkce = allowed;

		self
	}

	/// Adds a redirect URI.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.source.redirect_uris.push(uri.into());

		self
	}

	/// Adds a post-logout redirect URI.
	pub fn post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.source.post_logout_redirect_uris.push(uri.into());

		self
	}

	/// Sets the front-channel logout URI.
	pub fn front_channel_logout_uri(mut self, uri: impl Into<String>) -> Self {
		self.source.front_channel_logout_uri = Some(uri.into());

		self
	}

	/// Adds a CORS origin.
	pub fn allowed_cors_origin(mut self, origin: impl Into<String>) -> Self {
		self.source.allowed_cors_origins.push(origin.into());

		self
	}

	/// Adds allowed scopes.
	pub fn allowed_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.source.allowed_scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// Sets whether `offline_access` is allowed.
	pub fn allow_offline_access(mut self, allowed: bool) -> Self {
		self.source.allow_offline_access = allowed;

		self
	}

	/// Sets whether access tokens may travel through the browser.
	pub fn allow_access_tokens_via_browser(mut self, allowed: bool) -> Self {
		self.source.allow_access_tokens_via_browser = allowed;

		self
	}

	/// Sets whether consent is required.
	pub fn require_consent(mut self, required: bool) -> Self {
		self.source.require_consent = required;

		self
	}

	/// Sets whether client claims go into every token.
	pub fn always_send_client_claims(mut self, always: bool) -> Self {
		self.source.always_send_client_claims = always;

		self
	}

	/// Sets whether user claims go into the identity token.
	pub fn always_include_user_claims_in_id_token(mut self, always: bool) -> Self {
		self.source.always_include_user_claims_in_id_token = always;

		self
	}

	/// Adds a static client claim.
	pub fn claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
		self.source.claims.push(ClientClaim { claim_type: claim_type.into(), value: value.into() });

		self
	}

	/// Overrides the client claims prefix (defaults to `client_`).
	pub fn client_claims_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.source.client_claims_prefix = prefix.into();

		self
	}

	/// Finishes the record.
	pub fn build(self) -> ClientSource {
		self.source
	}
}
