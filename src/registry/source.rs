//! Normalized registration records consumed by [`Registry::load`](super::Registry::load).
//!
//! Records derive `Deserialize` so a hosting layer can fill them from JSON (see
//! [`RegistrySource::from_json`]) or build them in code with [`ClientSource::builder`].
//! Nothing here is validated until load.

// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	error::ConfigError,
	registry::{ClientClaim, ClientSourceBuilder, GrantType, StandardIdentityResource},
};

/// Raw entity records for a registry load.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrySource {
	/// Protected APIs.
	pub api_resources: Vec<ApiResourceSource>,
	/// API scopes.
	pub api_scopes: Vec<ApiScopeSource>,
	/// Identity resources; standard ones may be listed by name.
	pub identity_resources: Vec<IdentityResourceSource>,
	/// Client applications.
	pub clients: Vec<ClientSource>,
}
impl RegistrySource {
	/// Parses a JSON document, reporting the path of the first malformed element.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}
}

/// Record for a protected API.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResourceSource {
	/// Resource identifier.
	pub name: String,
	/// Optional label.
	#[serde(default)]
	pub display_name: Option<String>,
	/// Owned API scope names.
	#[serde(default)]
	pub scopes: Vec<String>,
}
impl ApiResourceSource {
	/// Creates a resource record owning the given scopes.
	pub fn new<I, S>(name: impl Into<String>, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			name: name.into(),
			display_name: None,
			scopes: scopes.into_iter().map(Into::into).collect(),
		}
	}
}

/// Record for an API scope.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiScopeSource {
	/// Scope name.
	pub name: String,
	/// Optional label.
	#[serde(default)]
	pub display_name: Option<String>,
}
impl ApiScopeSource {
	/// Creates a scope record.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), display_name: None }
	}

	/// Sets the label.
	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = Some(display_name.into());

		self
	}
}

/// Identity resource record: a standard resource by name, or a custom claim bundle.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IdentityResourceSource {
	/// One of the OpenID Connect standard resources.
	Standard(StandardIdentityResource),
	/// Custom resource.
	Custom {
		/// Scope name.
		name: String,
		/// Consent-screen label; defaults to the name.
		#[serde(default)]
		display_name: Option<String>,
		/// Claim types granted.
		claim_types: Vec<String>,
	},
}
impl IdentityResourceSource {
	/// Creates a custom resource record.
	pub fn custom<I, S>(name: impl Into<String>, display_name: impl Into<String>, claims: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::Custom {
			name: name.into(),
			display_name: Some(display_name.into()),
			claim_types: claims.into_iter().map(Into::into).collect(),
		}
	}

	/// Scope name of the record.
	pub fn name(&self) -> &str {
		match self {
			Self::Standard(standard) => standard.name(),
			Self::Custom { name, .. } => name,
		}
	}
}

/// Secret material as configured: plaintext (hashed at load) or an existing hash.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretValue {
	/// Plaintext; hashed and discarded during load.
	Plain(ClientSecret),
	/// Base64 SHA-256 hash.
	Sha256(String),
}

/// Secret record.
#[derive(Clone, Debug, Deserialize)]
pub struct SecretSource {
	/// Secret material.
	#[serde(flatten)]
	pub value: SecretValue,
	/// Optional operator note.
	#[serde(default)]
	pub description: Option<String>,
	/// Optional RFC 3339 expiration.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expiration: Option<OffsetDateTime>,
}
impl SecretSource {
	/// Plaintext secret, hashed during load.
	pub fn plain(value: impl Into<String>) -> Self {
		Self::from_value(SecretValue::Plain(ClientSecret::new(value)))
	}

	/// Pre-hashed secret.
	pub fn sha256(hash: impl Into<String>) -> Self {
		Self::from_value(SecretValue::Sha256(hash.into()))
	}

	/// Sets the expiration.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	fn from_value(value: SecretValue) -> Self {
		Self { value, description: None, expiration: None }
	}
}

/// Client application record. Defaults: enabled, confidential, everything else off.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientSource {
	/// Client identifier.
	pub client_id: String,
	/// Optional display name.
	#[serde(default)]
	pub client_name: Option<String>,
	/// Optional home page.
	#[serde(default)]
	pub client_uri: Option<String>,
	/// Whether the client may authenticate at all.
	#[serde(default = "on")]
	pub enabled: bool,
	/// Allowed grants.
	#[serde(default)]
	pub allowed_grant_types: Vec<GrantType>,
	/// Secrets.
	#[serde(default)]
	pub client_secrets: Vec<SecretSource>,
	/// Whether a secret must be presented.
	#[serde(default = "on")]
	pub require_client_secret: bool,
	/// Whether code grants need PKCE.
	#[serde(default)]
	pub require_pkce: bool,
	/// Whether `plain` PKCE is accepted.
	#[serde(default)]
	pub allow_plain_text_pkce: bool,
	/// Redirect URIs.
	#[serde(default)]
	pub redirect_uris: Vec<String>,
	/// Post-logout redirect URIs.
	#[serde(default)]
	pub post_logout_redirect_uris: Vec<String>,
	/// Front-channel logout URI.
	#[serde(default)]
	pub front_channel_logout_uri: Option<String>,
	/// CORS origins.
	#[serde(default)]
	pub allowed_cors_origins: Vec<String>,
	/// Allowed scope names.
	#[serde(default)]
	pub allowed_scopes: Vec<String>,
	/// Allows `offline_access`.
	#[serde(default)]
	pub allow_offline_access: bool,
	/// Allows access tokens via the browser.
	#[serde(default)]
	pub allow_access_tokens_via_browser: bool,
	/// Requires consent.
	#[serde(default)]
	pub require_consent: bool,
	/// Sends client claims for every grant.
	#[serde(default)]
	pub always_send_client_claims: bool,
	/// Puts user claims in the identity token.
	#[serde(default)]
	pub always_include_user_claims_in_id_token: bool,
	/// Static client claims.
	#[serde(default)]
	pub claims: Vec<ClientClaim>,
	/// Prefix for client claim types.
	#[serde(default = "default_client_claims_prefix")]
	pub client_claims_prefix: String,
}
impl ClientSource {
	/// Starts a fluent client record.
	pub fn builder(client_id: impl Into<String>) -> ClientSourceBuilder {
		ClientSourceBuilder::new(client_id)
	}

	/// Record with default flags and nothing else configured.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_name: None,
			client_uri: None,
			enabled: true,
			allowed_grant_types: Vec::new(),
			client_secrets: Vec::new(),
			require_client_secret: true,
			require_pkce: false,
			allow_plain_text_pkce: false,
			redirect_uris: Vec::new(),
			post_logout_redirect_uris: Vec::new(),
			front_channel_logout_uri: None,
			allowed_cors_origins: Vec::new(),
			allowed_scopes: Vec::new(),
			allow_offline_access: false,
			allow_access_tokens_via_browser: false,
			require_consent: false,
			always_send_client_claims: false,
			always_include_user_claims_in_id_token: false,
			claims: Vec::new(),
			client_claims_prefix: default_client_claims_prefix(),
		}
	}
}

fn on() -> bool {
	true
}

fn default_client_claims_prefix() -> String {
	"client_".into()
}
