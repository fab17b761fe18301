//! Immutable registry entities. Values are only produced by [`Registry::load`](super::Registry::load).

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ResourceId, ScopeSet, Secret},
	registry::{AllowedGrants, GrantType},
};

/// Scope exposed by a protected API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiScope {
	/// Scope name as requested by clients.
	pub name: String,
	/// Optional consent-screen label.
	pub display_name: Option<String>,
}

/// Protected API; its identifier becomes a token audience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiResource {
	/// Resource identifier.
	pub id: ResourceId,
	/// Optional label.
	pub display_name: Option<String>,
	/// API scopes owned by the resource.
	pub scopes: ScopeSet,
}

/// Bundle of user claim types grantable through a scope of the same name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IdentityResource {
	/// Scope name.
	pub name: String,
	/// Consent-screen label.
	pub display_name: String,
	/// Claim types, in declaration order.
	pub claim_types: Vec<String>,
}

/// Static claim attached to every token issued for the client when client claims are sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientClaim {
	/// Claim type before the client claims prefix is applied.
	#[serde(rename = "type")]
	pub claim_type: String,
	/// Claim value.
	pub value: String,
}

/// Registered client application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
	/// Client identifier.
	pub id: ClientId,
	/// Optional display name.
	pub name: Option<String>,
	/// Optional home page.
	pub uri: Option<Url>,
	/// Disabled clients fail authentication.
	pub enabled: bool,
	/// Grants the client may use.
	pub allowed_grants: AllowedGrants,
	/// Hashed secrets.
	pub secrets: Vec<Secret>,
	/// Confidential clients must present a secret.
	pub require_client_secret: bool,
	/// Code grants must carry a PKCE proof.
	pub require_pkce: bool,
	/// Accepts the `plain` PKCE method in addition to `S256`.
	pub allow_plain_text_pkce: bool,
	/// Registered redirect URIs, matched by exact string comparison.
	pub redirect_uris: Vec<String>,
	/// Registered post-logout redirect URIs, matched by exact string comparison.
	pub post_logout_redirect_uris: Vec<String>,
	/// Front-channel logout URI.
	pub front_channel_logout_uri: Option<String>,
	/// Origins allowed for browser-based calls.
	pub allowed_cors_origins: Vec<String>,
	/// Scopes the client may request.
	pub allowed_scopes: ScopeSet,
	/// Allows `offline_access` (refresh tokens).
	pub allow_offline_access: bool,
	/// Allows access tokens to travel through the user agent.
	pub allow_access_tokens_via_browser: bool,
	/// Requires explicit user consent before approval.
	pub require_consent: bool,
	/// Sends client claims for user-centric grants too.
	pub always_send_client_claims: bool,
	/// Places user claims in the identity token rather than only the access token.
	pub always_include_user_claims_in_id_token: bool,
	/// Static client claims.
	pub claims: Vec<ClientClaim>,
	/// Prefix applied to client claim types.
	pub client_claims_prefix: String,
}
impl Client {
	/// Returns true if the client may use the grant.
	pub fn supports(&self, grant: GrantType) -> bool {
		self.allowed_grants.supports(grant)
	}

	/// Public clients authenticate without a secret.
	pub fn is_public(&self) -> bool {
		!self.require_client_secret
	}

	/// PKCE is mandatory for code grants when the client asks for it or has no secret.
	pub fn pkce_required_for(&self, grant: GrantType) -> bool {
		grant.issues_code() && (self.require_pkce || self.is_public())
	}

	/// Exact-string redirect URI check; no prefix, case folding, or wildcard semantics.
	pub fn allows_redirect_uri(&self, uri: &str) -> bool {
		self.redirect_uris.iter().any(|registered| registered == uri)
	}

	/// Exact-string post-logout redirect URI check.
	pub fn allows_post_logout_redirect_uri(&self, uri: &str) -> bool {
		self.post_logout_redirect_uris.iter().any(|registered| registered == uri)
	}

	/// Origin check for browser calls; origins compare ASCII case-insensitively.
	pub fn allows_cors_origin(&self, origin: &str) -> bool {
		self.allowed_cors_origins.iter().any(|allowed| allowed.eq_ignore_ascii_case(origin))
	}

	/// Secrets still valid at `instant`.
	pub fn active_secrets_at(&self, instant: OffsetDateTime) -> impl Iterator<Item = &Secret> {
		self.secrets.iter().filter(move |secret| !secret.is_expired_at(instant))
	}
}
