//! Crate-level error types: fatal registry configuration failures, collaborator failures, and
//! the per-request rejection reasons reported to the calling layer.

// self
use crate::{_prelude::*, registry::GrantType};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Registry configuration problem; fatal at startup.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Consent or secret collaborator failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Request rejected with a specific reason.
	#[error(transparent)]
	Rejected(#[from] Rejection),
}

/// Registry load failures. A process must not start with an invalid registry.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Two entities of the same kind share a name.
	#[error("Duplicate {kind} `{name}`.")]
	DuplicateName {
		/// Entity kind (client, API scope, API resource, identity resource).
		kind: &'static str,
		/// Offending name.
		name: String,
	},
	/// A name is registered both as an API scope and as an identity resource.
	#[error("Scope `{name}` is registered both as an API scope and as an identity resource.")]
	ScopeNamespaceCollision {
		/// Offending name.
		name: String,
	},
	/// A reserved protocol scope was registered as an entity.
	#[error("Scope `{name}` is reserved and cannot be registered.")]
	ReservedScopeName {
		/// Offending name.
		name: String,
	},
	/// An API resource references an API scope that does not exist.
	#[error("API resource `{resource}` references unknown API scope `{scope}`.")]
	UnknownResourceScope {
		/// Resource identifier.
		resource: String,
		/// Missing scope name.
		scope: String,
	},
	/// A client allows a scope that is neither an API scope nor an identity resource.
	#[error("Client `{client}` allows unknown scope `{scope}`.")]
	UnknownClientScope {
		/// Client identifier.
		client: String,
		/// Missing scope name.
		scope: String,
	},
	/// A client requires a secret but none is configured.
	#[error("Client `{client}` requires a client secret but has none configured.")]
	MissingClientSecret {
		/// Client identifier.
		client: String,
	},
	/// A client allows an interactive grant without any redirect URI.
	#[error("Client `{client}` allows the {grant} grant but has no redirect URIs.")]
	MissingRedirectUri {
		/// Client identifier.
		client: String,
		/// Interactive grant that needs a redirect target.
		grant: GrantType,
	},
	/// A client enables no grants at all.
	#[error("Client `{client}` must allow at least one grant type.")]
	NoAllowedGrants {
		/// Client identifier.
		client: String,
	},
	/// A configured URI could not be parsed as an absolute URL.
	#[error("Client `{client}` has an invalid {field}: {value}.")]
	InvalidUri {
		/// Client identifier.
		client: String,
		/// Which field failed validation.
		field: &'static str,
		/// Value that failed to parse.
		value: String,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// A scope list failed validation.
	#[error(transparent)]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Raw configuration could not be deserialized.
	#[error("Registry source is malformed at `{path}`: {message}.")]
	Malformed {
		/// Path to the offending element.
		path: String,
		/// Deserializer message.
		message: String,
	},
	/// The process-wide registry handle was installed twice.
	#[error("The process-wide registry handle is already installed.")]
	AlreadyInstalled,
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Malformed { path: e.path().to_string(), message: e.inner().to_string() }
	}
}

/// Reason a request was rejected. Every rejection is terminal for the request.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Rejection {
	/// No client with the presented identifier is registered.
	#[error("Client `{client_id}` is not registered.")]
	ClientNotFound {
		/// Presented client identifier.
		client_id: String,
	},
	/// The client exists but is disabled.
	#[error("Client `{client_id}` is disabled.")]
	ClientDisabled {
		/// Client identifier.
		client_id: String,
	},
	/// Secret or PKCE proof is missing or does not verify.
	#[error("Client authentication failed: {reason}.")]
	InvalidCredential {
		/// Human-readable reason; never contains secret material.
		reason: String,
	},
	/// The client is not allowed to use the requested grant.
	#[error("Client is not allowed to use the {grant} grant.")]
	UnsupportedGrantType {
		/// Requested grant.
		grant: GrantType,
	},
	/// The presented redirect URI is not registered for the client.
	#[error("Redirect URI `{redirect_uri}` is not registered for this client.")]
	InvalidRedirectUri {
		/// Presented redirect URI (empty when none was supplied).
		redirect_uri: String,
	},
	/// None of the requested scopes is allowed for the client.
	#[error("No requested scope is allowed for this client.")]
	NoValidScopes,
	/// An interactive request arrived without an authenticated subject.
	#[error("Interactive grants require an authenticated subject.")]
	LoginRequired,
	/// The grant would hand tokens to the browser but the client forbids it.
	#[error("Client is not allowed to receive access tokens via the browser.")]
	AccessTokensViaBrowserNotAllowed,
}
impl Rejection {
	/// OAuth 2.0 / OpenID Connect error code for the calling layer's response.
	pub fn code(&self) -> &'static str {
		match self {
			Self::ClientNotFound { .. }
			| Self::ClientDisabled { .. }
			| Self::InvalidCredential { .. } => "invalid_client",
			Self::UnsupportedGrantType { .. } | Self::AccessTokensViaBrowserNotAllowed =>
				"unauthorized_client",
			Self::InvalidRedirectUri { .. } => "invalid_request",
			Self::NoValidScopes => "invalid_scope",
			Self::LoginRequired => "login_required",
		}
	}

	pub(crate) fn invalid_credential(reason: impl Into<String>) -> Self {
		Self::InvalidCredential { reason: reason.into() }
	}
}
