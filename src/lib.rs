//! Authorization core for OpenID Connect providers: an immutable registry of clients, API
//! resources, API scopes, and identity resources, plus the client, grant, redirect, PKCE,
//! consent, and claim decisions an identity provider makes before it signs anything.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod authorize;
pub mod claims;
pub mod client;
pub mod error;
pub mod obs;
pub mod registry;
pub mod resolve;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::ClientSecret,
		registry::{
			ApiResourceSource, ApiScopeSource, ClientSource, GrantType, IdentityResourceSource,
			Registry, RegistrySource, SecretSource, StandardIdentityResource,
		},
	};

	/// Plaintext secret registered for `m2m.client` in the demo registry.
	pub const M2M_SECRET: &str = "511536EF-F270-4058-80CA-1C89C192F69A";
	/// Plaintext secret registered for `interactive` in the demo registry.
	pub const INTERACTIVE_SECRET: &str = "49C1A7E1-0C79-4A89-A3D6-A37998FB86B0";
	/// Plaintext secret registered for `mvc` in the demo registry.
	pub const MVC_SECRET: &str = "secret";
	/// Plaintext secret registered for `console-cliente` in the demo registry.
	pub const CONSOLE_SECRET: &str = "console-cliente";

	/// Wraps a plaintext fixture secret as a presented credential.
	pub fn presented(secret: &str) -> ClientSecret {
		ClientSecret::new(secret)
	}

	/// Registration data for the demo identity provider used across tests.
	pub fn demo_source() -> RegistrySource {
		RegistrySource {
			api_resources: vec![ApiResourceSource::new(
				"doughnutapi",
				["doughnutapi", "console-cliente", "swagger-client"],
			)],
			api_scopes: vec![
				ApiScopeSource::new("scope1"),
				ApiScopeSource::new("scope2"),
				ApiScopeSource::new("doughnutapi").with_display_name("Doughnut API"),
				ApiScopeSource::new("console-cliente"),
				ApiScopeSource::new("swagger-client"),
			],
			identity_resources: vec![
				IdentityResourceSource::Standard(StandardIdentityResource::OpenId),
				IdentityResourceSource::Standard(StandardIdentityResource::Profile),
				IdentityResourceSource::Standard(StandardIdentityResource::Address),
				IdentityResourceSource::Standard(StandardIdentityResource::Email),
				IdentityResourceSource::custom("roles", "User role(s)", ["role"]),
			],
			clients: demo_clients(),
		}
	}

	/// Loads [`demo_source`] into a registry, panicking if the fixture is inconsistent.
	pub fn demo_registry() -> Registry {
		Registry::load(demo_source()).expect("Demo registry fixture should load.")
	}

	fn demo_clients() -> Vec<ClientSource> {
		vec![
			ClientSource::builder("m2m.client")
				.name("Client Credentials Client")
				.grant(GrantType::ClientCredentials)
				.secret(SecretSource::plain(M2M_SECRET))
				.allowed_scopes(["scope1"])
				.build(),
			ClientSource::builder("interactive")
				.secret(SecretSource::plain(INTERACTIVE_SECRET))
				.grant(GrantType::AuthorizationCode)
				.redirect_uri("https://localhost:44300/signin-oidc")
				.front_channel_logout_uri("https://localhost:44300/signout-oidc")
				.post_logout_redirect_uri("https://localhost:44300/signout-callback-oidc")
				.allow_offline_access(true)
				.allowed_scopes(["openid", "profile", "scope2"])
				.build(),
			ClientSource::builder("wewantdoughnuts")
				.name("We Want Doughnuts")
				.uri("http://localhost:3000")
				.grant(GrantType::AuthorizationCode)
				.require_client_secret(false)
				.redirect_uri("http://localhost:3000/signin-oidc")
				.post_logout_redirect_uri("http://localhost:3000/signout-oidc")
				.allowed_cors_origin("http://localhost:3000")
				.allowed_scopes(["openid", "profile", "email", "doughnutapi", "roles"])
				.allow_access_tokens_via_browser(true)
				.require_consent(true)
				.build(),
			ClientSource::builder("mvc")
				.secret(SecretSource::plain(MVC_SECRET))
				.grant(GrantType::AuthorizationCode)
				.redirect_uri("https://localhost:44340/signin-oidc")
				.post_logout_redirect_uri("https://localhost:44340/signout-callback-oidc")
				.allowed_scopes(["openid", "profile", "roles"])
				.allow_access_tokens_via_browser(true)
				.allow_offline_access(true)
				.always_send_client_claims(true)
				.always_include_user_claims_in_id_token(true)
				.claim("tier", "gold")
				.build(),
			ClientSource::builder("react-puc")
				.name("Cliente PUC")
				.uri("http://localhost:4200/")
				.grant(GrantType::AuthorizationCode)
				.require_client_secret(false)
				.redirect_uri("http://localhost:4200/signin-callback.html")
				.post_logout_redirect_uri("http://localhost:4200/signout-oidc")
				.allowed_cors_origin("http://localhost:4200")
				.allowed_scopes(["openid", "profile", "email", "roles", "doughnutapi"])
				.allow_access_tokens_via_browser(true)
				.allow_offline_access(true)
				.build(),
			ClientSource::builder("swagger-client")
				.name("Swagger UI for demo_api")
				.secret(SecretSource::plain("swagger-client"))
				.grant(GrantType::AuthorizationCode)
				.require_pkce(true)
				.require_client_secret(false)
				.redirect_uri("https://localhost:44356/swagger/oauth2-redirect.html")
				.allowed_cors_origin("https://localhost:44356")
				.allowed_cors_origin("https://localhost:4200")
				.allowed_scopes(["doughnutapi"])
				.build(),
			ClientSource::builder("console-cliente")
				.name("Client Credentials Client")
				.grant(GrantType::ClientCredentials)
				.secret(SecretSource::plain(CONSOLE_SECRET))
				.allowed_scopes(["console-cliente"])
				.build(),
		]
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		hash::{Hash, Hasher},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use color_eyre as _;
