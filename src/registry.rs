//! Immutable registration snapshot: clients, API scopes, API resources, identity resources.
//!
//! [`Registry::load`] is the only constructor. It validates names and cross-references once,
//! hashes configured plaintext secrets, and indexes which resources own each API scope.
//! After that the value is read-only and freely shared between threads; [`RegistryHandle`]
//! swaps whole snapshots when a reload is needed.

/// Fluent builder for client registration records.
pub mod builder;
/// Grant types and per-client grant sets.
pub mod grant;
pub mod handle;
pub mod identity;
pub mod model;
pub mod source;

pub use builder::*;
pub use grant::*;
pub use handle::*;
pub use identity::*;
pub use model::*;
pub use source::*;

// std
use std::collections::HashSet;
// self
use crate::{
	_prelude::*,
	auth::{self, ClientId, OFFLINE_ACCESS, ResourceId, ScopeSet, Secret},
	error::ConfigError,
	obs,
};

/// Load-time switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
	/// Secrets live in an external [`SecretStore`](crate::store::SecretStore), so confidential
	/// clients may be registered without embedded secrets.
	pub external_secrets: bool,
}

/// Validated, immutable registration data.
#[derive(Debug)]
pub struct Registry {
	clients: HashMap<ClientId, Client>,
	api_scopes: HashMap<String, ApiScope>,
	api_resources: BTreeMap<ResourceId, ApiResource>,
	identity_resources: HashMap<String, IdentityResource>,
	audiences: HashMap<String, BTreeSet<ResourceId>>,
	options: LoadOptions,
}
impl Registry {
	/// Validates and loads a registry with default options.
	pub fn load(source: RegistrySource) -> Result<Self, ConfigError> {
		Self::load_with(source, LoadOptions::default())
	}

	/// Validates and loads a registry.
	pub fn load_with(source: RegistrySource, options: LoadOptions) -> Result<Self, ConfigError> {
		let RegistrySource { api_resources, api_scopes, identity_resources, clients } = source;
		let identity_resources = load_identity_resources(identity_resources)?;
		let api_scopes = load_api_scopes(api_scopes, &identity_resources)?;
		let (api_resources, audiences) = load_api_resources(api_resources, &api_scopes)?;
		let mut registry = Self {
			clients: HashMap::with_capacity(clients.len()),
			api_scopes,
			api_resources,
			identity_resources,
			audiences,
			options,
		};

		for record in clients {
			let client = registry.load_client(record)?;

			if registry.clients.contains_key(&client.id) {
				return Err(ConfigError::DuplicateName {
					kind: "client",
					name: client.id.to_string(),
				});
			}

			registry.clients.insert(client.id.clone(), client);
		}

		obs::registry_loaded(&registry);

		Ok(registry)
	}

	/// Looks up a client.
	pub fn find_client(&self, id: &str) -> Option<&Client> {
		self.clients.get(id)
	}

	/// Looks up an API scope.
	pub fn find_api_scope(&self, name: &str) -> Option<&ApiScope> {
		self.api_scopes.get(name)
	}

	/// Looks up an API resource.
	pub fn find_api_resource(&self, id: &str) -> Option<&ApiResource> {
		self.api_resources.get(id)
	}

	/// Looks up an identity resource, standard ones included.
	pub fn find_identity_resource(&self, name: &str) -> Option<&IdentityResource> {
		self.identity_resources.get(name)
	}

	/// Resources owning the API scope, in identifier order.
	pub fn resources_for_scope(&self, scope: &str) -> impl Iterator<Item = &ResourceId> {
		self.audiences.get(scope).into_iter().flatten()
	}

	/// Returns true if the name is an identity resource or an API scope.
	pub fn is_known_scope(&self, name: &str) -> bool {
		self.identity_resources.contains_key(name) || self.api_scopes.contains_key(name)
	}

	/// All clients, in no particular order.
	pub fn clients(&self) -> impl Iterator<Item = &Client> {
		self.clients.values()
	}

	/// All API scopes, in no particular order.
	pub fn api_scopes(&self) -> impl Iterator<Item = &ApiScope> {
		self.api_scopes.values()
	}

	/// All API resources, in identifier order.
	pub fn api_resources(&self) -> impl Iterator<Item = &ApiResource> {
		self.api_resources.values()
	}

	/// All identity resources, in no particular order.
	pub fn identity_resources(&self) -> impl Iterator<Item = &IdentityResource> {
		self.identity_resources.values()
	}

	/// Options the snapshot was loaded with; reloads reuse them.
	pub fn options(&self) -> LoadOptions {
		self.options
	}

	fn load_client(&self, record: ClientSource) -> Result<Client, ConfigError> {
		let id = ClientId::new(&record.client_id)?;
		let name = id.to_string();
		let allowed_grants = record.allowed_grant_types.iter().copied().collect::<AllowedGrants>();

		if allowed_grants.is_empty() {
			return Err(ConfigError::NoAllowedGrants { client: name });
		}

		let secrets = record.client_secrets.into_iter().map(hash_secret).collect::<Vec<_>>();

		if record.require_client_secret && secrets.is_empty() && !self.options.external_secrets {
			return Err(ConfigError::MissingClientSecret { client: name });
		}
		if let Some(grant) = allowed_grants.iter().find(|grant| grant.is_interactive())
			&& record.redirect_uris.is_empty()
		{
			return Err(ConfigError::MissingRedirectUri { client: name, grant });
		}

		for uri in &record.redirect_uris {
			check_uri(&name, "redirect URI", uri)?;
		}
		for uri in &record.post_logout_redirect_uris {
			check_uri(&name, "post-logout redirect URI", uri)?;
		}
		if let Some(uri) = &record.front_channel_logout_uri {
			check_uri(&name, "front-channel logout URI", uri)?;
		}
		for origin in &record.allowed_cors_origins {
			check_origin(&name, origin)?;
		}

		let uri = record
			.client_uri
			.as_deref()
			.map(|uri| {
				Url::parse(uri).map_err(|_| ConfigError::InvalidUri {
					client: name.clone(),
					field: "client URI",
					value: uri.to_owned(),
				})
			})
			.transpose()?;
		let allowed_scopes = ScopeSet::new(record.allowed_scopes)?;

		for scope in &allowed_scopes {
			if scope == OFFLINE_ACCESS {
				return Err(ConfigError::ReservedScopeName { name: scope.to_owned() });
			}
			if !self.is_known_scope(scope) {
				return Err(ConfigError::UnknownClientScope {
					client: name,
					scope: scope.to_owned(),
				});
			}
		}

		Ok(Client {
			id,
			name: record.client_name,
			uri,
			enabled: record.enabled,
			allowed_grants,
			secrets,
			require_client_secret: record.require_client_secret,
			require_pkce: record.require_pkce,
			allow_plain_text_pkce: record.allow_plain_text_pkce,
			redirect_uris: record.redirect_uris,
			post_logout_redirect_uris: record.post_logout_redirect_uris,
			front_channel_logout_uri: record.front_channel_logout_uri,
			allowed_cors_origins: record.allowed_cors_origins,
			allowed_scopes,
			allow_offline_access: record.allow_offline_access,
			allow_access_tokens_via_browser: record.allow_access_tokens_via_browser,
			require_consent: record.require_consent,
			always_send_client_claims: record.always_send_client_claims,
			always_include_user_claims_in_id_token: record.always_include_user_claims_in_id_token,
			claims: record.claims,
			client_claims_prefix: record.client_claims_prefix,
		})
	}
}

fn load_identity_resources(
	records: Vec<IdentityResourceSource>,
) -> Result<HashMap<String, IdentityResource>, ConfigError> {
	let mut resources = StandardIdentityResource::ALL
		.iter()
		.map(|standard| (standard.name().to_owned(), standard.resource()))
		.collect::<HashMap<_, _>>();
	let mut explicit = HashSet::new();

	for record in records {
		let resource = match record {
			IdentityResourceSource::Standard(standard) => standard.resource(),
			IdentityResourceSource::Custom { name, display_name, claim_types } => {
				auth::validate_scope(&name)?;

				IdentityResource {
					display_name: display_name.unwrap_or_else(|| name.clone()),
					name,
					claim_types,
				}
			},
		};

		ensure_not_reserved(&resource.name)?;

		if !explicit.insert(resource.name.clone()) {
			return Err(ConfigError::DuplicateName {
				kind: "identity resource",
				name: resource.name,
			});
		}

		resources.insert(resource.name.clone(), resource);
	}

	Ok(resources)
}

fn load_api_scopes(
	records: Vec<ApiScopeSource>,
	identity_resources: &HashMap<String, IdentityResource>,
) -> Result<HashMap<String, ApiScope>, ConfigError> {
	let mut scopes = HashMap::with_capacity(records.len());

	for ApiScopeSource { name, display_name } in records {
		auth::validate_scope(&name)?;
		ensure_not_reserved(&name)?;

		if identity_resources.contains_key(&name) {
			return Err(ConfigError::ScopeNamespaceCollision { name });
		}
		if scopes.contains_key(&name) {
			return Err(ConfigError::DuplicateName { kind: "API scope", name });
		}

		scopes.insert(name.clone(), ApiScope { name, display_name });
	}

	Ok(scopes)
}

type ResourceIndex = (BTreeMap<ResourceId, ApiResource>, HashMap<String, BTreeSet<ResourceId>>);

fn load_api_resources(
	records: Vec<ApiResourceSource>,
	api_scopes: &HashMap<String, ApiScope>,
) -> Result<ResourceIndex, ConfigError> {
	let mut resources = BTreeMap::new();
	let mut audiences = HashMap::<String, BTreeSet<ResourceId>>::new();

	for ApiResourceSource { name, display_name, scopes } in records {
		let id = ResourceId::new(&name)?;
		let scopes = ScopeSet::new(scopes)?;

		if resources.contains_key(&id) {
			return Err(ConfigError::DuplicateName { kind: "API resource", name });
		}

		for scope in &scopes {
			if !api_scopes.contains_key(scope) {
				return Err(ConfigError::UnknownResourceScope { resource: name, scope: scope.into() });
			}

			audiences.entry(scope.to_owned()).or_default().insert(id.clone());
		}

		resources.insert(id.clone(), ApiResource { id, display_name, scopes });
	}

	Ok((resources, audiences))
}

fn hash_secret(record: SecretSource) -> Secret {
	let SecretSource { value, description, expiration } = record;
	let mut secret = match value {
		SecretValue::Plain(plain) => Secret::from_hash(plain.hashed()),
		SecretValue::Sha256(hash) => Secret::from_hash(hash),
	};

	secret.description = description;
	secret.expiration = expiration;

	secret
}

fn ensure_not_reserved(name: &str) -> Result<(), ConfigError> {
	if name == OFFLINE_ACCESS {
		Err(ConfigError::ReservedScopeName { name: name.into() })
	} else {
		Ok(())
	}
}

fn check_uri(client: &str, field: &'static str, value: &str) -> Result<(), ConfigError> {
	match Url::parse(value) {
		Ok(_) => Ok(()),
		Err(_) => Err(ConfigError::InvalidUri { client: client.into(), field, value: value.into() }),
	}
}

// Origins carry scheme, host, and port only.
fn check_origin(client: &str, value: &str) -> Result<(), ConfigError> {
	let valid = Url::parse(value).is_ok_and(|url| {
		url.has_host()
			&& url.path() == "/"
			&& url.query().is_none()
			&& url.fragment().is_none()
			&& !value.ends_with('/')
	});

	if valid {
		Ok(())
	} else {
		Err(ConfigError::InvalidUri { client: client.into(), field: "CORS origin", value: value.into() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn scope_only_source() -> RegistrySource {
		RegistrySource {
			api_scopes: vec![ApiScopeSource::new("scope1")],
			..Default::default()
		}
	}

	fn m2m(scopes: &[&str]) -> ClientSource {
		ClientSource::builder("m2m.client")
			.grant(GrantType::ClientCredentials)
			.secret(SecretSource::plain(M2M_SECRET))
			.allowed_scopes(scopes.iter().copied())
			.build()
	}

	#[test]
	fn demo_registry_loads_and_indexes() {
		let registry = demo_registry();

		assert_eq!(registry.clients().count(), 7);
		assert!(registry.find_client("m2m.client").is_some());
		assert!(registry.find_client("nobody").is_none());
		assert_eq!(
			registry.find_api_scope("doughnutapi").and_then(|scope| scope.display_name.as_deref()),
			Some("Doughnut API")
		);
		assert_eq!(
			registry.resources_for_scope("doughnutapi").map(ToString::to_string).collect::<Vec<_>>(),
			vec!["doughnutapi".to_string()]
		);
		assert_eq!(registry.resources_for_scope("scope1").count(), 0);
		assert_eq!(
			registry.find_identity_resource("roles").map(|resource| resource.claim_types.clone()),
			Some(vec!["role".to_string()])
		);
	}

	#[test]
	fn every_allowed_scope_resolves() {
		let registry = demo_registry();

		for client in registry.clients() {
			for scope in &client.allowed_scopes {
				assert!(registry.is_known_scope(scope), "{} allows unknown {scope}", client.id);
			}
		}
	}

	#[test]
	fn plaintext_secrets_are_hashed_at_load() {
		let registry = demo_registry();
		let client = registry.find_client("mvc").expect("MVC client should be registered.");

		assert_eq!(client.secrets[0].hash(), "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols=");
	}

	#[test]
	fn standard_identity_resources_need_no_registration() {
		let registry = Registry::load(scope_only_source()).expect("Bare registry should load.");

		for standard in StandardIdentityResource::ALL {
			assert!(registry.find_identity_resource(standard.name()).is_some());
		}
	}

	#[test]
	fn unknown_client_scope_is_named() {
		let mut source = scope_only_source();

		source.clients.push(m2m(&["scope1", "scope9"]));

		assert_eq!(
			Registry::load(source).expect_err("Unknown client scope must fail the load."),
			ConfigError::UnknownClientScope { client: "m2m.client".into(), scope: "scope9".into() }
		);
	}

	#[test]
	fn resource_referencing_missing_scope_fails() {
		let mut source = demo_source();

		source.api_scopes.retain(|scope| scope.name != "swagger-client");

		let err = Registry::load(source).expect_err("Dangling resource scope must fail the load.");

		assert_eq!(
			err,
			ConfigError::UnknownResourceScope {
				resource: "doughnutapi".into(),
				scope: "swagger-client".into()
			}
		);
		assert!(err.to_string().contains("swagger-client"));
	}

	#[test]
	fn duplicate_names_fail() {
		let mut clients = scope_only_source();

		clients.clients.extend([m2m(&["scope1"]), m2m(&["scope1"])]);

		assert!(matches!(
			Registry::load(clients),
			Err(ConfigError::DuplicateName { kind: "client", .. })
		));

		let mut scopes = scope_only_source();

		scopes.api_scopes.push(ApiScopeSource::new("scope1"));

		assert!(matches!(
			Registry::load(scopes),
			Err(ConfigError::DuplicateName { kind: "API scope", .. })
		));

		let mut identity = scope_only_source();

		identity.identity_resources.extend([
			IdentityResourceSource::Standard(StandardIdentityResource::OpenId),
			IdentityResourceSource::Standard(StandardIdentityResource::OpenId),
		]);

		assert!(matches!(
			Registry::load(identity),
			Err(ConfigError::DuplicateName { kind: "identity resource", .. })
		));
	}

	#[test]
	fn api_scope_and_identity_names_are_disjoint() {
		let mut source = scope_only_source();

		source.api_scopes.push(ApiScopeSource::new("email"));

		assert_eq!(
			Registry::load(source).expect_err("Colliding names must fail the load."),
			ConfigError::ScopeNamespaceCollision { name: "email".into() }
		);
	}

	#[test]
	fn offline_access_is_reserved() {
		let mut registered = scope_only_source();

		registered.api_scopes.push(ApiScopeSource::new(OFFLINE_ACCESS));

		assert!(matches!(Registry::load(registered), Err(ConfigError::ReservedScopeName { .. })));

		let mut allowed = scope_only_source();

		allowed.clients.push(m2m(&["scope1", OFFLINE_ACCESS]));

		assert!(matches!(Registry::load(allowed), Err(ConfigError::ReservedScopeName { .. })));
	}

	#[test]
	fn confidential_clients_need_secrets_unless_external() {
		let confidential = ClientSource::builder("no-secret")
			.grant(GrantType::ClientCredentials)
			.allowed_scopes(["scope1"])
			.build();
		let mut source = scope_only_source();

		source.clients.push(confidential);

		assert_eq!(
			Registry::load(source.clone()).expect_err("Missing secret must fail the load."),
			ConfigError::MissingClientSecret { client: "no-secret".into() }
		);

		let registry = Registry::load_with(source, LoadOptions { external_secrets: true })
			.expect("External secret stores allow empty embedded secrets.");

		assert!(registry.options().external_secrets);
	}

	#[test]
	fn interactive_grants_need_redirect_uris() {
		let mut source = scope_only_source();

		source.clients.push(
			ClientSource::builder("spa")
				.grant(GrantType::AuthorizationCode)
				.require_client_secret(false)
				.allowed_scopes(["openid"])
				.build(),
		);

		assert_eq!(
			Registry::load(source).expect_err("Missing redirect URIs must fail the load."),
			ConfigError::MissingRedirectUri {
				client: "spa".into(),
				grant: GrantType::AuthorizationCode
			}
		);
	}

	#[test]
	fn clients_need_a_grant() {
		let mut source = scope_only_source();

		source.clients.push(
			ClientSource::builder("idle").secret(SecretSource::plain("x")).build(),
		);

		assert!(matches!(Registry::load(source), Err(ConfigError::NoAllowedGrants { .. })));
	}

	#[test]
	fn malformed_uris_and_origins_fail() {
		let spa = |origin: &str| {
			ClientSource::builder("spa")
				.grant(GrantType::AuthorizationCode)
				.require_client_secret(false)
				.redirect_uri("http://localhost:3000/signin-oidc")
				.allowed_cors_origin(origin)
				.allowed_scopes(["openid"])
				.build()
		};

		for origin in ["http://localhost:3000/", "http://localhost:3000/app", "localhost:3000"] {
			let mut source = scope_only_source();

			source.clients.push(spa(origin));

			assert!(
				matches!(
					Registry::load(source),
					Err(ConfigError::InvalidUri { field: "CORS origin", .. })
				),
				"{origin} must be rejected as an origin"
			);
		}

		let mut relative = scope_only_source();

		relative.clients.push(
			ClientSource::builder("spa")
				.grant(GrantType::AuthorizationCode)
				.require_client_secret(false)
				.redirect_uri("/signin-oidc")
				.allowed_scopes(["openid"])
				.build(),
		);

		assert!(matches!(
			Registry::load(relative),
			Err(ConfigError::InvalidUri { field: "redirect URI", .. })
		));
	}

	#[test]
	fn registry_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}

		assert_send_sync::<Registry>();
	}
}
