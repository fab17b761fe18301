//! Scope resolution: splits requested names into identity scopes, API scopes, and unknown
//! names, and derives the token audiences implied by the API scopes.

// self
use crate::{
	_prelude::*,
	auth::{OFFLINE_ACCESS, RequestedScopes, ResourceId, ScopeSet},
	registry::Registry,
};

/// Resolves requested scope names against a registry snapshot.
#[derive(Clone, Copy, Debug)]
pub struct ScopeResolver<'r> {
	registry: &'r Registry,
}
impl<'r> ScopeResolver<'r> {
	/// Creates a resolver borrowing the snapshot.
	pub fn new(registry: &'r Registry) -> Self {
		Self { registry }
	}

	/// Resolves the requested names, looking each up as an identity resource first and then as
	/// an API scope. `offline_access` is recognized but never looked up.
	pub fn resolve(&self, requested: &RequestedScopes) -> ResolvedScopes {
		let mut resolved = ResolvedScopes::default();
		let mut resource_sets = Vec::<BTreeSet<ResourceId>>::new();

		for scope in requested.iter() {
			if scope == OFFLINE_ACCESS {
				resolved.offline_access = true;
			} else if let Some(identity) = self.registry.find_identity_resource(scope) {
				resolved.identity_scopes.insert(scope.to_owned());
				resolved.claim_types.extend(identity.claim_types.iter().cloned());
			} else if self.registry.find_api_scope(scope).is_some() {
				let owners = self.registry.resources_for_scope(scope).cloned().collect::<BTreeSet<_>>();

				resolved.api_scopes.insert(scope.to_owned());
				resolved.audiences.extend(owners.iter().map(ToString::to_string));

				if !owners.is_empty() {
					resource_sets.push(owners);
				}
			} else {
				resolved.invalid_scopes.insert(scope.to_owned());

				continue;
			}

			resolved.granted.push(scope.to_owned());
		}

		resolved.split = resource_sets.windows(2).any(|pair| pair[0] != pair[1]);

		resolved
	}
}

/// Outcome of [`ScopeResolver::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedScopes {
	/// Requested names that are identity resources.
	pub identity_scopes: BTreeSet<String>,
	/// Requested names that are API scopes.
	pub api_scopes: BTreeSet<String>,
	/// Identifiers of every resource owning one of the API scopes.
	pub audiences: BTreeSet<String>,
	/// Requested names found nowhere in the registry.
	pub invalid_scopes: BTreeSet<String>,
	/// `offline_access` was requested.
	pub offline_access: bool,
	/// Resolvable names in request order, first occurrence wins.
	pub granted: Vec<String>,
	/// Claim types covered by the identity scopes.
	pub claim_types: BTreeSet<String>,
	split: bool,
}
impl ResolvedScopes {
	/// Returns true when every API scope that has owners maps to the same resource set, so a
	/// single token can carry all audiences.
	pub fn audiences_shared(&self) -> bool {
		!self.split
	}

	/// Returns true if nothing resolved.
	pub fn is_empty(&self) -> bool {
		self.granted.is_empty()
	}

	/// Granted names as a sorted set.
	pub fn scope_set(&self) -> ScopeSet {
		ScopeSet::from_sorted(self.granted.iter().cloned().collect())
	}

	/// Granted names in request order, space-delimited.
	pub fn granted_string(&self) -> String {
		self.granted.join(" ")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		registry::{ApiResourceSource, ApiScopeSource, Registry, RegistrySource},
	};

	fn requested(value: &str) -> RequestedScopes {
		RequestedScopes::from_str(value).expect("Requested scope fixture should parse.")
	}

	fn set(values: &[&str]) -> BTreeSet<String> {
		values.iter().map(|value| (*value).to_owned()).collect()
	}

	#[test]
	fn interactive_scopes_split_without_audiences() {
		let registry = demo_registry();
		let resolved = ScopeResolver::new(&registry).resolve(&requested("openid profile scope2"));

		assert_eq!(resolved.identity_scopes, set(&["openid", "profile"]));
		assert_eq!(resolved.api_scopes, set(&["scope2"]));
		assert!(resolved.audiences.is_empty());
		assert!(resolved.invalid_scopes.is_empty());
		assert!(resolved.claim_types.contains("sub"));
		assert!(resolved.claim_types.contains("preferred_username"));
	}

	#[test]
	fn api_scopes_imply_their_resources() {
		let registry = demo_registry();
		let resolved = ScopeResolver::new(&registry).resolve(&requested("doughnutapi roles"));

		assert_eq!(resolved.audiences, set(&["doughnutapi"]));
		assert_eq!(resolved.claim_types, set(&["role"]));
		assert!(resolved.audiences_shared());
	}

	#[test]
	fn unknown_names_are_collected_not_granted() {
		let registry = demo_registry();
		let resolved =
			ScopeResolver::new(&registry).resolve(&requested("scope9 email offline_access scope1"));

		assert_eq!(resolved.invalid_scopes, set(&["scope9"]));
		assert!(resolved.offline_access);
		assert_eq!(resolved.granted, vec!["email", "offline_access", "scope1"]);
		assert_eq!(resolved.granted_string(), "email offline_access scope1");
		assert_eq!(resolved.scope_set().normalized(), "email offline_access scope1");
	}

	#[test]
	fn scope_set_covers_every_granted_name() {
		let registry = demo_registry();
		let resolved = ScopeResolver::new(&registry).resolve(&requested("roles openid doughnutapi"));
		let scopes = resolved.scope_set();
		let narrower = ScopeSet::from_str("openid roles").expect("Narrower scopes should parse.");

		assert_eq!(scopes.len(), resolved.granted.len());
		assert!(resolved.granted.iter().all(|scope| scopes.contains(scope)));
		assert!(!narrower.is_superset(&scopes));
		assert!(scopes.is_superset(&narrower));
	}

	#[test]
	fn resolution_is_idempotent_and_order_insensitive() {
		let registry = demo_registry();
		let resolver = ScopeResolver::new(&registry);
		let first = resolver.resolve(&requested("roles doughnutapi openid bogus"));
		let again = resolver.resolve(&requested("roles doughnutapi openid bogus"));
		let shuffled = resolver.resolve(&requested("openid bogus doughnutapi roles"));

		assert_eq!(first, again);
		assert_eq!(first.identity_scopes, shuffled.identity_scopes);
		assert_eq!(first.api_scopes, shuffled.api_scopes);
		assert_eq!(first.audiences, shuffled.audiences);
		assert_eq!(first.invalid_scopes, shuffled.invalid_scopes);
		assert_eq!(first.granted, vec!["roles", "doughnutapi", "openid"]);
		assert_eq!(shuffled.granted, vec!["openid", "doughnutapi", "roles"]);

		let granted = RequestedScopes::new(first.granted.clone())
			.expect("Granted scopes should form a valid request.");

		assert_eq!(resolver.resolve(&granted).granted, first.granted);
	}

	#[test]
	fn diverging_resource_sets_require_split_tokens() {
		let registry = Registry::load(RegistrySource {
			api_resources: vec![
				ApiResourceSource::new("orders", ["orders.read", "shared"]),
				ApiResourceSource::new("billing", ["billing.read", "shared"]),
			],
			api_scopes: vec![
				ApiScopeSource::new("orders.read"),
				ApiScopeSource::new("billing.read"),
				ApiScopeSource::new("shared"),
			],
			..Default::default()
		})
		.expect("Two-resource registry should load.");
		let resolver = ScopeResolver::new(&registry);
		let single = resolver.resolve(&requested("shared"));
		let mixed = resolver.resolve(&requested("orders.read billing.read"));

		assert_eq!(single.audiences, set(&["billing", "orders"]));
		assert!(single.audiences_shared());
		assert_eq!(mixed.audiences, set(&["billing", "orders"]));
		assert!(!mixed.audiences_shared());
	}
}
