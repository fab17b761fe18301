//! Shared, swappable registry snapshots.
//!
//! Requests take a [`snapshot`](RegistryHandle::snapshot) once and keep it for their whole
//! lifetime; a [`reload`](RegistryHandle::reload) replaces the snapshot wholesale and never
//! mutates one that is already handed out.

// std
use std::sync::OnceLock;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	registry::{Registry, RegistrySource},
};

static GLOBAL: OnceLock<RegistryHandle> = OnceLock::new();

/// Holder of the current registry snapshot.
#[derive(Debug)]
pub struct RegistryHandle {
	current: RwLock<Arc<Registry>>,
}
impl RegistryHandle {
	/// Wraps an already-loaded registry.
	pub fn new(registry: Registry) -> Self {
		Self { current: RwLock::new(Arc::new(registry)) }
	}

	/// Current snapshot; cheap to clone and unaffected by later reloads.
	pub fn snapshot(&self) -> Arc<Registry> {
		self.current.read().clone()
	}

	/// Loads `source` with the options of the current snapshot, then swaps it in.
	///
	/// On failure the current snapshot stays in place.
	pub fn reload(&self, source: RegistrySource) -> Result<Arc<Registry>, ConfigError> {
		let options = self.current.read().options();
		let next = Arc::new(Registry::load_with(source, options)?);

		*self.current.write() = next.clone();

		Ok(next)
	}

	/// Swaps in a registry loaded elsewhere, returning the previous snapshot.
	pub fn replace(&self, registry: Registry) -> Arc<Registry> {
		std::mem::replace(&mut *self.current.write(), Arc::new(registry))
	}
}

/// Installs the process-wide handle. Fails if one is already installed.
pub fn install(registry: Registry) -> Result<&'static RegistryHandle, ConfigError> {
	let mut installed = false;
	let handle = GLOBAL.get_or_init(|| {
		installed = true;

		RegistryHandle::new(registry)
	});

	if installed { Ok(handle) } else { Err(ConfigError::AlreadyInstalled) }
}

/// Process-wide handle, if [`install`] has run.
pub fn global() -> Option<&'static RegistryHandle> {
	GLOBAL.get()
}

#[cfg(test)]
mod tests {
	// std
	use std::thread;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		registry::{ApiScopeSource, ClientSource, GrantType, LoadOptions},
	};

	#[test]
	fn snapshots_survive_reloads() {
		let handle = RegistryHandle::new(demo_registry());
		let before = handle.snapshot();
		let mut source = demo_source();

		source.clients.retain(|client| client.client_id != "mvc");

		let after = handle.reload(source).expect("Trimmed demo source should reload.");

		assert!(before.find_client("mvc").is_some());
		assert!(after.find_client("mvc").is_none());
		assert!(handle.snapshot().find_client("mvc").is_none());
	}

	#[test]
	fn failed_reload_keeps_the_current_snapshot() {
		let handle = RegistryHandle::new(demo_registry());
		let mut source = demo_source();

		source.api_scopes.clear();

		assert!(handle.reload(source).is_err());
		assert!(handle.snapshot().find_client("m2m.client").is_some());
	}

	#[test]
	fn reload_reuses_load_options() {
		let options = LoadOptions { external_secrets: true };
		let source = RegistrySource {
			api_scopes: vec![ApiScopeSource::new("scope1")],
			clients: vec![
				ClientSource::builder("vault-backed")
					.grant(GrantType::ClientCredentials)
					.allowed_scopes(["scope1"])
					.build(),
			],
			..Default::default()
		};
		let handle = RegistryHandle::new(
			Registry::load_with(source.clone(), options).expect("External-secret source should load."),
		);

		handle.reload(source).expect("Reload must keep the external-secret option.");

		let previous = handle.replace(demo_registry());

		assert!(previous.find_client("vault-backed").is_some());
		assert!(!handle.snapshot().options().external_secrets);
	}

	#[test]
	fn readers_share_snapshots_across_threads() {
		let handle = Arc::new(RegistryHandle::new(demo_registry()));
		let readers = (0..4)
			.map(|_| {
				let handle = handle.clone();

				thread::spawn(move || handle.snapshot().clients().count())
			})
			.collect::<Vec<_>>();

		for reader in readers {
			assert_eq!(reader.join().expect("Reader thread should not panic."), 7);
		}
	}

	#[test]
	fn global_installs_once() {
		let first = install(demo_registry()).expect("First install should succeed.");

		assert!(global().is_some_and(|handle| std::ptr::eq(handle, first)));
		assert_eq!(install(demo_registry()).err(), Some(ConfigError::AlreadyInstalled));
	}
}
