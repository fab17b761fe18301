//! Thread-safe in-memory [`ConsentStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, SubjectId},
	authorize::ConsentRecord,
	store::{ConsentStore, StoreError},
};

type ConsentKey = (ClientId, SubjectId);
type ConsentMap = Arc<RwLock<HashMap<ConsentKey, ScopeSet>>>;

/// Consent store that keeps grants in-process. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryConsentStore(ConsentMap);
impl MemoryConsentStore {
	/// Records consent, widening any earlier grant for the same client and subject.
	pub fn grant(&self, record: ConsentRecord) {
		let ConsentRecord { client_id, subject_id, scopes } = record;
		let mut guard = self.0.write();
		let merged = match guard.get(&(client_id.clone(), subject_id.clone())) {
			Some(existing) => existing.union(&scopes),
			None => scopes,
		};

		guard.insert((client_id, subject_id), merged);
	}

	/// Withdraws every consent the subject gave the client. Returns true if one existed.
	pub fn revoke(&self, client: &ClientId, subject: &SubjectId) -> bool {
		self.0.write().remove(&(client.clone(), subject.clone())).is_some()
	}

	/// Scopes currently consented for the pair, if any.
	pub fn consented(&self, client: &ClientId, subject: &SubjectId) -> Option<ScopeSet> {
		self.0.read().get(&(client.clone(), subject.clone())).cloned()
	}
}
impl ConsentStore for MemoryConsentStore {
	fn has_consented(
		&self,
		client: &ClientId,
		subject: &SubjectId,
		scopes: &ScopeSet,
	) -> Result<bool, StoreError> {
		Ok(self
			.0
			.read()
			.get(&(client.clone(), subject.clone()))
			.is_some_and(|granted| granted.is_superset(scopes)))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn ids() -> (ClientId, SubjectId) {
		(
			ClientId::new("wewantdoughnuts").expect("Client fixture should be valid."),
			SubjectId::new("818727").expect("Subject fixture should be valid."),
		)
	}

	fn scopes(value: &str) -> ScopeSet {
		ScopeSet::from_str(value).expect("Scope fixture should parse.")
	}

	#[test]
	fn consent_covers_subsets_only() {
		let store = MemoryConsentStore::default();
		let (client, subject) = ids();

		store.grant(ConsentRecord::new(client.clone(), subject.clone(), scopes("openid doughnutapi")));

		assert_eq!(store.has_consented(&client, &subject, &scopes("doughnutapi")), Ok(true));
		assert_eq!(store.has_consented(&client, &subject, &scopes("openid doughnutapi")), Ok(true));
		assert_eq!(store.has_consented(&client, &subject, &scopes("openid email")), Ok(false));
	}

	#[test]
	fn grants_accumulate_and_revoke_clears() {
		let store = MemoryConsentStore::default();
		let shared = store.clone();
		let (client, subject) = ids();

		store.grant(ConsentRecord::new(client.clone(), subject.clone(), scopes("openid")));
		shared.grant(ConsentRecord::new(client.clone(), subject.clone(), scopes("email")));

		assert_eq!(store.consented(&client, &subject), Some(scopes("email openid")));
		assert!(store.revoke(&client, &subject));
		assert!(!shared.revoke(&client, &subject));
		assert_eq!(store.has_consented(&client, &subject, &scopes("openid")), Ok(false));
	}

	#[test]
	fn other_subjects_are_isolated() {
		let store = MemoryConsentStore::default();
		let (client, subject) = ids();
		let other = SubjectId::new("bob").expect("Subject fixture should be valid.");

		store.grant(ConsentRecord::new(client.clone(), subject, scopes("openid")));

		assert_eq!(store.has_consented(&client, &other, &scopes("openid")), Ok(false));
	}
}
