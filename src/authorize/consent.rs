// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, SubjectId},
	registry::Client,
	resolve::ResolvedScopes,
};

/// Consent a subject gave a client for a set of scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
	/// Consented client.
	pub client_id: ClientId,
	/// Consenting user.
	pub subject_id: SubjectId,
	/// Scopes covered.
	pub scopes: ScopeSet,
}
impl ConsentRecord {
	/// Creates a record.
	pub fn new(client_id: ClientId, subject_id: SubjectId, scopes: ScopeSet) -> Self {
		Self { client_id, subject_id, scopes }
	}

	/// Returns true if the record is for this pair and covers every scope in `scopes`.
	pub fn covers(&self, client: &ClientId, subject: &SubjectId, scopes: &ScopeSet) -> bool {
		&self.client_id == client && &self.subject_id == subject && self.scopes.is_superset(scopes)
	}
}

/// What the consent screen must present before the request can be approved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentPrompt {
	/// Client asking for access.
	pub client_id: ClientId,
	/// Client display name, when configured.
	pub client_name: Option<String>,
	/// User being asked.
	pub subject: SubjectId,
	/// Scopes awaiting consent, already filtered to what the client may receive.
	pub scopes: ResolvedScopes,
}
impl ConsentPrompt {
	pub(crate) fn new(client: &Client, subject: SubjectId, scopes: ResolvedScopes) -> Self {
		Self { client_id: client.id.clone(), client_name: client.name.clone(), subject, scopes }
	}

	/// Record to persist once the user approves every listed scope.
	pub fn approve(&self) -> ConsentRecord {
		ConsentRecord::new(self.client_id.clone(), self.subject.clone(), self.scopes.scope_set())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn record() -> ConsentRecord {
		ConsentRecord::new(
			ClientId::new("wewantdoughnuts").expect("Client fixture should be valid."),
			SubjectId::new("818727").expect("Subject fixture should be valid."),
			ScopeSet::from_str("openid profile doughnutapi").expect("Scope fixture should parse."),
		)
	}

	#[test]
	fn records_cover_their_pair_and_subsets() {
		let record = record();
		let client = record.client_id.clone();
		let subject = record.subject_id.clone();
		let other = SubjectId::new("bob").expect("Subject fixture should be valid.");
		let narrow = ScopeSet::from_str("openid doughnutapi").expect("Scope fixture should parse.");
		let wide = ScopeSet::from_str("openid email").expect("Scope fixture should parse.");

		assert!(record.covers(&client, &subject, &narrow));
		assert!(!record.covers(&client, &subject, &wide));
		assert!(!record.covers(&client, &other, &narrow));
	}

	#[test]
	fn records_serialize_with_scope_lists() {
		let json = serde_json::to_value(record()).expect("Consent record should serialize.");

		assert_eq!(json["client_id"], "wewantdoughnuts");
		assert_eq!(json["scopes"], serde_json::json!(["doughnutapi", "openid", "profile"]));
	}
}
