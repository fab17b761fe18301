//! Scope collections: sorted sets for membership and consent, ordered lists for requests.

// std
use std::{collections::HashSet, slice::Iter};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Reserved scope that asks for a refresh token.
pub const OFFLINE_ACCESS: &str = "offline_access";
/// Scope that turns an OAuth 2.0 request into an OpenID Connect request.
pub const OPENID: &str = "openid";

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized set of scope names.
///
/// Scopes are deduplicated and sorted, so two sets naming the same scopes compare, order, and
/// hash equal regardless of input order. Consent is recorded and checked in this form.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeSet {
	scopes: Arc<[String]>,
}
impl ScopeSet {
	/// Creates a normalized scope set from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut sorted = BTreeSet::new();

		for scope in scopes {
			sorted.insert(validate(scope.into())?);
		}

		Ok(Self::from_sorted(sorted))
	}

	// Callers guarantee every entry already passed `validate`.
	pub(crate) fn from_sorted(sorted: BTreeSet<String>) -> Self {
		Self { scopes: Arc::from(sorted.into_iter().collect::<Vec<_>>()) }
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the normalized set contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Returns true if every scope of `other` is also in `self`.
	pub fn is_superset(&self, other: &ScopeSet) -> bool {
		other.iter().all(|scope| self.contains(scope))
	}

	/// Returns the union of both sets.
	pub fn union(&self, other: &ScopeSet) -> ScopeSet {
		Self::from_sorted(self.iter().chain(other.iter()).map(str::to_owned).collect())
	}

	/// Iterator over normalized scopes.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Returns the normalized string representation (space-delimited).
	pub fn normalized(&self) -> String {
		self.scopes.join(" ")
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.scopes).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeSet {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.scopes.iter() }
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in self.scopes.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeSet::new(values).map_err(DeError::custom)
	}
}

/// Scope names exactly as requested: deduplicated, first occurrence wins.
///
/// Used wherever the caller expects its own ordering echoed back (the granted scope list).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestedScopes(Vec<String>);
impl RequestedScopes {
	/// Builds the ordered list, dropping repeats after their first occurrence.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut seen = HashSet::new();
		let mut ordered = Vec::new();

		for scope in scopes {
			let owned = validate(scope.into())?;

			if seen.insert(owned.clone()) {
				ordered.push(owned);
			}
		}

		Ok(Self(ordered))
	}

	/// Number of distinct requested scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if nothing was requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the scope was requested.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|s| s == scope)
	}

	/// Iterator in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Keeps only the scopes for which `keep` returns true, preserving order.
	pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
		Self(self.0.iter().filter(|s| keep(s.as_str())).cloned().collect())
	}

	/// Converts into the sorted set representation.
	pub fn to_set(&self) -> ScopeSet {
		ScopeSet::from_sorted(self.0.iter().cloned().collect())
	}

	/// Returns the scopes in request order.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl FromStr for RequestedScopes {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s.split_whitespace())
	}
}
impl Display for RequestedScopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join(" "))
	}
}

/// Checks a single scope name against the same rules the collections apply.
pub fn validate_scope(scope: &str) -> Result<(), ScopeValidationError> {
	validate(scope.to_owned()).map(|_| ())
}

fn validate(owned: String) -> Result<String, ScopeValidationError> {
	if owned.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	if owned.chars().any(char::is_whitespace) {
		return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
	}

	Ok(owned)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_regardless_of_input_order() {
		let lhs = ScopeSet::new(["profile", "openid", "openid"])
			.expect("Left-hand scope set should be valid.");
		let rhs =
			ScopeSet::new(["openid", "profile"]).expect("Right-hand scope set should be valid.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "openid profile");
		assert_eq!(HashSet::from([lhs, rhs]).len(), 1);
	}

	#[test]
	fn scopes_reject_whitespace_padding() {
		let err = ScopeSet::new([" profile "]).expect_err("Padded scopes must be rejected.");

		assert!(matches!(err, ScopeValidationError::ContainsWhitespace { .. }));
		assert!(ScopeSet::from_str("").is_ok(), "Empty string represents an empty scope set.");
		assert!(ScopeSet::from_str("   ").is_err(), "Whitespace-only input must be rejected.");
		assert!(ScopeSet::new([""]).is_err());
	}

	#[test]
	fn superset_checks_every_member() {
		let granted = ScopeSet::from_str("openid profile doughnutapi")
			.expect("Granted scope string should parse.");
		let asked = ScopeSet::from_str("doughnutapi openid").expect("Asked scopes should parse.");
		let more = ScopeSet::from_str("doughnutapi email").expect("Wider scopes should parse.");

		assert!(granted.is_superset(&asked));
		assert!(!granted.is_superset(&more));
		assert_eq!(asked.union(&more).normalized(), "doughnutapi email openid");
	}

	#[test]
	fn requested_scopes_keep_first_occurrence_order() {
		let requested = RequestedScopes::from_str("scope2 openid profile openid scope2")
			.expect("Requested scope string should parse.");

		assert_eq!(requested.iter().collect::<Vec<_>>(), vec!["scope2", "openid", "profile"]);
		assert_eq!(requested.to_string(), "scope2 openid profile");
		assert_eq!(requested.to_set().normalized(), "openid profile scope2");
	}

	#[test]
	fn requested_scopes_retain_preserves_order() {
		let requested = RequestedScopes::new(["email", "openid", "roles"])
			.expect("Requested scopes should build.");
		let kept = requested.retain(|scope| scope != "openid");

		assert_eq!(kept.as_slice(), &["email".to_string(), "roles".to_string()]);
		assert!(requested.contains("openid"));
		assert!(!kept.contains("openid"));
	}
}
