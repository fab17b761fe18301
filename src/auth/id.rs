//! Strongly typed identifiers for clients, API resources, and subjects.
//!
//! Each kind carries its own character and length rules: resource identifiers end up as token
//! audiences and scope tokens, subjects as the `sub` claim, so both follow the grammar of the
//! place they are echoed into.

// std
use std::{borrow::Borrow, cmp::Ordering, marker::PhantomData, ops::Deref};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Validation rules for one identifier kind.
pub trait IdentifierKind: 'static {
	/// Label used in errors and `Debug` output.
	const NAME: &'static str;
	/// Maximum length in bytes; every allowed character is ASCII.
	const MAX_LEN: usize;

	/// Returns true if `c` may appear in the identifier.
	fn allows(c: char) -> bool;
}

/// Registered client application. Printable ASCII without spaces (RFC 6749 `VSCHAR`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientKind {}
impl IdentifierKind for ClientKind {
	const NAME: &'static str = "Client";
	const MAX_LEN: usize = 200;

	fn allows(c: char) -> bool {
		c.is_ascii_graphic()
	}
}

/// Protected API resource. Usable verbatim as a scope token (RFC 6749 `NQCHAR`) and audience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {}
impl IdentifierKind for ResourceKind {
	const NAME: &'static str = "Resource";
	const MAX_LEN: usize = 200;

	fn allows(c: char) -> bool {
		c.is_ascii_graphic() && c != '"' && c != '\\'
	}
}

/// Authenticated end-user. OpenID Connect caps `sub` at 255 ASCII characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectKind {}
impl IdentifierKind for SubjectKind {
	const NAME: &'static str = "Subject";
	const MAX_LEN: usize = 255;

	fn allows(c: char) -> bool {
		c.is_ascii_graphic()
	}
}

/// Unique identifier of a registered client application.
pub type ClientId = Identifier<ClientKind>;
/// Unique identifier of a protected API resource (token audience).
pub type ResourceId = Identifier<ResourceKind>;
/// Identifier of the authenticated end-user (`sub`).
pub type SubjectId = Identifier<SubjectKind>;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains a character its kind does not allow.
	#[error("{kind} identifier contains disallowed character {character:?} at byte {position}.")]
	DisallowedCharacter {
		/// Kind of identifier.
		kind: &'static str,
		/// Offending character.
		character: char,
		/// Byte offset of the character.
		position: usize,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

/// Validated identifier of kind `K`.
pub struct Identifier<K> {
	value: String,
	kind: PhantomData<fn() -> K>,
}
impl<K> Identifier<K>
where
	K: IdentifierKind,
{
	/// Creates a new identifier after validation.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		let value = value.into();

		check::<K>(&value)?;

		Ok(Self { value, kind: PhantomData })
	}

	/// Borrows the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.value
	}
}
impl<K> Clone for Identifier<K> {
	fn clone(&self) -> Self {
		Self { value: self.value.clone(), kind: PhantomData }
	}
}
impl<K> PartialEq for Identifier<K> {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}
impl<K> Eq for Identifier<K> {}
impl<K> PartialOrd for Identifier<K> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl<K> Ord for Identifier<K> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.value.cmp(&other.value)
	}
}
// Must hash like `str` so `Borrow<str>` lookups work.
impl<K> Hash for Identifier<K> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.value.hash(state);
	}
}
impl<K> Deref for Identifier<K> {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.value
	}
}
impl<K> AsRef<str> for Identifier<K> {
	fn as_ref(&self) -> &str {
		&self.value
	}
}
impl<K> Borrow<str> for Identifier<K> {
	fn borrow(&self) -> &str {
		&self.value
	}
}
impl<K> From<Identifier<K>> for String {
	fn from(id: Identifier<K>) -> Self {
		id.value
	}
}
impl<K> TryFrom<String> for Identifier<K>
where
	K: IdentifierKind,
{
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl<K> FromStr for Identifier<K>
where
	K: IdentifierKind,
{
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl<K> Debug for Identifier<K>
where
	K: IdentifierKind,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}({})", K::NAME, self.value)
	}
}
impl<K> Display for Identifier<K> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.value)
	}
}
impl<K> Serialize for Identifier<K> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.value)
	}
}
impl<'de, K> Deserialize<'de> for Identifier<K>
where
	K: IdentifierKind,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Self::new(String::deserialize(deserializer)?).map_err(DeError::custom)
	}
}

fn check<K>(value: &str) -> Result<(), IdentifierError>
where
	K: IdentifierKind,
{
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind: K::NAME });
	}
	if let Some((position, character)) = value.char_indices().find(|(_, c)| !K::allows(*c)) {
		return Err(IdentifierError::DisallowedCharacter { kind: K::NAME, character, position });
	}
	if value.len() > K::MAX_LEN {
		return Err(IdentifierError::TooLong { kind: K::NAME, max: K::MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_padding_and_empty_values() {
		assert!(ClientId::new(" m2m.client").is_err(), "Leading whitespace must be rejected.");
		assert!(ClientId::new("m2m.client ").is_err(), "Trailing whitespace must be rejected.");

		let client = ClientId::new("m2m.client").expect("Client fixture should be valid.");

		assert_eq!(client.as_str(), "m2m.client");
		assert_eq!(SubjectId::new(""), Err(IdentifierError::Empty { kind: "Subject" }));
	}

	#[test]
	fn resources_must_be_valid_scope_tokens() {
		ResourceId::new("doughnutapi").expect("Plain resource name should be valid.");
		ResourceId::new("api://orders#v1").expect("Punctuation outside quote and backslash is fine.");

		assert_eq!(
			ResourceId::new("doughnut\"api"),
			Err(IdentifierError::DisallowedCharacter {
				kind: "Resource",
				character: '"',
				position: 8
			})
		);
		assert!(ResourceId::new("doughnut\\api").is_err());
		assert!(ResourceId::new("doughnut api").is_err());
		assert!(ClientId::new("legacy\"client").is_ok());
	}

	#[test]
	fn subjects_follow_the_sub_claim_limits() {
		SubjectId::new("a".repeat(255)).expect("255 ASCII characters should succeed.");

		assert_eq!(
			SubjectId::new("a".repeat(256)),
			Err(IdentifierError::TooLong { kind: "Subject", max: 255 })
		);
		assert!(ClientId::new("a".repeat(201)).is_err());

		let err = SubjectId::new("alicé").expect_err("Non-ASCII subjects must be rejected.");

		assert_eq!(err.to_string(), "Subject identifier contains disallowed character 'é' at byte 4.");
	}

	#[test]
	fn serde_enforces_validation() {
		let client: ClientId = serde_json::from_str("\"wewantdoughnuts\"")
			.expect("Client id should deserialize successfully.");

		assert_eq!(client.as_ref(), "wewantdoughnuts");
		assert_eq!(
			serde_json::to_string(&client).expect("Client id should serialize."),
			"\"wewantdoughnuts\""
		);
		assert!(serde_json::from_str::<ClientId>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_lookup_by_str() {
		let map: HashMap<ClientId, u8> = HashMap::from_iter([(
			ClientId::new("interactive").expect("Client used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("interactive"), Some(&7));
	}

	#[test]
	fn debug_names_the_kind() {
		let subject = SubjectId::new("818727").expect("Subject fixture should be valid.");

		assert_eq!(format!("{subject:?}"), "Subject(818727)");
	}
}
