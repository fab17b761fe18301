//! Client secrets: one-way hashes at rest, redacted plaintext in flight.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Secret presented by a client at request time. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wraps a presented secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// One-way hash of the presented value, comparable with stored [`Secret`]s.
	pub fn hashed(&self) -> String {
		hash_secret(&self.0)
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
	}
}
impl Display for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Stored client secret: base64 SHA-256 hash plus optional metadata.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
	hash: String,
	/// Optional operator note.
	pub description: Option<String>,
	/// Instant after which the secret no longer verifies.
	pub expiration: Option<OffsetDateTime>,
}
impl Secret {
	/// Hashes a plaintext secret; the plaintext is not retained.
	pub fn sha256(plaintext: &str) -> Self {
		Self::from_hash(hash_secret(plaintext))
	}

	/// Wraps an already-hashed value.
	pub fn from_hash(hash: impl Into<String>) -> Self {
		Self { hash: hash.into(), description: None, expiration: None }
	}

	/// Attaches a description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Attaches an expiration instant.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Stored hash value.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// Returns true once `instant` reaches the expiration.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expiration.is_some_and(|expiration| instant >= expiration)
	}

	/// Compares the presented secret against this hash in constant time.
	pub fn verify(&self, presented: &ClientSecret) -> bool {
		constant_time_eq(self.hash.as_bytes(), presented.hashed().as_bytes())
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Secret")
			.field("hash", &"<redacted>")
			.field("description", &self.description)
			.field("expiration", &self.expiration)
			.finish()
	}
}

/// Base64 (padded) SHA-256 digest of a plaintext secret.
pub fn hash_secret(plaintext: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(plaintext.as_bytes());

	STANDARD.encode(hasher.finalize())
}

pub(crate) fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
	if lhs.len() != rhs.len() {
		return false;
	}

	lhs.iter().zip(rhs).fold(0_u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let presented = ClientSecret::new("super-secret");
		let stored = Secret::sha256("super-secret");

		assert_eq!(format!("{presented:?}"), "ClientSecret(\"<redacted>\")");
		assert_eq!(format!("{presented}"), "<redacted>");
		assert!(!format!("{stored:?}").contains(stored.hash()));
	}

	#[test]
	fn hash_matches_known_sha256_base64() {
		assert_eq!(hash_secret("secret"), "K7gNU3sdo+OL0wNhqoVWhr3g6s1xYv72ol/pe/Unols=");
	}

	#[test]
	fn verify_compares_hashes() {
		let stored = Secret::sha256("511536EF-F270-4058-80CA-1C89C192F69A");

		assert!(stored.verify(&ClientSecret::new("511536EF-F270-4058-80CA-1C89C192F69A")));
		assert!(!stored.verify(&ClientSecret::new("511536ef-f270-4058-80ca-1c89c192f69a")));
		assert!(!stored.verify(&ClientSecret::new("")));
	}

	#[test]
	fn expiration_is_inclusive() {
		let instant = macros::datetime!(2026-01-01 00:00 UTC);
		let stored = Secret::sha256("secret").with_expiration(instant);

		assert!(!stored.is_expired_at(instant - Duration::seconds(1)));
		assert!(stored.is_expired_at(instant));
		assert!(!Secret::sha256("secret").is_expired_at(instant));
	}
}
