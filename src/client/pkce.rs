//! Proof Key for Code Exchange (RFC 7636): challenge verification and pair generation.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::secret};

const VERIFIER_MIN_LEN: usize = 43;
const VERIFIER_MAX_LEN: usize = 128;
const GENERATED_VERIFIER_LEN: usize = 64;

/// Errors emitted while checking a PKCE proof.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PkceError {
	/// The verifier is shorter or longer than RFC 7636 allows.
	#[error("Code verifier must be 43 to 128 characters, got {len}.")]
	VerifierLength {
		/// Observed length.
		len: usize,
	},
	/// The verifier contains characters outside the unreserved set.
	#[error("Code verifier contains characters outside `[A-Za-z0-9-._~]`.")]
	VerifierCharset,
	/// The challenge method is not recognized.
	#[error("Unsupported code challenge method: {method}.")]
	UnsupportedMethod {
		/// Presented method.
		method: String,
	},
	/// The client does not accept the `plain` method.
	#[error("Plain code challenges are not allowed for this client.")]
	PlainNotAllowed,
	/// The verifier does not match the challenge.
	#[error("Code verifier does not match the code challenge.")]
	Mismatch,
}

/// Supported PKCE challenge methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PkceMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	#[default]
	S256,
	/// Verifier sent unchanged; accepted only when the client allows it.
	#[serde(rename = "plain")]
	Plain,
}
impl PkceMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub fn as_str(self) -> &'static str {
		match self {
			PkceMethod::S256 => "S256",
			PkceMethod::Plain => "plain",
		}
	}
}
impl FromStr for PkceMethod {
	type Err = PkceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"S256" => Ok(Self::S256),
			"plain" => Ok(Self::Plain),
			other => Err(PkceError::UnsupportedMethod { method: other.into() }),
		}
	}
}
impl Display for PkceMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Code challenge recorded when the authorization request was made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChallenge {
	/// Challenge value.
	pub value: String,
	/// Transformation applied to the verifier.
	pub method: PkceMethod,
}
impl CodeChallenge {
	/// `S256` challenge.
	pub fn s256(value: impl Into<String>) -> Self {
		Self { value: value.into(), method: PkceMethod::S256 }
	}

	/// `plain` challenge.
	pub fn plain(value: impl Into<String>) -> Self {
		Self { value: value.into(), method: PkceMethod::Plain }
	}

	/// Checks the verifier format, then compares its transform with the challenge.
	pub fn verify(&self, verifier: &str) -> Result<(), PkceError> {
		validate_verifier(verifier)?;

		let expected = match self.method {
			PkceMethod::S256 => compute_challenge(verifier),
			PkceMethod::Plain => verifier.to_owned(),
		};

		if secret::constant_time_eq(expected.as_bytes(), self.value.as_bytes()) {
			Ok(())
		} else {
			Err(PkceError::Mismatch)
		}
	}
}

/// Freshly generated verifier and its `S256` challenge, for callers acting as the client.
#[derive(Clone)]
pub struct PkcePair {
	/// Secret verifier; kept by the client until the code exchange.
	pub verifier: String,
	/// Challenge sent with the authorization request.
	pub challenge: CodeChallenge,
}
impl PkcePair {
	/// Generates a random alphanumeric verifier and derives the challenge.
	pub fn generate() -> Self {
		let verifier = rand::rng()
			.sample_iter(Alphanumeric)
			.take(GENERATED_VERIFIER_LEN)
			.map(char::from)
			.collect::<String>();
		let challenge = CodeChallenge::s256(compute_challenge(&verifier));

		Self { verifier, challenge }
	}
}
impl Debug for PkcePair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PkcePair")
			.field("verifier", &"<redacted>")
			.field("challenge", &self.challenge)
			.finish()
	}
}

/// Validates length and character set of a verifier.
pub fn validate_verifier(verifier: &str) -> Result<(), PkceError> {
	let len = verifier.len();

	if !(VERIFIER_MIN_LEN..=VERIFIER_MAX_LEN).contains(&len) {
		return Err(PkceError::VerifierLength { len });
	}
	if !verifier.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
	{
		return Err(PkceError::VerifierCharset);
	}

	Ok(())
}

/// Base64url (no padding) SHA-256 of the verifier.
pub fn compute_challenge(verifier: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}
