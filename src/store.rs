//! Collaborator contracts consulted during authorization, plus an in-memory consent store.
//!
//! Both traits are synchronous: implementations answer from their own cache or block on their
//! own I/O. Calls are never retried, and any [`StoreError`] aborts the request.

pub mod memory;

pub use memory::MemoryConsentStore;

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, ScopeSet, SubjectId},
};

/// Source of previously granted consent.
pub trait ConsentStore
where
	Self: Send + Sync,
{
	/// Returns true if the subject already consented to every scope in `scopes` for the client.
	fn has_consented(
		&self,
		client: &ClientId,
		subject: &SubjectId,
		scopes: &ScopeSet,
	) -> Result<bool, StoreError>;
}

/// External secret verifier, used instead of secrets embedded in the registry.
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Returns true if the presented secret is currently valid for the client.
	fn verify(&self, client: &ClientId, presented: &ClientSecret) -> Result<bool, StoreError>;
}

/// Error type produced by [`ConsentStore`] and [`SecretStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The backend could not be reached or answered with a failure.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Stored data could not be decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "consent database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("consent database unreachable"));

		let source =
			StdError::source(&error).expect("Crate error should expose the store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn traits_are_object_safe() {
		struct Deny;
		impl SecretStore for Deny {
			fn verify(&self, _: &ClientId, _: &ClientSecret) -> Result<bool, StoreError> {
				Ok(false)
			}
		}

		let store: &dyn SecretStore = &Deny;
		let client = ClientId::new("m2m.client").expect("Client fixture should be valid.");

		assert_eq!(store.verify(&client, &ClientSecret::new("x")), Ok(false));
	}
}
