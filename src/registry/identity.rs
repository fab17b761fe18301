//! Well-known OpenID Connect identity resources and their claim bundles.

// self
use crate::{_prelude::*, registry::IdentityResource};

/// Identity resources defined by OpenID Connect Core, section 5.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardIdentityResource {
	/// `openid`: the subject identifier.
	#[serde(rename = "openid")]
	OpenId,
	/// `profile`: default profile claims.
	Profile,
	/// `email`: email address and verification flag.
	Email,
	/// `address`: postal address.
	Address,
	/// `phone`: phone number and verification flag.
	Phone,
}
impl StandardIdentityResource {
	/// Every standard resource; all are resolvable without registration.
	pub const ALL: [Self; 5] = [Self::OpenId, Self::Profile, Self::Email, Self::Address, Self::Phone];

	/// Scope name of the resource.
	pub const fn name(self) -> &'static str {
		match self {
			Self::OpenId => "openid",
			Self::Profile => "profile",
			Self::Email => "email",
			Self::Address => "address",
			Self::Phone => "phone",
		}
	}

	/// Display name shown on consent screens.
	pub const fn display_name(self) -> &'static str {
		match self {
			Self::OpenId => "Your user identifier",
			Self::Profile => "User profile",
			Self::Email => "Your email address",
			Self::Address => "Your postal address",
			Self::Phone => "Your phone number",
		}
	}

	/// Claim types granted by the resource.
	pub const fn claim_types(self) -> &'static [&'static str] {
		match self {
			Self::OpenId => &["sub"],
			Self::Profile => &[
				"name",
				"family_name",
				"given_name",
				"middle_name",
				"nickname",
				"preferred_username",
				"profile",
				"picture",
				"website",
				"gender",
				"birthdate",
				"zoneinfo",
				"locale",
				"updated_at",
			],
			Self::Email => &["email", "email_verified"],
			Self::Address => &["address"],
			Self::Phone => &["phone_number", "phone_number_verified"],
		}
	}

	/// Materializes the registry entity.
	pub fn resource(self) -> IdentityResource {
		IdentityResource {
			name: self.name().into(),
			display_name: self.display_name().into(),
			claim_types: self.claim_types().iter().map(|claim| (*claim).into()).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_round_trip_through_serde() {
		for standard in StandardIdentityResource::ALL {
			let json = serde_json::to_string(&standard).expect("Standard resource should serialize.");

			assert_eq!(json, format!("\"{}\"", standard.name()));
		}
	}

	#[test]
	fn openid_grants_subject_only() {
		assert_eq!(StandardIdentityResource::OpenId.resource().claim_types, vec!["sub".to_string()]);
		assert!(StandardIdentityResource::Profile.claim_types().contains(&"preferred_username"));
	}
}
