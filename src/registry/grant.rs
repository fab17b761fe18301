// self
use crate::_prelude::*;

/// OAuth 2.0 / OpenID Connect grant types a client may be allowed to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant (PKCE per client policy).
	AuthorizationCode,
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
	/// Refresh Token grant for long-lived sessions.
	RefreshToken,
	/// Implicit grant; tokens are returned from the authorize endpoint.
	Implicit,
	/// Hybrid flow; a code plus front-channel tokens.
	Hybrid,
	/// Resource Owner Password Credentials grant.
	Password,
	/// Device Authorization grant (RFC 8628).
	DeviceCode,
}
impl GrantType {
	/// Returns the protocol identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::ClientCredentials => "client_credentials",
			GrantType::RefreshToken => "refresh_token",
			GrantType::Implicit => "implicit",
			GrantType::Hybrid => "hybrid",
			GrantType::Password => "password",
			GrantType::DeviceCode => "urn:ietf:params:oauth:grant-type:device_code",
		}
	}

	/// Redirect-based grants that go through the user agent.
	pub fn is_interactive(self) -> bool {
		matches!(self, GrantType::AuthorizationCode | GrantType::Implicit | GrantType::Hybrid)
	}

	/// Grants that issue an authorization code, and can therefore carry PKCE.
	pub fn issues_code(self) -> bool {
		matches!(self, GrantType::AuthorizationCode | GrantType::Hybrid)
	}

	/// Grants that hand access tokens to the user agent.
	pub fn delivers_tokens_via_browser(self) -> bool {
		matches!(self, GrantType::Implicit | GrantType::Hybrid)
	}

	/// Grants acting on behalf of an end-user rather than the client itself.
	pub fn has_subject(self) -> bool {
		!matches!(self, GrantType::ClientCredentials)
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Set of grants a client is allowed to use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowedGrants(BTreeSet<GrantType>);
impl AllowedGrants {
	/// Returns true if the provided grant is allowed.
	pub fn supports(&self, grant: GrantType) -> bool {
		self.0.contains(&grant)
	}

	/// Marks a grant as allowed.
	pub fn enable(mut self, grant: GrantType) -> Self {
		self.0.insert(grant);

		self
	}

	/// Returns true when no grants are allowed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Allowed grants in declaration order of [`GrantType`].
	pub fn iter(&self) -> impl Iterator<Item = GrantType> + '_ {
		self.0.iter().copied()
	}
}
impl FromIterator<GrantType> for AllowedGrants {
	fn from_iter<I: IntoIterator<Item = GrantType>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grant_categories() {
		assert!(GrantType::AuthorizationCode.is_interactive());
		assert!(GrantType::Hybrid.issues_code());
		assert!(!GrantType::Implicit.issues_code());
		assert!(GrantType::Implicit.delivers_tokens_via_browser());
		assert!(!GrantType::ClientCredentials.has_subject());
		assert!(!GrantType::DeviceCode.is_interactive());
	}

	#[test]
	fn allowed_grants_membership() {
		let grants = AllowedGrants::default().enable(GrantType::AuthorizationCode);

		assert!(grants.supports(GrantType::AuthorizationCode));
		assert!(!grants.supports(GrantType::ClientCredentials));
		assert!(AllowedGrants::default().is_empty());
	}

	#[test]
	fn grants_deserialize_from_snake_case() {
		let grants: AllowedGrants = serde_json::from_str(r#"["client_credentials","device_code"]"#)
			.expect("Grant list should deserialize.");

		assert!(grants.supports(GrantType::DeviceCode));
		assert_eq!(GrantType::DeviceCode.to_string(), "urn:ietf:params:oauth:grant-type:device_code");
	}
}
