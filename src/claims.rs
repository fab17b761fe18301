//! Claim and audience assembly for approved requests.
//!
//! The payload is handed to an external token issuer; nothing here signs or serializes tokens.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::OPENID, authorize::AuthorizationDecision};

const SUBJECT_CLAIM: &str = "sub";
const CLIENT_ID_CLAIM: &str = "client_id";

/// Single token claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
	/// Claim type, e.g. `email` or `client_tier`.
	#[serde(rename = "type")]
	pub claim_type: String,
	/// Claim value.
	pub value: Value,
}
impl Claim {
	/// Creates a claim.
	pub fn new(claim_type: impl Into<String>, value: impl Into<Value>) -> Self {
		Self { claim_type: claim_type.into(), value: value.into() }
	}
}

/// Claims known about the end-user, supplied by the hosting layer's user store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserClaims(Vec<Claim>);
impl UserClaims {
	/// Empty claim set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a claim.
	pub fn with(mut self, claim_type: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.push(Claim::new(claim_type, value));

		self
	}

	/// Iterator in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Claim> {
		self.0.iter()
	}
}
impl FromIterator<Claim> for UserClaims {
	fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Claims and audiences for the tokens of one approved request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimsPayload {
	/// Client the tokens are issued to.
	pub client_id: String,
	/// End-user, when the grant has one.
	pub subject: Option<String>,
	/// Access token audiences.
	pub audiences: BTreeSet<String>,
	/// Granted scopes in request order.
	pub scopes: Vec<String>,
	/// A refresh token may be issued.
	pub offline_access: bool,
	/// Access token claims.
	pub access_token_claims: Vec<Claim>,
	/// Identity token claims; present only for OpenID Connect requests with a subject.
	pub identity_token_claims: Option<Vec<Claim>>,
	/// The API scopes map to different resource sets, so the issuer must mint one access token
	/// per audience instead of a single token.
	pub audience_split_required: bool,
}
impl ClaimsPayload {
	/// First access token claim of the type.
	pub fn access_claim(&self, claim_type: &str) -> Option<&Claim> {
		self.access_token_claims.iter().find(|claim| claim.claim_type == claim_type)
	}

	/// First identity token claim of the type.
	pub fn identity_claim(&self, claim_type: &str) -> Option<&Claim> {
		self.identity_token_claims.as_ref()?.iter().find(|claim| claim.claim_type == claim_type)
	}
}

/// Builds a [`ClaimsPayload`] from an approved decision.
#[derive(Clone, Debug)]
pub struct TokenClaimsBuilder<'a, 'r> {
	decision: &'a AuthorizationDecision<'r>,
	user_claims: UserClaims,
}
impl<'a, 'r> TokenClaimsBuilder<'a, 'r> {
	/// Starts a builder with no user claims.
	pub fn new(decision: &'a AuthorizationDecision<'r>) -> Self {
		Self { decision, user_claims: UserClaims::default() }
	}

	/// Supplies user claims; only types covered by the granted identity scopes are kept.
	pub fn user_claims(mut self, claims: UserClaims) -> Self {
		self.user_claims = claims;

		self
	}

	/// Assembles the payload.
	pub fn build(self) -> ClaimsPayload {
		let TokenClaimsBuilder { decision, user_claims } = self;
		let client = decision.client;
		let subject = decision.subject.as_ref().map(ToString::to_string);
		let gated = user_claims
			.0
			.into_iter()
			.filter(|claim| {
				claim.claim_type != SUBJECT_CLAIM
					&& decision.scopes.claim_types.contains(&claim.claim_type)
			})
			.collect::<Vec<_>>();
		let client_claims: Vec<Claim> = if subject.is_none() || client.always_send_client_claims {
			client
				.claims
				.iter()
				.map(|claim| {
					Claim::new(
						format!("{}{}", client.client_claims_prefix, claim.claim_type),
						claim.value.as_str(),
					)
				})
				.collect()
		} else {
			Vec::new()
		};
		let mut access_token_claims = vec![Claim::new(CLIENT_ID_CLAIM, client.id.to_string())];

		if let Some(subject) = &subject {
			access_token_claims.push(Claim::new(SUBJECT_CLAIM, subject.as_str()));
		}

		access_token_claims.extend(client_claims.iter().cloned());
		access_token_claims.extend(gated.iter().cloned());

		let identity_token_claims = match &subject {
			Some(subject) if decision.scopes.identity_scopes.contains(OPENID) => {
				let mut claims = vec![Claim::new(SUBJECT_CLAIM, subject.as_str())];

				if client.always_send_client_claims {
					claims.extend(client_claims);
				}
				if client.always_include_user_claims_in_id_token {
					claims.extend(gated);
				}

				Some(claims)
			},
			_ => None,
		};

		ClaimsPayload {
			client_id: client.id.to_string(),
			subject,
			audiences: decision.scopes.audiences.clone(),
			scopes: decision.scopes.granted.clone(),
			offline_access: decision.scopes.offline_access,
			access_token_claims,
			identity_token_claims,
			audience_split_required: !decision.scopes.audiences_shared(),
		}
	}
}
