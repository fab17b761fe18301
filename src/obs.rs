//! Optional observability helpers for authorization decisions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every authorization inside an `oidc_gatekeeper.authorize` span with
//!   `grant` and `client` fields, emit a `debug` event for each rejection, and an `info` event
//!   whenever a registry snapshot is loaded.
//! - Enable `metrics` to increment the `oidc_gatekeeper_decision_total` counter for every
//!   terminal outcome, labeled by `grant` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Terminal outcome labels recorded for each authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
	/// Request approved.
	Approved,
	/// User consent must be collected first.
	ConsentRequired,
	/// Request rejected.
	Rejected,
}
impl DecisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DecisionOutcome::Approved => "approved",
			DecisionOutcome::ConsentRequired => "consent_required",
			DecisionOutcome::Rejected => "rejected",
		}
	}
}
impl Display for DecisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
