// self
use crate::{obs::DecisionOutcome, registry::GrantType};

/// Records a terminal authorization outcome via the global metrics recorder (when enabled).
pub fn record_decision(grant: GrantType, outcome: DecisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oidc_gatekeeper_decision_total",
			"grant" => grant.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (grant, outcome);
	}
}
