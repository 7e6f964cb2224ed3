//! Simulated card-network adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::{ChargeRequest, Decision, ProviderAdapter, Settlement};
use crate::types::Provider;

/// Simulates a card authorization: a short gateway delay, then the
/// configured decision. Produces no receipt hash.
#[derive(Debug, Clone)]
pub struct CardNetworkAdapter {
    delay: Duration,
    decision: Decision,
}

impl CardNetworkAdapter {
    /// Typical simulated gateway latency.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            decision: Decision::Approve,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = decision;
        self
    }
}

impl Default for CardNetworkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for CardNetworkAdapter {
    fn provider(&self) -> Provider {
        Provider::CardNetwork
    }

    fn label(&self) -> &str {
        "Card Network"
    }

    async fn pay(&self, charge: &ChargeRequest) -> Settlement {
        tracing::debug!(
            intent = %charge.id,
            amount_minor = charge.amount_minor,
            currency = %charge.currency,
            "simulating card authorization"
        );
        tokio::time::sleep(self.delay).await;
        match self.decision {
            Decision::Approve => Settlement::settled(),
            Decision::Decline => Settlement::declined(),
        }
    }
}
