//! Simulated wallet-network adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::{ChargeRequest, Decision, ProviderAdapter, Settlement};
use crate::types::Provider;

/// Simulates a digital-wallet confirmation: the wallet redirect round-trip
/// takes a bit longer than card rails. Produces no receipt hash.
#[derive(Debug, Clone)]
pub struct WalletNetworkAdapter {
    delay: Duration,
    decision: Decision,
}

impl WalletNetworkAdapter {
    /// Typical simulated redirect round-trip latency.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1200);

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

impl Default for WalletNetworkAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for WalletNetworkAdapter {
    fn provider(&self) -> Provider {
        Provider::WalletNetwork
    }

    fn label(&self) -> &str {
        "Wallet Network"
    }

    async fn pay(&self, charge: &ChargeRequest) -> Settlement {
        tracing::debug!(
            intent = %charge.id,
            amount_minor = charge.amount_minor,
            currency = %charge.currency,
            "simulating wallet confirmation"
        );
        tokio::time::sleep(self.delay).await;
        match self.decision {
            Decision::Approve => Settlement::settled(),
            Decision::Decline => Settlement::declined(),
        }
    }
}
