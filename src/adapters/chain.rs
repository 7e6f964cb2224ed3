//! Simulated chain-settlement adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::{ChargeRequest, Decision, ProviderAdapter, Settlement};
use crate::types::Provider;

/// Simulates an on-chain transfer: the slowest of the three, and the only
/// one that attaches a receipt token (a stand-in for an on-chain receipt).
#[derive(Debug, Clone)]
pub struct ChainSettlementAdapter {
    delay: Duration,
    decision: Decision,
}

impl ChainSettlementAdapter {
    /// Typical simulated block-inclusion latency.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

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

impl Default for ChainSettlementAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for ChainSettlementAdapter {
    fn provider(&self) -> Provider {
        Provider::ChainSettlement
    }

    fn label(&self) -> &str {
        "Chain Settlement"
    }

    async fn pay(&self, charge: &ChargeRequest) -> Settlement {
        tracing::debug!(
            intent = %charge.id,
            amount_minor = charge.amount_minor,
            currency = %charge.currency,
            "simulating chain settlement"
        );
        tokio::time::sleep(self.delay).await;
        match self.decision {
            Decision::Approve => {
                Settlement::settled_with_receipt(format!("chain:demo:{}", charge.id))
            }
            Decision::Decline => Settlement::declined(),
        }
    }
}
