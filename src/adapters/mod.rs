//! Provider adapters: a uniform settlement capability over one payment
//! provider.
//!
//! Each adapter wraps one provider's collection step behind
//! [`ProviderAdapter::pay`]. The contract:
//!
//! - `ok == true` means the payment is to be treated as settled.
//! - `receipt_hash`, when present, is an opaque token meaningful only to the
//!   issuing provider. No adapter is required to produce one; a settled
//!   result without a hash is valid.
//! - `ok == false` is a decline (shopper backed out or the provider said
//!   no), not an error.
//!
//! The bundled adapters simulate their providers: they sleep a
//! provider-typical latency and resolve according to a constructor-chosen
//! [`Decision`]. In a production system each would wrap a real gateway SDK.

use async_trait::async_trait;

use crate::types::Provider;

pub mod card;
pub mod chain;
pub mod wallet;

pub use card::CardNetworkAdapter;
pub use chain::ChainSettlementAdapter;
pub use wallet::WalletNetworkAdapter;

/// What the checkout flow hands an adapter when asking it to collect payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Ledger-assigned intent id.
    pub id: String,
    /// Amount in the currency's smallest unit.
    pub amount_minor: u64,
    /// ISO 4217 code, uppercase.
    pub currency: String,
    pub description: Option<String>,
}

/// Outcome of one settlement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub ok: bool,
    pub receipt_hash: Option<String>,
}

impl Settlement {
    /// A confirmed settlement without a receipt.
    pub fn settled() -> Self {
        Self {
            ok: true,
            receipt_hash: None,
        }
    }

    /// A confirmed settlement carrying a provider-opaque receipt token.
    pub fn settled_with_receipt(receipt_hash: impl Into<String>) -> Self {
        Self {
            ok: true,
            receipt_hash: Some(receipt_hash.into()),
        }
    }

    /// A declined attempt. The intent stays pending and may be retried.
    pub fn declined() -> Self {
        Self {
            ok: false,
            receipt_hash: None,
        }
    }
}

/// Simulated shopper decision used by the demo adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    /// Confirm the simulated payment.
    #[default]
    Approve,
    /// Back out of the simulated payment.
    Decline,
}

/// The uniform capability every payment provider is wrapped behind.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable identifier of the provider this adapter settles for.
    fn provider(&self) -> Provider;

    /// Human-readable label shown in checkout surfaces.
    fn label(&self) -> &str;

    /// Collects payment for one intent, suspending until the payment method
    /// resolves. Adapters do not time out on their own; the checkout flow
    /// bounds the wait with its own deadline.
    async fn pay(&self, charge: &ChargeRequest) -> Settlement;
}
