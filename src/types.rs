//! Core domain types shared by the checkout flow, the admin view, and the
//! ledger boundary.
//!
//! The ledger's discriminated variants ([`Provider`], [`IntentStatus`]) are
//! modeled as closed enums with exhaustive matching, so a value that matches
//! none of the variants is a deserialization error rather than a silent
//! fall-through.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::timestamp::UnixNanos;

/// Payment providers supported by the storefront.
///
/// Chosen at intent creation and immutable thereafter.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    /// Card rails (simulated card-network authorization).
    #[serde(rename = "card-network")]
    CardNetwork,
    /// Digital wallet (simulated wallet-network confirmation).
    #[serde(rename = "wallet-network")]
    WalletNetwork,
    /// On-chain transfer (simulated chain settlement with a receipt marker).
    #[serde(rename = "chain-settlement")]
    ChainSettlement,
}

impl Provider {
    /// Return all known [`Provider`] variants.
    pub fn variants() -> &'static [Provider] {
        &[
            Provider::CardNetwork,
            Provider::WalletNetwork,
            Provider::ChainSettlement,
        ]
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::CardNetwork => write!(f, "card-network"),
            Provider::WalletNetwork => write!(f, "wallet-network"),
            Provider::ChainSettlement => write!(f, "chain-settlement"),
        }
    }
}

/// Error returned when parsing a [`Provider`] from a string.
#[derive(Debug, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct ProviderParseError(String);

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card-network" => Ok(Provider::CardNetwork),
            "wallet-network" => Ok(Provider::WalletNetwork),
            "chain-settlement" => Ok(Provider::ChainSettlement),
            other => Err(ProviderParseError(other.to_string())),
        }
    }
}

/// Lifecycle status of a payment intent, as recorded by the ledger.
///
/// The local flow only ever advances an intent from `Processing` to
/// `Succeeded`; `Failed` and `Refunded` are set exclusively by the ledger.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    /// Created, settlement not (yet) recorded.
    Processing,
    /// A settlement attempt confirmed and was finalized.
    Succeeded,
    /// Marked failed by the ledger through an out-of-band path.
    Failed,
    /// Refunded by an operator after success.
    Refunded,
}

impl IntentStatus {
    /// Return all known [`IntentStatus`] variants.
    pub fn variants() -> &'static [IntentStatus] {
        &[
            IntentStatus::Processing,
            IntentStatus::Succeeded,
            IntentStatus::Failed,
            IntentStatus::Refunded,
        ]
    }
}

impl Display for IntentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentStatus::Processing => write!(f, "processing"),
            IntentStatus::Succeeded => write!(f, "succeeded"),
            IntentStatus::Failed => write!(f, "failed"),
            IntentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// A single payment attempt tracked by the ledger.
///
/// The ledger owns the canonical record; values held here are transient
/// snapshots fetched per view and discarded on navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Opaque identifier, assigned by the ledger at creation.
    pub id: String,
    /// Amount in the currency's smallest unit (e.g. cents). Always > 0.
    pub amount_minor: u64,
    /// ISO 4217 code, uppercase.
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider: Provider,
    pub status: IntentStatus,
    /// Present if and only if a settlement attempt reported success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_hash: Option<String>,
    /// Set once by the ledger; non-decreasing in id order.
    pub created_at: UnixNanos,
}

/// Fields the storefront supplies when asking the ledger to open an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDraft {
    pub amount_minor: u64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub provider: Provider,
}

impl IntentDraft {
    /// Builds a draft, normalizing the currency code to uppercase at the
    /// single point where it crosses the boundary.
    pub fn new(
        amount_minor: u64,
        currency: &str,
        description: Option<String>,
        provider: Provider,
    ) -> Self {
        Self {
            amount_minor,
            currency: currency.to_ascii_uppercase(),
            description,
            provider,
        }
    }
}

/// A billing record, independent of the intent flow.
///
/// Append-only: invoices are never deleted, and `paid` flips to true only
/// through an explicit mark-paid action on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub amount_minor: u64,
    pub currency: String,
    pub issued_at: UnixNanos,
    /// Opaque as stored by the ledger; never decoded client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_enc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub paid: bool,
}

/// Fields the admin view supplies when issuing an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub amount_minor: u64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_enc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InvoiceDraft {
    pub fn new(
        amount_minor: u64,
        currency: &str,
        email_enc: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            amount_minor,
            currency: currency.to_ascii_uppercase(),
            email_enc,
            description,
        }
    }
}

/// Operator-supplied key/value configuration for one provider.
///
/// Saved wholesale: a write replaces the full `kv` sequence for that
/// provider. Keys need not be unique; the sequence is passed through
/// verbatim and the ledger is the sole arbiter of acceptability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub kv: Vec<(String, String)>,
}

/// Ledger liveness report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub timestamp: UnixNanos,
}
