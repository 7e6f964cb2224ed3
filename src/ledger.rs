//! The ledger trait: the narrow RPC surface of the external backend.
//!
//! The backend owns the canonical record of intents, invoices, and provider
//! configuration; everything in this crate reaches it exclusively through
//! [`Ledger`]. The HTTP implementation lives in
//! [`ledger_client`](crate::ledger_client); tests substitute in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{
    HealthStatus, IntentDraft, Invoice, InvoiceDraft, PaymentIntent, ProviderConfig,
};

/// Asynchronous interface to the external payment ledger.
///
/// Every method is a remote call: a fresh snapshot per invocation, no local
/// caching, no cancellation once issued. List operations return new copies
/// each call.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// The error type returned by this ledger.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a new intent. The ledger assigns the id and `created_at` and
    /// starts the intent in `Processing`.
    async fn create_intent(&self, draft: IntentDraft) -> Result<PaymentIntent, Self::Error>;

    /// Fetches one intent; `None` if the id is unknown.
    async fn get_intent(&self, id: &str) -> Result<Option<PaymentIntent>, Self::Error>;

    /// Fetches a fresh snapshot of all intents.
    async fn list_intents(&self) -> Result<Vec<PaymentIntent>, Self::Error>;

    /// Finalizes an intent as paid, attaching an optional opaque receipt
    /// hash. Only called after an adapter confirmed settlement.
    async fn mark_paid(&self, id: &str, receipt_hash: Option<String>) -> Result<(), Self::Error>;

    /// Refunds a settled intent. Operator tooling only; the checkout flow
    /// never calls this.
    async fn refund_intent(&self, id: &str) -> Result<(), Self::Error>;

    /// Issues a new invoice, unpaid.
    async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, Self::Error>;

    /// Fetches a fresh snapshot of all invoices.
    async fn list_invoices(&self) -> Result<Vec<Invoice>, Self::Error>;

    /// Replaces the full configuration record for one provider. Last writer
    /// wins; no optimistic-concurrency check is performed client-side.
    async fn set_provider_config(&self, config: ProviderConfig) -> Result<(), Self::Error>;

    /// Fetches all provider configuration records.
    async fn get_provider_configs(&self) -> Result<Vec<ProviderConfig>, Self::Error>;

    /// Liveness probe; the returned timestamp is the ledger's own clock.
    async fn health(&self) -> Result<HealthStatus, Self::Error>;
}

#[async_trait]
impl<T: Ledger> Ledger for Arc<T> {
    type Error = T::Error;

    async fn create_intent(&self, draft: IntentDraft) -> Result<PaymentIntent, Self::Error> {
        self.as_ref().create_intent(draft).await
    }

    async fn get_intent(&self, id: &str) -> Result<Option<PaymentIntent>, Self::Error> {
        self.as_ref().get_intent(id).await
    }

    async fn list_intents(&self) -> Result<Vec<PaymentIntent>, Self::Error> {
        self.as_ref().list_intents().await
    }

    async fn mark_paid(&self, id: &str, receipt_hash: Option<String>) -> Result<(), Self::Error> {
        self.as_ref().mark_paid(id, receipt_hash).await
    }

    async fn refund_intent(&self, id: &str) -> Result<(), Self::Error> {
        self.as_ref().refund_intent(id).await
    }

    async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, Self::Error> {
        self.as_ref().create_invoice(draft).await
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, Self::Error> {
        self.as_ref().list_invoices().await
    }

    async fn set_provider_config(&self, config: ProviderConfig) -> Result<(), Self::Error> {
        self.as_ref().set_provider_config(config).await
    }

    async fn get_provider_configs(&self) -> Result<Vec<ProviderConfig>, Self::Error> {
        self.as_ref().get_provider_configs().await
    }

    async fn health(&self) -> Result<HealthStatus, Self::Error> {
        self.as_ref().health().await
    }
}
