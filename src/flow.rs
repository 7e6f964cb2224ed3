//! The checkout flow: drives one payment intent from creation to a
//! settlement outcome.
//!
//! The ledger always holds the canonical status. The flow only ever
//! *advances* an intent — create it `Processing`, and on a confirmed
//! settlement finalize it `Succeeded`. It never marks `Failed` or
//! `Refunded`; those are set exclusively by the ledger through separate
//! paths. A declined attempt issues no finalize call and leaves the intent
//! `Processing`, eligible for a fresh attempt against the same id.
//!
//! Remote failures are reported to the caller without retry; a created
//! intent is never rolled back on partial failure (it stays `Processing`,
//! matching reality — settlement did not happen).

use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::instrument;

use crate::adapters::ChargeRequest;
use crate::ledger::Ledger;
use crate::registry::AdapterRegistry;
use crate::types::{IntentDraft, Provider};
use crate::util::{MoneyAmount, MoneyAmountParseError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A shopper's checkout submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Decimal amount string (two-fraction-digit currency assumed),
    /// e.g. `"10.00"`.
    pub amount: String,
    /// ISO 4217 code; normalized to uppercase before it crosses the
    /// ledger boundary.
    pub currency: String,
    pub description: Option<String>,
    pub provider: Provider,
}

/// How a submission ended, short of an error.
///
/// Declined is deliberately *not* an error: the shopper or provider said
/// no, the intent stays pending on the ledger, and the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The adapter confirmed and the ledger recorded the intent as paid.
    /// The id is ready for redirection to a receipt view.
    Settled { intent_id: String },
    /// The settlement attempt was declined; no finalize call was issued.
    Declined { intent_id: String },
}

impl SubmitOutcome {
    pub fn intent_id(&self) -> &str {
        match self {
            SubmitOutcome::Settled { intent_id } => intent_id,
            SubmitOutcome::Declined { intent_id } => intent_id,
        }
    }
}

impl Display for SubmitOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitOutcome::Settled { intent_id } => write!(f, "settled ({intent_id})"),
            SubmitOutcome::Declined { intent_id } => write!(f, "declined ({intent_id})"),
        }
    }
}

/// All possible failures of a checkout submission.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The amount string did not parse as a positive two-decimal amount.
    /// Checked before anything leaves the process.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] MoneyAmountParseError),
    /// A ledger call failed. Retryable by the caller; no local state is
    /// retained.
    #[error("ledger unavailable: {source}")]
    LedgerUnavailable {
        #[source]
        source: BoxError,
    },
    /// No adapter is registered for the requested provider. A
    /// programming/configuration error, detected before any network call.
    #[error("unknown provider: {0}")]
    UnknownProvider(Provider),
    /// The adapter did not resolve within the settlement deadline. The
    /// intent remains `Processing` on the ledger.
    #[error("settlement attempt timed out after {0:?}")]
    SettlementTimeout(Duration),
}

/// Drives payment intents through creation, settlement, and finalization.
///
/// Generic over the [`Ledger`] so tests run against an in-memory fake. The
/// adapter registry is injected at construction; concurrent submissions for
/// different intents are independent and unordered.
#[derive(Clone)]
pub struct CheckoutFlow<L> {
    ledger: L,
    adapters: AdapterRegistry,
    settle_timeout: Option<Duration>,
}

impl<L> CheckoutFlow<L>
where
    L: Ledger,
{
    /// Default deadline for one settlement attempt.
    ///
    /// An adapter that never resolves would otherwise suspend the flow
    /// forever. [`CheckoutFlow::without_settle_timeout`] removes the bound
    /// for callers that accept that.
    pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(ledger: L, adapters: AdapterRegistry) -> Self {
        Self {
            ledger,
            adapters,
            settle_timeout: Some(Self::DEFAULT_SETTLE_TIMEOUT),
        }
    }

    /// Sets the settlement deadline.
    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = Some(timeout);
        self
    }

    /// Removes the settlement deadline; the flow waits on the adapter
    /// indefinitely.
    pub fn without_settle_timeout(mut self) -> Self {
        self.settle_timeout = None;
        self
    }

    /// Submits one payment: parse the amount, open the intent on the
    /// ledger, run the provider adapter, and on confirmation finalize the
    /// intent as paid.
    ///
    /// Returns [`SubmitOutcome::Settled`] with the intent id on success and
    /// [`SubmitOutcome::Declined`] when the attempt was turned down (the
    /// intent stays `Processing`).
    ///
    /// # Errors
    ///
    /// - [`FlowError::InvalidAmount`] — before any remote call.
    /// - [`FlowError::UnknownProvider`] — before any remote call; the
    ///   adapter must exist before an intent is opened for it.
    /// - [`FlowError::LedgerUnavailable`] — intent creation or finalize
    ///   failed. If creation succeeded first, the intent stays
    ///   `Processing`, recoverable by an operator or a later retry.
    /// - [`FlowError::SettlementTimeout`] — the adapter never resolved;
    ///   the intent stays `Processing`.
    #[instrument(
        name = "checkout.submit_payment",
        skip_all,
        err,
        fields(provider = %request.provider, currency = %request.currency)
    )]
    pub async fn submit_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<SubmitOutcome, FlowError> {
        // The sole point where a textual amount becomes integer minor units.
        let amount_minor = MoneyAmount::parse(&request.amount)?.minor_units()?;

        let adapter = self
            .adapters
            .by_provider(request.provider)
            .ok_or(FlowError::UnknownProvider(request.provider))?;

        let draft = IntentDraft::new(
            amount_minor,
            &request.currency,
            request.description.clone(),
            request.provider,
        );
        let intent = self
            .ledger
            .create_intent(draft)
            .await
            .map_err(|e| FlowError::LedgerUnavailable {
                source: Box::new(e),
            })?;
        tracing::debug!(intent = %intent.id, amount_minor, "intent opened");

        let charge = ChargeRequest {
            id: intent.id.clone(),
            amount_minor,
            currency: intent.currency.clone(),
            description: intent.description.clone(),
        };
        let settlement = match self.settle_timeout {
            Some(deadline) => tokio::time::timeout(deadline, adapter.pay(&charge))
                .await
                .map_err(|_| FlowError::SettlementTimeout(deadline))?,
            None => adapter.pay(&charge).await,
        };

        if settlement.ok {
            self.ledger
                .mark_paid(&intent.id, settlement.receipt_hash)
                .await
                .map_err(|e| FlowError::LedgerUnavailable {
                    source: Box::new(e),
                })?;
            tracing::info!(intent = %intent.id, "payment settled");
            Ok(SubmitOutcome::Settled {
                intent_id: intent.id,
            })
        } else {
            tracing::info!(intent = %intent.id, "payment declined, intent left processing");
            Ok(SubmitOutcome::Declined {
                intent_id: intent.id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;

    use crate::adapters::{ProviderAdapter, Settlement};
    use crate::timestamp::UnixNanos;
    use crate::types::{
        HealthStatus, IntentStatus, Invoice, InvoiceDraft, PaymentIntent, ProviderConfig,
    };

    #[derive(Debug, thiserror::Error)]
    #[error("ledger offline")]
    struct LedgerOffline;

    /// In-memory ledger recording every call the flow makes.
    #[derive(Default)]
    struct RecordingLedger {
        intents: Mutex<Vec<PaymentIntent>>,
        mark_paid_calls: Mutex<Vec<(String, Option<String>)>>,
        create_calls: Mutex<usize>,
        fail_creates: bool,
    }

    impl RecordingLedger {
        fn offline() -> Self {
            Self {
                fail_creates: true,
                ..Self::default()
            }
        }

        fn intent(&self, id: &str) -> Option<PaymentIntent> {
            self.intents
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.id == id)
                .cloned()
        }

        fn create_calls(&self) -> usize {
            *self.create_calls.lock().unwrap()
        }

        fn mark_paid_calls(&self) -> Vec<(String, Option<String>)> {
            self.mark_paid_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Ledger for RecordingLedger {
        type Error = LedgerOffline;

        async fn create_intent(&self, draft: IntentDraft) -> Result<PaymentIntent, Self::Error> {
            *self.create_calls.lock().unwrap() += 1;
            if self.fail_creates {
                return Err(LedgerOffline);
            }
            let mut intents = self.intents.lock().unwrap();
            let seq = intents.len() as u64 + 1;
            let intent = PaymentIntent {
                id: format!("int-{seq}"),
                amount_minor: draft.amount_minor,
                currency: draft.currency,
                description: draft.description,
                provider: draft.provider,
                status: IntentStatus::Processing,
                receipt_hash: None,
                created_at: UnixNanos::from_nanos(seq * 1_000_000_000),
            };
            intents.push(intent.clone());
            Ok(intent)
        }

        async fn get_intent(&self, id: &str) -> Result<Option<PaymentIntent>, Self::Error> {
            Ok(self.intent(id))
        }

        async fn list_intents(&self) -> Result<Vec<PaymentIntent>, Self::Error> {
            Ok(self.intents.lock().unwrap().clone())
        }

        async fn mark_paid(
            &self,
            id: &str,
            receipt_hash: Option<String>,
        ) -> Result<(), Self::Error> {
            self.mark_paid_calls
                .lock()
                .unwrap()
                .push((id.to_string(), receipt_hash.clone()));
            let mut intents = self.intents.lock().unwrap();
            if let Some(intent) = intents.iter_mut().find(|i| i.id == id) {
                intent.status = IntentStatus::Succeeded;
                intent.receipt_hash = receipt_hash;
            }
            Ok(())
        }

        async fn refund_intent(&self, _id: &str) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn create_invoice(&self, _draft: InvoiceDraft) -> Result<Invoice, Self::Error> {
            Err(LedgerOffline)
        }

        async fn list_invoices(&self) -> Result<Vec<Invoice>, Self::Error> {
            Ok(vec![])
        }

        async fn set_provider_config(&self, _config: ProviderConfig) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn get_provider_configs(&self) -> Result<Vec<ProviderConfig>, Self::Error> {
            Ok(vec![])
        }

        async fn health(&self) -> Result<HealthStatus, Self::Error> {
            Ok(HealthStatus {
                healthy: true,
                timestamp: UnixNanos::from_nanos(0),
            })
        }
    }

    /// Adapter resolving instantly with a fixed settlement.
    struct FakeAdapter {
        provider: Provider,
        settlement: Settlement,
    }

    #[async_trait]
    impl ProviderAdapter for FakeAdapter {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn label(&self) -> &str {
            "Fake"
        }

        async fn pay(&self, _charge: &ChargeRequest) -> Settlement {
            self.settlement.clone()
        }
    }

    /// Adapter that never resolves.
    struct StalledAdapter(Provider);

    #[async_trait]
    impl ProviderAdapter for StalledAdapter {
        fn provider(&self) -> Provider {
            self.0
        }

        fn label(&self) -> &str {
            "Stalled"
        }

        async fn pay(&self, _charge: &ChargeRequest) -> Settlement {
            std::future::pending().await
        }
    }

    fn request(provider: Provider) -> PaymentRequest {
        PaymentRequest {
            amount: "10.00".to_string(),
            currency: "USD".to_string(),
            description: Some("Demo Payment".to_string()),
            provider,
        }
    }

    #[tokio::test]
    async fn confirmed_settlement_finalizes_the_intent() {
        let ledger = Arc::new(RecordingLedger::default());
        let adapters = AdapterRegistry::new().and_register(FakeAdapter {
            provider: Provider::ChainSettlement,
            settlement: Settlement::settled_with_receipt("x"),
        });
        let flow = CheckoutFlow::new(ledger.clone(), adapters);

        let outcome = flow
            .submit_payment(&request(Provider::ChainSettlement))
            .await
            .unwrap();

        let intent_id = match outcome {
            SubmitOutcome::Settled { ref intent_id } => intent_id.clone(),
            other => panic!("expected settled, got {other:?}"),
        };
        let intent = ledger.intent(&intent_id).unwrap();
        assert_eq!(intent.amount_minor, 1000);
        assert_eq!(intent.status, IntentStatus::Succeeded);
        assert_eq!(intent.receipt_hash.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn declined_settlement_issues_no_finalize_call() {
        let ledger = Arc::new(RecordingLedger::default());
        let adapters = AdapterRegistry::new().and_register(FakeAdapter {
            provider: Provider::CardNetwork,
            settlement: Settlement::declined(),
        });
        let flow = CheckoutFlow::new(ledger.clone(), adapters);

        let outcome = flow
            .submit_payment(&request(Provider::CardNetwork))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Declined { .. }));
        assert!(ledger.mark_paid_calls().is_empty());
        let intent = ledger.intent(outcome.intent_id()).unwrap();
        assert_eq!(intent.status, IntentStatus::Processing);
    }

    #[tokio::test]
    async fn unknown_provider_fails_before_any_ledger_call() {
        let ledger = Arc::new(RecordingLedger::default());
        let flow = CheckoutFlow::new(ledger.clone(), AdapterRegistry::new());

        let err = flow
            .submit_payment(&request(Provider::WalletNetwork))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FlowError::UnknownProvider(Provider::WalletNetwork)
        ));
        assert_eq!(ledger.create_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_amount_fails_before_any_ledger_call() {
        let ledger = Arc::new(RecordingLedger::default());
        let flow = CheckoutFlow::new(ledger.clone(), AdapterRegistry::defaults());

        let mut bad = request(Provider::CardNetwork);
        bad.amount = "ten dollars".to_string();
        let err = flow.submit_payment(&bad).await.unwrap_err();

        assert!(matches!(err, FlowError::InvalidAmount(_)));
        assert_eq!(ledger.create_calls(), 0);
    }

    #[tokio::test]
    async fn unavailable_ledger_aborts_with_nothing_retained() {
        let ledger = Arc::new(RecordingLedger::offline());
        let adapters = AdapterRegistry::new().and_register(FakeAdapter {
            provider: Provider::CardNetwork,
            settlement: Settlement::settled(),
        });
        let flow = CheckoutFlow::new(ledger.clone(), adapters);

        let err = flow
            .submit_payment(&request(Provider::CardNetwork))
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::LedgerUnavailable { .. }));
        assert!(ledger.mark_paid_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_adapter_trips_the_settlement_deadline() {
        let ledger = Arc::new(RecordingLedger::default());
        let adapters =
            AdapterRegistry::new().and_register(StalledAdapter(Provider::ChainSettlement));
        let flow = CheckoutFlow::new(ledger.clone(), adapters)
            .with_settle_timeout(Duration::from_secs(5));

        let err = flow
            .submit_payment(&request(Provider::ChainSettlement))
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::SettlementTimeout(_)));
        // The intent was opened and stays pending; nothing was finalized.
        assert_eq!(ledger.create_calls(), 1);
        assert!(ledger.mark_paid_calls().is_empty());
        let intents = ledger.list_intents().await.unwrap();
        assert_eq!(intents[0].status, IntentStatus::Processing);
    }

    #[tokio::test]
    async fn settlement_without_receipt_hash_is_valid() {
        let ledger = Arc::new(RecordingLedger::default());
        let adapters = AdapterRegistry::new().and_register(FakeAdapter {
            provider: Provider::WalletNetwork,
            settlement: Settlement::settled(),
        });
        let flow = CheckoutFlow::new(ledger.clone(), adapters);

        let outcome = flow
            .submit_payment(&request(Provider::WalletNetwork))
            .await
            .unwrap();

        let intent = ledger.intent(outcome.intent_id()).unwrap();
        assert_eq!(intent.status, IntentStatus::Succeeded);
        assert_eq!(intent.receipt_hash, None);
        assert_eq!(ledger.mark_paid_calls(), vec![(intent.id.clone(), None)]);
    }
}
