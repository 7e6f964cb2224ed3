//! End-to-end checkout runs against a mock HTTP ledger.

use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paydesk::adapters::{ChainSettlementAdapter, Decision, WalletNetworkAdapter};
use paydesk::flow::{CheckoutFlow, FlowError, PaymentRequest, SubmitOutcome};
use paydesk::ledger_client::LedgerClient;
use paydesk::registry::AdapterRegistry;
use paydesk::types::Provider;

fn intent_body(id: &str, amount_minor: u64, provider: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "amount_minor": amount_minor,
        "currency": "USD",
        "description": "Demo Payment",
        "provider": provider,
        "status": "processing",
        "created_at": "1700000000000000000"
    })
}

fn request(provider: Provider) -> PaymentRequest {
    PaymentRequest {
        amount: "10.00".to_string(),
        currency: "usd".to_string(),
        description: Some("Demo Payment".to_string()),
        provider,
    }
}

fn client_for(server: &MockServer) -> LedgerClient {
    LedgerClient::try_from(server.uri())
        .unwrap()
        .with_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn settled_checkout_creates_then_finalizes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intents"))
        .and(body_partial_json(serde_json::json!({
            "amount_minor": 1000,
            "currency": "USD",
            "provider": "chain-settlement"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(intent_body("int-1", 1000, "chain-settlement")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The simulated chain adapter scopes its receipt token to the intent id.
    Mock::given(method("POST"))
        .and(path("/intents/int-1/mark-paid"))
        .and(body_partial_json(serde_json::json!({
            "receipt_hash": "chain:demo:int-1"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let adapters = AdapterRegistry::new()
        .and_register(ChainSettlementAdapter::new().with_delay(Duration::ZERO));
    let flow = CheckoutFlow::new(client_for(&server), adapters);

    let outcome = flow
        .submit_payment(&request(Provider::ChainSettlement))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Settled {
            intent_id: "int-1".to_string()
        }
    );
}

#[tokio::test]
async fn declined_checkout_never_touches_mark_paid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(intent_body("int-2", 1000, "wallet-network")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/intents/int-2/mark-paid"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let adapters = AdapterRegistry::new().and_register(
        WalletNetworkAdapter::new()
            .with_delay(Duration::ZERO)
            .with_decision(Decision::Decline),
    );
    let flow = CheckoutFlow::new(client_for(&server), adapters);

    let outcome = flow
        .submit_payment(&request(Provider::WalletNetwork))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Declined {
            intent_id: "int-2".to_string()
        }
    );
}

#[tokio::test]
async fn unavailable_ledger_surfaces_as_retryable_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intents"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let adapters = AdapterRegistry::new()
        .and_register(ChainSettlementAdapter::new().with_delay(Duration::ZERO));
    let flow = CheckoutFlow::new(client_for(&server), adapters);

    let err = flow
        .submit_payment(&request(Provider::ChainSettlement))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::LedgerUnavailable { .. }));
}

#[tokio::test]
async fn unknown_provider_makes_no_http_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(intent_body("int-3", 1000, "card-network")),
        )
        .expect(0)
        .mount(&server)
        .await;

    let flow = CheckoutFlow::new(client_for(&server), AdapterRegistry::new());

    let err = flow
        .submit_payment(&request(Provider::CardNetwork))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::UnknownProvider(Provider::CardNetwork)));
}
