//! Storefront and admin front end for a multi-provider payment demo.
//!
//! This crate drives payment intents from creation to settlement against an
//! external ledger backend. The ledger owns the canonical record of
//! intents, invoices, and provider configuration; this crate holds only
//! transient snapshots and reaches the backend through a narrow RPC
//! surface.
//!
//! # Roles
//!
//! - **Shopper**: the checkout flow ([`flow`]) opens an intent, runs the
//!   chosen provider adapter, and finalizes the intent as paid when the
//!   adapter confirms.
//! - **Operator**: the admin surfaces issue invoices, save provider
//!   configuration, refund settled intents, and read aggregated reports
//!   ([`report`]).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters: a uniform settlement capability per payment provider |
//! | [`config`] | Front-end configuration with env-var fallbacks |
//! | [`flow`] | The checkout flow driving one intent to a settlement outcome |
//! | [`ledger`] | The [`Ledger`](ledger::Ledger) trait: the backend's RPC surface |
//! | [`ledger_client`] | JSON-over-HTTP implementation of the ledger trait |
//! | [`registry`] | Explicit adapter registry, injected into the flow |
//! | [`report`] | Pure read-side projections for the admin views |
//! | [`timestamp`] | Nanosecond wire timestamps, string-encoded in JSON |
//! | [`types`] | Domain types: intents, invoices, provider configuration |
//! | [`util`] | Fixed-point money parsing |
//!
//! # Example
//!
//! ```rust,no_run
//! use paydesk::flow::{CheckoutFlow, PaymentRequest};
//! use paydesk::ledger_client::LedgerClient;
//! use paydesk::registry::AdapterRegistry;
//! use paydesk::types::Provider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = LedgerClient::try_from("http://127.0.0.1:8080")?;
//! let flow = CheckoutFlow::new(ledger, AdapterRegistry::defaults());
//! let outcome = flow
//!     .submit_payment(&PaymentRequest {
//!         amount: "10.00".to_string(),
//!         currency: "USD".to_string(),
//!         description: Some("Demo Payment".to_string()),
//!         provider: Provider::ChainSettlement,
//!     })
//!     .await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod flow;
pub mod ledger;
pub mod ledger_client;
pub mod registry;
pub mod report;
pub mod timestamp;
pub mod types;
pub mod util;
