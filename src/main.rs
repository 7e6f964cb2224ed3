//! Storefront/admin CLI for the payment demo ledger.
//!
//! Subcommands stand in for the storefront's pages:
//! - `checkout` – shopper flow: open an intent, run the provider adapter,
//!   finalize on confirmation
//! - `receipt` – show one intent
//! - `report` – status histogram, revenue, recent payments
//! - `invoice create|list` – billing records
//! - `provider set|list` – provider configuration
//! - `refund` – operator refund of a settled intent
//! - `health` – ledger liveness
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `LEDGER_URL`, `REQUEST_TIMEOUT_SECS`, `SETTLE_TIMEOUT_SECS`
//! - `RUST_LOG` controls tracing output

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::process;
use tracing_subscriber::EnvFilter;

use paydesk::adapters::{
    CardNetworkAdapter, ChainSettlementAdapter, Decision, WalletNetworkAdapter,
};
use paydesk::config::{Config, config_defaults};
use paydesk::flow::{CheckoutFlow, PaymentRequest, SubmitOutcome};
use paydesk::ledger_client::LedgerClient;
use paydesk::registry::AdapterRegistry;
use paydesk::report;
use paydesk::types::{Provider, ProviderConfig};
use paydesk::util::MoneyAmount;

#[derive(Parser, Debug)]
#[command(name = "paydesk")]
#[command(about = "Storefront and admin front end for the payment demo ledger")]
struct Cli {
    /// Base URL of the ledger backend
    #[arg(long, global = true, env = "LEDGER_URL", default_value_t = config_defaults::default_ledger_url())]
    ledger_url: String,
    /// Per-request timeout towards the ledger, in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value_t = config_defaults::default_request_timeout_secs())]
    request_timeout_secs: u64,
    /// Settlement deadline in seconds; 0 waits indefinitely
    #[arg(long, global = true, env = "SETTLE_TIMEOUT_SECS", default_value_t = config_defaults::default_settle_timeout_secs())]
    settle_timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a shopper checkout against the chosen provider
    Checkout {
        /// Decimal amount, e.g. 10.00
        #[arg(long)]
        amount: String,
        /// ISO 4217 currency code
        #[arg(long, default_value = "USD")]
        currency: String,
        #[arg(long)]
        description: Option<String>,
        /// card-network, wallet-network, or chain-settlement
        #[arg(long)]
        provider: String,
        /// Simulate the shopper backing out of the payment
        #[arg(long)]
        decline: bool,
    },
    /// Show one intent as a receipt
    Receipt { id: String },
    /// Status histogram, revenue, and recent payments
    Report,
    /// Billing records
    #[command(subcommand)]
    Invoice(InvoiceCommand),
    /// Provider configuration
    #[command(subcommand)]
    Provider(ProviderCommand),
    /// Refund a settled intent
    Refund { id: String },
    /// Check ledger liveness
    Health,
}

#[derive(Subcommand, Debug)]
enum InvoiceCommand {
    /// Issue a new invoice
    Create {
        /// Decimal amount, e.g. 10.00
        #[arg(long)]
        amount: String,
        /// ISO 4217 currency code
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Recipient email, stored opaquely by the ledger
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List all invoices
    List,
}

#[derive(Subcommand, Debug)]
enum ProviderCommand {
    /// Replace one provider's configuration record
    Set {
        /// card-network, wallet-network, or chain-settlement
        provider: String,
        /// key=value entries, repeatable; saved in the given order
        #[arg(short = 'k', long = "kv")]
        entries: Vec<String>,
    },
    /// List configured providers
    List,
}

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::new(
        &cli.ledger_url,
        cli.request_timeout_secs,
        cli.settle_timeout_secs,
    )?;
    let ledger =
        LedgerClient::try_from(config.ledger_url().as_str())?.with_timeout(config.request_timeout());

    match cli.command {
        Command::Checkout {
            amount,
            currency,
            description,
            provider,
            decline,
        } => {
            let provider: Provider = provider.parse()?;
            let decision = if decline {
                Decision::Decline
            } else {
                Decision::Approve
            };
            let adapters = AdapterRegistry::new()
                .and_register(CardNetworkAdapter::new().with_decision(decision))
                .and_register(WalletNetworkAdapter::new().with_decision(decision))
                .and_register(ChainSettlementAdapter::new().with_decision(decision));
            let mut flow = CheckoutFlow::new(ledger.clone(), adapters);
            flow = match config.settle_timeout() {
                Some(timeout) => flow.with_settle_timeout(timeout),
                None => flow.without_settle_timeout(),
            };

            let request = PaymentRequest {
                amount,
                currency,
                description,
                provider,
            };
            match flow.submit_payment(&request).await? {
                SubmitOutcome::Settled { intent_id } => {
                    println!("payment settled");
                    print_receipt(&ledger, &intent_id).await?;
                }
                SubmitOutcome::Declined { intent_id } => {
                    println!("payment declined; intent {intent_id} left processing and may be retried");
                }
            }
        }
        Command::Receipt { id } => {
            print_receipt(&ledger, &id).await?;
        }
        Command::Report => {
            let intents = ledger.list_intents().await?;
            let counts = report::StatusCounts::tally(&intents);
            println!("succeeded:  {}", counts.succeeded);
            println!("processing: {}", counts.processing);
            println!("failed:     {}", counts.failed);
            println!("refunded:   {}", counts.refunded);
            println!("revenue:    {}", report::revenue_display(&intents));
            println!();
            println!("recent payments:");
            for intent in intents.iter().rev().take(10) {
                println!("  {}", report::intent_line(intent));
            }
        }
        Command::Invoice(InvoiceCommand::Create {
            amount,
            currency,
            email,
            description,
        }) => {
            let amount_minor = MoneyAmount::parse(&amount)?.minor_units()?;
            let draft =
                paydesk::types::InvoiceDraft::new(amount_minor, &currency, email, description);
            let invoice = ledger.create_invoice(&draft).await?;
            println!("invoice issued: {}", invoice.id);
        }
        Command::Invoice(InvoiceCommand::List) => {
            let invoices = ledger.list_invoices().await?;
            if invoices.is_empty() {
                println!("no invoices issued yet");
            }
            for invoice in &invoices {
                println!("{}", report::invoice_line(invoice));
            }
        }
        Command::Provider(ProviderCommand::Set { provider, entries }) => {
            let provider: Provider = provider.parse()?;
            let kv = entries
                .iter()
                .map(|entry| parse_kv(entry))
                .collect::<Result<Vec<_>, _>>()?;
            let record = ProviderConfig { provider, kv };
            ledger.set_provider_config(&record).await?;
            println!("configuration saved for {provider}");
        }
        Command::Provider(ProviderCommand::List) => {
            let configs = ledger.get_provider_configs().await?;
            if configs.is_empty() {
                println!("no provider configurations set up yet");
            }
            for record in &configs {
                println!("{}: {} configuration fields", record.provider, record.kv.len());
            }
        }
        Command::Refund { id } => {
            ledger.refund_intent(&id).await?;
            println!("refund recorded for {id}");
        }
        Command::Health => {
            let health = ledger.health().await?;
            let state = if health.healthy { "healthy" } else { "unhealthy" };
            println!(
                "ledger {state} as of {}",
                report::format_timestamp(health.timestamp)
            );
        }
    }

    Ok(())
}

async fn print_receipt(
    ledger: &LedgerClient,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match ledger.get_intent(id).await? {
        Some(intent) => {
            println!("intent:   {}", intent.id);
            println!(
                "amount:   {}",
                report::format_amount(intent.amount_minor, &intent.currency)
            );
            println!("provider: {}", intent.provider);
            println!("status:   {}", intent.status);
            if let Some(description) = &intent.description {
                println!("memo:     {description}");
            }
            if let Some(receipt_hash) = &intent.receipt_hash {
                println!("receipt:  {receipt_hash}");
            }
            println!("created:  {}", report::format_timestamp(intent.created_at));
        }
        None => println!("payment not found: {id}"),
    }
    Ok(())
}

/// Splits a `key=value` CLI entry; values may themselves contain `=`.
fn parse_kv(entry: &str) -> Result<(String, String), String> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got: {entry}"))
}
