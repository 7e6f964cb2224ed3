//! A [`Ledger`] implementation that talks to the external backend over HTTP.
//!
//! [`LedgerClient`] maps each logical ledger operation onto a JSON endpoint
//! relative to a base URL and implements the [`Ledger`] trait for use by the
//! checkout flow and the admin views.
//!
//! ## Example
//!
//! ```rust
//! use paydesk::ledger_client::LedgerClient;
//!
//! let ledger = LedgerClient::try_from("http://127.0.0.1:8080").unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Custom error types capture detailed failure contexts, including
//! - URL construction
//! - HTTP transport failures
//! - JSON deserialization errors
//! - Unexpected HTTP status responses

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::ledger::Ledger;
use crate::types::{
    HealthStatus, IntentDraft, Invoice, InvoiceDraft, PaymentIntent, Provider, ProviderConfig,
};

/// A client for the ledger backend's JSON-over-HTTP surface.
///
/// | Operation | Endpoint |
/// |---|---|
/// | `create_intent` | `POST ./intents` |
/// | `get_intent` | `GET ./intents/{id}` (404 ⇒ not found) |
/// | `list_intents` | `GET ./intents` |
/// | `mark_paid` | `POST ./intents/{id}/mark-paid` |
/// | `refund_intent` | `POST ./intents/{id}/refund` |
/// | `create_invoice` | `POST ./invoices` |
/// | `list_invoices` | `GET ./invoices` |
/// | `set_provider_config` | `PUT ./providers/{provider}/config` |
/// | `get_provider_configs` | `GET ./providers/config` |
/// | `health` | `GET ./health` |
#[derive(Clone, Debug)]
pub struct LedgerClient {
    /// Base URL of the ledger backend (e.g. `http://ledger.internal/`).
    base_url: Url,
    /// Shared Reqwest HTTP client.
    client: Client,
    /// Optional custom headers sent with each request.
    headers: HeaderMap,
    /// Optional request timeout.
    timeout: Option<Duration>,
}

/// Errors that can occur while interacting with the ledger backend.
#[derive(Debug, thiserror::Error)]
pub enum LedgerClientError {
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        context: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP error: {context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to deserialize JSON: {context}: {source}")]
    JsonDeserialization {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        context: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Body for the finalize-as-paid call.
#[derive(Debug, Serialize)]
struct MarkPaidBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt_hash: Option<String>,
}

impl LedgerClient {
    /// Constructs a new [`LedgerClient`] from a base URL.
    pub fn try_new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Returns the base URL used by this client.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Attaches custom headers to all future requests.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        let mut this = self.clone();
        this.headers = headers;
        this
    }

    /// Sets a timeout for all future requests.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut this = self.clone();
        this.timeout = Some(timeout);
        this
    }

    fn endpoint(&self, path: &str, context: &'static str) -> Result<Url, LedgerClientError> {
        self.base_url
            .join(path)
            .map_err(|e| LedgerClientError::UrlParse { context, source: e })
    }

    /// Applies the configured headers and timeout to a request.
    fn prepare(&self, mut req: RequestBuilder) -> RequestBuilder {
        for (key, value) in self.headers.iter() {
            req = req.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req
    }

    /// Sends a request expecting a JSON body on 200.
    async fn run_json<R>(
        &self,
        req: RequestBuilder,
        context: &'static str,
    ) -> Result<R, LedgerClientError>
    where
        R: DeserializeOwned,
    {
        let response = self
            .prepare(req)
            .send()
            .await
            .map_err(|e| LedgerClientError::Http { context, source: e })?;
        if response.status() == StatusCode::OK {
            response
                .json::<R>()
                .await
                .map_err(|e| LedgerClientError::JsonDeserialization { context, source: e })
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| LedgerClientError::ResponseBodyRead { context, source: e })?;
            Err(LedgerClientError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }

    /// Sends a request where only the 200 status matters; any body is dropped.
    async fn run_unit(
        &self,
        req: RequestBuilder,
        context: &'static str,
    ) -> Result<(), LedgerClientError> {
        let response = self
            .prepare(req)
            .send()
            .await
            .map_err(|e| LedgerClientError::Http { context, source: e })?;
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| LedgerClientError::ResponseBodyRead { context, source: e })?;
            Err(LedgerClientError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }

    /// Sends a `POST ./intents` request.
    #[instrument(name = "ledger.create_intent", skip_all, err)]
    pub async fn create_intent(
        &self,
        draft: &IntentDraft,
    ) -> Result<PaymentIntent, LedgerClientError> {
        let context = "POST /intents";
        let url = self.endpoint("./intents", context)?;
        self.run_json(self.client.post(url).json(draft), context)
            .await
    }

    /// Sends a `GET ./intents/{id}` request. A 404 decodes to `None`.
    #[instrument(name = "ledger.get_intent", skip_all, err)]
    pub async fn get_intent(&self, id: &str) -> Result<Option<PaymentIntent>, LedgerClientError> {
        let context = "GET /intents/{id}";
        let url = self.endpoint(&format!("./intents/{id}"), context)?;
        let response = self
            .prepare(self.client.get(url))
            .send()
            .await
            .map_err(|e| LedgerClientError::Http { context, source: e })?;
        match response.status() {
            StatusCode::OK => response
                .json::<PaymentIntent>()
                .await
                .map(Some)
                .map_err(|e| LedgerClientError::JsonDeserialization { context, source: e }),
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| LedgerClientError::ResponseBodyRead { context, source: e })?;
                Err(LedgerClientError::HttpStatus {
                    context,
                    status,
                    body,
                })
            }
        }
    }

    /// Sends a `GET ./intents` request.
    #[instrument(name = "ledger.list_intents", skip_all, err)]
    pub async fn list_intents(&self) -> Result<Vec<PaymentIntent>, LedgerClientError> {
        let context = "GET /intents";
        let url = self.endpoint("./intents", context)?;
        self.run_json(self.client.get(url), context).await
    }

    /// Sends a `POST ./intents/{id}/mark-paid` request.
    #[instrument(name = "ledger.mark_paid", skip_all, err)]
    pub async fn mark_paid(
        &self,
        id: &str,
        receipt_hash: Option<String>,
    ) -> Result<(), LedgerClientError> {
        let context = "POST /intents/{id}/mark-paid";
        let url = self.endpoint(&format!("./intents/{id}/mark-paid"), context)?;
        let body = MarkPaidBody { receipt_hash };
        self.run_unit(self.client.post(url).json(&body), context)
            .await
    }

    /// Sends a `POST ./intents/{id}/refund` request.
    #[instrument(name = "ledger.refund_intent", skip_all, err)]
    pub async fn refund_intent(&self, id: &str) -> Result<(), LedgerClientError> {
        let context = "POST /intents/{id}/refund";
        let url = self.endpoint(&format!("./intents/{id}/refund"), context)?;
        self.run_unit(self.client.post(url), context).await
    }

    /// Sends a `POST ./invoices` request.
    #[instrument(name = "ledger.create_invoice", skip_all, err)]
    pub async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<Invoice, LedgerClientError> {
        let context = "POST /invoices";
        let url = self.endpoint("./invoices", context)?;
        self.run_json(self.client.post(url).json(draft), context)
            .await
    }

    /// Sends a `GET ./invoices` request.
    #[instrument(name = "ledger.list_invoices", skip_all, err)]
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, LedgerClientError> {
        let context = "GET /invoices";
        let url = self.endpoint("./invoices", context)?;
        self.run_json(self.client.get(url), context).await
    }

    /// Sends a `PUT ./providers/{provider}/config` request, replacing the
    /// provider's whole configuration record.
    #[instrument(name = "ledger.set_provider_config", skip_all, err)]
    pub async fn set_provider_config(
        &self,
        config: &ProviderConfig,
    ) -> Result<(), LedgerClientError> {
        let context = "PUT /providers/{provider}/config";
        let url = self.endpoint(&format!("./providers/{}/config", config.provider), context)?;
        self.run_unit(self.client.put(url).json(config), context)
            .await
    }

    /// Sends a `GET ./providers/config` request.
    #[instrument(name = "ledger.get_provider_configs", skip_all, err)]
    pub async fn get_provider_configs(&self) -> Result<Vec<ProviderConfig>, LedgerClientError> {
        let context = "GET /providers/config";
        let url = self.endpoint("./providers/config", context)?;
        self.run_json(self.client.get(url), context).await
    }

    /// Sends a `GET ./health` request.
    #[instrument(name = "ledger.health", skip_all, err)]
    pub async fn health(&self) -> Result<HealthStatus, LedgerClientError> {
        let context = "GET /health";
        let url = self.endpoint("./health", context)?;
        self.run_json(self.client.get(url), context).await
    }
}

#[async_trait]
impl Ledger for LedgerClient {
    type Error = LedgerClientError;

    async fn create_intent(&self, draft: IntentDraft) -> Result<PaymentIntent, Self::Error> {
        LedgerClient::create_intent(self, &draft).await
    }

    async fn get_intent(&self, id: &str) -> Result<Option<PaymentIntent>, Self::Error> {
        LedgerClient::get_intent(self, id).await
    }

    async fn list_intents(&self) -> Result<Vec<PaymentIntent>, Self::Error> {
        LedgerClient::list_intents(self).await
    }

    async fn mark_paid(&self, id: &str, receipt_hash: Option<String>) -> Result<(), Self::Error> {
        LedgerClient::mark_paid(self, id, receipt_hash).await
    }

    async fn refund_intent(&self, id: &str) -> Result<(), Self::Error> {
        LedgerClient::refund_intent(self, id).await
    }

    async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, Self::Error> {
        LedgerClient::create_invoice(self, &draft).await
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, Self::Error> {
        LedgerClient::list_invoices(self).await
    }

    async fn set_provider_config(&self, config: ProviderConfig) -> Result<(), Self::Error> {
        LedgerClient::set_provider_config(self, &config).await
    }

    async fn get_provider_configs(&self) -> Result<Vec<ProviderConfig>, Self::Error> {
        LedgerClient::get_provider_configs(self).await
    }

    async fn health(&self) -> Result<HealthStatus, Self::Error> {
        LedgerClient::health(self).await
    }
}

/// Converts a string URL into a `LedgerClient`, normalizing the trailing slash.
impl TryFrom<&str> for LedgerClient {
    type Error = LedgerClientError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Normalize: strip trailing slashes and add a single trailing slash
        let mut normalized = value.trim_end_matches('/').to_string();
        normalized.push('/');
        let url = Url::parse(&normalized).map_err(|e| LedgerClientError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;
        Ok(LedgerClient::try_new(url))
    }
}

/// Converts a String URL into a `LedgerClient`.
impl TryFrom<String> for LedgerClient {
    type Error = LedgerClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LedgerClient::try_from(value.as_str())
    }
}
