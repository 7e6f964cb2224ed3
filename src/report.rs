//! Read-side projections over intent and invoice snapshots for the admin
//! views.
//!
//! Everything here is pure and synchronous: it never mutates the fetched
//! snapshot and is safe to recompute on every render. Canonical sums stay
//! in integer minor units; decimal values exist for display only.

use chrono::DateTime;
use rust_decimal::Decimal;

use crate::timestamp::UnixNanos;
use crate::types::{IntentStatus, Invoice, PaymentIntent};

/// Histogram over the four intent status variants.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub processing: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub refunded: usize,
}

impl StatusCounts {
    /// Tallies a snapshot. Statuses are mutually exclusive by construction,
    /// so each intent lands in exactly one bucket and the buckets sum to
    /// the snapshot length.
    pub fn tally(intents: &[PaymentIntent]) -> Self {
        let mut counts = StatusCounts::default();
        for intent in intents {
            match intent.status {
                IntentStatus::Processing => counts.processing += 1,
                IntentStatus::Succeeded => counts.succeeded += 1,
                IntentStatus::Failed => counts.failed += 1,
                IntentStatus::Refunded => counts.refunded += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.processing + self.succeeded + self.failed + self.refunded
    }
}

/// Canonical revenue: the sum of `amount_minor` over succeeded intents.
///
/// Integer math, independent of iteration order. This is the value to use
/// for any further computation.
pub fn revenue_minor(intents: &[PaymentIntent]) -> u64 {
    intents
        .iter()
        .filter(|intent| intent.status == IntentStatus::Succeeded)
        .map(|intent| intent.amount_minor)
        .sum()
}

/// Revenue scaled to whole currency units for display, e.g. `20.00`.
///
/// Derived from [`revenue_minor`]; never feed this back into a sum.
pub fn revenue_display(intents: &[PaymentIntent]) -> Decimal {
    Decimal::from_i128_with_scale(revenue_minor(intents) as i128, 2)
}

/// Renders minor units for listings: `1234` + `"USD"` → `"12.34 USD"`.
pub fn format_amount(amount_minor: u64, currency: &str) -> String {
    let amount = Decimal::from_i128_with_scale(amount_minor as i128, 2);
    format!("{amount} {currency}")
}

/// Renders a wire timestamp for listings, at millisecond-truncated
/// precision. Falls back to the raw nanosecond count if the value is out of
/// calendar range.
pub fn format_timestamp(at: UnixNanos) -> String {
    match DateTime::from_timestamp_millis(at.as_millis() as i64) {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => at.to_string(),
    }
}

/// One listing line per intent for the admin payments table.
pub fn intent_line(intent: &PaymentIntent) -> String {
    format!(
        "{}  {}  {}  {}  {}",
        intent.id,
        format_amount(intent.amount_minor, &intent.currency),
        intent.provider,
        intent.status,
        format_timestamp(intent.created_at),
    )
}

/// One listing line per invoice for the admin invoices table.
pub fn invoice_line(invoice: &Invoice) -> String {
    format!(
        "{}  {}  {}  {}",
        invoice.id,
        format_amount(invoice.amount_minor, &invoice.currency),
        if invoice.paid { "paid" } else { "pending" },
        format_timestamp(invoice.issued_at),
    )
}
