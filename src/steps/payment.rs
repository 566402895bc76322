//! Payment method canonicalization.

use crate::config::PaymentConfig;
use crate::report::PaymentReport;
use crate::table::{Table, Value};

/// Canonical labels paired with the substrings that select them, in
/// precedence order.
const PATTERNS: &[(&str, &[&str])] = &[
    ("UPI", &["upi", "phonepe", "google pay", "gpay", "googlepay"]),
    ("Cash on Delivery", &["cod", "cash on delivery", "cash-on-delivery"]),
    ("Debit Card", &["debit"]),
    ("Credit Card", &["credit card", "cc"]),
    ("Net Banking", &["netbank", "net bank"]),
    ("Wallet", &["wallet"]),
];

/// Canonical label for a raw payment string, if any pattern matches.
pub fn canonical_payment(raw: &str) -> Option<&'static str> {
    let text = raw
        .trim()
        .to_lowercase()
        .replace('_', " ")
        .replace("c.o.d", "cod")
        .replace("creditcard", "credit card");
    PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| text.contains(n)))
        .map(|(label, _)| *label)
}

/// Map the payment column onto canonical labels.
///
/// `extra_mappings` is checked first with the raw string. Values that match
/// nothing keep their original cell.
pub fn normalize_payment(mut table: Table, config: &PaymentConfig) -> (Table, PaymentReport) {
    let mut report = PaymentReport::default();
    let Some(idx) = config
        .column
        .as_deref()
        .and_then(|c| table.column_index(c))
    else {
        return (table, report);
    };

    for cell in table.column_mut(idx) {
        let Some(raw) = cell.to_text() else {
            continue;
        };
        let label = match config.extra_mappings.get(&raw) {
            Some(mapped) => mapped.as_str(),
            None => match canonical_payment(&raw) {
                Some(label) => label,
                None => continue,
            },
        };
        let new = Value::from(label);
        if *cell != new {
            report.payment_standardized += 1;
            *cell = new;
        }
    }

    (table, report)
}
