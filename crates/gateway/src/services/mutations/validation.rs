//! Schema validation of untrusted mutation input.
//!
//! Every rule failure is an ordinary result value, never an unwound
//! error: callers receive the full field → messages map in one pass.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use ledgerline_core::{CustomerId, CustomerStatus, Email, InvoiceStatus, Money};

use super::error::ValidationErrors;

/// Untrusted raw invoice input, as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct InvoiceInput {
    /// Selected customer reference.
    pub customer_id: String,
    /// Major-unit amount (e.g. "19.99").
    pub amount: String,
    /// "pending" or "paid".
    pub status: String,
    /// Optional issuance date; creation defaults it to now.
    pub date: Option<String>,
}

/// A validated invoice, amount already converted to minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidInvoice {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub status: InvoiceStatus,
    pub date: Option<DateTime<Utc>>,
}

/// Untrusted raw customer input, as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    /// Customer name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// "active" or "inactive".
    pub status: String,
}

/// A validated customer update (sans image handling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidCustomer {
    pub name: String,
    pub email: Email,
    pub status: CustomerStatus,
}

/// Check every invoice rule, collecting all violations.
pub(crate) fn validate_invoice(input: &InvoiceInput) -> Result<ValidInvoice, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let customer_id = input.customer_id.trim();
    if customer_id.is_empty() {
        errors.add("customer_id", "Please select a customer.");
    }

    let amount = match Decimal::from_str(input.amount.trim()) {
        Ok(value) if value > Decimal::ZERO => Money::from_major(value).ok(),
        _ => None,
    };
    if amount.is_none() {
        errors.add("amount", "Please enter an amount greater than $0.");
    }

    let status = InvoiceStatus::from_str(input.status.trim()).ok();
    if status.is_none() {
        errors.add("status", "Please select an invoice status.");
    }

    let date = match input.date.as_deref().map(str::trim) {
        None | Some("") => Some(None),
        Some(raw) => parse_date(raw).map(Some),
    };
    if date.is_none() {
        errors.add("date", "Please enter a valid date.");
    }

    match (amount, status, date, errors.is_empty()) {
        (Some(amount), Some(status), Some(date), true) => Ok(ValidInvoice {
            customer_id: CustomerId::new(customer_id),
            amount,
            status,
            date,
        }),
        _ => Err(errors),
    }
}

/// Check every customer rule, collecting all violations.
pub(crate) fn validate_customer(input: &CustomerInput) -> Result<ValidCustomer, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add("name", "Please enter a customer name.");
    }

    let email = Email::parse(input.email.trim()).ok();
    if email.is_none() {
        errors.add("email", "Please enter a valid email address.");
    }

    let status = CustomerStatus::from_str(input.status.trim()).ok();
    if status.is_none() {
        errors.add("status", "Please select a customer status.");
    }

    match (email, status, errors.is_empty()) {
        (Some(email), Some(status), true) => Ok(ValidCustomer {
            name: name.to_owned(),
            email,
            status,
        }),
        _ => Err(errors),
    }
}

/// Parse a calendar date/time in the formats the forms produce:
/// RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD`.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_input() -> InvoiceInput {
        InvoiceInput {
            customer_id: "c1".to_owned(),
            amount: "19.99".to_owned(),
            status: "pending".to_owned(),
            date: None,
        }
    }

    #[test]
    fn test_valid_invoice_converts_to_minor_units() {
        let valid = validate_invoice(&valid_input()).unwrap();
        assert_eq!(valid.customer_id, CustomerId::new("c1"));
        assert_eq!(valid.amount.minor_units(), 1999);
        assert_eq!(valid.status, InvoiceStatus::Pending);
        assert_eq!(valid.date, None);
    }

    #[test]
    fn test_amount_must_be_strictly_positive() {
        for amount in ["0", "-5", "0.00"] {
            let errors = validate_invoice(&InvoiceInput {
                amount: amount.to_owned(),
                ..valid_input()
            })
            .unwrap_err();
            assert_eq!(
                errors.field("amount").unwrap(),
                ["Please enter an amount greater than $0.".to_owned()]
            );
        }
    }

    #[test]
    fn test_amount_must_parse_as_a_number() {
        let errors = validate_invoice(&InvoiceInput {
            amount: "nineteen".to_owned(),
            ..valid_input()
        })
        .unwrap_err();
        assert!(errors.field("amount").is_some());
    }

    #[test]
    fn test_customer_reference_must_be_selected() {
        let errors = validate_invoice(&InvoiceInput {
            customer_id: "  ".to_owned(),
            ..valid_input()
        })
        .unwrap_err();
        assert_eq!(
            errors.field("customer_id").unwrap(),
            ["Please select a customer.".to_owned()]
        );
    }

    #[test]
    fn test_status_must_be_enumerated() {
        let errors = validate_invoice(&InvoiceInput {
            status: "overdue".to_owned(),
            ..valid_input()
        })
        .unwrap_err();
        assert_eq!(
            errors.field("status").unwrap(),
            ["Please select an invoice status.".to_owned()]
        );
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let errors = validate_invoice(&InvoiceInput {
            customer_id: String::new(),
            amount: "-1".to_owned(),
            status: "nope".to_owned(),
            date: Some("not-a-date".to_owned()),
        })
        .unwrap_err();
        assert_eq!(errors.fields().len(), 4);
    }

    #[test]
    fn test_date_formats() {
        for raw in ["2026-08-27T10:30:00Z", "2026-08-27 10:30:00", "2026-08-27"] {
            let valid = validate_invoice(&InvoiceInput {
                date: Some(raw.to_owned()),
                ..valid_input()
            })
            .unwrap();
            assert!(valid.date.is_some(), "failed to parse {raw}");
        }
    }

    #[test]
    fn test_invalid_date_rejected() {
        let errors = validate_invoice(&InvoiceInput {
            date: Some("27/08/2026".to_owned()),
            ..valid_input()
        })
        .unwrap_err();
        assert_eq!(
            errors.field("date").unwrap(),
            ["Please enter a valid date.".to_owned()]
        );
    }

    #[test]
    fn test_valid_customer() {
        let valid = validate_customer(&CustomerInput {
            name: " Amy K ".to_owned(),
            email: "amy@x.com".to_owned(),
            status: "inactive".to_owned(),
        })
        .unwrap();
        assert_eq!(valid.name, "Amy K");
        assert_eq!(valid.status, CustomerStatus::Inactive);
    }

    #[test]
    fn test_customer_rules() {
        let errors = validate_customer(&CustomerInput {
            name: String::new(),
            email: "not-an-email".to_owned(),
            status: "archived".to_owned(),
        })
        .unwrap_err();
        assert!(errors.field("name").is_some());
        assert_eq!(
            errors.field("email").unwrap(),
            ["Please enter a valid email address.".to_owned()]
        );
        assert_eq!(
            errors.field("status").unwrap(),
            ["Please select a customer status.".to_owned()]
        );
    }
}
