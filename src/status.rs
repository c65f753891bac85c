//! Payment status derived from a contract's total due and amount paid.
//!
//! Tenant listings and the dashboard both read contract amounts through this
//! module so the rules live in one place.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Tenant payment status, computed at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    #[serde(rename = "Belum Ada Kontrak")]
    NoContract,
    #[serde(rename = "Belum Bayar")]
    Unpaid,
    #[serde(rename = "Kurang Bayar")]
    PartiallyPaid,
    #[serde(rename = "Lunas")]
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::NoContract => "Belum Ada Kontrak",
            PaymentStatus::Unpaid => "Belum Bayar",
            PaymentStatus::PartiallyPaid => "Kurang Bayar",
            PaymentStatus::Paid => "Lunas",
        })
    }
}

/// Status of a contract with `total_due` of which `paid` has been received.
/// A zero total means there is no contract to pay.
pub fn payment_status(total_due: Decimal, paid: Decimal) -> PaymentStatus {
    if total_due <= Decimal::ZERO {
        PaymentStatus::NoContract
    } else if paid >= total_due {
        PaymentStatus::Paid
    } else if paid > Decimal::ZERO {
        PaymentStatus::PartiallyPaid
    } else {
        PaymentStatus::Unpaid
    }
}

/// Amount paid on a contract. Rows without a recorded amount count as fully paid.
pub fn effective_paid(total_due: Decimal, paid: Option<Decimal>) -> Decimal {
    paid.unwrap_or(total_due)
}

/// Revenue a contract contributes to the dashboard: the amount paid, or the
/// total due when nothing has been recorded.
pub fn revenue(total_due: Decimal, paid: Option<Decimal>) -> Decimal {
    match paid {
        Some(paid) if paid > Decimal::ZERO => paid,
        _ => total_due,
    }
}
