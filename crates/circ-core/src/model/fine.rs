use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{FineId, LoanId, MemberId};

/// Why a fine was levied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FineReason {
    LateReturn,
    BookDamage,
    BookLost,
    Other,
}

impl FineReason {
    /// The literal stored in the `reason` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LateReturn => "Late Return",
            Self::BookDamage => "Book Damage",
            Self::BookLost => "Book Lost",
            Self::Other => "Other",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Late Return" => Some(Self::LateReturn),
            "Book Damage" => Some(Self::BookDamage),
            "Book Lost" => Some(Self::BookLost),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Settlement state of a fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Waived,
}

impl PaymentStatus {
    /// The literal stored in the `payment_status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Waived => "Waived",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Paid" => Some(Self::Paid),
            "Waived" => Some(Self::Waived),
            _ => None,
        }
    }
}

/// A monetary penalty against a member.
///
/// The loan link is optional and nulled out if the loan is deleted, so
/// the fine itself survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fine {
    pub id: Option<FineId>,
    pub member_id: MemberId,
    pub loan_id: Option<LoanId>,
    pub fine_amount: f64,
    pub reason: FineReason,
    pub issued_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<NaiveDate>,
}

impl Fine {
    #[must_use]
    pub fn new(
        member_id: MemberId,
        fine_amount: f64,
        reason: FineReason,
        issued_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            member_id,
            loan_id: None,
            fine_amount,
            reason,
            issued_date,
            payment_status: PaymentStatus::Pending,
            payment_date: None,
        }
    }

    #[must_use]
    pub fn with_loan(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    #[must_use]
    pub fn with_payment(mut self, status: PaymentStatus, date: NaiveDate) -> Self {
        self.payment_status = status;
        self.payment_date = Some(date);
        self
    }

    /// Whether money is still owed.
    #[must_use]
    pub fn is_outstanding(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fine_new_defaults() {
        let fine = Fine::new(MemberId::new(1), 4.50, FineReason::LateReturn, day(2025, 3, 20));
        assert!(fine.loan_id.is_none());
        assert!(fine.is_outstanding());
    }

    #[test]
    fn test_fine_paid() {
        let fine = Fine::new(MemberId::new(1), 12.0, FineReason::BookDamage, day(2025, 2, 3))
            .with_loan(LoanId::new(8))
            .with_payment(PaymentStatus::Paid, day(2025, 2, 10));

        assert!(!fine.is_outstanding());
        assert_eq!(fine.payment_date, Some(day(2025, 2, 10)));
    }

    #[test]
    fn test_fine_reason_round_trip() {
        for reason in [
            FineReason::LateReturn,
            FineReason::BookDamage,
            FineReason::BookLost,
            FineReason::Other,
        ] {
            assert_eq!(FineReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(FineReason::parse("Damage"), None);
    }

    #[test]
    fn test_payment_status_round_trip() {
        for status in [PaymentStatus::Pending, PaymentStatus::Paid, PaymentStatus::Waived] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }
}
