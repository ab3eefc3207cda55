use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{CopyId, LoanId, MemberId};

/// The lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Returned,
    Overdue,
}

impl LoanStatus {
    /// The literal stored in the `loan_status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Returned => "Returned",
            Self::Overdue => "Overdue",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Returned" => Some(Self::Returned),
            "Overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// A checkout of one physical copy by one member.
///
/// Copies and members restrict-delete while loans reference them. The
/// schema does not enforce "one active loan per copy"; callers are
/// expected to consult `Database::active_loan_for_copy` before inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Option<LoanId>,
    pub copy_id: CopyId,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub loan_status: LoanStatus,

    /// Fee accrued past the due date; zero while on time.
    pub late_fee: f64,
}

impl Loan {
    #[must_use]
    pub fn new(
        copy_id: CopyId,
        member_id: MemberId,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            copy_id,
            member_id,
            loan_date,
            due_date,
            return_date: None,
            loan_status: LoanStatus::Active,
            late_fee: 0.0,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.loan_status = status;
        self
    }

    #[must_use]
    pub fn with_return_date(mut self, date: NaiveDate) -> Self {
        self.return_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_late_fee(mut self, fee: f64) -> Self {
        self.late_fee = fee;
        self
    }

    /// Whether the copy has come back.
    #[must_use]
    pub const fn is_returned(&self) -> bool {
        self.return_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_loan_new_defaults() {
        let loan = Loan::new(
            CopyId::new(1),
            MemberId::new(1),
            day(2025, 3, 1),
            day(2025, 3, 15),
        );
        assert_eq!(loan.loan_status, LoanStatus::Active);
        assert_eq!(loan.late_fee, 0.0);
        assert!(!loan.is_returned());
    }

    #[test]
    fn test_loan_returned() {
        let loan = Loan::new(
            CopyId::new(1),
            MemberId::new(1),
            day(2025, 3, 1),
            day(2025, 3, 15),
        )
        .with_status(LoanStatus::Returned)
        .with_return_date(day(2025, 3, 12));

        assert!(loan.is_returned());
    }

    #[test]
    fn test_loan_status_round_trip() {
        for status in [LoanStatus::Active, LoanStatus::Returned, LoanStatus::Overdue] {
            assert_eq!(LoanStatus::parse(status.as_str()), Some(status));
        }
        // "Pending" is a fine payment state, never a loan state.
        assert_eq!(LoanStatus::parse("Pending"), None);
    }
}
