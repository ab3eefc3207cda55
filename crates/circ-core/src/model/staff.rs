use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::StaffId;

/// Employment state of a staff record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffStatus {
    Active,
    Inactive,
}

impl StaffStatus {
    /// The literal stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A library employee; referenced by audit rows with set-null semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Option<StaffId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub salary: Option<f64>,
    pub hire_date: NaiveDate,
    pub status: StaffStatus,
}

impl Staff {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
        hire_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            position: position.into(),
            salary: None,
            hire_date,
            status: StaffStatus::Active,
        }
    }

    #[must_use]
    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary = Some(salary);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StaffStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_builder() {
        let hire = NaiveDate::from_ymd_opt(2019, 6, 1).unwrap();
        let staff = Staff::new("Priya", "Nair", "pnair@library.example", "Head Librarian", hire)
            .with_salary(52_000.0);

        assert_eq!(staff.status, StaffStatus::Active);
        assert_eq!(staff.salary, Some(52_000.0));
    }

    #[test]
    fn test_staff_status_round_trip() {
        for status in [StaffStatus::Active, StaffStatus::Inactive] {
            assert_eq!(StaffStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StaffStatus::parse("Retired"), None);
    }
}
