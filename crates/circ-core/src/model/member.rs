use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::MemberId;

/// The standing of a member's registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipStatus {
    Active,
    Suspended,
    Expired,
}

impl MembershipStatus {
    /// The literal stored in the `membership_status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Expired => "Expired",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Suspended" => Some(Self::Suspended),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// A registered library member.
///
/// One row per real person; `national_id` and `email` are both unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Assigned by the database; `None` until inserted.
    pub id: Option<MemberId>,
    pub first_name: String,
    pub last_name: String,

    /// Government-issued identifier, unique across members.
    pub national_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,

    /// Date the membership was registered.
    pub membership_date: NaiveDate,
    pub membership_status: MembershipStatus,

    /// Borrowing limit applied by the lending application.
    pub max_books_allowed: u32,
}

impl Member {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
        email: impl Into<String>,
        membership_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            national_id: national_id.into(),
            email: email.into(),
            phone: None,
            address: None,
            membership_date,
            membership_status: MembershipStatus::Active,
            max_books_allowed: 5,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: MembershipStatus) -> Self {
        self.membership_status = status;
        self
    }

    #[must_use]
    pub fn with_max_books(mut self, max: u32) -> Self {
        self.max_books_allowed = max;
        self
    }

    /// Whether the member may currently borrow.
    #[must_use]
    pub fn can_borrow(&self) -> bool {
        self.membership_status == MembershipStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_member_new_defaults() {
        let member = Member::new("Amira", "Haddad", "A1204937", "amira@example.org", day(2024, 9, 2));
        assert!(member.id.is_none());
        assert_eq!(member.membership_status, MembershipStatus::Active);
        assert_eq!(member.max_books_allowed, 5);
        assert!(member.can_borrow());
    }

    #[test]
    fn test_member_builder() {
        let member = Member::new("Jonas", "Weber", "C7731185", "jweber@example.org", day(2023, 1, 15))
            .with_phone("+49 30 1234567")
            .with_status(MembershipStatus::Suspended)
            .with_max_books(3);

        assert_eq!(member.phone.as_deref(), Some("+49 30 1234567"));
        assert_eq!(member.max_books_allowed, 3);
        assert!(!member.can_borrow());
    }

    #[test]
    fn test_membership_status_round_trip() {
        for status in [
            MembershipStatus::Active,
            MembershipStatus::Suspended,
            MembershipStatus::Expired,
        ] {
            assert_eq!(MembershipStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MembershipStatus::parse("Lapsed"), None);
    }
}
