use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{BookId, MemberId, ReservationId};

/// The lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    Active,
    Fulfilled,
    Cancelled,
}

impl ReservationStatus {
    /// The literal stored in the `reservation_status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Fulfilled => "Fulfilled",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse a stored column literal.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Fulfilled" => Some(Self::Fulfilled),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A member's hold on a title.
///
/// Reservations are placed against a book, never a specific copy, and
/// cascade away with either the book or the member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Option<ReservationId>,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub reservation_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub reservation_status: ReservationStatus,

    /// Queue position; lower numbers are served first.
    pub priority: u32,
}

impl Reservation {
    #[must_use]
    pub fn new(
        book_id: BookId,
        member_id: MemberId,
        reservation_date: NaiveDate,
        priority: u32,
    ) -> Self {
        Self {
            id: None,
            book_id,
            member_id,
            reservation_date,
            expiry_date: None,
            reservation_status: ReservationStatus::Active,
            priority,
        }
    }

    #[must_use]
    pub fn with_expiry_date(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.reservation_status = status;
        self
    }
}
