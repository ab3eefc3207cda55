use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        ///
        /// Wraps the integer key assigned by the database on insert.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(MemberId, "Unique identifier for a library member.");
define_id!(AuthorId, "Unique identifier for an author.");
define_id!(PublisherId, "Unique identifier for a publisher.");
define_id!(CategoryId, "Unique identifier for a category.");
define_id!(BookId, "Unique identifier for a cataloged title.");
define_id!(CopyId, "Unique identifier for a physical copy.");
define_id!(LoanId, "Unique identifier for a loan.");
define_id!(ReservationId, "Unique identifier for a reservation.");
define_id!(FineId, "Unique identifier for a fine.");
define_id!(StaffId, "Unique identifier for a staff record.");
define_id!(AuditLogId, "Unique identifier for an audit log row.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = BookId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(BookId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        let id = MemberId::new(7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_id_ordering() {
        assert!(CopyId::new(1) < CopyId::new(2));
    }
}
