pub mod audit;
pub mod author;
pub mod book;
pub mod category;
pub mod copy;
pub mod fine;
pub mod ids;
pub mod loan;
pub mod member;
pub mod publisher;
pub mod reservation;
pub mod staff;

pub use audit::{AuditAction, AuditEntry};
pub use author::Author;
pub use book::{Book, BookAuthor};
pub use category::Category;
pub use copy::{BookCopy, CopyStatus};
pub use fine::{Fine, FineReason, PaymentStatus};
pub use ids::{
    AuditLogId, AuthorId, BookId, CategoryId, CopyId, FineId, LoanId, MemberId, PublisherId,
    ReservationId, StaffId,
};
pub use loan::{Loan, LoanStatus};
pub use member::{Member, MembershipStatus};
pub use publisher::Publisher;
pub use reservation::{Reservation, ReservationStatus};
pub use staff::{Staff, StaffStatus};
