//! Illustrative demo catalog.
//!
//! Loads a small, internally consistent data set covering every entity
//! table and every enum state the schema declares: a category tree,
//! multi-author titles, numbered copies, loans in all three states,
//! a priority-ordered reservation queue, fines (one orphaned from its
//! loan), staff, and audit history.

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{
    AuditAction, AuditEntry, Author, Book, BookAuthor, BookCopy, Category, CopyStatus, Fine,
    FineReason, Loan, LoanStatus, Member, MembershipStatus, PaymentStatus, Publisher, Reservation,
    ReservationStatus, Staff, StaffStatus,
};
use crate::schema::Database;

use serde_json::json;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    // All seed dates are literal and valid.
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

/// Load the demo catalog.
///
/// Fails with a uniqueness violation if the database already holds the
/// demo rows; seeding is not an upsert.
pub fn seed_demo_data(db: &Database) -> Result<()> {
    log::info!("Seeding demo catalog");

    // Publishers
    let ace = db.insert_publisher(
        &Publisher::new("Ace Books").with_address("1120 Avenue of the Americas, New York"),
    )?;
    let harper = db.insert_publisher(
        &Publisher::new("HarperCollins").with_website("https://www.harpercollins.com"),
    )?;
    let oup = db.insert_publisher(
        &Publisher::new("Oxford University Press").with_website("https://global.oup.com"),
    )?;

    // Category tree: two roots, three children
    let fiction = db.insert_category(&Category::new("Fiction"))?;
    let sf = db.insert_category(
        &Category::new("Science Fiction")
            .with_parent(fiction)
            .with_description("Speculative and science fiction"),
    )?;
    let mystery = db.insert_category(&Category::new("Mystery").with_parent(fiction))?;
    let nonfiction = db.insert_category(&Category::new("Non-fiction"))?;
    let science = db.insert_category(&Category::new("Popular Science").with_parent(nonfiction))?;

    // Authors
    let le_guin = db.insert_author(
        &Author::new("Ursula K. Le Guin")
            .with_birth_date(day(1929, 10, 21))
            .with_nationality("American"),
    )?;
    let christie = db.insert_author(
        &Author::new("Agatha Christie")
            .with_birth_date(day(1890, 9, 15))
            .with_nationality("British"),
    )?;
    let sagan = db.insert_author(
        &Author::new("Carl Sagan")
            .with_birth_date(day(1934, 11, 9))
            .with_nationality("American"),
    )?;
    let pratchett = db.insert_author(
        &Author::new("Terry Pratchett")
            .with_birth_date(day(1948, 4, 28))
            .with_nationality("British"),
    )?;
    let gaiman = db.insert_author(
        &Author::new("Neil Gaiman")
            .with_birth_date(day(1960, 11, 10))
            .with_nationality("British"),
    )?;

    // Books and author links
    let left_hand = db.insert_book(
        &Book::new("The Left Hand of Darkness", "978-0-441-47812-5", ace, sf)
            .with_publication_year(1969)
            .with_language("English"),
    )?;
    db.link_author(&BookAuthor::new(left_hand, le_guin, 1))?;

    let orient = db.insert_book(
        &Book::new("Murder on the Orient Express", "978-0-06-269366-2", harper, mystery)
            .with_publication_year(1934)
            .with_language("English"),
    )?;
    db.link_author(&BookAuthor::new(orient, christie, 1))?;

    let cosmos = db.insert_book(
        &Book::new("Cosmos", "978-0-345-53943-4", oup, science)
            .with_publication_year(1980)
            .with_language("English"),
    )?;
    db.link_author(&BookAuthor::new(cosmos, sagan, 1))?;

    let good_omens = db.insert_book(
        &Book::new("Good Omens", "978-0-06-085398-3", harper, sf)
            .with_publication_year(1990)
            .with_language("English"),
    )?;
    db.link_author(&BookAuthor::new(good_omens, pratchett, 1))?;
    db.link_author(&BookAuthor::new(good_omens, gaiman, 2))?;

    // Physical copies; the first title holds copies 1 and 2
    let left_hand_1 = db.insert_copy(
        &BookCopy::new(left_hand, 1)
            .with_acquisition_date(day(2022, 5, 14))
            .with_shelf_location("F-SF-12")
            .with_status(CopyStatus::CheckedOut),
    )?;
    db.insert_copy(
        &BookCopy::new(left_hand, 2)
            .with_acquisition_date(day(2023, 2, 7))
            .with_shelf_location("F-SF-12"),
    )?;
    let orient_1 = db.insert_copy(
        &BookCopy::new(orient, 1)
            .with_acquisition_date(day(2021, 11, 30))
            .with_shelf_location("F-MY-03")
            .with_status(CopyStatus::CheckedOut),
    )?;
    db.insert_copy(
        &BookCopy::new(orient, 2)
            .with_acquisition_date(day(2021, 11, 30))
            .with_shelf_location("F-MY-03")
            .with_status(CopyStatus::Damaged),
    )?;
    let cosmos_1 = db.insert_copy(
        &BookCopy::new(cosmos, 1)
            .with_acquisition_date(day(2020, 8, 19))
            .with_shelf_location("NF-SC-07"),
    )?;
    db.insert_copy(
        &BookCopy::new(good_omens, 1)
            .with_acquisition_date(day(2024, 1, 25))
            .with_shelf_location("F-SF-15")
            .with_status(CopyStatus::UnderMaintenance),
    )?;

    // Members in every status
    let amira = db.insert_member(
        &Member::new("Amira", "Haddad", "A1204937", "amira.haddad@example.org", day(2024, 9, 2))
            .with_phone("+20 2 3456 7890")
            .with_address("14 Tahrir Square, Cairo"),
    )?;
    let jonas = db.insert_member(
        &Member::new("Jonas", "Weber", "C7731185", "jweber@example.org", day(2023, 1, 15))
            .with_phone("+49 30 1234 567")
            .with_status(MembershipStatus::Suspended)
            .with_max_books(3),
    )?;
    let sofia = db.insert_member(
        &Member::new("Sofía", "Reyes", "B5529004", "sofia.reyes@example.org", day(2021, 6, 30))
            .with_address("Calle Mayor 8, Madrid")
            .with_status(MembershipStatus::Expired),
    )?;

    // Loans: one active, one returned, one overdue
    db.insert_loan(&Loan::new(left_hand_1, amira, day(2025, 3, 1), day(2025, 3, 15)))?;
    db.insert_loan(
        &Loan::new(cosmos_1, sofia, day(2025, 1, 10), day(2025, 1, 24))
            .with_status(LoanStatus::Returned)
            .with_return_date(day(2025, 1, 20)),
    )?;
    let overdue_loan = db.insert_loan(
        &Loan::new(orient_1, jonas, day(2025, 2, 3), day(2025, 2, 17))
            .with_status(LoanStatus::Overdue)
            .with_late_fee(4.50),
    )?;

    // Reservation queue on the first title, plus a cancelled hold
    db.insert_reservation(
        &Reservation::new(left_hand, jonas, day(2025, 3, 2), 1).with_expiry_date(day(2025, 4, 2)),
    )?;
    db.insert_reservation(
        &Reservation::new(left_hand, sofia, day(2025, 3, 5), 2).with_expiry_date(day(2025, 4, 5)),
    )?;
    db.insert_reservation(
        &Reservation::new(good_omens, amira, day(2025, 2, 20), 1)
            .with_status(ReservationStatus::Cancelled),
    )?;

    // Fines: pending (late return), paid (damage), and one whose loan
    // is already gone
    db.insert_fine(
        &Fine::new(jonas, 4.50, FineReason::LateReturn, day(2025, 2, 18)).with_loan(overdue_loan),
    )?;
    db.insert_fine(
        &Fine::new(sofia, 12.00, FineReason::BookDamage, day(2024, 11, 5))
            .with_payment(PaymentStatus::Paid, day(2024, 11, 12)),
    )?;
    db.insert_fine(&Fine::new(amira, 25.00, FineReason::BookLost, day(2024, 7, 1)))?;

    // Staff
    let priya = db.insert_staff(
        &Staff::new("Priya", "Nair", "pnair@library.example", "Head Librarian", day(2019, 6, 1))
            .with_salary(52_000.0),
    )?;
    db.insert_staff(
        &Staff::new("Marco", "Ferretti", "mferretti@library.example", "Archivist", day(2016, 3, 12))
            .with_salary(41_000.0)
            .with_status(StaffStatus::Inactive),
    )?;

    // Audit history
    db.record_change(
        &AuditEntry::new("members", amira.as_i64(), AuditAction::Insert)
            .with_new_values(json!({
                "first_name": "Amira",
                "last_name": "Haddad",
                "membership_status": "Active"
            }))
            .with_staff(priya),
    )?;
    db.record_change(
        &AuditEntry::new("book_copies", left_hand_1.as_i64(), AuditAction::Update)
            .with_old_values(json!({"status": "Available"}))
            .with_new_values(json!({"status": "Checked Out"}))
            .with_staff(priya),
    )?;
    db.record_change(
        &AuditEntry::new("loans", overdue_loan.as_i64(), AuditAction::Update)
            .with_old_values(json!({"loan_status": "Active"}))
            .with_new_values(json!({"loan_status": "Overdue", "late_fee": 4.5})),
    )?;

    log::info!("Demo catalog loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookId;

    #[test]
    fn test_seed_populates_every_table() {
        let db = Database::open_in_memory().unwrap();
        seed_demo_data(&db).unwrap();

        for (table, count) in db.table_counts().unwrap() {
            assert!(count > 0, "table {table} is empty after seeding");
        }
    }

    #[test]
    fn test_seed_is_not_an_upsert() {
        let db = Database::open_in_memory().unwrap();
        seed_demo_data(&db).unwrap();

        let err = seed_demo_data(&db).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_seed_copy_numbers() {
        let db = Database::open_in_memory().unwrap();
        seed_demo_data(&db).unwrap();

        let first_book = BookId::new(1);
        let copies = db.copies_for_book(first_book).unwrap();
        let numbers: Vec<u32> = copies.iter().map(|c| c.copy_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_seed_circulation_summary() {
        let db = Database::open_in_memory().unwrap();
        seed_demo_data(&db).unwrap();

        let summary = db.circulation_summary().unwrap();
        assert_eq!(summary.overdue_loans, 1);
        assert_eq!(summary.active_reservations, 2);
        assert_eq!(summary.pending_fines, 2);
    }
}
