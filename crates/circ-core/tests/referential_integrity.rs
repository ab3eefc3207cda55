//! Integration tests for the referential-integrity rules the schema
//! declares: restrict, cascade, and set-null foreign keys, uniqueness,
//! and the CHECK-backed enum domains.

use chrono::NaiveDate;
use tempfile::TempDir;

use circ_core::model::{
    Author, Book, BookAuthor, BookCopy, Category, Fine, FineReason, Loan, Member, Publisher,
    Reservation,
};
use circ_core::schema::{seed_demo_data, Database};
use circ_core::Error;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn member(n: u32) -> Member {
    Member::new(
        format!("Member{n}"),
        "Test",
        format!("N{n:07}"),
        format!("member{n}@example.org"),
        day(2024, 1, 1),
    )
}

/// Publisher, category, and one book wired to both.
fn catalog(db: &Database) -> (circ_core::model::PublisherId, circ_core::model::CategoryId, circ_core::model::BookId) {
    let publisher = db.insert_publisher(&Publisher::new("Tor Books")).unwrap();
    let category = db.insert_category(&Category::new("Fantasy")).unwrap();
    let book = db
        .insert_book(&Book::new("A Wizard of Earthsea", "978-0-547-77374-3", publisher, category))
        .unwrap();
    (publisher, category, book)
}

#[test]
fn schema_creation_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("circ.db");

    {
        let db = Database::open(&db_path).unwrap();
        assert!(db.list_books().unwrap().is_empty());
    }

    // Reopening applies nothing new
    let db = Database::open(&db_path).unwrap();
    let applied: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 1);
}

#[test]
fn book_requires_known_publisher_and_category() {
    let db = Database::open_in_memory().unwrap();
    let (publisher, category, _) = catalog(&db);

    let unknown_publisher = Book::new(
        "Orphaned",
        "978-0-000-00000-1",
        circ_core::model::PublisherId::new(999),
        category,
    );
    let err = db.insert_book(&unknown_publisher).unwrap_err();
    assert!(err.is_constraint_violation());

    let unknown_category = Book::new(
        "Orphaned",
        "978-0-000-00000-2",
        publisher,
        circ_core::model::CategoryId::new(999),
    );
    let err = db.insert_book(&unknown_category).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn referenced_publisher_cannot_be_deleted() {
    let db = Database::open_in_memory().unwrap();
    let (publisher, _, _) = catalog(&db);

    let err = db.delete_publisher(publisher).unwrap_err();
    assert!(err.is_constraint_violation());

    // Still present
    assert!(db.get_publisher(publisher).is_ok());
}

#[test]
fn referenced_category_cannot_be_deleted() {
    let db = Database::open_in_memory().unwrap();
    let (_, category, _) = catalog(&db);

    let err = db.delete_category(category).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn deleting_parent_category_detaches_children() {
    let db = Database::open_in_memory().unwrap();

    let parent = db.insert_category(&Category::new("Fiction")).unwrap();
    let child = db
        .insert_category(&Category::new("Science Fiction").with_parent(parent))
        .unwrap();

    assert_eq!(db.subcategories(parent).unwrap().len(), 1);

    db.delete_category(parent).unwrap();

    let detached = db.get_category(child).unwrap();
    assert!(detached.parent_category_id.is_none());
}

#[test]
fn deleting_book_cascades_to_copies_and_author_links() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);

    let author = db.insert_author(&Author::new("Ursula K. Le Guin")).unwrap();
    db.link_author(&BookAuthor::new(book, author, 1)).unwrap();
    db.insert_copy(&BookCopy::new(book, 1)).unwrap();
    db.insert_copy(&BookCopy::new(book, 2)).unwrap();

    db.delete_book(book).unwrap();

    assert!(db.copies_for_book(book).unwrap().is_empty());
    assert!(db.authors_for_book(book).unwrap().is_empty());
    // The author survives; only the link cascades
    assert!(db.get_author(author).is_ok());
}

#[test]
fn deleting_loan_orphans_fine_instead_of_deleting_it() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);
    let copy = db.insert_copy(&BookCopy::new(book, 1)).unwrap();
    let m = db.insert_member(&member(1)).unwrap();

    let loan = db
        .insert_loan(&Loan::new(copy, m, day(2025, 2, 3), day(2025, 2, 17)))
        .unwrap();
    let fine = db
        .insert_fine(&Fine::new(m, 4.50, FineReason::LateReturn, day(2025, 2, 18)).with_loan(loan))
        .unwrap();

    db.delete_loan(loan).unwrap();

    let orphaned = db.get_fine(fine).unwrap();
    assert!(orphaned.loan_id.is_none());
    assert_eq!(orphaned.fine_amount, 4.50);
}

#[test]
fn deleting_member_cascades_to_reservations_and_fines() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);
    let m = db.insert_member(&member(1)).unwrap();

    db.insert_reservation(&Reservation::new(book, m, day(2025, 4, 1), 1))
        .unwrap();
    let fine = db
        .insert_fine(&Fine::new(m, 25.0, FineReason::BookLost, day(2025, 1, 1)))
        .unwrap();

    db.delete_member(m).unwrap();

    assert!(db.reservation_queue(book).unwrap().is_empty());
    assert!(matches!(
        db.get_fine(fine).unwrap_err(),
        Error::NotFound { entity: "fine", .. }
    ));
}

#[test]
fn member_with_loans_cannot_be_deleted() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);
    let copy = db.insert_copy(&BookCopy::new(book, 1)).unwrap();
    let m = db.insert_member(&member(1)).unwrap();
    db.insert_loan(&Loan::new(copy, m, day(2025, 3, 1), day(2025, 3, 15)))
        .unwrap();

    let err = db.delete_member(m).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn copy_numbers_are_unique_per_book() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);

    db.insert_copy(&BookCopy::new(book, 1)).unwrap();
    let err = db.insert_copy(&BookCopy::new(book, 1)).unwrap_err();
    assert!(err.is_constraint_violation());

    // Same number under a different book is fine
    let other = db
        .insert_book(&Book::new(
            "The Tombs of Atuan",
            "978-0-689-84536-9",
            db.list_publishers().unwrap()[0].id.unwrap(),
            db.list_categories().unwrap()[0].id.unwrap(),
        ))
        .unwrap();
    db.insert_copy(&BookCopy::new(other, 1)).unwrap();
}

#[test]
fn national_id_and_email_are_unique() {
    let db = Database::open_in_memory().unwrap();
    db.insert_member(&member(1)).unwrap();

    let mut same_national_id = member(2);
    same_national_id.national_id = "N0000001".into();
    assert!(db.insert_member(&same_national_id).unwrap_err().is_constraint_violation());

    let mut same_email = member(3);
    same_email.email = "member1@example.org".into();
    assert!(db.insert_member(&same_email).unwrap_err().is_constraint_violation());
}

#[test]
fn enum_domains_reject_unknown_literals() {
    let db = Database::open_in_memory().unwrap();
    let (_, _, book) = catalog(&db);
    let copy = db.insert_copy(&BookCopy::new(book, 1)).unwrap();
    let m = db.insert_member(&member(1)).unwrap();

    // loan_status has no 'Pending' state
    let result = db.conn().execute(
        "INSERT INTO loans (copy_id, member_id, loan_date, due_date, loan_status)
         VALUES (?1, ?2, '2025-03-01', '2025-03-15', 'Pending')",
        rusqlite::params![copy.as_i64(), m.as_i64()],
    );
    assert!(result.is_err());

    let result = db.conn().execute(
        "UPDATE book_copies SET status = 'Missing' WHERE copy_id = ?1",
        [copy.as_i64()],
    );
    assert!(result.is_err());

    let result = db.conn().execute(
        "INSERT INTO audit_log (table_name, record_id, action, logged_at)
         VALUES ('loans', 1, 'TRUNCATE', '2025-03-01T00:00:00Z')",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn seeded_copy_numbers_behave_per_spec() {
    let db = Database::open_in_memory().unwrap();
    seed_demo_data(&db).unwrap();

    let book = circ_core::model::BookId::new(1);

    // Copies 1 and 2 exist, so another copy 1 collides...
    let err = db.insert_copy(&BookCopy::new(book, 1)).unwrap_err();
    assert!(err.is_constraint_violation());

    // ...while copy 3 extends the run
    db.insert_copy(&BookCopy::new(book, 3)).unwrap();
    let numbers: Vec<u32> = db
        .copies_for_book(book)
        .unwrap()
        .iter()
        .map(|c| c.copy_number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn deleting_staff_keeps_audit_history() {
    let db = Database::open_in_memory().unwrap();
    seed_demo_data(&db).unwrap();

    let staff = db.list_staff().unwrap();
    let head = staff
        .iter()
        .find(|s| s.position == "Head Librarian")
        .unwrap()
        .id
        .unwrap();

    let before = db.history_for_record("members", 1).unwrap();
    assert!(before.iter().any(|e| e.staff_id == Some(head)));

    db.delete_staff(head).unwrap();

    let after = db.history_for_record("members", 1).unwrap();
    assert_eq!(after.len(), before.len());
    assert!(after.iter().all(|e| e.staff_id.is_none()));
}
