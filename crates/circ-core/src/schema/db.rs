use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{
    AuditAction, AuditEntry, AuditLogId, Author, AuthorId, Book, BookAuthor, BookCopy, BookId,
    Category, CategoryId, CopyId, CopyStatus, Fine, FineId, FineReason, Loan, LoanId, LoanStatus,
    Member, MemberId, MembershipStatus, PaymentStatus, Publisher, PublisherId, Reservation,
    ReservationId, ReservationStatus, Staff, StaffId, StaffStatus,
};

use super::migrations::{MIGRATIONS, TABLES};

/// Circulation activity counters shown by `circ status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculationSummary {
    pub overdue_loans: i64,
    pub active_reservations: i64,
    pub pending_fines: i64,
}

/// A database connection with CRUD methods for the circulation entities.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Foreign-key enforcement is per connection in SQLite.
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        // Create migrations table if it doesn't exist
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        // Get applied migrations
        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Apply pending migrations
        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }

    /// Row counts per entity table, in declaration order.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let count: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
            counts.push((*table, count));
        }
        Ok(counts)
    }

    /// Counters for the circulation hot spots.
    pub fn circulation_summary(&self) -> Result<CirculationSummary> {
        let overdue_loans: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM loans WHERE loan_status = 'Overdue'",
            [],
            |row| row.get(0),
        )?;
        let active_reservations: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reservations WHERE reservation_status = 'Active'",
            [],
            |row| row.get(0),
        )?;
        let pending_fines: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM fines WHERE payment_status = 'Pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(CirculationSummary {
            overdue_loans,
            active_reservations,
            pending_fines,
        })
    }
}

fn decode_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn column_enum<T>(idx: usize, raw: &str, parse: fn(&str) -> Option<T>, what: &str) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| decode_error(idx, format!("unknown {what} literal: {raw}")))
}

fn column_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| decode_error(idx, format!("bad date {raw}: {e}")))
}

fn column_opt_date(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    raw.map(|s| column_date(idx, &s)).transpose()
}

fn column_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(Into::into)
        .map_err(|e| decode_error(idx, format!("bad timestamp {raw}: {e}")))
}

fn column_opt_json(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<serde_json::Value>> {
    raw.map(|s| {
        serde_json::from_str(&s).map_err(|e| decode_error(idx, format!("bad JSON snapshot: {e}")))
    })
    .transpose()
}

fn require_id<T: Copy>(id: Option<T>, entity: &'static str) -> Result<T> {
    id.ok_or_else(|| Error::InvalidData(format!("{entity} has not been inserted yet")))
}

// Member CRUD
impl Database {
    /// Insert a new member and return the assigned id.
    pub fn insert_member(&self, member: &Member) -> Result<MemberId> {
        self.conn.execute(
            "INSERT INTO members (
                first_name, last_name, national_id, email, phone, address,
                membership_date, membership_status, max_books_allowed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                member.first_name,
                member.last_name,
                member.national_id,
                member.email,
                member.phone,
                member.address,
                member.membership_date.to_string(),
                member.membership_status.as_str(),
                i64::from(member.max_books_allowed),
            ],
        )?;
        Ok(MemberId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_member(&self, id: MemberId) -> Result<Member> {
        self.conn
            .query_row(
                "SELECT member_id, first_name, last_name, national_id, email, phone,
                        address, membership_date, membership_status, max_books_allowed
                 FROM members WHERE member_id = ?1",
                [id.as_i64()],
                |row| self.row_to_member(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "member",
                id: id.as_i64(),
            })
    }

    pub fn list_members(&self) -> Result<Vec<Member>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, first_name, last_name, national_id, email, phone,
                    address, membership_date, membership_status, max_books_allowed
             FROM members ORDER BY last_name, first_name",
        )?;
        let members = stmt
            .query_map([], |row| self.row_to_member(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    /// Update an existing member.
    pub fn update_member(&self, member: &Member) -> Result<()> {
        let id = require_id(member.id, "member")?;
        self.conn.execute(
            "UPDATE members SET
                first_name = ?2, last_name = ?3, national_id = ?4, email = ?5,
                phone = ?6, address = ?7, membership_date = ?8,
                membership_status = ?9, max_books_allowed = ?10
             WHERE member_id = ?1",
            rusqlite::params![
                id.as_i64(),
                member.first_name,
                member.last_name,
                member.national_id,
                member.email,
                member.phone,
                member.address,
                member.membership_date.to_string(),
                member.membership_status.as_str(),
                i64::from(member.max_books_allowed),
            ],
        )?;
        Ok(())
    }

    /// Delete a member; their reservations and fines cascade away.
    pub fn delete_member(&self, id: MemberId) -> Result<()> {
        self.conn
            .execute("DELETE FROM members WHERE member_id = ?1", [id.as_i64()])?;
        Ok(())
    }

    fn row_to_member(&self, row: &rusqlite::Row) -> rusqlite::Result<Member> {
        let membership_date: String = row.get(7)?;
        let status: String = row.get(8)?;
        let max_books: i64 = row.get(9)?;
        Ok(Member {
            id: Some(MemberId::new(row.get(0)?)),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            national_id: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            address: row.get(6)?,
            membership_date: column_date(7, &membership_date)?,
            membership_status: column_enum(8, &status, MembershipStatus::parse, "membership_status")?,
            max_books_allowed: max_books as u32,
        })
    }
}

// Author CRUD
impl Database {
    /// Insert a new author and return the assigned id.
    pub fn insert_author(&self, author: &Author) -> Result<AuthorId> {
        self.conn.execute(
            "INSERT INTO authors (name, birth_date, nationality) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                author.name,
                author.birth_date.map(|d| d.to_string()),
                author.nationality,
            ],
        )?;
        Ok(AuthorId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_author(&self, id: AuthorId) -> Result<Author> {
        self.conn
            .query_row(
                "SELECT author_id, name, birth_date, nationality
                 FROM authors WHERE author_id = ?1",
                [id.as_i64()],
                |row| self.row_to_author(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "author",
                id: id.as_i64(),
            })
    }

    pub fn list_authors(&self) -> Result<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT author_id, name, birth_date, nationality FROM authors ORDER BY name",
        )?;
        let authors = stmt
            .query_map([], |row| self.row_to_author(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    /// Delete an author; their book links cascade away.
    pub fn delete_author(&self, id: AuthorId) -> Result<()> {
        self.conn
            .execute("DELETE FROM authors WHERE author_id = ?1", [id.as_i64()])?;
        Ok(())
    }

    fn row_to_author(&self, row: &rusqlite::Row) -> rusqlite::Result<Author> {
        let birth_date: Option<String> = row.get(2)?;
        Ok(Author {
            id: Some(AuthorId::new(row.get(0)?)),
            name: row.get(1)?,
            birth_date: column_opt_date(2, birth_date)?,
            nationality: row.get(3)?,
        })
    }
}

// Publisher CRUD
impl Database {
    /// Insert a new publisher and return the assigned id.
    pub fn insert_publisher(&self, publisher: &Publisher) -> Result<PublisherId> {
        self.conn.execute(
            "INSERT INTO publishers (publisher_name, address, website) VALUES (?1, ?2, ?3)",
            rusqlite::params![publisher.publisher_name, publisher.address, publisher.website],
        )?;
        Ok(PublisherId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_publisher(&self, id: PublisherId) -> Result<Publisher> {
        self.conn
            .query_row(
                "SELECT publisher_id, publisher_name, address, website
                 FROM publishers WHERE publisher_id = ?1",
                [id.as_i64()],
                |row| self.row_to_publisher(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "publisher",
                id: id.as_i64(),
            })
    }

    pub fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let mut stmt = self.conn.prepare(
            "SELECT publisher_id, publisher_name, address, website
             FROM publishers ORDER BY publisher_name",
        )?;
        let publishers = stmt
            .query_map([], |row| self.row_to_publisher(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(publishers)
    }

    /// Delete a publisher; fails while any book references it.
    pub fn delete_publisher(&self, id: PublisherId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM publishers WHERE publisher_id = ?1",
            [id.as_i64()],
        )?;
        Ok(())
    }

    fn row_to_publisher(&self, row: &rusqlite::Row) -> rusqlite::Result<Publisher> {
        Ok(Publisher {
            id: Some(PublisherId::new(row.get(0)?)),
            publisher_name: row.get(1)?,
            address: row.get(2)?,
            website: row.get(3)?,
        })
    }
}

// Category CRUD
impl Database {
    /// Insert a new category and return the assigned id.
    pub fn insert_category(&self, category: &Category) -> Result<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (category_name, description, parent_category_id)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
                category.category_name,
                category.description,
                category.parent_category_id.map(|id| id.as_i64()),
            ],
        )?;
        Ok(CategoryId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Category> {
        self.conn
            .query_row(
                "SELECT category_id, category_name, description, parent_category_id
                 FROM categories WHERE category_id = ?1",
                [id.as_i64()],
                |row| self.row_to_category(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "category",
                id: id.as_i64(),
            })
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT category_id, category_name, description, parent_category_id
             FROM categories ORDER BY category_name",
        )?;
        let categories = stmt
            .query_map([], |row| self.row_to_category(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    /// Direct children of a category.
    pub fn subcategories(&self, id: CategoryId) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT category_id, category_name, description, parent_category_id
             FROM categories WHERE parent_category_id = ?1 ORDER BY category_name",
        )?;
        let categories = stmt
            .query_map([id.as_i64()], |row| self.row_to_category(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    /// Delete a category; children are detached (parent link nulled),
    /// but the delete fails while any book references the category.
    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM categories WHERE category_id = ?1",
            [id.as_i64()],
        )?;
        Ok(())
    }

    fn row_to_category(&self, row: &rusqlite::Row) -> rusqlite::Result<Category> {
        let parent: Option<i64> = row.get(3)?;
        Ok(Category {
            id: Some(CategoryId::new(row.get(0)?)),
            category_name: row.get(1)?,
            description: row.get(2)?,
            parent_category_id: parent.map(CategoryId::new),
        })
    }
}

// Book CRUD
impl Database {
    /// Insert a new book and return the assigned id.
    pub fn insert_book(&self, book: &Book) -> Result<BookId> {
        self.conn.execute(
            "INSERT INTO books (title, isbn, publication_year, language, publisher_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                book.title,
                book.isbn,
                book.publication_year,
                book.language,
                book.publisher_id.as_i64(),
                book.category_id.as_i64(),
            ],
        )?;
        Ok(BookId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_book(&self, id: BookId) -> Result<Book> {
        self.conn
            .query_row(
                "SELECT book_id, title, isbn, publication_year, language, publisher_id, category_id
                 FROM books WHERE book_id = ?1",
                [id.as_i64()],
                |row| self.row_to_book(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "book",
                id: id.as_i64(),
            })
    }

    /// Look a title up by its unique ISBN.
    pub fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .conn
            .query_row(
                "SELECT book_id, title, isbn, publication_year, language, publisher_id, category_id
                 FROM books WHERE isbn = ?1",
                [isbn],
                |row| self.row_to_book(row),
            )
            .optional()?)
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        let mut stmt = self.conn.prepare(
            "SELECT book_id, title, isbn, publication_year, language, publisher_id, category_id
             FROM books ORDER BY title",
        )?;
        let books = stmt
            .query_map([], |row| self.row_to_book(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    /// Delete a book; its copies and author links cascade away.
    pub fn delete_book(&self, id: BookId) -> Result<()> {
        self.conn
            .execute("DELETE FROM books WHERE book_id = ?1", [id.as_i64()])?;
        Ok(())
    }

    /// Attach an author to a book at the given title-page position.
    pub fn link_author(&self, link: &BookAuthor) -> Result<()> {
        self.conn.execute(
            "INSERT INTO book_authors (book_id, author_id, author_order) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                link.book_id.as_i64(),
                link.author_id.as_i64(),
                i64::from(link.author_order),
            ],
        )?;
        Ok(())
    }

    /// Authors of a book, in title-page order.
    pub fn authors_for_book(&self, id: BookId) -> Result<Vec<Author>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.author_id, a.name, a.birth_date, a.nationality
             FROM authors a
             JOIN book_authors ba ON ba.author_id = a.author_id
             WHERE ba.book_id = ?1
             ORDER BY ba.author_order",
        )?;
        let authors = stmt
            .query_map([id.as_i64()], |row| self.row_to_author(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    fn row_to_book(&self, row: &rusqlite::Row) -> rusqlite::Result<Book> {
        Ok(Book {
            id: Some(BookId::new(row.get(0)?)),
            title: row.get(1)?,
            isbn: row.get(2)?,
            publication_year: row.get(3)?,
            language: row.get(4)?,
            publisher_id: PublisherId::new(row.get(5)?),
            category_id: CategoryId::new(row.get(6)?),
        })
    }
}

// Copy CRUD
impl Database {
    /// Insert a new physical copy and return the assigned id.
    pub fn insert_copy(&self, copy: &BookCopy) -> Result<CopyId> {
        self.conn.execute(
            "INSERT INTO book_copies (book_id, copy_number, acquisition_date, shelf_location, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                copy.book_id.as_i64(),
                i64::from(copy.copy_number),
                copy.acquisition_date.map(|d| d.to_string()),
                copy.shelf_location,
                copy.status.as_str(),
            ],
        )?;
        Ok(CopyId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_copy(&self, id: CopyId) -> Result<BookCopy> {
        self.conn
            .query_row(
                "SELECT copy_id, book_id, copy_number, acquisition_date, shelf_location, status
                 FROM book_copies WHERE copy_id = ?1",
                [id.as_i64()],
                |row| self.row_to_copy(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "copy",
                id: id.as_i64(),
            })
    }

    /// All copies of a title, in copy-number order.
    pub fn copies_for_book(&self, id: BookId) -> Result<Vec<BookCopy>> {
        let mut stmt = self.conn.prepare(
            "SELECT copy_id, book_id, copy_number, acquisition_date, shelf_location, status
             FROM book_copies WHERE book_id = ?1 ORDER BY copy_number",
        )?;
        let copies = stmt
            .query_map([id.as_i64()], |row| self.row_to_copy(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(copies)
    }

    /// Copies of a title currently on the shelf.
    pub fn available_copies(&self, id: BookId) -> Result<Vec<BookCopy>> {
        let mut stmt = self.conn.prepare(
            "SELECT copy_id, book_id, copy_number, acquisition_date, shelf_location, status
             FROM book_copies
             WHERE book_id = ?1 AND status = 'Available'
             ORDER BY copy_number",
        )?;
        let copies = stmt
            .query_map([id.as_i64()], |row| self.row_to_copy(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(copies)
    }

    /// Move a copy to a new shelf status.
    pub fn set_copy_status(&self, id: CopyId, status: CopyStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE book_copies SET status = ?2 WHERE copy_id = ?1",
            rusqlite::params![id.as_i64(), status.as_str()],
        )?;
        Ok(())
    }

    fn row_to_copy(&self, row: &rusqlite::Row) -> rusqlite::Result<BookCopy> {
        let copy_number: i64 = row.get(2)?;
        let acquisition_date: Option<String> = row.get(3)?;
        let status: String = row.get(5)?;
        Ok(BookCopy {
            id: Some(CopyId::new(row.get(0)?)),
            book_id: BookId::new(row.get(1)?),
            copy_number: copy_number as u32,
            acquisition_date: column_opt_date(3, acquisition_date)?,
            shelf_location: row.get(4)?,
            status: column_enum(5, &status, CopyStatus::parse, "copy status")?,
        })
    }
}

// Loan CRUD
impl Database {
    /// Insert a new loan and return the assigned id.
    pub fn insert_loan(&self, loan: &Loan) -> Result<LoanId> {
        self.conn.execute(
            "INSERT INTO loans (copy_id, member_id, loan_date, due_date, return_date, loan_status, late_fee)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                loan.copy_id.as_i64(),
                loan.member_id.as_i64(),
                loan.loan_date.to_string(),
                loan.due_date.to_string(),
                loan.return_date.map(|d| d.to_string()),
                loan.loan_status.as_str(),
                loan.late_fee,
            ],
        )?;
        Ok(LoanId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_loan(&self, id: LoanId) -> Result<Loan> {
        self.conn
            .query_row(
                "SELECT loan_id, copy_id, member_id, loan_date, due_date, return_date, loan_status, late_fee
                 FROM loans WHERE loan_id = ?1",
                [id.as_i64()],
                |row| self.row_to_loan(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "loan",
                id: id.as_i64(),
            })
    }

    /// Update an existing loan.
    pub fn update_loan(&self, loan: &Loan) -> Result<()> {
        let id = require_id(loan.id, "loan")?;
        self.conn.execute(
            "UPDATE loans SET
                copy_id = ?2, member_id = ?3, loan_date = ?4, due_date = ?5,
                return_date = ?6, loan_status = ?7, late_fee = ?8
             WHERE loan_id = ?1",
            rusqlite::params![
                id.as_i64(),
                loan.copy_id.as_i64(),
                loan.member_id.as_i64(),
                loan.loan_date.to_string(),
                loan.due_date.to_string(),
                loan.return_date.map(|d| d.to_string()),
                loan.loan_status.as_str(),
                loan.late_fee,
            ],
        )?;
        Ok(())
    }

    /// Delete a loan; any fine that referenced it keeps its row with a
    /// nulled loan link.
    pub fn delete_loan(&self, id: LoanId) -> Result<()> {
        self.conn
            .execute("DELETE FROM loans WHERE loan_id = ?1", [id.as_i64()])?;
        Ok(())
    }

    /// The active loan on a copy, if any.
    ///
    /// The schema does not forbid two active loans on one copy; this is
    /// the check an application performs before issuing a new loan.
    pub fn active_loan_for_copy(&self, id: CopyId) -> Result<Option<Loan>> {
        Ok(self
            .conn
            .query_row(
                "SELECT loan_id, copy_id, member_id, loan_date, due_date, return_date, loan_status, late_fee
                 FROM loans
                 WHERE copy_id = ?1 AND loan_status = 'Active'
                 ORDER BY loan_date DESC
                 LIMIT 1",
                [id.as_i64()],
                |row| self.row_to_loan(row),
            )
            .optional()?)
    }

    /// All loans flagged overdue.
    pub fn overdue_loans(&self) -> Result<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT loan_id, copy_id, member_id, loan_date, due_date, return_date, loan_status, late_fee
             FROM loans WHERE loan_status = 'Overdue' ORDER BY due_date",
        )?;
        let loans = stmt
            .query_map([], |row| self.row_to_loan(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(loans)
    }

    /// A member's full borrowing history, newest first.
    pub fn loans_for_member(&self, id: MemberId) -> Result<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT loan_id, copy_id, member_id, loan_date, due_date, return_date, loan_status, late_fee
             FROM loans WHERE member_id = ?1 ORDER BY loan_date DESC",
        )?;
        let loans = stmt
            .query_map([id.as_i64()], |row| self.row_to_loan(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(loans)
    }

    fn row_to_loan(&self, row: &rusqlite::Row) -> rusqlite::Result<Loan> {
        let loan_date: String = row.get(3)?;
        let due_date: String = row.get(4)?;
        let return_date: Option<String> = row.get(5)?;
        let status: String = row.get(6)?;
        Ok(Loan {
            id: Some(LoanId::new(row.get(0)?)),
            copy_id: CopyId::new(row.get(1)?),
            member_id: MemberId::new(row.get(2)?),
            loan_date: column_date(3, &loan_date)?,
            due_date: column_date(4, &due_date)?,
            return_date: column_opt_date(5, return_date)?,
            loan_status: column_enum(6, &status, LoanStatus::parse, "loan_status")?,
            late_fee: row.get(7)?,
        })
    }
}

// Reservation CRUD
impl Database {
    /// Insert a new reservation and return the assigned id.
    pub fn insert_reservation(&self, reservation: &Reservation) -> Result<ReservationId> {
        self.conn.execute(
            "INSERT INTO reservations (book_id, member_id, reservation_date, expiry_date, reservation_status, priority)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                reservation.book_id.as_i64(),
                reservation.member_id.as_i64(),
                reservation.reservation_date.to_string(),
                reservation.expiry_date.map(|d| d.to_string()),
                reservation.reservation_status.as_str(),
                i64::from(reservation.priority),
            ],
        )?;
        Ok(ReservationId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_reservation(&self, id: ReservationId) -> Result<Reservation> {
        self.conn
            .query_row(
                "SELECT reservation_id, book_id, member_id, reservation_date, expiry_date, reservation_status, priority
                 FROM reservations WHERE reservation_id = ?1",
                [id.as_i64()],
                |row| self.row_to_reservation(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "reservation",
                id: id.as_i64(),
            })
    }

    /// Move a reservation to a new lifecycle state.
    pub fn set_reservation_status(&self, id: ReservationId, status: ReservationStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE reservations SET reservation_status = ?2 WHERE reservation_id = ?1",
            rusqlite::params![id.as_i64(), status.as_str()],
        )?;
        Ok(())
    }

    /// Active holds on a title, best priority first.
    pub fn reservation_queue(&self, id: BookId) -> Result<Vec<Reservation>> {
        let mut stmt = self.conn.prepare(
            "SELECT reservation_id, book_id, member_id, reservation_date, expiry_date, reservation_status, priority
             FROM reservations
             WHERE book_id = ?1 AND reservation_status = 'Active'
             ORDER BY priority, reservation_date",
        )?;
        let reservations = stmt
            .query_map([id.as_i64()], |row| self.row_to_reservation(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    fn row_to_reservation(&self, row: &rusqlite::Row) -> rusqlite::Result<Reservation> {
        let reservation_date: String = row.get(3)?;
        let expiry_date: Option<String> = row.get(4)?;
        let status: String = row.get(5)?;
        let priority: i64 = row.get(6)?;
        Ok(Reservation {
            id: Some(ReservationId::new(row.get(0)?)),
            book_id: BookId::new(row.get(1)?),
            member_id: MemberId::new(row.get(2)?),
            reservation_date: column_date(3, &reservation_date)?,
            expiry_date: column_opt_date(4, expiry_date)?,
            reservation_status: column_enum(5, &status, ReservationStatus::parse, "reservation_status")?,
            priority: priority as u32,
        })
    }
}

// Fine CRUD
impl Database {
    /// Insert a new fine and return the assigned id.
    pub fn insert_fine(&self, fine: &Fine) -> Result<FineId> {
        self.conn.execute(
            "INSERT INTO fines (member_id, loan_id, fine_amount, reason, issued_date, payment_status, payment_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                fine.member_id.as_i64(),
                fine.loan_id.map(|id| id.as_i64()),
                fine.fine_amount,
                fine.reason.as_str(),
                fine.issued_date.to_string(),
                fine.payment_status.as_str(),
                fine.payment_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(FineId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_fine(&self, id: FineId) -> Result<Fine> {
        self.conn
            .query_row(
                "SELECT fine_id, member_id, loan_id, fine_amount, reason, issued_date, payment_status, payment_date
                 FROM fines WHERE fine_id = ?1",
                [id.as_i64()],
                |row| self.row_to_fine(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "fine",
                id: id.as_i64(),
            })
    }

    /// A member's unpaid fines, oldest first.
    pub fn outstanding_fines(&self, id: MemberId) -> Result<Vec<Fine>> {
        let mut stmt = self.conn.prepare(
            "SELECT fine_id, member_id, loan_id, fine_amount, reason, issued_date, payment_status, payment_date
             FROM fines
             WHERE member_id = ?1 AND payment_status = 'Pending'
             ORDER BY issued_date",
        )?;
        let fines = stmt
            .query_map([id.as_i64()], |row| self.row_to_fine(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(fines)
    }

    /// Record payment (or waiver) of a fine.
    pub fn settle_fine(&self, id: FineId, status: PaymentStatus, date: NaiveDate) -> Result<()> {
        self.conn.execute(
            "UPDATE fines SET payment_status = ?2, payment_date = ?3 WHERE fine_id = ?1",
            rusqlite::params![id.as_i64(), status.as_str(), date.to_string()],
        )?;
        Ok(())
    }

    fn row_to_fine(&self, row: &rusqlite::Row) -> rusqlite::Result<Fine> {
        let loan_id: Option<i64> = row.get(2)?;
        let reason: String = row.get(4)?;
        let issued_date: String = row.get(5)?;
        let payment_status: String = row.get(6)?;
        let payment_date: Option<String> = row.get(7)?;
        Ok(Fine {
            id: Some(FineId::new(row.get(0)?)),
            member_id: MemberId::new(row.get(1)?),
            loan_id: loan_id.map(LoanId::new),
            fine_amount: row.get(3)?,
            reason: column_enum(4, &reason, FineReason::parse, "fine reason")?,
            issued_date: column_date(5, &issued_date)?,
            payment_status: column_enum(6, &payment_status, PaymentStatus::parse, "payment_status")?,
            payment_date: column_opt_date(7, payment_date)?,
        })
    }
}

// Staff CRUD
impl Database {
    /// Insert a new staff record and return the assigned id.
    pub fn insert_staff(&self, staff: &Staff) -> Result<StaffId> {
        self.conn.execute(
            "INSERT INTO staff (first_name, last_name, email, position, salary, hire_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                staff.first_name,
                staff.last_name,
                staff.email,
                staff.position,
                staff.salary,
                staff.hire_date.to_string(),
                staff.status.as_str(),
            ],
        )?;
        Ok(StaffId::new(self.conn.last_insert_rowid()))
    }

    pub fn get_staff(&self, id: StaffId) -> Result<Staff> {
        self.conn
            .query_row(
                "SELECT staff_id, first_name, last_name, email, position, salary, hire_date, status
                 FROM staff WHERE staff_id = ?1",
                [id.as_i64()],
                |row| self.row_to_staff(row),
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "staff",
                id: id.as_i64(),
            })
    }

    pub fn list_staff(&self) -> Result<Vec<Staff>> {
        let mut stmt = self.conn.prepare(
            "SELECT staff_id, first_name, last_name, email, position, salary, hire_date, status
             FROM staff ORDER BY last_name, first_name",
        )?;
        let staff = stmt
            .query_map([], |row| self.row_to_staff(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(staff)
    }

    /// Delete a staff record; audit rows it signed keep their history
    /// with a nulled staff link.
    pub fn delete_staff(&self, id: StaffId) -> Result<()> {
        self.conn
            .execute("DELETE FROM staff WHERE staff_id = ?1", [id.as_i64()])?;
        Ok(())
    }

    fn row_to_staff(&self, row: &rusqlite::Row) -> rusqlite::Result<Staff> {
        let hire_date: String = row.get(6)?;
        let status: String = row.get(7)?;
        Ok(Staff {
            id: Some(StaffId::new(row.get(0)?)),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            position: row.get(4)?,
            salary: row.get(5)?,
            hire_date: column_date(6, &hire_date)?,
            status: column_enum(7, &status, StaffStatus::parse, "staff status")?,
        })
    }
}

// Audit log
impl Database {
    /// Append a change record and return the assigned id.
    pub fn record_change(&self, entry: &AuditEntry) -> Result<AuditLogId> {
        self.conn.execute(
            "INSERT INTO audit_log (table_name, record_id, action, old_values, new_values, staff_id, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                entry.table_name,
                entry.record_id,
                entry.action.as_str(),
                entry.old_values.as_ref().map(serde_json::Value::to_string),
                entry.new_values.as_ref().map(serde_json::Value::to_string),
                entry.staff_id.map(|id| id.as_i64()),
                entry.logged_at.to_rfc3339(),
            ],
        )?;
        Ok(AuditLogId::new(self.conn.last_insert_rowid()))
    }

    /// Change history for one row of one table, oldest first.
    pub fn history_for_record(&self, table_name: &str, record_id: i64) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT log_id, table_name, record_id, action, old_values, new_values, staff_id, logged_at
             FROM audit_log
             WHERE table_name = ?1 AND record_id = ?2
             ORDER BY logged_at, log_id",
        )?;
        let entries = stmt
            .query_map(rusqlite::params![table_name, record_id], |row| {
                self.row_to_audit_entry(row)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn row_to_audit_entry(&self, row: &rusqlite::Row) -> rusqlite::Result<AuditEntry> {
        let action: String = row.get(3)?;
        let old_values: Option<String> = row.get(4)?;
        let new_values: Option<String> = row.get(5)?;
        let staff_id: Option<i64> = row.get(6)?;
        let logged_at: String = row.get(7)?;
        Ok(AuditEntry {
            id: Some(AuditLogId::new(row.get(0)?)),
            table_name: row.get(1)?,
            record_id: row.get(2)?,
            action: column_enum(3, &action, AuditAction::parse, "audit action")?,
            old_values: column_opt_json(4, old_values)?,
            new_values: column_opt_json(5, new_values)?,
            staff_id: staff_id.map(StaffId::new),
            logged_at: column_timestamp(7, &logged_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditAction, AuditEntry};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_catalog(db: &Database) -> (PublisherId, CategoryId, BookId) {
        let publisher = db.insert_publisher(&Publisher::new("Ace Books")).unwrap();
        let category = db.insert_category(&Category::new("Science Fiction")).unwrap();
        let book = db
            .insert_book(&Book::new(
                "The Dispossessed",
                "978-0-06-051275-3",
                publisher,
                category,
            ))
            .unwrap();
        (publisher, category, book)
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        // Verify migrations table exists
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1); // One migration applied

        let fk_on: i64 = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_on, 1);
    }

    #[test]
    fn test_member_round_trip() {
        let db = Database::open_in_memory().unwrap();

        let member = Member::new("Amira", "Haddad", "A1204937", "amira@example.org", day(2024, 9, 2))
            .with_phone("+20 2 3456 789");
        let id = db.insert_member(&member).unwrap();

        let loaded = db.get_member(id).unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.national_id, "A1204937");
        assert_eq!(loaded.phone.as_deref(), Some("+20 2 3456 789"));
        assert_eq!(loaded.membership_status, MembershipStatus::Active);
    }

    #[test]
    fn test_get_member_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.get_member(MemberId::new(99)).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "member", id: 99 }));
    }

    #[test]
    fn test_update_member_requires_id() {
        let db = Database::open_in_memory().unwrap();
        let member = Member::new("Ed", "Moll", "Z0000001", "ed@example.org", day(2024, 1, 1));
        let err = db.update_member(&member).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_book_with_authors_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let (_, _, book) = sample_catalog(&db);

        let second = db.insert_author(&Author::new("Avram Davidson")).unwrap();
        let first = db
            .insert_author(&Author::new("Ursula K. Le Guin").with_nationality("American"))
            .unwrap();
        db.link_author(&BookAuthor::new(book, second, 2)).unwrap();
        db.link_author(&BookAuthor::new(book, first, 1)).unwrap();

        let authors = db.authors_for_book(book).unwrap();
        assert_eq!(authors.len(), 2);
        // Ordered by author_order, not insertion
        assert_eq!(authors[0].name, "Ursula K. Le Guin");
        assert_eq!(authors[1].name, "Avram Davidson");

        let by_isbn = db.get_book_by_isbn("978-0-06-051275-3").unwrap();
        assert_eq!(by_isbn.map(|b| b.id), Some(Some(book)));
    }

    #[test]
    fn test_copy_status_transitions() {
        let db = Database::open_in_memory().unwrap();
        let (_, _, book) = sample_catalog(&db);

        let copy = db.insert_copy(&BookCopy::new(book, 1)).unwrap();
        assert_eq!(db.available_copies(book).unwrap().len(), 1);

        db.set_copy_status(copy, CopyStatus::CheckedOut).unwrap();
        assert!(db.available_copies(book).unwrap().is_empty());
        assert_eq!(db.get_copy(copy).unwrap().status, CopyStatus::CheckedOut);
    }

    #[test]
    fn test_active_loan_for_copy() {
        let db = Database::open_in_memory().unwrap();
        let (_, _, book) = sample_catalog(&db);
        let copy = db.insert_copy(&BookCopy::new(book, 1)).unwrap();
        let member = db
            .insert_member(&Member::new("Amira", "Haddad", "A1204937", "amira@example.org", day(2024, 9, 2)))
            .unwrap();

        assert!(db.active_loan_for_copy(copy).unwrap().is_none());

        let loan = db
            .insert_loan(&Loan::new(copy, member, day(2025, 3, 1), day(2025, 3, 15)))
            .unwrap();
        let active = db.active_loan_for_copy(copy).unwrap().unwrap();
        assert_eq!(active.id, Some(loan));

        let mut returned = active;
        returned.loan_status = LoanStatus::Returned;
        returned.return_date = Some(day(2025, 3, 10));
        db.update_loan(&returned).unwrap();
        assert!(db.active_loan_for_copy(copy).unwrap().is_none());
    }

    #[test]
    fn test_reservation_queue_ordering() {
        let db = Database::open_in_memory().unwrap();
        let (_, _, book) = sample_catalog(&db);
        let m1 = db
            .insert_member(&Member::new("Amira", "Haddad", "A1204937", "amira@example.org", day(2024, 9, 2)))
            .unwrap();
        let m2 = db
            .insert_member(&Member::new("Jonas", "Weber", "C7731185", "jweber@example.org", day(2023, 1, 15)))
            .unwrap();

        db.insert_reservation(&Reservation::new(book, m2, day(2025, 4, 2), 2))
            .unwrap();
        let first = db
            .insert_reservation(&Reservation::new(book, m1, day(2025, 4, 1), 1))
            .unwrap();
        let cancelled = db
            .insert_reservation(
                &Reservation::new(book, m1, day(2025, 3, 20), 1)
                    .with_status(ReservationStatus::Cancelled),
            )
            .unwrap();

        let queue = db.reservation_queue(book).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].id, Some(first));
        assert!(queue.iter().all(|r| r.id != Some(cancelled)));
    }

    #[test]
    fn test_fine_settlement() {
        let db = Database::open_in_memory().unwrap();
        let member = db
            .insert_member(&Member::new("Amira", "Haddad", "A1204937", "amira@example.org", day(2024, 9, 2)))
            .unwrap();

        let fine = db
            .insert_fine(&Fine::new(member, 4.50, FineReason::LateReturn, day(2025, 3, 20)))
            .unwrap();
        assert_eq!(db.outstanding_fines(member).unwrap().len(), 1);

        db.settle_fine(fine, PaymentStatus::Paid, day(2025, 3, 25))
            .unwrap();
        assert!(db.outstanding_fines(member).unwrap().is_empty());
        let settled = db.get_fine(fine).unwrap();
        assert_eq!(settled.payment_status, PaymentStatus::Paid);
        assert_eq!(settled.payment_date, Some(day(2025, 3, 25)));
    }

    #[test]
    fn test_audit_round_trip() {
        let db = Database::open_in_memory().unwrap();

        let entry = AuditEntry::new("book_copies", 3, AuditAction::Update)
            .with_old_values(serde_json::json!({"status": "Available"}))
            .with_new_values(serde_json::json!({"status": "Checked Out"}));
        db.record_change(&entry).unwrap();

        let history = db.history_for_record("book_copies", 3).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AuditAction::Update);
        assert_eq!(
            history[0].new_values,
            Some(serde_json::json!({"status": "Checked Out"}))
        );
        assert!(history[0].staff_id.is_none());
    }

    #[test]
    fn test_table_counts_cover_all_tables() {
        let db = Database::open_in_memory().unwrap();
        let counts = db.table_counts().unwrap();
        assert_eq!(counts.len(), TABLES.len());
        assert!(counts.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_circulation_summary_empty() {
        let db = Database::open_in_memory().unwrap();
        let summary = db.circulation_summary().unwrap();
        assert_eq!(summary.overdue_loans, 0);
        assert_eq!(summary.active_reservations, 0);
        assert_eq!(summary.pending_fines, 0);
    }
}
