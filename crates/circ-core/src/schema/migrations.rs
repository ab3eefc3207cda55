/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// Every entity table, in foreign-key declaration order.
pub const TABLES: &[&str] = &[
    "members",
    "authors",
    "publishers",
    "categories",
    "books",
    "book_authors",
    "book_copies",
    "loans",
    "reservations",
    "fines",
    "staff",
    "audit_log",
];

const MIGRATION_001: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Registered members (one row per real person)
CREATE TABLE IF NOT EXISTS members (
    member_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    national_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    address TEXT,
    membership_date TEXT NOT NULL,
    membership_status TEXT NOT NULL DEFAULT 'Active'
        CHECK (membership_status IN ('Active', 'Suspended', 'Expired')),
    max_books_allowed INTEGER NOT NULL DEFAULT 5
);

CREATE INDEX IF NOT EXISTS idx_members_status ON members(membership_status);

-- Authors (names intentionally not unique)
CREATE TABLE IF NOT EXISTS authors (
    author_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    birth_date TEXT,
    nationality TEXT
);

CREATE INDEX IF NOT EXISTS idx_authors_name ON authors(name);

-- Publishers
CREATE TABLE IF NOT EXISTS publishers (
    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    publisher_name TEXT NOT NULL UNIQUE,
    address TEXT,
    website TEXT
);

-- Categories form a tree; removing a parent detaches its children
CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name TEXT NOT NULL UNIQUE,
    description TEXT,
    parent_category_id INTEGER
        REFERENCES categories(category_id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_category_id);

-- Cataloged titles
CREATE TABLE IF NOT EXISTS books (
    book_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    isbn TEXT NOT NULL UNIQUE,
    publication_year INTEGER,
    language TEXT,
    publisher_id INTEGER NOT NULL
        REFERENCES publishers(publisher_id) ON DELETE RESTRICT,
    category_id INTEGER NOT NULL
        REFERENCES categories(category_id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_books_publisher ON books(publisher_id);
CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id);
CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);

-- Book-author links (many-to-many, ordered)
CREATE TABLE IF NOT EXISTS book_authors (
    book_id INTEGER NOT NULL
        REFERENCES books(book_id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL
        REFERENCES authors(author_id) ON DELETE CASCADE,
    author_order INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (book_id, author_id)
);

-- Physical copies, numbered per title
CREATE TABLE IF NOT EXISTS book_copies (
    copy_id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL
        REFERENCES books(book_id) ON DELETE CASCADE,
    copy_number INTEGER NOT NULL,
    acquisition_date TEXT,
    shelf_location TEXT,
    status TEXT NOT NULL DEFAULT 'Available'
        CHECK (status IN ('Available', 'Checked Out', 'Lost', 'Damaged', 'Under Maintenance')),
    UNIQUE (book_id, copy_number)
);

CREATE INDEX IF NOT EXISTS idx_book_copies_status ON book_copies(status);

-- Loans; copies and members cannot be deleted while referenced here
CREATE TABLE IF NOT EXISTS loans (
    loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
    copy_id INTEGER NOT NULL
        REFERENCES book_copies(copy_id) ON DELETE RESTRICT,
    member_id INTEGER NOT NULL
        REFERENCES members(member_id) ON DELETE RESTRICT,
    loan_date TEXT NOT NULL,
    due_date TEXT NOT NULL,
    return_date TEXT,
    loan_status TEXT NOT NULL DEFAULT 'Active'
        CHECK (loan_status IN ('Active', 'Returned', 'Overdue')),
    late_fee REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_loans_copy ON loans(copy_id);
CREATE INDEX IF NOT EXISTS idx_loans_member ON loans(member_id);
CREATE INDEX IF NOT EXISTS idx_loans_status ON loans(loan_status);

-- Title-level reservations (never against a specific copy)
CREATE TABLE IF NOT EXISTS reservations (
    reservation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL
        REFERENCES books(book_id) ON DELETE CASCADE,
    member_id INTEGER NOT NULL
        REFERENCES members(member_id) ON DELETE CASCADE,
    reservation_date TEXT NOT NULL,
    expiry_date TEXT,
    reservation_status TEXT NOT NULL DEFAULT 'Active'
        CHECK (reservation_status IN ('Active', 'Fulfilled', 'Cancelled')),
    priority INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_reservations_book ON reservations(book_id);
CREATE INDEX IF NOT EXISTS idx_reservations_member ON reservations(member_id);

-- Fines survive deletion of the loan that caused them
CREATE TABLE IF NOT EXISTS fines (
    fine_id INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id INTEGER NOT NULL
        REFERENCES members(member_id) ON DELETE CASCADE,
    loan_id INTEGER
        REFERENCES loans(loan_id) ON DELETE SET NULL,
    fine_amount REAL NOT NULL,
    reason TEXT NOT NULL
        CHECK (reason IN ('Late Return', 'Book Damage', 'Book Lost', 'Other')),
    issued_date TEXT NOT NULL,
    payment_status TEXT NOT NULL DEFAULT 'Pending'
        CHECK (payment_status IN ('Pending', 'Paid', 'Waived')),
    payment_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_fines_member ON fines(member_id);
CREATE INDEX IF NOT EXISTS idx_fines_payment ON fines(payment_status);

-- Staff
CREATE TABLE IF NOT EXISTS staff (
    staff_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    position TEXT NOT NULL,
    salary REAL,
    hire_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Active'
        CHECK (status IN ('Active', 'Inactive'))
);

-- Append-only change history; (table_name, record_id) is a loose
-- reference so history outlives the audited row
CREATE TABLE IF NOT EXISTS audit_log (
    log_id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    record_id INTEGER NOT NULL,
    action TEXT NOT NULL
        CHECK (action IN ('INSERT', 'UPDATE', 'DELETE')),
    old_values TEXT,
    new_values TEXT,
    staff_id INTEGER
        REFERENCES staff(staff_id) ON DELETE SET NULL,
    logged_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audit_log_record ON audit_log(table_name, record_id);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
