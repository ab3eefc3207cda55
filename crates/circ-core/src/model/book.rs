use serde::{Deserialize, Serialize};

use crate::model::ids::{AuthorId, BookId, CategoryId, PublisherId};

/// A cataloged title.
///
/// A book belongs to exactly one publisher and one category (both
/// restrict-delete) and has one or more authors through [`BookAuthor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<BookId>,
    pub title: String,

    /// ISBN-13, unique across the catalog.
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub publisher_id: PublisherId,
    pub category_id: CategoryId,
}

impl Book {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        isbn: impl Into<String>,
        publisher_id: PublisherId,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            isbn: isbn.into(),
            publication_year: None,
            language: None,
            publisher_id,
            category_id,
        }
    }

    #[must_use]
    pub fn with_publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A book-to-author link with the author's position on the title page.
///
/// Rows cascade away with either the book or the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAuthor {
    pub book_id: BookId,
    pub author_id: AuthorId,
    pub author_order: u32,
}

impl BookAuthor {
    #[must_use]
    pub const fn new(book_id: BookId, author_id: AuthorId, author_order: u32) -> Self {
        Self {
            book_id,
            author_id,
            author_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_new() {
        let book = Book::new(
            "The Left Hand of Darkness",
            "978-0-441-47812-5",
            PublisherId::new(1),
            CategoryId::new(2),
        );
        assert_eq!(book.isbn, "978-0-441-47812-5");
        assert!(book.publication_year.is_none());
    }

    #[test]
    fn test_book_builder() {
        let book = Book::new("Cosmos", "978-0-345-53943-4", PublisherId::new(1), CategoryId::new(1))
            .with_publication_year(1980)
            .with_language("English");
        assert_eq!(book.publication_year, Some(1980));
        assert_eq!(book.language.as_deref(), Some("English"));
    }

    #[test]
    fn test_book_author_link() {
        let link = BookAuthor::new(BookId::new(1), AuthorId::new(9), 2);
        assert_eq!(link.author_order, 2);
    }
}
