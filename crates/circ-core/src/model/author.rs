use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::AuthorId;

/// An author of one or more cataloged titles.
///
/// Names are deliberately not unique; two authors may share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<AuthorId>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
}

impl Author {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date: None,
            nationality: None,
        }
    }

    #[must_use]
    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_new() {
        let author = Author::new("Ursula K. Le Guin");
        assert_eq!(author.name, "Ursula K. Le Guin");
        assert!(author.birth_date.is_none());
    }

    #[test]
    fn test_author_builder() {
        let author = Author::new("Isaac Asimov")
            .with_birth_date(NaiveDate::from_ymd_opt(1920, 1, 2).unwrap())
            .with_nationality("American");

        assert_eq!(author.nationality.as_deref(), Some("American"));
        assert!(author.birth_date.is_some());
    }
}
