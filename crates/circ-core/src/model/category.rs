use serde::{Deserialize, Serialize};

use crate::model::ids::CategoryId;

/// A subject classification.
///
/// Categories form a tree through `parent_category_id`; deleting a parent
/// nulls the link on its children rather than deleting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub category_name: String,
    pub description: Option<String>,
    pub parent_category_id: Option<CategoryId>,
}

impl Category {
    #[must_use]
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            id: None,
            category_name: category_name.into(),
            description: None,
            parent_category_id: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent_category_id = Some(parent);
        self
    }

    /// Whether this category sits at the top of the tree.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_category_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_root() {
        let category = Category::new("Fiction");
        assert!(category.is_root());
    }

    #[test]
    fn test_category_with_parent() {
        let category = Category::new("Science Fiction").with_parent(CategoryId::new(1));
        assert!(!category.is_root());
        assert_eq!(category.parent_category_id, Some(CategoryId::new(1)));
    }
}
