use serde::{Deserialize, Serialize};

use crate::model::ids::PublisherId;

/// A publishing house; `publisher_name` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: Option<PublisherId>,
    pub publisher_name: String,
    pub address: Option<String>,
    pub website: Option<String>,
}

impl Publisher {
    #[must_use]
    pub fn new(publisher_name: impl Into<String>) -> Self {
        Self {
            id: None,
            publisher_name: publisher_name.into(),
            address: None,
            website: None,
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_builder() {
        let publisher = Publisher::new("Oxford University Press")
            .with_website("https://global.oup.com");
        assert_eq!(publisher.publisher_name, "Oxford University Press");
        assert_eq!(publisher.website.as_deref(), Some("https://global.oup.com"));
    }
}
