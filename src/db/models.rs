use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A persisted link row. The id is assigned by the store on first commit and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub url: String,
}

/// Validated field values for a link, without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFields {
    pub title: String,
    pub category: String,
    pub url: String,
}

impl LinkFields {
    pub fn with_id(&self, id: i64) -> LinkRecord {
        LinkRecord {
            id,
            title: self.title.clone(),
            category: self.category.clone(),
            url: self.url.clone(),
        }
    }
}

impl LinkRecord {
    pub fn fields(&self) -> LinkFields {
        LinkFields {
            title: self.title.clone(),
            category: self.category.clone(),
            url: self.url.clone(),
        }
    }
}

/// Raw form input for the create/edit flow.
#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
    pub title: String,
    pub category: String,
    pub url: String,
}

impl LinkDraft {
    /// Trim the fields and check them in form order, stopping at the first
    /// empty one. URL well-formedness is deliberately not checked here; links
    /// are only parsed when opened.
    pub fn validate(&self) -> Result<LinkFields> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::MissingField("title"));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::MissingField("category"));
        }

        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::MissingField("url"));
        }

        Ok(LinkFields {
            title: title.to_string(),
            category: category.to_string(),
            url: url.to_string(),
        })
    }
}
