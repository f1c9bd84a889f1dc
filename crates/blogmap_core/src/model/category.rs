//! Category entity, membership edge entity and their attribute inputs.

use super::validation::{require_id, require_present, require_text, ValidationError};
use super::{ArticleCategoryId, ArticleId, CategoryId};
use serde::{Deserialize, Serialize};

const CATEGORY: &str = "category";
const ARTICLE_CATEGORY: &str = "article_category";

/// One row of `categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(CATEGORY, "id", id)?,
            name: require_text(CATEGORY, "name", name.into())?,
        })
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Membership edge between one article and one category.
///
/// Carries no identity of its own beyond the pair it connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArticleCategory {
    id: ArticleCategoryId,
    article_id: ArticleId,
    category_id: CategoryId,
}

impl ArticleCategory {
    pub fn new(
        id: ArticleCategoryId,
        article_id: ArticleId,
        category_id: CategoryId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(ARTICLE_CATEGORY, "id", id)?,
            article_id: require_id(ARTICLE_CATEGORY, "article_id", article_id)?,
            category_id: require_id(ARTICLE_CATEGORY, "category_id", category_id)?,
        })
    }

    pub fn id(&self) -> ArticleCategoryId {
        self.id
    }

    pub fn article_id(&self) -> ArticleId {
        self.article_id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }
}

/// Attributes accepted by category creation. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    pub name: Option<String>,
}

impl NewCategory {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Returns the validated category name.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let name = require_present(CATEGORY, "name", self.name.clone())?;
        require_text(CATEGORY, "name", name)
    }
}

/// Attributes accepted by category updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryChanges {
    pub name: Option<String>,
}

impl CategoryChanges {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn validate(&self) -> Result<String, ValidationError> {
        match self.name.clone() {
            Some(name) => require_text(CATEGORY, "name", name),
            None => Err(ValidationError::NoChanges { entity: CATEGORY }),
        }
    }
}
