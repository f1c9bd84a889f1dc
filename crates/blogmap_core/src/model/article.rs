//! Article entity and its attribute inputs.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `title` is never blank.
//! - `categories` is a snapshot of membership rows taken at read time.

use super::category::Category;
use super::validation::{require_id, require_present, require_text, ValidationError};
use super::ArticleId;
use serde::{Deserialize, Serialize};

const ARTICLE: &str = "article";

/// Aggregate read model: one `articles` row plus its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    published: bool,
    categories: Vec<Category>,
}

impl Article {
    /// Builds an article from already-loaded parts.
    ///
    /// # Errors
    /// - `NonPositiveId` when `id` was not assigned by the store.
    /// - `EmptyField` when `title` is blank.
    pub fn new(
        id: ArticleId,
        title: impl Into<String>,
        published: bool,
        categories: Vec<Category>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: require_id(ARTICLE, "id", id)?,
            title: require_text(ARTICLE, "title", title.into())?,
            published,
            categories,
        })
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in stored order.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(Category::name).collect()
    }
}

/// Attributes accepted by article creation.
///
/// Unknown keys are dropped on deserialization, so only schema attributes
/// ever reach the store. `id` is server-assigned and not accepted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewArticle {
    pub title: Option<String>,
    pub published: Option<bool>,
}

/// Validated insert payload produced by `NewArticle::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub published: bool,
}

impl NewArticle {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            published: None,
        }
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    /// Checks required attributes and applies column defaults.
    pub fn validate(&self) -> Result<ArticleDraft, ValidationError> {
        let title = require_present(ARTICLE, "title", self.title.clone())?;
        Ok(ArticleDraft {
            title: require_text(ARTICLE, "title", title)?,
            published: self.published.unwrap_or(false),
        })
    }
}

/// Attributes accepted by `update_by_id`. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub published: Option<bool>,
}

/// Validated update payload produced by `ArticleChanges::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub published: Option<bool>,
}

impl ArticleChanges {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            published: None,
        }
    }

    pub fn published(published: bool) -> Self {
        Self {
            title: None,
            published: Some(published),
        }
    }

    pub fn validate(&self) -> Result<ArticlePatch, ValidationError> {
        if self.title.is_none() && self.published.is_none() {
            return Err(ValidationError::NoChanges { entity: ARTICLE });
        }

        let title = match self.title.clone() {
            Some(value) => Some(require_text(ARTICLE, "title", value)?),
            None => None,
        };

        Ok(ArticlePatch {
            title,
            published: self.published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Article, ArticleChanges, NewArticle};
    use crate::model::category::Category;
    use crate::model::validation::ValidationError;

    #[test]
    fn new_article_defaults_to_unpublished() {
        let draft = NewArticle::titled("Hello").validate().unwrap();
        assert_eq!(draft.title, "Hello");
        assert!(!draft.published);
    }

    #[test]
    fn new_article_requires_title() {
        let err = NewArticle::default().validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                entity: "article",
                field: "title"
            }
        );
    }

    #[test]
    fn changes_reject_blank_title_and_empty_payload() {
        assert!(matches!(
            ArticleChanges::title("   ").validate(),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            ArticleChanges::default().validate(),
            Err(ValidationError::NoChanges { .. })
        ));
    }

    #[test]
    fn article_constructor_never_returns_partial_value() {
        assert!(Article::new(0, "title", false, Vec::new()).is_err());
        assert!(Article::new(1, "", false, Vec::new()).is_err());

        let category = Category::new(3, "rust").unwrap();
        let article = Article::new(1, "title", true, vec![category]).unwrap();
        assert_eq!(article.category_names(), vec!["rust"]);
        assert!(article.is_published());
    }
}
