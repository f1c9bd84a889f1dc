//! Data-mapper walkthrough over SQLite: relations, entities, repositories.
//!
//! Relations declare tables and associations, entities are immutable
//! validated values, and repositories are the only persistence API callers
//! use. `StoreContext` ties them together for one connection.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod relation;
pub mod repo;
pub mod walkthrough;

pub use context::{ContextError, StoreContext};
pub use db::{StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::article::{Article, ArticleChanges, NewArticle};
pub use model::category::{ArticleCategory, Category, CategoryChanges, NewCategory};
pub use model::validation::ValidationError;
pub use model::{ArticleCategoryId, ArticleId, CategoryId};
pub use repo::article_category_repo::{
    ArticleCategoryRepository, SqliteArticleCategoryRepository,
};
pub use repo::article_repo::{ArticleRepository, RepoError, RepoResult, SqliteArticleRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use walkthrough::{run_walkthrough, WalkthroughError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
