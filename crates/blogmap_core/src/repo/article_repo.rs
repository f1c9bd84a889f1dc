//! Article repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Read articles as aggregates with their categories attached.
//! - Create and update article rows from validated attributes.
//!
//! # Invariants
//! - Aggregate reads take two round trips: root rows, then every category
//!   joined to rows matching the same filter. The bind count never grows
//!   with the number of rows. Rows are grouped per article before entity
//!   construction, so one article never yields two entities.
//! - `update_by_id` touches at most the one row with that id.

use crate::context::StoreContext;
use crate::db::DbError;
use crate::model::article::{Article, ArticleChanges, NewArticle};
use crate::model::category::Category;
use crate::model::validation::ValidationError;
use crate::model::ArticleId;
use crate::relation::{
    ArticleFilter, ArticleRow, ArticlesRelation, CategoriesRelation, JoinPlan, RelationError,
};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every repository in this crate.
#[derive(Debug)]
pub enum RepoError {
    /// Attribute input failed validation; nothing was written.
    Validation(ValidationError),
    /// Store-level failure (connection, statement, constraint).
    Db(DbError),
    /// Query by identifier matched zero rows.
    NotFound { relation: &'static str, id: i64 },
    /// Query by identifier matched more than one row.
    MultipleResults {
        relation: &'static str,
        id: i64,
        count: usize,
    },
    /// Relation definitions or join resolution failed.
    Schema(RelationError),
    /// Persisted row cannot be mapped into a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { relation, id } => write!(f, "{relation} row not found: {id}"),
            Self::MultipleResults {
                relation,
                id,
                count,
            } => write!(f, "{relation} id {id} matched {count} rows, expected one"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::MultipleResults { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RelationError> for RepoError {
    fn from(value: RelationError) -> Self {
        match value {
            RelationError::Db(err) => Self::Db(err),
            RelationError::InvalidData(message) => Self::InvalidData(message),
            other => Self::Schema(other),
        }
    }
}

/// Repository interface for article aggregates.
pub trait ArticleRepository {
    /// Returns the article with `id` and all of its categories.
    fn find_by_id(&self, id: ArticleId) -> RepoResult<Article>;
    /// Returns every published article with its categories, ordered by id.
    fn list_published(&self) -> RepoResult<Vec<Article>>;
    /// Returns every article with its categories, ordered by id.
    fn list_all(&self) -> RepoResult<Vec<Article>>;
    /// Inserts one article and returns it (with no categories yet).
    fn create(&self, attributes: &NewArticle) -> RepoResult<Article>;
    /// Applies `changes` to the article with `id` and returns the result.
    fn update_by_id(&self, id: ArticleId, changes: &ArticleChanges) -> RepoResult<Article>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'ctx> {
    ctx: &'ctx StoreContext,
    categories_join: JoinPlan,
}

impl<'ctx> SqliteArticleRepository<'ctx> {
    /// Builds the repository and resolves the `articles.categories` join once.
    pub fn try_new(ctx: &'ctx StoreContext) -> RepoResult<Self> {
        let categories_join = ctx.registry().resolve_join("articles", "categories")?;
        Ok(Self {
            ctx,
            categories_join,
        })
    }

    fn articles(&self) -> ArticlesRelation<'ctx> {
        ArticlesRelation::new(self.ctx.connection())
    }

    fn categories(&self) -> CategoriesRelation<'ctx> {
        CategoriesRelation::new(self.ctx.connection())
    }

    fn read_aggregates(&self, filter: &ArticleFilter) -> RepoResult<Vec<Article>> {
        let rows = self.articles().rows(filter)?;
        self.attach_categories(filter, rows)
    }

    /// `rows` must be the result of reading `filter`; the join read selects
    /// its owners with the same filter instead of binding every row id.
    fn attach_categories(
        &self,
        filter: &ArticleFilter,
        rows: Vec<ArticleRow>,
    ) -> RepoResult<Vec<Article>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let pairs = self
            .categories()
            .for_owners(&self.categories_join, &filter.scope())?;

        let mut grouped: BTreeMap<ArticleId, Vec<Category>> = BTreeMap::new();
        for (owner_id, row) in pairs {
            let category_id = row.id;
            let category = Category::new(category_id, row.name).map_err(|err| {
                RepoError::InvalidData(format!("categories row {category_id}: {err}"))
            })?;
            grouped.entry(owner_id).or_default().push(category);
        }

        let mut articles = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id;
            let categories = grouped.remove(&id).unwrap_or_default();
            let article = Article::new(id, row.title, row.published, categories)
                .map_err(|err| RepoError::InvalidData(format!("articles row {id}: {err}")))?;
            articles.push(article);
        }
        Ok(articles)
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn find_by_id(&self, id: ArticleId) -> RepoResult<Article> {
        let articles = self.read_aggregates(&ArticleFilter::all().by_pk(id))?;
        expect_one("articles", id, articles)
    }

    fn list_published(&self) -> RepoResult<Vec<Article>> {
        self.read_aggregates(&ArticleFilter::all().published())
    }

    fn list_all(&self) -> RepoResult<Vec<Article>> {
        self.read_aggregates(&ArticleFilter::all())
    }

    fn create(&self, attributes: &NewArticle) -> RepoResult<Article> {
        let draft = attributes.validate()?;
        let id = self.articles().insert(&draft.title, draft.published)?;
        debug!("event=article_create module=repo status=ok id={id}");
        self.find_by_id(id)
    }

    fn update_by_id(&self, id: ArticleId, changes: &ArticleChanges) -> RepoResult<Article> {
        let patch = changes.validate()?;
        let changed = self.articles().update_by_pk(id, &patch)?;
        if changed == 0 {
            debug!("event=article_update module=repo status=not_found id={id}");
            return Err(RepoError::NotFound {
                relation: "articles",
                id,
            });
        }

        debug!("event=article_update module=repo status=ok id={id}");
        self.find_by_id(id)
    }
}

/// Narrows a by-identifier result to its single entity.
pub(crate) fn expect_one<T>(
    relation: &'static str,
    id: i64,
    mut found: Vec<T>,
) -> RepoResult<T> {
    match found.len() {
        0 => Err(RepoError::NotFound { relation, id }),
        1 => Ok(found.remove(0)),
        count => Err(RepoError::MultipleResults {
            relation,
            id,
            count,
        }),
    }
}
