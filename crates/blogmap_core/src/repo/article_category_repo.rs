//! Membership edge repository (`articles_categories`).
//!
//! # Invariants
//! - An edge is only written when both endpoints exist.
//! - Edges are never updated; a duplicate pair is rejected by the store.

use crate::context::StoreContext;
use crate::model::category::ArticleCategory;
use crate::model::{ArticleId, CategoryId};
use crate::relation::{
    ArticleCategoryRow, ArticlesCategoriesRelation, ArticlesRelation, CategoriesRelation,
};
use crate::repo::article_repo::{RepoError, RepoResult};
use log::debug;

pub trait ArticleCategoryRepository {
    /// Links one article to one category.
    ///
    /// # Errors
    /// - `NotFound` when either endpoint does not exist.
    /// - `Db` when the pair is already linked.
    fn link(&self, article_id: ArticleId, category_id: CategoryId)
        -> RepoResult<ArticleCategory>;
    fn list_all(&self) -> RepoResult<Vec<ArticleCategory>>;
}

pub struct SqliteArticleCategoryRepository<'ctx> {
    ctx: &'ctx StoreContext,
}

impl<'ctx> SqliteArticleCategoryRepository<'ctx> {
    pub fn new(ctx: &'ctx StoreContext) -> Self {
        Self { ctx }
    }
}

impl ArticleCategoryRepository for SqliteArticleCategoryRepository<'_> {
    fn link(
        &self,
        article_id: ArticleId,
        category_id: CategoryId,
    ) -> RepoResult<ArticleCategory> {
        let conn = self.ctx.connection();
        if !ArticlesRelation::new(conn).exists(article_id)? {
            return Err(RepoError::NotFound {
                relation: "articles",
                id: article_id,
            });
        }
        if !CategoriesRelation::new(conn).exists(category_id)? {
            return Err(RepoError::NotFound {
                relation: "categories",
                id: category_id,
            });
        }

        let id = ArticlesCategoriesRelation::new(conn).insert(article_id, category_id)?;
        debug!(
            "event=article_category_link module=repo status=ok id={id} article_id={article_id} category_id={category_id}"
        );
        to_entity(ArticleCategoryRow {
            id,
            article_id,
            category_id,
        })
    }

    fn list_all(&self) -> RepoResult<Vec<ArticleCategory>> {
        ArticlesCategoriesRelation::new(self.ctx.connection())
            .all()?
            .into_iter()
            .map(to_entity)
            .collect()
    }
}

fn to_entity(row: ArticleCategoryRow) -> RepoResult<ArticleCategory> {
    ArticleCategory::new(row.id, row.article_id, row.category_id).map_err(|err| {
        RepoError::InvalidData(format!("articles_categories row {}: {err}", row.id))
    })
}
