//! `articles_categories` join relation.
//!
//! Its two belongs-to declarations exist so the `articles.categories`
//! has-many-through association can derive its join keys.

use super::{Association, ColumnDef, RelationDef, RelationResult};
use crate::model::{ArticleCategoryId, ArticleId, CategoryId};
use rusqlite::{params, Connection};

pub static ARTICLES_CATEGORIES: RelationDef = RelationDef {
    name: "articles_categories",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::foreign_key("article_id", "articles"),
        ColumnDef::foreign_key("category_id", "categories"),
    ],
    associations: &[
        Association::BelongsTo {
            name: "article",
            target: "articles",
            foreign_key: "article_id",
        },
        Association::BelongsTo {
            name: "category",
            target: "categories",
            foreign_key: "category_id",
        },
    ],
};

/// Raw `articles_categories` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleCategoryRow {
    pub id: ArticleCategoryId,
    pub article_id: ArticleId,
    pub category_id: CategoryId,
}

pub struct ArticlesCategoriesRelation<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ArticlesCategoriesRelation<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn all(&self) -> RelationResult<Vec<ArticleCategoryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, article_id, category_id
             FROM articles_categories
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(ArticleCategoryRow {
                id: row.get("id")?,
                article_id: row.get("article_id")?,
                category_id: row.get("category_id")?,
            });
        }
        Ok(edges)
    }

    pub fn insert(
        &self,
        article_id: ArticleId,
        category_id: CategoryId,
    ) -> RelationResult<ArticleCategoryId> {
        self.conn.execute(
            "INSERT INTO articles_categories (article_id, category_id) VALUES (?1, ?2);",
            params![article_id, category_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
