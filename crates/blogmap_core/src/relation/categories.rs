//! `categories` relation: raw row access plus the membership join read.

use super::{
    row_exists, ColumnDef, ColumnType, JoinPlan, RelationDef, RelationResult, RowScope,
};
use crate::model::{ArticleId, CategoryId};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub static CATEGORIES: RelationDef = RelationDef {
    name: "categories",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("name", ColumnType::Text),
    ],
    associations: &[],
};

/// Raw `categories` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
}

/// Row-level handle over `categories`.
pub struct CategoriesRelation<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CategoriesRelation<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn all(&self) -> RelationResult<Vec<CategoryRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    pub fn by_pk(&self, id: CategoryId) -> RelationResult<Option<CategoryRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1;",
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(row)
    }

    pub fn exists(&self, id: CategoryId) -> RelationResult<bool> {
        row_exists(self.conn, &CATEGORIES, id)
    }

    pub fn insert(&self, name: &str) -> RelationResult<CategoryId> {
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Renames one category. Returns the number of changed rows.
    pub fn update_by_pk(&self, id: CategoryId, name: &str) -> RelationResult<usize> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?2 WHERE id = ?1;",
            params![id, name],
        )?;
        Ok(changed)
    }

    /// Reads the categories joined to every `plan.root` row inside `owners`.
    ///
    /// Returns `(owner_id, category)` pairs ordered by owner then category id.
    /// The owners are selected by a subquery over the same scope as the root
    /// read, so one round trip covers any number of owners.
    pub fn for_owners(
        &self,
        plan: &JoinPlan,
        owners: &RowScope,
    ) -> RelationResult<Vec<(ArticleId, CategoryRow)>> {
        let sql = format!(
            "SELECT j.{source} AS owner_id, t.id AS id, t.name AS name
             FROM {through} j
             INNER JOIN {target} t ON t.{target_pk} = j.{target_key}
             WHERE j.{source} IN (
                 SELECT {root_pk} FROM {root} WHERE 1 = 1{conditions}
             )
             ORDER BY j.{source} ASC, t.{target_pk} ASC;",
            source = plan.source_key,
            through = plan.through,
            target = plan.target,
            target_pk = plan.target_primary_key,
            target_key = plan.target_key,
            root_pk = plan.root_primary_key,
            root = plan.root,
            conditions = owners.conditions,
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(owners.bind_values.iter()))?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            let owner_id: ArticleId = row.get("owner_id")?;
            pairs.push((owner_id, parse_category_row(row)?));
        }
        Ok(pairs)
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
