//! `articles` relation: schema, filters and row-level writes.

use super::{
    bool_to_int, int_to_bool, row_exists, Association, ColumnDef, ColumnType, RelationDef,
    RelationResult, RowScope,
};
use crate::model::article::ArticlePatch;
use crate::model::ArticleId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

pub static ARTICLES: RelationDef = RelationDef {
    name: "articles",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("title", ColumnType::Text),
        ColumnDef::required("published", ColumnType::Boolean),
    ],
    associations: &[Association::HasManyThrough {
        name: "categories",
        target: "categories",
        through: "articles_categories",
    }],
};

/// Raw `articles` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    pub id: ArticleId,
    pub title: String,
    pub published: bool,
}

/// Composable narrowing of the `articles` result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    id: Option<ArticleId>,
    published_only: bool,
}

impl ArticleFilter {
    /// No narrowing: every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// At most the one row with primary key `id`.
    pub fn by_pk(mut self, id: ArticleId) -> Self {
        self.id = Some(id);
        self
    }

    /// Only rows with `published = 1`.
    pub fn published(mut self) -> Self {
        self.published_only = true;
        self
    }

    /// Renders the filter as `WHERE 1 = 1` conditions over `articles`.
    pub fn scope(&self) -> RowScope {
        let mut scope = RowScope::default();
        if let Some(id) = self.id {
            scope.conditions.push_str(" AND id = ?");
            scope.bind_values.push(Value::Integer(id));
        }
        if self.published_only {
            scope.conditions.push_str(" AND published = 1");
        }
        scope
    }
}

/// Row-level handle over `articles`.
pub struct ArticlesRelation<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ArticlesRelation<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Rows matching `filter`, ordered by id.
    pub fn rows(&self, filter: &ArticleFilter) -> RelationResult<Vec<ArticleRow>> {
        let scope = filter.scope();
        let sql = format!(
            "SELECT {} FROM {} WHERE 1 = 1{} ORDER BY id ASC;",
            ARTICLES.select_list(),
            ARTICLES.name,
            scope.conditions
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(scope.bind_values))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }
        Ok(articles)
    }

    pub fn exists(&self, id: ArticleId) -> RelationResult<bool> {
        row_exists(self.conn, &ARTICLES, id)
    }

    /// Inserts one row and returns the assigned id.
    pub fn insert(&self, title: &str, published: bool) -> RelationResult<ArticleId> {
        self.conn.execute(
            "INSERT INTO articles (title, published) VALUES (?1, ?2);",
            params![title, bool_to_int(published)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Applies `patch` to the row with primary key `id`.
    ///
    /// Returns the number of changed rows; `0` means no such row. An empty
    /// patch touches nothing and also returns `0`.
    pub fn update_by_pk(&self, id: ArticleId, patch: &ArticlePatch) -> RelationResult<usize> {
        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(published) = patch.published {
            assignments.push("published = ?");
            bind_values.push(Value::Integer(bool_to_int(published)));
        }
        if assignments.is_empty() {
            return Ok(0);
        }

        bind_values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE articles SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }
}

fn parse_article_row(row: &Row<'_>) -> RelationResult<ArticleRow> {
    let published: i64 = row.get("published")?;
    Ok(ArticleRow {
        id: row.get("id")?,
        title: row.get("title")?,
        published: int_to_bool("articles", "published", published)?,
    })
}

#[cfg(test)]
mod tests {
    use super::ArticleFilter;
    use rusqlite::types::Value;

    #[test]
    fn scope_binds_a_fixed_number_of_values() {
        let all = ArticleFilter::all().scope();
        assert!(all.conditions.is_empty());
        assert!(all.bind_values.is_empty());

        let narrowed = ArticleFilter::all().published().by_pk(4).scope();
        assert_eq!(narrowed.conditions, " AND id = ? AND published = 1");
        assert_eq!(narrowed.bind_values, vec![Value::Integer(4)]);
    }
}
