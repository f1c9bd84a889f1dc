//! Relation layer: one static definition and one row-level handle per table.
//!
//! # Responsibility
//! - Declare column names, primitive types and foreign-key targets.
//! - Declare associations (belongs-to, has-many-through) as plain data.
//! - Expose filter methods that narrow a table's rows.
//!
//! # Invariants
//! - Definitions are validated once by `RelationRegistry::new`.
//! - Relation handles return raw rows; entity mapping is the repository's job.
//! - SQL identifiers are only ever taken from static definitions.

use crate::db::DbError;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod articles;
pub mod articles_categories;
pub mod categories;
mod registry;

pub use articles::{ArticleFilter, ArticleRow, ArticlesRelation, ARTICLES};
pub use articles_categories::{
    ArticleCategoryRow, ArticlesCategoriesRelation, ARTICLES_CATEGORIES,
};
pub use categories::{CategoriesRelation, CategoryRow, CATEGORIES};
pub use registry::{JoinPlan, RelationRegistry};

pub type RelationResult<T> = Result<T, RelationError>;

/// Primitive column types understood by the row mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Stored as `INTEGER` 0/1.
    Boolean,
}

impl ColumnType {
    /// Declared SQLite type expected in `PRAGMA table_info`.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Integer | Self::Boolean => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// One declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub nullable: bool,
    /// Name of the relation this column points at, for foreign keys.
    pub references: Option<&'static str>,
}

impl ColumnDef {
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Integer,
            primary_key: true,
            nullable: false,
            references: None,
        }
    }

    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: false,
            nullable: false,
            references: None,
        }
    }

    pub const fn foreign_key(name: &'static str, references: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Integer,
            primary_key: false,
            nullable: false,
            references: Some(references),
        }
    }
}

/// Declared relationship used to derive join conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// This relation holds `foreign_key` pointing at `target`.
    BelongsTo {
        name: &'static str,
        target: &'static str,
        foreign_key: &'static str,
    },
    /// Rows of `target` reached through the join relation `through`.
    HasManyThrough {
        name: &'static str,
        target: &'static str,
        through: &'static str,
    },
}

impl Association {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BelongsTo { name, .. } | Self::HasManyThrough { name, .. } => *name,
        }
    }
}

/// Static schema definition of one table.
#[derive(Debug)]
pub struct RelationDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub associations: &'static [Association],
}

impl RelationDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the single primary-key column, if exactly one is declared.
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        let mut keys = self.columns.iter().filter(|column| column.primary_key);
        match (keys.next(), keys.next()) {
            (Some(key), None) => Some(key),
            _ => None,
        }
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations
            .iter()
            .find(|association| association.name() == name)
    }

    /// Foreign-key column declared against `target` through a belongs-to.
    pub fn foreign_key_to(&self, target: &str) -> Option<&ColumnDef> {
        self.associations.iter().find_map(|association| match association {
            Association::BelongsTo {
                target: declared,
                foreign_key,
                ..
            } if *declared == target => self.column(foreign_key),
            _ => None,
        })
    }

    /// Comma separated column list in declaration order.
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|column| column.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Errors raised by relation definitions and row-level access.
#[derive(Debug)]
pub enum RelationError {
    /// Underlying SQLite error.
    Db(DbError),
    /// Relation name is not registered.
    UnknownRelation(String),
    /// Association name is not declared on the relation.
    UnknownAssociation {
        relation: &'static str,
        association: String,
    },
    /// Static definitions contradict each other.
    InvalidDefinition(String),
    /// Declared table does not exist in the live database.
    MissingTable(&'static str),
    /// Declared column does not exist in the live table.
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Live column type or nullability differs from the declaration.
    ColumnMismatch {
        table: &'static str,
        column: &'static str,
        message: String,
    },
    /// Persisted value cannot be mapped to its declared type.
    InvalidData(String),
}

impl Display for RelationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownRelation(name) => write!(f, "unknown relation `{name}`"),
            Self::UnknownAssociation {
                relation,
                association,
            } => write!(f, "relation `{relation}` has no association `{association}`"),
            Self::InvalidDefinition(message) => {
                write!(f, "invalid relation definition: {message}")
            }
            Self::MissingTable(table) => write!(f, "schema is missing table `{table}`"),
            Self::MissingColumn { table, column } => {
                write!(f, "schema is missing column `{column}` in table `{table}`")
            }
            Self::ColumnMismatch {
                table,
                column,
                message,
            } => write!(f, "column `{table}.{column}` does not match: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RelationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RelationError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RelationError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Parameterized `WHERE` conditions over one relation.
///
/// `conditions` is empty or a sequence of ` AND ...` fragments, so it can
/// follow `WHERE 1 = 1` both in a root query and in an `IN (SELECT ...)`
/// subquery. The bind count depends on the filter, never on the row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowScope {
    pub conditions: String,
    pub bind_values: Vec<Value>,
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(table: &str, column: &str, value: i64) -> RelationResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RelationError::InvalidData(format!(
            "invalid boolean value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RelationResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Column metadata as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LiveColumn {
    pub sql_type: String,
    pub not_null: bool,
}

pub(crate) fn live_column(
    conn: &Connection,
    table: &str,
    column: &str,
) -> RelationResult<Option<LiveColumn>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get("name")?;
        if current == column {
            let sql_type: String = row.get("type")?;
            let not_null: i64 = row.get("notnull")?;
            return Ok(Some(LiveColumn {
                sql_type: sql_type.to_ascii_uppercase(),
                not_null: not_null == 1,
            }));
        }
    }
    Ok(None)
}

pub(crate) fn row_exists(conn: &Connection, def: &RelationDef, id: i64) -> RelationResult<bool> {
    let key = def.primary_key().ok_or_else(|| {
        RelationError::InvalidDefinition(format!("`{}` has no primary key", def.name))
    })?;
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
            def.name, key.name
        ),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{int_to_bool, ARTICLES, ARTICLES_CATEGORIES};

    #[test]
    fn int_to_bool_rejects_out_of_range_values() {
        assert!(!int_to_bool("articles", "published", 0).unwrap());
        assert!(int_to_bool("articles", "published", 1).unwrap());
        assert!(int_to_bool("articles", "published", 2).is_err());
    }

    #[test]
    fn join_relation_exposes_foreign_keys_by_target() {
        let article_key = ARTICLES_CATEGORIES.foreign_key_to("articles").unwrap();
        assert_eq!(article_key.name, "article_id");
        assert_eq!(article_key.references, Some("articles"));
        assert!(ARTICLES_CATEGORIES.foreign_key_to("tags").is_none());
    }

    #[test]
    fn select_list_follows_declaration_order() {
        assert_eq!(ARTICLES.select_list(), "id, title, published");
        assert_eq!(ARTICLES.primary_key().unwrap().name, "id");
    }
}
