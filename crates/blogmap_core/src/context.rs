//! Store context: the container every repository is built from.
//!
//! # Responsibility
//! - Open the configured store with migrations applied.
//! - Validate relation definitions and check them against the live schema.
//! - Own the connection and registry for the lifetime of the process.
//!
//! # Invariants
//! - A `StoreContext` only exists for a migrated, schema-checked connection.
//! - Repositories borrow the context; there is no global instance.

use crate::db::{open_store, DbError, StoreConfig};
use crate::relation::{RelationError, RelationRegistry};
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ContextError {
    Db(DbError),
    Relation(RelationError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Relation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Relation(err) => Some(err),
        }
    }
}

impl From<DbError> for ContextError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RelationError> for ContextError {
    fn from(value: RelationError) -> Self {
        Self::Relation(value)
    }
}

/// Connection plus validated relation registry.
pub struct StoreContext {
    conn: Connection,
    registry: RelationRegistry,
}

impl StoreContext {
    /// Opens the store described by `config` and finalizes the container.
    pub fn open(config: &StoreConfig) -> Result<Self, ContextError> {
        let conn = open_store(config)?;
        Self::with_connection(conn)
    }

    /// Finalizes a container around an already-open connection.
    ///
    /// The connection is not migrated here; it must already carry the
    /// declared schema or `ContextError::Relation` is returned.
    pub fn with_connection(conn: Connection) -> Result<Self, ContextError> {
        let registry = RelationRegistry::blog()?;
        registry.verify_schema(&conn)?;
        info!(
            "event=context_ready module=context status=ok relations={}",
            registry.names().collect::<Vec<_>>().join(",")
        );
        Ok(Self { conn, registry })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn registry(&self) -> &RelationRegistry {
        &self.registry
    }
}
