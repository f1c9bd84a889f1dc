//! Registry of relation definitions and association resolution.
//!
//! # Responsibility
//! - Check static definitions for consistency once at startup.
//! - Check the live schema against the declared tables and columns.
//! - Turn has-many-through declarations into explicit join plans.
//!
//! # Invariants
//! - A registry only exists for a consistent set of definitions.
//! - Join plans reference only registered tables and declared columns.

use super::{
    live_column, table_exists, Association, RelationDef, RelationError, RelationResult,
    ARTICLES, ARTICLES_CATEGORIES, CATEGORIES,
};
use log::debug;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Join keys for one has-many-through association.
///
/// Reads as: `through.source_key` points at `root.root_primary_key` and
/// `through.target_key` points at `target.target_primary_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPlan {
    pub root: &'static str,
    pub root_primary_key: &'static str,
    pub through: &'static str,
    pub source_key: &'static str,
    pub target: &'static str,
    pub target_key: &'static str,
    pub target_primary_key: &'static str,
}

/// Validated lookup table of relation definitions.
#[derive(Debug, Clone)]
pub struct RelationRegistry {
    relations: BTreeMap<&'static str, &'static RelationDef>,
}

impl RelationRegistry {
    /// Registers `defs` after checking keys, foreign keys and associations.
    ///
    /// # Errors
    /// - `InvalidDefinition` when any declaration is inconsistent.
    pub fn new(defs: &[&'static RelationDef]) -> RelationResult<Self> {
        let mut relations = BTreeMap::new();
        for def in defs {
            if relations.insert(def.name, *def).is_some() {
                return Err(invalid(format!("relation `{}` registered twice", def.name)));
            }
        }

        let registry = Self { relations };
        for def in registry.relations.values() {
            registry.check_definition(def)?;
        }
        Ok(registry)
    }

    /// Registry for the blog schema: articles, categories and their join table.
    pub fn blog() -> RelationResult<Self> {
        Self::new(&[&ARTICLES, &CATEGORIES, &ARTICLES_CATEGORIES])
    }

    pub fn get(&self, name: &str) -> RelationResult<&'static RelationDef> {
        self.relations
            .get(name)
            .copied()
            .ok_or_else(|| RelationError::UnknownRelation(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relations.keys().copied()
    }

    /// Checks every declared table and column against `conn`.
    ///
    /// Column types must match the declared SQLite type. Non-key columns
    /// declared as required must be `NOT NULL`.
    pub fn verify_schema(&self, conn: &Connection) -> RelationResult<()> {
        for def in self.relations.values() {
            if !table_exists(conn, def.name)? {
                return Err(RelationError::MissingTable(def.name));
            }
            for column in def.columns {
                let live = live_column(conn, def.name, column.name)?.ok_or(
                    RelationError::MissingColumn {
                        table: def.name,
                        column: column.name,
                    },
                )?;

                let expected = column.column_type.sql_type();
                if live.sql_type != expected {
                    return Err(RelationError::ColumnMismatch {
                        table: def.name,
                        column: column.name,
                        message: format!("expected {expected}, found {}", live.sql_type),
                    });
                }
                // INTEGER PRIMARY KEY aliases rowid and reports notnull=0.
                if !column.primary_key && !column.nullable && !live.not_null {
                    return Err(RelationError::ColumnMismatch {
                        table: def.name,
                        column: column.name,
                        message: "expected NOT NULL".to_string(),
                    });
                }
            }
        }
        debug!(
            "event=schema_verify module=relation status=ok relations={}",
            self.relations.len()
        );
        Ok(())
    }

    /// Resolves a has-many-through association on `root` into join keys.
    ///
    /// # Errors
    /// - `UnknownRelation` / `UnknownAssociation` for undeclared names.
    /// - `InvalidDefinition` when the association is not has-many-through.
    pub fn resolve_join(&self, root: &str, association: &str) -> RelationResult<JoinPlan> {
        let root_def = self.get(root)?;
        let declared = root_def.association(association).ok_or_else(|| {
            RelationError::UnknownAssociation {
                relation: root_def.name,
                association: association.to_string(),
            }
        })?;

        let Association::HasManyThrough {
            target, through, ..
        } = *declared
        else {
            return Err(invalid(format!(
                "`{}.{}` is not a has-many-through association",
                root_def.name, association
            )));
        };

        let through_def = self.get(through)?;
        let target_def = self.get(target)?;
        let source_key = through_def.foreign_key_to(root_def.name).ok_or_else(|| {
            invalid(format!("`{through}` has no belongs-to `{}`", root_def.name))
        })?;
        let target_key = through_def
            .foreign_key_to(target)
            .ok_or_else(|| invalid(format!("`{through}` has no belongs-to `{target}`")))?;
        let root_primary_key = root_def
            .primary_key()
            .ok_or_else(|| invalid(format!("`{}` has no primary key", root_def.name)))?;
        let target_primary_key = target_def
            .primary_key()
            .ok_or_else(|| invalid(format!("`{target}` has no primary key")))?;

        Ok(JoinPlan {
            root: root_def.name,
            root_primary_key: root_primary_key.name,
            through: through_def.name,
            source_key: source_key.name,
            target: target_def.name,
            target_key: target_key.name,
            target_primary_key: target_primary_key.name,
        })
    }

    fn check_definition(&self, def: &RelationDef) -> RelationResult<()> {
        if def.primary_key().is_none() {
            return Err(invalid(format!(
                "`{}` must declare exactly one primary key",
                def.name
            )));
        }

        for (index, column) in def.columns.iter().enumerate() {
            if def.columns[..index].iter().any(|other| other.name == column.name) {
                return Err(invalid(format!(
                    "`{}.{}` declared twice",
                    def.name, column.name
                )));
            }
            if let Some(target) = column.references {
                if !self.relations.contains_key(target) {
                    return Err(invalid(format!(
                        "`{}.{}` references unregistered relation `{target}`",
                        def.name, column.name
                    )));
                }
            }
        }

        for association in def.associations {
            let declarations = def
                .associations
                .iter()
                .filter(|other| other.name() == association.name())
                .count();
            if declarations > 1 {
                return Err(invalid(format!(
                    "`{}.{}` declared twice",
                    def.name,
                    association.name()
                )));
            }

            match *association {
                Association::BelongsTo {
                    name,
                    target,
                    foreign_key,
                } => {
                    let column = def.column(foreign_key).ok_or_else(|| {
                        invalid(format!(
                            "`{}.{name}` uses undeclared column `{foreign_key}`",
                            def.name
                        ))
                    })?;
                    if column.references != Some(target) {
                        return Err(invalid(format!(
                            "`{}.{foreign_key}` does not reference `{target}`",
                            def.name
                        )));
                    }
                }
                Association::HasManyThrough {
                    name,
                    target,
                    through,
                } => {
                    let through_def = self.relations.get(through).ok_or_else(|| {
                        invalid(format!(
                            "`{}.{name}` goes through unregistered `{through}`",
                            def.name
                        ))
                    })?;
                    if !self.relations.contains_key(target) {
                        return Err(invalid(format!(
                            "`{}.{name}` targets unregistered `{target}`",
                            def.name
                        )));
                    }
                    if through_def.foreign_key_to(def.name).is_none()
                        || through_def.foreign_key_to(target).is_none()
                    {
                        return Err(invalid(format!(
                            "`{through}` must belong to both `{}` and `{target}`",
                            def.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> RelationError {
    RelationError::InvalidDefinition(message)
}

#[cfg(test)]
mod tests {
    use super::RelationRegistry;
    use crate::relation::{
        Association, ColumnDef, ColumnType, RelationDef, RelationError, ARTICLES,
        ARTICLES_CATEGORIES, CATEGORIES,
    };

    static TAGS: RelationDef = RelationDef {
        name: "tags",
        columns: &[
            ColumnDef::primary_key("id"),
            ColumnDef::foreign_key("article_id", "missing"),
        ],
        associations: &[],
    };

    static WRONG_TARGET: RelationDef = RelationDef {
        name: "comments",
        columns: &[
            ColumnDef::primary_key("id"),
            ColumnDef::foreign_key("article_id", "categories"),
        ],
        associations: &[Association::BelongsTo {
            name: "article",
            target: "articles",
            foreign_key: "article_id",
        }],
    };

    static NO_KEY: RelationDef = RelationDef {
        name: "drafts",
        columns: &[ColumnDef::required("title", ColumnType::Text)],
        associations: &[],
    };

    #[test]
    fn blog_registry_resolves_article_categories() {
        let registry = RelationRegistry::blog().unwrap();
        let plan = registry.resolve_join("articles", "categories").unwrap();
        assert_eq!(plan.root_primary_key, "id");
        assert_eq!(plan.through, "articles_categories");
        assert_eq!(plan.source_key, "article_id");
        assert_eq!(plan.target, "categories");
        assert_eq!(plan.target_key, "category_id");
        assert_eq!(plan.target_primary_key, "id");
    }

    #[test]
    fn belongs_to_cannot_be_resolved_as_join() {
        let registry = RelationRegistry::blog().unwrap();
        let err = registry
            .resolve_join("articles_categories", "article")
            .unwrap_err();
        assert!(matches!(err, RelationError::InvalidDefinition(_)));
    }

    #[test]
    fn unknown_association_is_reported() {
        let registry = RelationRegistry::blog().unwrap();
        let err = registry.resolve_join("articles", "authors").unwrap_err();
        assert!(matches!(err, RelationError::UnknownAssociation { .. }));
    }

    #[test]
    fn foreign_key_to_unregistered_relation_is_rejected() {
        let err = RelationRegistry::new(&[&ARTICLES, &CATEGORIES, &ARTICLES_CATEGORIES, &TAGS])
            .unwrap_err();
        assert!(matches!(err, RelationError::InvalidDefinition(_)));
    }

    #[test]
    fn belongs_to_must_match_column_reference() {
        let err = RelationRegistry::new(&[
            &ARTICLES,
            &CATEGORIES,
            &ARTICLES_CATEGORIES,
            &WRONG_TARGET,
        ])
        .unwrap_err();
        assert!(err.to_string().contains("does not reference"));
    }

    #[test]
    fn relation_without_primary_key_is_rejected() {
        assert!(RelationRegistry::new(&[&NO_KEY]).is_err());
    }

    #[test]
    fn has_many_through_requires_registered_join_relation() {
        let err = RelationRegistry::new(&[&ARTICLES, &CATEGORIES]).unwrap_err();
        assert!(err.to_string().contains("articles_categories"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        assert!(RelationRegistry::new(&[&CATEGORIES, &CATEGORIES]).is_err());
    }
}
