//! Entity layer: immutable, validated value objects built from rows.
//!
//! # Responsibility
//! - Define the entities handed to repository callers.
//! - Define the attribute inputs accepted by create/update operations.
//!
//! # Invariants
//! - Entities are only obtainable through fallible constructors.
//! - Entities expose read accessors only; writes go through repositories.

pub mod article;
pub mod category;
pub mod validation;

/// Server-assigned article identifier (`articles.id`).
pub type ArticleId = i64;
/// Server-assigned category identifier (`categories.id`).
pub type CategoryId = i64;
/// Server-assigned join row identifier (`articles_categories.id`).
pub type ArticleCategoryId = i64;
