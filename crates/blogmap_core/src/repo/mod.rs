//! Repository layer: the only persistence API application code calls.
//!
//! # Responsibility
//! - Expose named queries returning validated entities.
//! - Expose named mutations (create, update-by-id) with validated inputs.
//! - Compose relation filters and association joins into aggregate reads.
//!
//! # Invariants
//! - Write paths validate attribute inputs before any SQL runs.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`, `MultipleResults`)
//!   in addition to store errors.

pub mod article_category_repo;
pub mod article_repo;
pub mod category_repo;
