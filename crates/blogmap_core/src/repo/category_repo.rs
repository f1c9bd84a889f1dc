//! Category repository contract and SQLite implementation.

use crate::context::StoreContext;
use crate::model::category::{Category, CategoryChanges, NewCategory};
use crate::model::CategoryId;
use crate::relation::{CategoriesRelation, CategoryRow};
use crate::repo::article_repo::{RepoError, RepoResult};
use log::debug;

pub trait CategoryRepository {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Category>;
    fn list_all(&self) -> RepoResult<Vec<Category>>;
    fn create(&self, attributes: &NewCategory) -> RepoResult<Category>;
    fn update_by_id(&self, id: CategoryId, changes: &CategoryChanges) -> RepoResult<Category>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'ctx> {
    ctx: &'ctx StoreContext,
}

impl<'ctx> SqliteCategoryRepository<'ctx> {
    pub fn new(ctx: &'ctx StoreContext) -> Self {
        Self { ctx }
    }

    fn relation(&self) -> CategoriesRelation<'ctx> {
        CategoriesRelation::new(self.ctx.connection())
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Category> {
        match self.relation().by_pk(id)? {
            Some(row) => to_entity(row),
            None => Err(RepoError::NotFound {
                relation: "categories",
                id,
            }),
        }
    }

    fn list_all(&self) -> RepoResult<Vec<Category>> {
        self.relation()
            .all()?
            .into_iter()
            .map(to_entity)
            .collect()
    }

    fn create(&self, attributes: &NewCategory) -> RepoResult<Category> {
        let name = attributes.validate()?;
        let id = self.relation().insert(&name)?;
        debug!("event=category_create module=repo status=ok id={id}");
        self.find_by_id(id)
    }

    fn update_by_id(&self, id: CategoryId, changes: &CategoryChanges) -> RepoResult<Category> {
        let name = changes.validate()?;
        if self.relation().update_by_pk(id, &name)? == 0 {
            return Err(RepoError::NotFound {
                relation: "categories",
                id,
            });
        }
        self.find_by_id(id)
    }
}

fn to_entity(row: CategoryRow) -> RepoResult<Category> {
    let id = row.id;
    Category::new(row.id, row.name)
        .map_err(|err| RepoError::InvalidData(format!("categories row {id}: {err}")))
}
