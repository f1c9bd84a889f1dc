//! Narrated create/read/update walkthrough over the repositories.
//!
//! # Responsibility
//! - Run the tutorial steps in order against one `StoreContext`.
//! - Print one human-readable block per step.
//!
//! # Invariants
//! - The first failure aborts the walkthrough and is returned unchanged.
//! - Every write goes through a repository.

use crate::context::StoreContext;
use crate::model::article::{Article, ArticleChanges, NewArticle};
use crate::model::category::NewCategory;
use crate::repo::article_category_repo::{
    ArticleCategoryRepository, SqliteArticleCategoryRepository,
};
use crate::repo::article_repo::{ArticleRepository, RepoError, SqliteArticleRepository};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

#[derive(Debug)]
pub enum WalkthroughError {
    Repo(RepoError),
    Io(io::Error),
}

impl Display for WalkthroughError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write walkthrough output: {err}"),
        }
    }
}

impl Error for WalkthroughError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for WalkthroughError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for WalkthroughError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs every step against `ctx`, writing narration to `out`.
///
/// Expects an empty store: the narration refers to articles by the ids
/// SQLite assigns to the first two inserts.
pub fn run_walkthrough<W: Write>(
    ctx: &StoreContext,
    out: &mut W,
) -> Result<(), WalkthroughError> {
    let articles = SqliteArticleRepository::try_new(ctx)?;
    let categories = SqliteCategoryRepository::new(ctx);
    let memberships = SqliteArticleCategoryRepository::new(ctx);

    writeln!(out, "== Creating a draft article")?;
    let first = articles.create(&NewArticle::titled("Hello rom-rb"))?;
    writeln!(out, "created: {}", describe(&first))?;
    let published = articles.list_published()?;
    writeln!(out, "published articles: {}", describe_all(&published))?;
    let found = articles.find_by_id(first.id())?;
    writeln!(out, "find_by_id({}): {}", first.id(), describe(&found))?;
    writeln!(out)?;

    writeln!(out, "== Creating a published article")?;
    let second = articles.create(&NewArticle::titled("An alien or sutin").with_published(true))?;
    writeln!(out, "created: {}", describe(&second))?;
    let published = articles.list_published()?;
    writeln!(out, "published articles: {}", describe_all(&published))?;
    writeln!(out)?;

    writeln!(out, "== Attaching categories")?;
    for name in ["dry-rb", "rom-rb"] {
        let category = categories.create(&NewCategory::named(name))?;
        let edge = memberships.link(first.id(), category.id())?;
        writeln!(
            out,
            "linked article {} to category {} ({})",
            edge.article_id(),
            edge.category_id(),
            category.name()
        )?;
    }
    let found = articles.find_by_id(first.id())?;
    writeln!(out, "find_by_id({}): {}", first.id(), describe(&found))?;
    writeln!(out)?;

    writeln!(out, "== Updating a title")?;
    let updated = articles.update_by_id(first.id(), &ArticleChanges::title("new title"))?;
    writeln!(out, "updated: {}", describe(&updated))?;
    let found = articles.find_by_id(first.id())?;
    writeln!(out, "find_by_id({}): {}", first.id(), describe(&found))?;

    info!("event=walkthrough module=walkthrough status=ok");
    Ok(())
}

/// One-line rendering of an article aggregate.
pub fn describe(article: &Article) -> String {
    format!(
        "#<Article id={} title={:?} published={} categories=[{}]>",
        article.id(),
        article.title(),
        article.is_published(),
        article
            .categories()
            .iter()
            .map(|category| {
                format!("#<Category id={} name={:?}>", category.id(), category.name())
            })
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn describe_all(articles: &[Article]) -> String {
    format!(
        "[{}]",
        articles.iter().map(describe).collect::<Vec<_>>().join(", ")
    )
}
