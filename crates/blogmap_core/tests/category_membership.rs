use blogmap_core::{
    ArticleCategoryRepository, ArticleRepository, CategoryChanges, CategoryRepository,
    NewArticle, NewCategory, RepoError, SqliteArticleCategoryRepository,
    SqliteArticleRepository, SqliteCategoryRepository, StoreConfig, StoreContext,
};

fn context() -> StoreContext {
    StoreContext::open(&StoreConfig::in_memory()).unwrap()
}

#[test]
fn categories_are_created_listed_and_renamed() {
    let ctx = context();
    let repo = SqliteCategoryRepository::new(&ctx);

    let dry = repo.create(&NewCategory::named("dry-rb")).unwrap();
    let rom = repo.create(&NewCategory::named("rom-rb")).unwrap();
    assert_eq!((dry.id(), rom.id()), (1, 2));

    let renamed = repo
        .update_by_id(dry.id(), &CategoryChanges::rename("dry-ruby"))
        .unwrap();
    assert_eq!(renamed.id(), dry.id());
    assert_eq!(renamed.name(), "dry-ruby");

    let names: Vec<_> = repo
        .list_all()
        .unwrap()
        .iter()
        .map(|category| category.name().to_string())
        .collect();
    assert_eq!(names, vec!["dry-ruby", "rom-rb"]);
}

#[test]
fn renaming_missing_category_returns_not_found() {
    let ctx = context();
    let repo = SqliteCategoryRepository::new(&ctx);
    let err = repo
        .update_by_id(9, &CategoryChanges::rename("ghost"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            relation: "categories",
            id: 9
        }
    ));
}

#[test]
fn renamed_category_shows_up_in_article_aggregate() {
    let ctx = context();
    let articles = SqliteArticleRepository::try_new(&ctx).unwrap();
    let categories = SqliteCategoryRepository::new(&ctx);
    let links = SqliteArticleCategoryRepository::new(&ctx);

    let article = articles.create(&NewArticle::titled("post")).unwrap();
    let category = categories.create(&NewCategory::named("old")).unwrap();
    links.link(article.id(), category.id()).unwrap();
    let before = articles.find_by_id(article.id()).unwrap();

    categories
        .update_by_id(category.id(), &CategoryChanges::rename("new"))
        .unwrap();

    assert_eq!(before.category_names(), vec!["old"]);
    let after = articles.find_by_id(article.id()).unwrap();
    assert_eq!(after.category_names(), vec!["new"]);
}

#[test]
fn link_requires_existing_endpoints() {
    let ctx = context();
    let articles = SqliteArticleRepository::try_new(&ctx).unwrap();
    let categories = SqliteCategoryRepository::new(&ctx);
    let links = SqliteArticleCategoryRepository::new(&ctx);
    let article = articles.create(&NewArticle::titled("post")).unwrap();
    let category = categories.create(&NewCategory::named("rust")).unwrap();

    let err = links.link(99, category.id()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            relation: "articles",
            ..
        }
    ));

    let err = links.link(article.id(), 99).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            relation: "categories",
            ..
        }
    ));

    assert!(links.list_all().unwrap().is_empty());
}

#[test]
fn duplicate_link_is_a_store_failure() {
    let ctx = context();
    let articles = SqliteArticleRepository::try_new(&ctx).unwrap();
    let categories = SqliteCategoryRepository::new(&ctx);
    let links = SqliteArticleCategoryRepository::new(&ctx);
    let article = articles.create(&NewArticle::titled("post")).unwrap();
    let category = categories.create(&NewCategory::named("rust")).unwrap();

    let edge = links.link(article.id(), category.id()).unwrap();
    assert_eq!(edge.article_id(), article.id());
    assert_eq!(edge.category_id(), category.id());

    let err = links.link(article.id(), category.id()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(links.list_all().unwrap(), vec![edge]);
    assert_eq!(
        articles.find_by_id(article.id()).unwrap().categories().len(),
        1
    );
}

#[test]
fn aggregate_is_a_snapshot_not_a_live_view() {
    let ctx = context();
    let articles = SqliteArticleRepository::try_new(&ctx).unwrap();
    let categories = SqliteCategoryRepository::new(&ctx);
    let links = SqliteArticleCategoryRepository::new(&ctx);
    let article = articles.create(&NewArticle::titled("post")).unwrap();

    let mut expected = Vec::new();
    for name in ["a", "b", "c"] {
        let snapshot = articles.find_by_id(article.id()).unwrap();
        assert_eq!(snapshot.categories().len(), expected.len());

        let category = categories.create(&NewCategory::named(name)).unwrap();
        links.link(article.id(), category.id()).unwrap();
        expected.push(name);
        assert_eq!(snapshot.categories().len(), expected.len() - 1);
    }

    let found = articles.find_by_id(article.id()).unwrap();
    assert_eq!(found.category_names(), expected);
}
