use blogmap_core::{
    Article, ArticleCategory, ArticleChanges, Category, NewArticle, NewCategory, ValidationError,
};
use serde_json::json;

#[test]
fn new_article_decoding_ignores_unknown_attributes() {
    let attributes: NewArticle = serde_json::from_value(json!({
        "id": 99,
        "title": "Hello rom-rb",
        "author": "someone",
    }))
    .unwrap();

    assert_eq!(attributes, NewArticle::titled("Hello rom-rb"));
    let draft = attributes.validate().unwrap();
    assert_eq!(draft.title, "Hello rom-rb");
    assert!(!draft.published);
}

#[test]
fn mistyped_attribute_fails_to_decode() {
    let result = serde_json::from_value::<NewArticle>(json!({
        "title": "x",
        "published": "yes",
    }));
    assert!(result.is_err());
}

#[test]
fn changes_decoding_keeps_only_supplied_fields() {
    let changes: ArticleChanges =
        serde_json::from_value(json!({ "title": "new title", "id": 5 })).unwrap();
    let patch = changes.validate().unwrap();
    assert_eq!(patch.title.as_deref(), Some("new title"));
    assert_eq!(patch.published, None);

    let empty: ArticleChanges = serde_json::from_value(json!({ "id": 5 })).unwrap();
    assert_eq!(
        empty.validate().unwrap_err(),
        ValidationError::NoChanges { entity: "article" }
    );
}

#[test]
fn new_category_requires_name() {
    let attributes: NewCategory = serde_json::from_value(json!({})).unwrap();
    assert!(matches!(
        attributes.validate(),
        Err(ValidationError::MissingField { field: "name", .. })
    ));
}

#[test]
fn article_serializes_with_nested_categories() {
    let article = Article::new(
        1,
        "Hello rom-rb",
        false,
        vec![
            Category::new(1, "dry-rb").unwrap(),
            Category::new(2, "rom-rb").unwrap(),
        ],
    )
    .unwrap();

    let value = serde_json::to_value(&article).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 1,
            "title": "Hello rom-rb",
            "published": false,
            "categories": [
                { "id": 1, "name": "dry-rb" },
                { "id": 2, "name": "rom-rb" },
            ],
        })
    );
}

#[test]
fn membership_edge_keeps_both_endpoints() {
    let edge = ArticleCategory::new(3, 1, 2).unwrap();
    assert_eq!((edge.id(), edge.article_id(), edge.category_id()), (3, 1, 2));
    assert!(ArticleCategory::new(3, 1, -2).is_err());
}
