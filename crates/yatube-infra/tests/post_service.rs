//! Post workflows against the in-memory store.

use std::sync::Arc;

use yatube_core::DomainError;
use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, User};
use yatube_core::forms::{FieldKind, REQUIRED};
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};
use yatube_core::services::{PostService, Submission};
use yatube_infra::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    service: PostService,
    author: User,
    not_author: User,
    group: Group,
}

async fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let author = store.create_user(NewUser::new("author", "hash")).await.unwrap();
    let not_author = store
        .create_user(NewUser::new("not_author", "hash"))
        .await
        .unwrap();
    let group = store
        .create_group(NewGroup::new("Test group", "test_slug", "Test description"))
        .await
        .unwrap();

    let service = PostService::new(store.clone(), store.clone(), store.clone());

    Fixture {
        store,
        service,
        author,
        not_author,
        group,
    }
}

async fn seed_posts(fx: &Fixture, count: usize) {
    for i in 0..count {
        fx.store
            .create_post(NewPost::new(
                fx.author.id,
                format!("Test text {i}"),
                Some(fx.group.id),
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn thirteen_posts_paginate_ten_then_three_everywhere() {
    let fx = fixture().await;
    seed_posts(&fx, 13).await;

    assert_eq!(fx.service.index(None).await.unwrap().len(), 10);
    assert_eq!(fx.service.index(Some("2")).await.unwrap().len(), 3);

    let group_first = fx.service.group_feed("test_slug", None).await.unwrap();
    let group_second = fx.service.group_feed("test_slug", Some("2")).await.unwrap();
    assert_eq!(group_first.page.len(), 10);
    assert_eq!(group_second.page.len(), 3);

    let profile_first = fx.service.profile("author", None).await.unwrap();
    let profile_second = fx.service.profile("author", Some("2")).await.unwrap();
    assert_eq!(profile_first.page.len(), 10);
    assert_eq!(profile_second.page.len(), 3);
    assert_eq!(profile_first.post_count, 13);
}

#[tokio::test]
async fn out_of_range_page_shows_first_page() {
    let fx = fixture().await;
    seed_posts(&fx, 13).await;

    let page = fx.service.index(Some("7")).await.unwrap();

    assert_eq!(page.number, 1);
    assert_eq!(page[0].text(), "Test text 12");
}

#[tokio::test]
async fn group_feed_carries_the_group() {
    let fx = fixture().await;

    let feed = fx.service.group_feed("test_slug", None).await.unwrap();

    assert_eq!(feed.group.title, "Test group");
    assert_eq!(feed.group.description, "Test description");
    assert!(feed.page.is_empty());
}

#[tokio::test]
async fn unknown_slug_and_username_are_not_found() {
    let fx = fixture().await;

    let group = fx.service.group_feed("missing", None).await.unwrap_err();
    let profile = fx.service.profile("nobody", None).await.unwrap_err();
    let post = fx.service.post_detail(404).await.unwrap_err();

    assert!(matches!(group, DomainError::NotFound { entity_type: "group", .. }));
    assert!(matches!(profile, DomainError::NotFound { entity_type: "user", .. }));
    assert!(matches!(post, DomainError::NotFound { entity_type: "post", .. }));
}

#[tokio::test]
async fn created_post_leads_every_listing() {
    let fx = fixture().await;
    seed_posts(&fx, 3).await;

    let saved = match fx
        .service
        .create_post(fx.author.id, "Fresh text", &fx.group.id.to_string())
        .await
        .unwrap()
    {
        Submission::Saved(post) => post,
        Submission::Invalid(form) => panic!("form rejected: {form:?}"),
    };

    let index = fx.service.index(None).await.unwrap();
    let group = fx.service.group_feed("test_slug", None).await.unwrap().page;
    let profile = fx.service.profile("author", None).await.unwrap().page;

    for page in [&index, &group, &profile] {
        let first = &page[0];
        assert_eq!(first.id(), saved.id);
        assert_eq!(first.text(), "Fresh text");
        assert_eq!(first.author.username, "author");
        assert_eq!(first.group.as_ref().unwrap().title, "Test group");
    }
}

#[tokio::test]
async fn unknown_author_cannot_publish() {
    let fx = fixture().await;

    let err = fx
        .service
        .create_post(9_999, "Orphan text", "")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Unauthorized));
    assert_eq!(fx.store.count_posts(PostFilter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn ungrouped_post_stays_out_of_group_feed() {
    let fx = fixture().await;

    fx.service
        .create_post(fx.author.id, "No group", "")
        .await
        .unwrap();

    assert_eq!(fx.service.index(None).await.unwrap().len(), 1);
    assert!(fx.service.group_feed("test_slug", None).await.unwrap().page.is_empty());
}

#[tokio::test]
async fn invalid_create_is_returned_with_errors_and_not_saved() {
    let fx = fixture().await;

    let outcome = fx.service.create_post(fx.author.id, "  ", "").await.unwrap();

    match outcome {
        Submission::Invalid(form) => {
            assert_eq!(form.field("text").unwrap().errors, vec![REQUIRED.to_string()]);
        }
        Submission::Saved(_) => panic!("blank post was saved"),
    }
    assert!(fx.service.index(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_form_offers_text_and_group_choice() {
    let fx = fixture().await;

    let form = fx.service.create_form().await.unwrap();

    assert_eq!(form.field("text").unwrap().kind, FieldKind::Text);
    let group = form.field("group").unwrap();
    assert!(group.is_choice());
    assert!(group.choices().iter().any(|c| c.label == "Test group"));
}

#[tokio::test]
async fn author_edits_own_post() {
    let fx = fixture().await;
    seed_posts(&fx, 1).await;

    let form = fx.service.edit_form(fx.author.id, 1).await.unwrap();
    assert_eq!(form.field("text").unwrap().value, "Test text 0");

    let outcome = fx
        .service
        .edit_post(fx.author.id, 1, "Edited text", "")
        .await
        .unwrap();
    assert!(matches!(outcome, Submission::Saved(_)));

    let detail = fx.service.post_detail(1).await.unwrap();
    assert_eq!(detail.entry.text(), "Edited text");
    assert!(detail.entry.group.is_none());
    assert_eq!(detail.author_post_count, 1);
}

#[tokio::test]
async fn non_author_cannot_edit() {
    let fx = fixture().await;
    seed_posts(&fx, 1).await;

    let form = fx.service.edit_form(fx.not_author.id, 1).await.unwrap_err();
    let edit = fx
        .service
        .edit_post(fx.not_author.id, 1, "Hijacked", "")
        .await
        .unwrap_err();

    assert!(matches!(form, DomainError::Forbidden));
    assert!(matches!(edit, DomainError::Forbidden));
    assert_eq!(fx.service.post_detail(1).await.unwrap().entry.text(), "Test text 0");
}
