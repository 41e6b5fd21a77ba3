use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use yatube_core::domain::{NewPost, PostChanges};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

use crate::database::entity::{group, post, user};
use crate::database::postgres_repo::PostgresStore;

fn author_model() -> user::Model {
    user::Model {
        id: 1,
        username: "author".to_owned(),
        password_hash: "hash".to_owned(),
        date_joined: Utc::now().into(),
    }
}

fn group_model() -> group::Model {
    group::Model {
        id: 3,
        title: "Test group".to_owned(),
        slug: "test_slug".to_owned(),
        description: "Test description".to_owned(),
    }
}

fn post_model(id: i64, group_id: Option<i64>) -> post::Model {
    post::Model {
        id,
        text: format!("Test text {id}"),
        author_id: 1,
        group_id,
        pub_date: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_group_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![group_model()]])
        .into_connection();

    let repo = PostgresStore::new(db);

    let group = repo.find_by_slug("test_slug").await.unwrap().unwrap();

    assert_eq!(group.title, "Test group");
    assert_eq!(group.description, "Test description");
}

#[tokio::test]
async fn test_find_user_by_username_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresStore::new(db);

    assert!(repo.find_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_post_attaches_author_and_group() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(1, Some(3))]])
        .append_query_results(vec![vec![author_model()]])
        .append_query_results(vec![vec![group_model()]])
        .into_connection();

    let repo = PostgresStore::new(db);

    let entry = repo.find_post(1).await.unwrap().unwrap();

    assert_eq!(entry.post.text, "Test text 1");
    assert_eq!(entry.author.username, "author");
    assert_eq!(entry.group.unwrap().slug, "test_slug");
}

#[tokio::test]
async fn test_list_posts_without_groups_skips_group_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(2, None), post_model(1, None)]])
        .append_query_results(vec![vec![author_model()]])
        .into_connection();

    let repo = PostgresStore::new(db);

    let entries = repo.list_posts(PostFilter::All, 0, 10).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].post.id, 2);
    assert!(entries.iter().all(|e| e.group.is_none()));
}

#[tokio::test]
async fn test_create_post_returns_stored_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(5, Some(3))]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 5,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresStore::new(db);

    let post = repo
        .create_post(NewPost::new(1, "Test text 5", Some(3)))
        .await
        .unwrap();

    assert_eq!(post.id, 5);
    assert_eq!(post.group_id, Some(3));
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresStore::new(db);

    let err = repo
        .update_post(
            9,
            PostChanges {
                text: "x".to_owned(),
                group_id: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound));
}
