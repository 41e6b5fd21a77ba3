//! In-memory store implementing every repository port.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, PostChanges, PostEntry, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_group_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn entry(&self, post: &Post) -> Result<PostEntry, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .cloned()
            .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))?;
        let group = post.group_id.and_then(|id| self.groups.get(&id).cloned());

        Ok(PostEntry {
            post: post.clone(),
            author,
            group,
        })
    }

    /// Posts matching `filter`, newest first.
    fn ordered(&self, filter: PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|p| filter.matches(p)).collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Process-local store backed by ordered maps behind an async RwLock.
///
/// Data is lost on process restart. Ids are assigned sequentially from 1.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' is taken",
                user.username
            )));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: user.username,
            password_hash: user.password_hash,
            date_joined: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.tables.read().await.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' is taken",
                group.slug
            )));
        }

        tables.last_group_id += 1;
        let group = Group {
            id: tables.last_group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_post(&self, id: i64) -> Result<Option<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.entry(p)).transpose()
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .ordered(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| tables.entry(p))
            .collect()
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        if let Some(group_id) = post.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::Constraint(format!(
                    "group {group_id} does not exist"
                )));
            }
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            text: post.text,
            author_id: post.author_id,
            group_id: post.group_id,
            pub_date: Utc::now(),
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(group_id) = changes.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::Constraint(format!(
                    "group {group_id} does not exist"
                )));
            }
        }

        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.text = changes.text;
        post.group_id = changes.group_id;
        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_slug_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        store
            .create_group(NewGroup::new("Cats", "cats", "About cats"))
            .await
            .unwrap();

        let err = store
            .create_group(NewGroup::new("More cats", "cats", "Again"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        store.create_user(NewUser::new("author", "hash")).await.unwrap();

        let err = store
            .create_user(NewUser::new("author", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_id_tiebreak() {
        let store = InMemoryStore::new();
        let author = store.create_user(NewUser::new("author", "hash")).await.unwrap();
        for i in 0..3 {
            store
                .create_post(NewPost::new(author.id, format!("post {i}"), None))
                .await
                .unwrap();
        }

        let texts: Vec<String> = store
            .list_posts(PostFilter::All, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.post.text)
            .collect();
        assert_eq!(texts, vec!["post 2", "post 1", "post 0"]);
    }

    #[tokio::test]
    async fn filters_by_group_and_author() {
        let store = InMemoryStore::new();
        let alice = store.create_user(NewUser::new("alice", "hash")).await.unwrap();
        let bob = store.create_user(NewUser::new("bob", "hash")).await.unwrap();
        let cats = store
            .create_group(NewGroup::new("Cats", "cats", "About cats"))
            .await
            .unwrap();

        store
            .create_post(NewPost::new(alice.id, "alice in cats", Some(cats.id)))
            .await
            .unwrap();
        store
            .create_post(NewPost::new(bob.id, "bob alone", None))
            .await
            .unwrap();

        assert_eq!(store.count_posts(PostFilter::All).await.unwrap(), 2);
        assert_eq!(store.count_posts(PostFilter::Group(cats.id)).await.unwrap(), 1);
        assert_eq!(store.count_posts(PostFilter::Author(bob.id)).await.unwrap(), 1);

        let in_cats = store.list_posts(PostFilter::Group(cats.id), 0, 10).await.unwrap();
        assert_eq!(in_cats[0].author.username, "alice");
        assert_eq!(in_cats[0].group.as_ref().unwrap().title, "Cats");
    }

    #[tokio::test]
    async fn post_for_unknown_author_is_rejected() {
        let store = InMemoryStore::new();
        let err = store
            .create_post(NewPost::new(42, "orphan", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn update_changes_text_and_group_only() {
        let store = InMemoryStore::new();
        let author = store.create_user(NewUser::new("author", "hash")).await.unwrap();
        let post = store
            .create_post(NewPost::new(author.id, "before", None))
            .await
            .unwrap();

        let updated = store
            .update_post(
                post.id,
                PostChanges {
                    text: "after".to_string(),
                    group_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.pub_date, post.pub_date);
        assert_eq!(updated.author_id, author.id);

        let missing = store
            .update_post(
                99,
                PostChanges {
                    text: "x".to_string(),
                    group_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(missing, RepoError::NotFound));
    }
}
