use async_trait::async_trait;

use crate::domain::{Group, NewGroup, NewPost, NewUser, Post, PostChanges, PostEntry, User};
use crate::error::RepoError;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Stores a new user. Fails with `Constraint` on a taken username.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list_groups(&self) -> Result<Vec<Group>, RepoError>;

    /// Stores a new group. Fails with `Constraint` on a taken slug.
    async fn create_group(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(i64),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Group(id) => post.group_id == Some(*id),
            PostFilter::Author(id) => post.author_id == *id,
        }
    }
}

/// Post repository.
///
/// Listings are ordered newest first: `pub_date` descending, then `id`
/// descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_post(&self, id: i64) -> Result<Option<PostEntry>, RepoError>;

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, RepoError>;

    async fn list_posts(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostEntry>, RepoError>;

    /// Stores a new post stamped with the current time.
    async fn create_post(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Applies `changes` to post `id`. Fails with `NotFound` if it is gone.
    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError>;
}
