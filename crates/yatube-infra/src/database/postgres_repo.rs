//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, PostChanges, PostEntry, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL store implementing every repository port over one pool.
#[derive(Clone)]
pub struct PostgresStore {
    db: Arc<DbConn>,
}

impl PostgresStore {
    pub fn new(db: DbConn) -> Self {
        Self { db: Arc::new(db) }
    }

    fn filtered(filter: PostFilter) -> Select<PostEntity> {
        let query = PostEntity::find();
        match filter {
            PostFilter::All => query,
            PostFilter::Group(id) => query.filter(post::Column::GroupId.eq(id)),
            PostFilter::Author(id) => query.filter(post::Column::AuthorId.eq(id)),
        }
    }

    /// Loads authors and groups for `posts` in two batched queries.
    async fn attach(&self, posts: Vec<post::Model>) -> Result<Vec<PostEntry>, RepoError> {
        let mut author_ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut group_ids: Vec<i64> = posts.iter().filter_map(|p| p.group_id).collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let authors: HashMap<i64, User> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            UserEntity::find()
                .filter(user::Column::Id.is_in(author_ids))
                .all(&*self.db)
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, User::from(m)))
                .collect()
        };

        let groups: HashMap<i64, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            GroupEntity::find()
                .filter(group::Column::Id.is_in(group_ids))
                .all(&*self.db)
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, Group::from(m)))
                .collect()
        };

        posts
            .into_iter()
            .map(|model| {
                let author = authors
                    .get(&model.author_id)
                    .cloned()
                    .ok_or_else(|| RepoError::Query(format!("post {} has no author", model.id)))?;
                let group = model.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostEntry {
                    post: model.into(),
                    author,
                    group,
                })
            })
            .collect()
    }
}

fn query_error(err: DbErr) -> RepoError {
    RepoError::Query(err.to_string())
}

fn write_error(err: DbErr) -> RepoError {
    let err_str = err.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") || err_str.contains("foreign key") {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            date_joined: Set(Utc::now().into()),
        }
        .insert(&*self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_groups(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create_group(&self, new_group: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel {
            id: NotSet,
            title: Set(new_group.title),
            slug: Set(new_group.slug),
            description: Set(new_group.description),
        }
        .insert(&*self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresStore {
    async fn find_post(&self, id: i64) -> Result<Option<PostEntry>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.attach(vec![model]).await?.pop())
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64, RepoError> {
        Self::filtered(filter)
            .count(&*self.db)
            .await
            .map_err(query_error)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostEntry>, RepoError> {
        tracing::debug!(?filter, offset, limit, "Listing posts");

        let posts = Self::filtered(filter)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(query_error)?;

        self.attach(posts).await
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            text: Set(new_post.text),
            author_id: Set(new_post.author_id),
            group_id: Set(new_post.group_id),
            pub_date: Set(Utc::now().into()),
        }
        .insert(&*self.db)
        .await
        .map_err(write_error)?;

        Ok(model.into())
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Post, RepoError> {
        let existing = PostEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        let mut active = existing.into_active_model();
        active.text = Set(changes.text);
        active.group_id = Set(changes.group_id);

        let model = active.update(&*self.db).await.map_err(write_error)?;
        Ok(model.into())
    }
}
