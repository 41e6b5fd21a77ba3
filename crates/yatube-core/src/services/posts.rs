//! Post browsing and authoring.

use std::sync::Arc;

use crate::domain::{Group, NewPost, Post, PostChanges, PostEntry, User};
use crate::error::DomainError;
use crate::forms::PostForm;
use crate::pagination::{Page, Paginator};
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

/// A group together with one page of its posts.
#[derive(Debug, Clone)]
pub struct GroupFeed {
    pub group: Group,
    pub page: Page<PostEntry>,
}

/// An author together with one page of their posts.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: User,
    pub post_count: u64,
    pub page: Page<PostEntry>,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub entry: PostEntry,
    pub author_post_count: u64,
}

/// Outcome of a create or edit submission.
#[derive(Debug, Clone)]
pub enum Submission {
    Saved(Post),
    /// The form did not validate; it carries the errors for re-rendering.
    Invalid(PostForm),
}

/// Post workflows shared by every front end.
pub struct PostService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    paginator: Paginator,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
            paginator: Paginator::default(),
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    /// Every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostEntry>, DomainError> {
        self.paginated(PostFilter::All, page).await
    }

    pub async fn group_feed(&self, slug: &str, page: Option<&str>) -> Result<GroupFeed, DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.paginated(PostFilter::Group(group.id), page).await?;
        Ok(GroupFeed { group, page })
    }

    pub async fn profile(&self, username: &str, page: Option<&str>) -> Result<ProfileFeed, DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let filter = PostFilter::Author(author.id);
        let page = self.paginated(filter, page).await?;
        Ok(ProfileFeed {
            author,
            post_count: page.total as u64,
            page,
        })
    }

    pub async fn post_detail(&self, post_id: i64) -> Result<PostDetail, DomainError> {
        let entry = self.find_entry(post_id).await?;
        let author_post_count = self
            .posts
            .count_posts(PostFilter::Author(entry.author.id))
            .await?;

        Ok(PostDetail {
            entry,
            author_post_count,
        })
    }

    pub async fn create_form(&self) -> Result<PostForm, DomainError> {
        let groups = self.groups.list_groups().await?;
        Ok(PostForm::blank(&groups))
    }

    /// Publishes a post by `author_id` if the submitted form is valid.
    pub async fn create_post(
        &self,
        author_id: i64,
        text: &str,
        group: &str,
    ) -> Result<Submission, DomainError> {
        // A session can outlive its user, e.g. across an in-memory restart.
        if self.users.find_user(author_id).await?.is_none() {
            tracing::warn!(author_id, "Post refused: session names an unknown user");
            return Err(DomainError::Unauthorized);
        }

        let groups = self.groups.list_groups().await?;
        let input = match PostForm::submit(&groups, text, group) {
            Ok(input) => input,
            Err(form) => return Ok(Submission::Invalid(form)),
        };

        let post = self
            .posts
            .create_post(NewPost::new(author_id, input.text, input.group_id))
            .await?;

        tracing::info!(post_id = post.id, author_id, "Post published");
        Ok(Submission::Saved(post))
    }

    /// The edit form for `post_id`, prefilled. Only its author may see it.
    pub async fn edit_form(&self, actor_id: i64, post_id: i64) -> Result<PostForm, DomainError> {
        let entry = self.find_entry(post_id).await?;
        ensure_author(actor_id, &entry)?;

        let groups = self.groups.list_groups().await?;
        Ok(PostForm::for_post(&entry.post, &groups))
    }

    pub async fn edit_post(
        &self,
        actor_id: i64,
        post_id: i64,
        text: &str,
        group: &str,
    ) -> Result<Submission, DomainError> {
        let entry = self.find_entry(post_id).await?;
        ensure_author(actor_id, &entry)?;

        let groups = self.groups.list_groups().await?;
        let input = match PostForm::submit(&groups, text, group) {
            Ok(input) => input,
            Err(form) => return Ok(Submission::Invalid(form)),
        };

        let post = self
            .posts
            .update_post(
                post_id,
                PostChanges {
                    text: input.text,
                    group_id: input.group_id,
                },
            )
            .await?;

        tracing::info!(post_id, author_id = actor_id, "Post edited");
        Ok(Submission::Saved(post))
    }

    async fn find_entry(&self, post_id: i64) -> Result<PostEntry, DomainError> {
        self.posts
            .find_post(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn paginated(
        &self,
        filter: PostFilter,
        requested: Option<&str>,
    ) -> Result<Page<PostEntry>, DomainError> {
        let total = self.posts.count_posts(filter).await? as usize;
        let number = self.paginator.resolve(requested, total);
        let (offset, limit) = self.paginator.window(number);

        let items = self
            .posts
            .list_posts(filter, offset as u64, limit as u64)
            .await?;

        Ok(self.paginator.page(items, number, total))
    }
}

fn ensure_author(actor_id: i64, entry: &PostEntry) -> Result<(), DomainError> {
    if entry.is_authored_by(actor_id) {
        Ok(())
    } else {
        tracing::warn!(
            post_id = entry.id(),
            actor_id,
            "Edit refused: actor is not the author"
        );
        Err(DomainError::Forbidden)
    }
}
