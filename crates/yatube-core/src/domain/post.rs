use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, User};

/// Number of characters of `text` a post displays as.
pub const POST_DISPLAY_CHARS: usize = 15;

/// Post entity - a short text published by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub pub_date: DateTime<Utc>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text.char_indices().nth(POST_DISPLAY_CHARS) {
            Some((cut, _)) => f.write_str(&self.text[..cut]),
            None => f.write_str(&self.text),
        }
    }
}

/// A post about to be published. `pub_date` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

impl NewPost {
    pub fn new(author_id: i64, text: impl Into<String>, group_id: Option<i64>) -> Self {
        Self {
            text: text.into(),
            author_id,
            group_id,
        }
    }
}

/// The editable part of a post.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i64>,
}

/// A post together with its author and group, as listings show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

impl PostEntry {
    pub fn id(&self) -> i64 {
        self.post.id
    }

    pub fn text(&self) -> &str {
        &self.post.text
    }

    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.post.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_text(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_string(),
            author_id: 1,
            group_id: None,
            pub_date: Utc::now(),
        }
    }

    #[test]
    fn short_text_displays_in_full() {
        let post = post_with_text("Test post");
        assert_eq!(post.to_string(), "Test post");
    }

    #[test]
    fn long_text_is_cut_to_fifteen_chars() {
        let post = post_with_text("This text is definitely longer than fifteen");
        assert_eq!(post.to_string(), "This text is de");
    }

    #[test]
    fn cut_counts_characters_not_bytes() {
        let post = post_with_text("Тестовый текст длиннее пятнадцати");
        assert_eq!(post.to_string(), "Тестовый текст ");
        assert_eq!(post.to_string().chars().count(), POST_DISPLAY_CHARS);
    }

    #[test]
    fn group_displays_title() {
        let group = Group {
            id: 1,
            title: "Test group".to_string(),
            slug: "test_slug".to_string(),
            description: "Test description".to_string(),
        };
        assert_eq!(group.to_string(), "Test group");
    }
}
