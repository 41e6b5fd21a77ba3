//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::{Group, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostEntry, POST_DISPLAY_CHARS};
pub use user::{NewUser, User};
