//! Use cases built on top of the ports.

mod posts;

pub use posts::{GroupFeed, PostDetail, PostService, ProfileFeed, Submission};
