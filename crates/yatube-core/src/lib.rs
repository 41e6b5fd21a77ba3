//! # Yatube Core
//!
//! The domain layer of Yatube.
//! Entities, ports, pagination and the post workflows live here with zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use pagination::{Page, Paginator, POSTS_PER_PAGE};
