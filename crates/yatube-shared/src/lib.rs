//! # Yatube Shared
//!
//! Request payloads and response shapes shared by the web front end and
//! anything else that talks to it.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
