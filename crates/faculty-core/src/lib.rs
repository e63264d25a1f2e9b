//! Core types and search logic for the faculty directory.
//!
//! This crate is deliberately free of HTTP dependencies. The remote API is
//! reached through the [`directory::FacultyDirectory`] trait, which
//! `faculty-client` implements over `reqwest`.

// Native `async fn` in traits; the returned futures carry explicit `Send`
// bounds where they matter.
#![allow(async_fn_in_trait)]

pub mod directory;
pub mod error;
pub mod filter;
pub mod live;
pub mod profile;
pub mod record;
pub mod router;
pub mod session;
pub mod summary;

pub use error::{Error, Result};
