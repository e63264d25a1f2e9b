//! HTTP client for the faculty directory REST API.
//!
//! [`ApiClient`] implements [`faculty_core::directory::FacultyDirectory`], so
//! it can be handed straight to [`faculty_core::router::route`]. The
//! endpoints the router does not use (updates, departments, summaries,
//! links) are inherent methods.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn demo() -> faculty_client::Result<()> {
//! use faculty_client::{ApiClient, ApiConfig};
//! use faculty_core::{filter::SearchFilter, router::route};
//!
//! let client = ApiClient::new(ApiConfig::default())?;
//! let hits = route(&client, &SearchFilter::default().with_topic("kelp")).await;
//! # Ok(()) }
//! ```

pub mod auth;
mod client;
pub mod error;
pub mod message;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL, FacultyLinks, GOOGLE_USERINFO_URL};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
