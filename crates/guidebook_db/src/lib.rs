//! Guide credential store for the Guidebook calendar service
//!
//! The store is database agnostic: it runs on a `sqlx::Any` pool and supports
//! SQLite (default), PostgreSQL and MySQL through feature flags.
//!
//! # Example
//!
//! ```rust,no_run
//! use guidebook_db::{DbClient, GuideCredentialStore, SqlGuideCredentialStore};
//!
//! async fn setup() -> Result<SqlGuideCredentialStore, guidebook_db::DbError> {
//!     let client = DbClient::from_url("sqlite://data/guidebook.db").await?;
//!     let store = SqlGuideCredentialStore::new(client);
//!     store.init_schema().await?;
//!     Ok(store)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{GuideCredentialStore, SqlGuideCredentialStore};
pub use guidebook_common::models::{ConnectedGuide, GuideCredential, GuideRecord};
