//! Store for guides' Google credentials
//!
//! The calendar workflows only ever touch one guide row per call, through the
//! single-row reads and updates below.

use crate::error::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use guidebook_common::models::{ConnectedGuide, GuideCredential, GuideRecord};

/// Persistent association between a guide and their Google refresh token.
///
/// Object safe so the HTTP state can hold an `Arc<dyn GuideCredentialStore>`
/// and tests can substitute their own implementation.
#[async_trait]
pub trait GuideCredentialStore: Send + Sync {
    /// Create the backing table if it does not exist yet.
    async fn init_schema(&self) -> Result<(), DbError>;

    /// Credential row of a guide, `None` if the guide is unknown.
    async fn get_credential(&self, guide_id: &str) -> Result<Option<GuideCredential>, DbError>;

    /// Forget the guide's refresh token and its creation timestamp.
    ///
    /// Clearing an unknown guide is not an error.
    async fn clear_credential(&self, guide_id: &str) -> Result<(), DbError>;

    /// All guides that currently have a refresh token on file.
    async fn list_connected_guides(&self) -> Result<Vec<ConnectedGuide>, DbError>;

    /// E-mail address of the guide, which is also the id of their booking calendar.
    async fn get_guide_email(&self, guide_id: &str) -> Result<Option<String>, DbError>;

    /// Id of the guide's dedicated availability calendar, if they configured one.
    async fn get_availability_calendar_id(
        &self,
        guide_id: &str,
    ) -> Result<Option<String>, DbError>;

    /// Profile fields of a guide.
    async fn find_guide(&self, guide_id: &str) -> Result<Option<GuideRecord>, DbError>;

    /// Insert the guide or update their profile fields. Stored credentials are left untouched.
    async fn upsert_guide(&self, guide: GuideRecord) -> Result<(), DbError>;

    /// Store a refresh token obtained by the authorization flow.
    ///
    /// Fails with [`DbError::NotFound`] when the guide does not exist.
    async fn save_refresh_token(
        &self,
        guide_id: &str,
        refresh_token: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), DbError>;
}
