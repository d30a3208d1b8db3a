//! SQL implementation of the guide credential store

use crate::error::DbError;
use crate::repositories::guide_credentials::{
    ConnectedGuide, GuideCredential, GuideCredentialStore, GuideRecord,
};
use crate::DbClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};

/// SQL implementation of [`GuideCredentialStore`] over the `guides` table.
#[derive(Debug, Clone)]
pub struct SqlGuideCredentialStore {
    db_client: DbClient,
}

impl SqlGuideCredentialStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn query_error(context: &str, e: sqlx::Error) -> DbError {
        error!("{}: {}", context, e);
        DbError::QueryError(e.to_string())
    }

    fn parse_timestamp(guide_id: &str, raw: Option<String>) -> Option<DateTime<Utc>> {
        let raw = raw?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(
                    "Ignoring malformed token timestamp for guide {}: {}",
                    guide_id, e
                );
                None
            }
        }
    }

    fn guide_from_row(row: &AnyRow) -> Result<GuideRecord, DbError> {
        Ok(GuideRecord {
            id: row.try_get("id")?,
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            email: row.try_get("email")?,
            availability_calendar_id: row.try_get("availability_calendar_id")?,
        })
    }
}

#[async_trait]
impl GuideCredentialStore for SqlGuideCredentialStore {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing guides schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS guides (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                email TEXT,
                google_refresh_token TEXT,
                google_token_created_at TEXT,
                availability_calendar_id TEXT
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Guides schema initialized successfully");
        Ok(())
    }

    async fn get_credential(&self, guide_id: &str) -> Result<Option<GuideCredential>, DbError> {
        debug!("Loading Google credential for guide: {}", guide_id);

        let query = r#"
            SELECT id, google_refresh_token, google_token_created_at
            FROM guides
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(guide_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to load guide credential", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: Option<String> = row.try_get("google_token_created_at")?;
        Ok(Some(GuideCredential {
            guide_id: row.try_get("id")?,
            refresh_token: row.try_get("google_refresh_token")?,
            token_created_at: Self::parse_timestamp(guide_id, created_at),
        }))
    }

    async fn clear_credential(&self, guide_id: &str) -> Result<(), DbError> {
        debug!("Clearing Google credential for guide: {}", guide_id);

        let query = r#"
            UPDATE guides
            SET google_refresh_token = NULL, google_token_created_at = NULL
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(guide_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to clear guide credential", e))?;

        if result.rows_affected() == 0 {
            warn!("No guide row to clear for guide: {}", guide_id);
        } else {
            info!("Cleared Google credential for guide: {}", guide_id);
        }
        Ok(())
    }

    async fn list_connected_guides(&self) -> Result<Vec<ConnectedGuide>, DbError> {
        debug!("Listing guides with a connected Google Calendar");

        let query = r#"
            SELECT id, name, google_refresh_token, availability_calendar_id
            FROM guides
            WHERE google_refresh_token IS NOT NULL AND google_refresh_token <> ''
            ORDER BY name, id
        "#;

        let rows = sqlx::query(query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to list connected guides", e))?;

        rows.iter()
            .map(|row| {
                Ok(ConnectedGuide {
                    id: row.try_get("id")?,
                    name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
                    refresh_token: row.try_get("google_refresh_token")?,
                    availability_calendar_id: row.try_get("availability_calendar_id")?,
                })
            })
            .collect()
    }

    async fn get_guide_email(&self, guide_id: &str) -> Result<Option<String>, DbError> {
        Ok(self.find_guide(guide_id).await?.and_then(|guide| guide.email))
    }

    async fn get_availability_calendar_id(
        &self,
        guide_id: &str,
    ) -> Result<Option<String>, DbError> {
        Ok(self
            .find_guide(guide_id)
            .await?
            .and_then(|guide| guide.availability_calendar_id))
    }

    async fn find_guide(&self, guide_id: &str) -> Result<Option<GuideRecord>, DbError> {
        let query = r#"
            SELECT id, name, email, availability_calendar_id
            FROM guides
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(guide_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to load guide", e))?;

        row.as_ref().map(Self::guide_from_row).transpose()
    }

    async fn upsert_guide(&self, guide: GuideRecord) -> Result<(), DbError> {
        debug!("Upserting guide: {}", guide.id);

        let query = r#"
            INSERT INTO guides (id, name, email, availability_calendar_id)
            VALUES ($1, $2, NULLIF($3, ''), NULLIF($4, ''))
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                availability_calendar_id = excluded.availability_calendar_id
        "#;

        // Optional fields are bound as '' and turned into NULL by the statement,
        // the Any driver has no typed NULL for text parameters.
        sqlx::query(query)
            .bind(guide.id.as_str())
            .bind(guide.name.as_str())
            .bind(guide.email.as_deref().unwrap_or(""))
            .bind(guide.availability_calendar_id.as_deref().unwrap_or(""))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to upsert guide", e))?;
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        guide_id: &str,
        refresh_token: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        debug!("Storing Google refresh token for guide: {}", guide_id);

        let query = r#"
            UPDATE guides
            SET google_refresh_token = $1, google_token_created_at = $2
            WHERE id = $3
        "#;

        let result = sqlx::query(query)
            .bind(refresh_token)
            .bind(created_at.to_rfc3339())
            .bind(guide_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| Self::query_error("Failed to store refresh token", e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("guide {}", guide_id)));
        }
        info!("Stored Google refresh token for guide: {}", guide_id);
        Ok(())
    }
}
