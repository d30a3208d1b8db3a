// --- File: crates/guidebook_gcal/src/test_support.rs ---
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guidebook_config::GoogleOAuthConfig;
use guidebook_db::{ConnectedGuide, DbError, GuideCredential, GuideCredentialStore, GuideRecord};
use mockall::mock;

mock! {
    pub Store {}

    #[async_trait]
    impl GuideCredentialStore for Store {
        async fn init_schema(&self) -> Result<(), DbError>;
        async fn get_credential(&self, guide_id: &str) -> Result<Option<GuideCredential>, DbError>;
        async fn clear_credential(&self, guide_id: &str) -> Result<(), DbError>;
        async fn list_connected_guides(&self) -> Result<Vec<ConnectedGuide>, DbError>;
        async fn get_guide_email(&self, guide_id: &str) -> Result<Option<String>, DbError>;
        async fn get_availability_calendar_id(&self, guide_id: &str) -> Result<Option<String>, DbError>;
        async fn find_guide(&self, guide_id: &str) -> Result<Option<GuideRecord>, DbError>;
        async fn upsert_guide(&self, guide: GuideRecord) -> Result<(), DbError>;
        async fn save_refresh_token(
            &self,
            guide_id: &str,
            refresh_token: &str,
            created_at: DateTime<Utc>,
        ) -> Result<(), DbError>;
    }
}

pub fn credential(guide_id: &str, refresh_token: Option<&str>) -> GuideCredential {
    GuideCredential {
        guide_id: guide_id.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        token_created_at: refresh_token.map(|_| Utc::now()),
    }
}

pub fn oauth_config(token_url: String) -> GoogleOAuthConfig {
    GoogleOAuthConfig {
        client_id: "client-id.apps.googleusercontent.com".to_string(),
        client_secret: "client-secret".to_string(),
        token_url,
    }
}
