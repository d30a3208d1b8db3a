//! Repository modules for database access

pub mod guide_credentials;
pub mod guide_credentials_sql;

pub use guide_credentials::GuideCredentialStore;
pub use guide_credentials_sql::SqlGuideCredentialStore;
