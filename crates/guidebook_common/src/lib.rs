// --- File: crates/guidebook_common/src/lib.rs ---

pub mod error; // Error taxonomy shared by all crates
pub mod http; // HTTP error mapping and client factory
pub mod logging; // Logging utilities
pub mod models; // Guide and credential rows

pub use error::{
    auth_required, config_error, external_service_error, not_found, validation_error,
    GuidebookError, HttpStatusCode,
};

pub use http::{
    client::{create_client, HTTP_CLIENT},
    ErrorBody,
};

pub use logging::{init, init_with_level, log_result};

pub use models::{ConnectedGuide, GuideCredential, GuideRecord};
