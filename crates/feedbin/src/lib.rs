// ABOUTME: Feedbin API client and FreshRSS-to-Feedbin favorites migration.
// ABOUTME: Re-exports the client, credentials, migration runner, report and exports.

pub mod client;
pub mod credentials;
pub mod error;
pub mod export;
pub mod migration;

pub use client::{Entry, FeedbinClient, FeedbinClientBuilder, FeedbinSubscription, DEFAULT_BASE_URL};
pub use credentials::Credentials;
pub use error::FeedbinError;
pub use migration::{MigrationConfig, MigrationReport, Migrator, SourceStats};
