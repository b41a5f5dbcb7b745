//! Job portal backend: job listings, applications, interviews, notifications and accounts.
//!
//! Every domain module follows the same split: `domain` types, a storage trait in
//! `repository`, a synchronous service, and an axum router. [`persistence::SqliteStore`]
//! implements all storage traits on top of one SQLite connection.

pub mod accounts;
pub mod config;
pub mod error;
pub mod hiring;
pub mod jobs;
pub mod mail;
pub mod notifications;
pub mod persistence;
pub mod telemetry;
