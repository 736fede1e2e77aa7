//! Credential issuance against the BI vendor API.
//!
//! [`EmbedClient::issue`] runs the four issuance steps in order: service
//! token, workspace name, report metadata and `GenerateToken`. Each failing
//! step maps to its own [`EmbedError`] variant.

mod client;
mod config;
mod error;
mod payload;

pub use client::EmbedClient;
pub use config::EmbedConfig;
pub use error::{EmbedError, EmbedResult};
pub use payload::{
    DatasetAccess, EffectiveIdentity, EmbedCredential, EmbedTarget, GenerateTokenRequest,
    ItemReference,
};
