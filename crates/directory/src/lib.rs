//! Client for the external identity directory.
//!
//! The directory is the system of record for login credentials and email
//! addresses, keyed by an opaque string id that is independent of the
//! relational store's primary keys. The relational side keeps only that id
//! (`auth_id`); emails are fetched from here at read time.

pub mod http;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use volly_core::errors::VollyResult;

/// One directory entry as exposed to the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub email: String,
}

/// Operations the account coordinator needs from the directory. The client
/// is stateless and safe to share across requests.
#[automock]
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn create_identity(&self, email: &str, password: &str) -> VollyResult<IdentityRecord>;
    async fn get_identity(&self, id: &str) -> VollyResult<IdentityRecord>;
    async fn get_identity_by_email(&self, email: &str) -> VollyResult<IdentityRecord>;
    async fn update_identity_email(&self, id: &str, email: &str) -> VollyResult<IdentityRecord>;
    async fn delete_identity(&self, id: &str) -> VollyResult<()>;
}
