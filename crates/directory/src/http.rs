use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use volly_core::errors::{VollyError, VollyResult};

use crate::{IdentityDirectory, IdentityRecord};

/// Directory client speaking to a REST admin API.
///
/// Endpoints:
/// - `POST   {base}/v1/identities`         create
/// - `GET    {base}/v1/identities/{id}`    fetch by id
/// - `GET    {base}/v1/identities?email=`  fetch by email
/// - `PATCH  {base}/v1/identities/{id}`    update email
/// - `DELETE {base}/v1/identities/{id}`    delete
#[derive(Clone)]
pub struct HttpIdentityDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct CreateIdentityPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct UpdateIdentityPayload<'a> {
    email: &'a str,
}

impl HttpIdentityDirectory {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn identities_url(&self) -> String {
        format!("{}/v1/identities", self.base_url)
    }

    fn identity_url(&self, id: &str) -> String {
        format!("{}/v1/identities/{}", self.base_url, id)
    }

    async fn parse_record(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> VollyResult<IdentityRecord> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<IdentityRecord>()
                .await
                .map_err(|e| VollyError::Directory(format!("{context}: invalid response: {e}")))
        } else {
            Err(map_status(status, context))
        }
    }
}

/// Maps a directory HTTP status to the domain error taxonomy.
pub(crate) fn map_status(status: StatusCode, context: &str) -> VollyError {
    match status {
        StatusCode::NOT_FOUND => VollyError::NotFound(format!("{context}: identity not found")),
        StatusCode::CONFLICT => {
            VollyError::Conflict(format!("{context}: identity already exists"))
        }
        _ => VollyError::Directory(format!("{context}: directory returned {status}")),
    }
}

fn transport_error(context: &str, err: reqwest::Error) -> VollyError {
    VollyError::Directory(format!("{context}: {err}"))
}

#[async_trait]
impl IdentityDirectory for HttpIdentityDirectory {
    async fn create_identity(&self, email: &str, password: &str) -> VollyResult<IdentityRecord> {
        tracing::debug!("Creating directory identity for email={}", email);

        let response = self
            .client
            .post(self.identities_url())
            .bearer_auth(&self.api_key)
            .json(&CreateIdentityPayload { email, password })
            .send()
            .await
            .map_err(|e| transport_error("create identity", e))?;

        self.parse_record(response, "create identity").await
    }

    async fn get_identity(&self, id: &str) -> VollyResult<IdentityRecord> {
        let response = self
            .client
            .get(self.identity_url(id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("get identity", e))?;

        self.parse_record(response, "get identity").await
    }

    async fn get_identity_by_email(&self, email: &str) -> VollyResult<IdentityRecord> {
        let response = self
            .client
            .get(self.identities_url())
            .query(&[("email", email)])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("get identity by email", e))?;

        self.parse_record(response, "get identity by email").await
    }

    async fn update_identity_email(&self, id: &str, email: &str) -> VollyResult<IdentityRecord> {
        tracing::debug!("Updating directory identity id={}", id);

        let response = self
            .client
            .patch(self.identity_url(id))
            .bearer_auth(&self.api_key)
            .json(&UpdateIdentityPayload { email })
            .send()
            .await
            .map_err(|e| transport_error("update identity", e))?;

        self.parse_record(response, "update identity").await
    }

    async fn delete_identity(&self, id: &str) -> VollyResult<()> {
        tracing::debug!("Deleting directory identity id={}", id);

        let response = self
            .client
            .delete(self.identity_url(id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("delete identity", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(map_status(status, "delete identity"))
        }
    }
}
