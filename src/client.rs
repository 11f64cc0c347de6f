//! HTTP access to the activities/customers backend.

use crate::config::Config;
use crate::errors::{ClientError, ClientResult};
use crate::models::{ActivityCatalog, CustomerRecord, ErrorBody, MessageBody};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Result of a collection fetch that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Loaded(T),
    Unavailable(StatusCode),
}

/// Result of a state-changing request that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Accepted(MessageBody),
    Rejected(StatusCode, ErrorBody),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// No request timeout is configured; the transport defaults apply.
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.backend_url.clone())
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn fetch_activities(&self) -> ClientResult<Fetched<ActivityCatalog>> {
        let url = self.endpoint(&["activities"])?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Ok(Fetched::Unavailable(response.status()));
        }
        Ok(Fetched::Loaded(decode(&url, response).await?))
    }

    pub async fn sign_up(&self, activity: &str, email: &str) -> ClientResult<Submission> {
        let url = self.endpoint(&["activities", activity, "signup"])?;
        let response = self
            .client
            .post(url.clone())
            .query(&[("email", email)])
            .send()
            .await?;
        submission(&url, response).await
    }

    /// A `null` collection is reported as an empty roster.
    pub async fn fetch_customers(&self) -> ClientResult<Fetched<Vec<CustomerRecord>>> {
        let url = self.endpoint(&["customers"])?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Ok(Fetched::Unavailable(response.status()));
        }
        let customers: Option<Vec<CustomerRecord>> = decode(&url, response).await?;
        Ok(Fetched::Loaded(customers.unwrap_or_default()))
    }

    pub async fn create_customer(&self, payload: &CustomerRecord) -> ClientResult<Submission> {
        let url = self.endpoint(&["customers"])?;
        let response = self.client.post(url.clone()).json(payload).send().await?;
        submission(&url, response).await
    }

    /// Appends percent-encoded path segments to the base url, so an activity
    /// name containing `/` or `?` stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn submission(url: &Url, response: Response) -> ClientResult<Submission> {
    let status = response.status();
    if status.is_success() {
        Ok(Submission::Accepted(decode(url, response).await?))
    } else {
        Ok(Submission::Rejected(status, decode(url, response).await?))
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
        endpoint: url.path().to_string(),
        source,
    })
}
