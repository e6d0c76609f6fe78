//! Meta Threads publisher.
//!
//! Threads publishes in two steps: create a media container, then publish
//! the returned creation id.

use crate::{PUBLISH_TIMEOUT_SECS, dry_run_receipt};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tracing::{debug, error, instrument};
use vasari_core::{Platform, PublishReceipt};
use vasari_error::{SocialError, SocialErrorKind, VasariResult};
use vasari_interface::PlatformPublisher;

const THREADS_API_BASE: &str = "https://graph.threads.net/v1.0";

/// Publishes text posts through the Threads Graph API.
#[derive(Debug, Clone)]
pub struct ThreadsPublisher {
    client: Client,
    user_id: Option<String>,
    access_token: Option<String>,
}

impl ThreadsPublisher {
    /// Create a publisher with explicit credentials.
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_id: Some(user_id.into()),
            access_token: Some(access_token.into()),
        }
    }

    /// Create a publisher from `THREADS_USER_ID` and `THREADS_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            user_id: std::env::var("THREADS_USER_ID").ok(),
            access_token: std::env::var("THREADS_ACCESS_TOKEN").ok(),
        }
    }

    fn credentials(&self) -> VasariResult<(&str, &str)> {
        let user_id = self.user_id.as_deref().ok_or_else(|| {
            SocialError::new(SocialErrorKind::MissingCredentials {
                platform: Platform::Threads.to_string(),
                variable: "THREADS_USER_ID".to_string(),
            })
        })?;
        let token = self.access_token.as_deref().ok_or_else(|| {
            SocialError::new(SocialErrorKind::MissingCredentials {
                platform: Platform::Threads.to_string(),
                variable: "THREADS_ACCESS_TOKEN".to_string(),
            })
        })?;
        Ok((user_id, token))
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> VasariResult<JsonValue> {
        let response = self
            .client
            .post(url)
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url, "Threads request failed");
                SocialError::new(SocialErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Threads API returned error");
            return Err(SocialError::new(SocialErrorKind::ApiStatus {
                platform: Platform::Threads.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Parse(e.to_string())).into())
    }
}

#[async_trait]
impl PlatformPublisher for ThreadsPublisher {
    #[instrument(skip(self, content), fields(chars = content.chars().count()))]
    async fn publish(&self, content: &str, dry_run: bool) -> VasariResult<PublishReceipt> {
        if dry_run {
            debug!("dry-run publish to threads");
            return Ok(dry_run_receipt(Platform::Threads));
        }

        let (user_id, token) = self.credentials()?;

        let create = self
            .post_form(
                &format!("{THREADS_API_BASE}/{user_id}/threads"),
                &[
                    ("media_type", "TEXT"),
                    ("text", content),
                    ("access_token", token),
                ],
            )
            .await?;

        let creation_id = create["id"].as_str().map(str::trim).unwrap_or_default();
        if creation_id.is_empty() {
            return Err(SocialError::new(SocialErrorKind::Parse(
                "Threads create did not return a creation id".to_string(),
            ))
            .into());
        }

        let published = self
            .post_form(
                &format!("{THREADS_API_BASE}/{user_id}/threads_publish"),
                &[("creation_id", creation_id), ("access_token", token)],
            )
            .await?;

        debug!(creation_id, "threads post published");
        Ok(PublishReceipt {
            platform: Platform::Threads,
            dry_run: false,
            payload: json!({"create": create, "publish": published}),
        })
    }

    fn platform(&self) -> Platform {
        Platform::Threads
    }
}
