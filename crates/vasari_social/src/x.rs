//! X (formerly Twitter) publisher.

use crate::{PUBLISH_TIMEOUT_SECS, dry_run_receipt};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, instrument};
use vasari_core::{Platform, PublishReceipt};
use vasari_error::{SocialError, SocialErrorKind, VasariResult};
use vasari_interface::PlatformPublisher;

const X_API_URL: &str = "https://api.x.com/2/tweets";

/// Publishes tweets through the X v2 API with an OAuth2 user token.
#[derive(Debug, Clone)]
pub struct XPublisher {
    client: Client,
    access_token: Option<String>,
}

impl XPublisher {
    /// Create a publisher with an explicit OAuth2 user access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token: Some(access_token.into()),
        }
    }

    /// Create a publisher from the `X_ACCESS_TOKEN` environment variable.
    ///
    /// A missing token is not an error here: dry-run publishes work without
    /// credentials, and live publishes report the gap when attempted.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            access_token: std::env::var("X_ACCESS_TOKEN").ok(),
        }
    }
}

#[async_trait]
impl PlatformPublisher for XPublisher {
    #[instrument(skip(self, content), fields(chars = content.chars().count()))]
    async fn publish(&self, content: &str, dry_run: bool) -> VasariResult<PublishReceipt> {
        if dry_run {
            debug!("dry-run publish to x");
            return Ok(dry_run_receipt(Platform::X));
        }

        let token = self.access_token.as_deref().ok_or_else(|| {
            SocialError::new(SocialErrorKind::MissingCredentials {
                platform: Platform::X.to_string(),
                variable: "X_ACCESS_TOKEN".to_string(),
            })
        })?;

        let response = self
            .client
            .post(X_API_URL)
            .bearer_auth(token)
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .json(&json!({"text": content}))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send tweet");
                SocialError::new(SocialErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "X API returned error");
            return Err(SocialError::new(SocialErrorKind::ApiStatus {
                platform: Platform::X.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let payload = response.json().await.map_err(|e| {
            SocialError::new(SocialErrorKind::Parse(e.to_string()))
        })?;
        debug!("tweet published");
        Ok(PublishReceipt {
            platform: Platform::X,
            dry_run: false,
            payload,
        })
    }

    fn platform(&self) -> Platform {
        Platform::X
    }
}
