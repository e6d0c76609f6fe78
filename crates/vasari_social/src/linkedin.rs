//! LinkedIn publisher.

use crate::{PUBLISH_TIMEOUT_SECS, dry_run_receipt};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use vasari_core::{Platform, PublishReceipt};
use vasari_error::{SocialError, SocialErrorKind, VasariResult};
use vasari_interface::PlatformPublisher;

const LINKEDIN_POSTS_URL: &str = "https://api.linkedin.com/v2/ugcPosts";
const LINKEDIN_USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";

/// Publishes UGC posts through the LinkedIn v2 API.
#[derive(Debug, Clone)]
pub struct LinkedInPublisher {
    client: Client,
    access_token: Option<String>,
    person_urn: Option<String>,
}

fn normalize_person_urn(value: &str) -> Option<String> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("urn:li:person:") {
        Some(raw.to_string())
    } else {
        Some(format!("urn:li:person:{raw}"))
    }
}

impl LinkedInPublisher {
    /// Create a publisher with explicit credentials.
    pub fn new(access_token: impl Into<String>, person_urn: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            access_token: Some(access_token.into()),
            person_urn: normalize_person_urn(&person_urn.into()),
        }
    }

    /// Create a publisher from `LINKEDIN_ACCESS_TOKEN` and (optionally)
    /// `LINKEDIN_PERSON_URN`. Without an explicit URN the member id is
    /// resolved from the userinfo endpoint at publish time.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            access_token: std::env::var("LINKEDIN_ACCESS_TOKEN").ok(),
            person_urn: std::env::var("LINKEDIN_PERSON_URN")
                .ok()
                .as_deref()
                .and_then(normalize_person_urn),
        }
    }

    async fn resolve_author(&self, token: &str) -> VasariResult<String> {
        if let Some(urn) = &self.person_urn {
            return Ok(urn.clone());
        }

        let response = self
            .client
            .get(LINKEDIN_USERINFO_URL)
            .bearer_auth(token)
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Http(e.to_string())))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "userinfo lookup failed");
            return Err(SocialError::new(SocialErrorKind::MissingCredentials {
                platform: Platform::LinkedIn.to_string(),
                variable: "LINKEDIN_PERSON_URN".to_string(),
            })
            .into());
        }

        let data: JsonValue = response
            .json()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Parse(e.to_string())))?;
        data["sub"]
            .as_str()
            .and_then(normalize_person_urn)
            .ok_or_else(|| {
                SocialError::new(SocialErrorKind::MissingCredentials {
                    platform: Platform::LinkedIn.to_string(),
                    variable: "LINKEDIN_PERSON_URN".to_string(),
                })
                .into()
            })
    }
}

#[async_trait]
impl PlatformPublisher for LinkedInPublisher {
    #[instrument(skip(self, content), fields(chars = content.chars().count()))]
    async fn publish(&self, content: &str, dry_run: bool) -> VasariResult<PublishReceipt> {
        if dry_run {
            debug!("dry-run publish to linkedin");
            return Ok(dry_run_receipt(Platform::LinkedIn));
        }

        let token = self.access_token.as_deref().ok_or_else(|| {
            SocialError::new(SocialErrorKind::MissingCredentials {
                platform: Platform::LinkedIn.to_string(),
                variable: "LINKEDIN_ACCESS_TOKEN".to_string(),
            })
        })?;
        let author = self.resolve_author(token).await?;

        let body = json!({
            "author": author,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": {"text": content},
                    "shareMediaCategory": "NONE",
                }
            },
            "visibility": {"com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"},
        });

        let response = self
            .client
            .post(LINKEDIN_POSTS_URL)
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send LinkedIn post");
                SocialError::new(SocialErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "LinkedIn API returned error");
            return Err(SocialError::new(SocialErrorKind::ApiStatus {
                platform: Platform::LinkedIn.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let payload = response.json().await.unwrap_or(JsonValue::Null);
        debug!("linkedin post published");
        Ok(PublishReceipt {
            platform: Platform::LinkedIn,
            dry_run: false,
            payload: json!({"response": payload, "author": author}),
        })
    }

    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }
}
