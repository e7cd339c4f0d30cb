//! Existence check against the User service over REST

use async_trait::async_trait;
use reqwest::{Client, Url};
use request_context::TRACKING_HEADER;
use std::time::Duration;
use storefront_common::{User, UserDirectory};

/// `UserDirectory` that issues `GET {base}/users/{id}`
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("user service URL cannot be a base: {}", base_url);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `None` for ids that cannot name a single user path segment
    fn user_url(&self, user_id: &str) -> Option<Url> {
        // `url` drops dot segments, which would turn the lookup into a list
        if matches!(user_id, "" | "." | "..") {
            return None;
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        Some(url)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn user_exists(&self, user_id: &str) -> bool {
        let Some(url) = self.user_url(user_id) else {
            tracing::debug!(user_id = %user_id, "user id cannot be looked up");
            return false;
        };

        let mut request = self.client.get(url);
        if let Some(id) = request_context::current() {
            request = request.header(TRACKING_HEADER, id.as_str());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "user existence check over HTTP failed"
                );
                return false;
            }
        };

        let status = response.status();
        tracing::debug!(user_id = %user_id, status = status.as_u16(), "user lookup answered");
        if !status.is_success() {
            return false;
        }

        // Only a record for this exact id counts as present
        match response.json::<User>().await {
            Ok(user) => user.id == user_id,
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "user lookup returned an unexpected body"
                );
                false
            }
        }
    }
}
