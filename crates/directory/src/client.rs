use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::LookupError;
use crate::model::UserRecord;

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn get_user(&self, id: u64) -> Result<UserRecord, LookupError>;
    /// Users whose username matches exactly; empty when there is none.
    async fn find_users(&self, username: &str) -> Result<Vec<UserRecord>, LookupError>;
}

/// [`DirectoryClient`] backed by the GitLab REST v4 users API.
pub struct GitlabDirectoryClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl GitlabDirectoryClient {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let mut root = Url::parse(base_url)?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gitlab-notifier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base: root.join("api/v4/")?,
            token: token.into(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, path: &str) -> Result<Url, LookupError> {
        Ok(self.base.join(path)?)
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LookupError> {
        let endpoint = url.path().to_string();
        debug!(endpoint = %endpoint, "dispatching directory request");
        let response = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::status(status, endpoint));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| LookupError::Decode { endpoint, source })
    }
}

#[async_trait]
impl DirectoryClient for GitlabDirectoryClient {
    async fn get_user(&self, id: u64) -> Result<UserRecord, LookupError> {
        let url = self.join(&format!("users/{id}"))?;
        self.get_json(url).await
    }

    async fn find_users(&self, username: &str) -> Result<Vec<UserRecord>, LookupError> {
        let mut url = self.join("users")?;
        url.query_pairs_mut().append_pair("username", username);
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_points_at_api_v4() {
        let client =
            GitlabDirectoryClient::new("https://gitlab.com", "t", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base().as_str(), "https://gitlab.com/api/v4/");
    }

    #[test]
    fn base_url_keeps_subpath_installs() {
        let client = GitlabDirectoryClient::new(
            "https://code.example.org/gitlab",
            "t",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.join("users/5").unwrap().as_str(),
            "https://code.example.org/gitlab/api/v4/users/5"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GitlabDirectoryClient::new("not a url", "t", Duration::from_secs(1));
        assert!(matches!(result, Err(LookupError::Url(_))));
    }
}
