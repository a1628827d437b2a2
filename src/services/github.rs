use reqwest::{header, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::GithubConfig;
use crate::error::ApiError;

/// Pass-through client for a user's public repositories
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// `{api}/users/{username}/repos?per_page=8&sort=created:asc`
    pub fn repos_url(&self, username: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|_| ApiError::bad_gateway("GitHub API URL is misconfigured"))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::bad_gateway("GitHub API URL is misconfigured"))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", "8")
            .append_pair("sort", "created:asc");
        Ok(url)
    }

    pub async fn repos(&self, username: &str) -> Result<Value, ApiError> {
        let url = self.repos_url(username)?;

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("GitHub request failed for {}: {}", username, e);
            ApiError::bad_gateway("GitHub is unavailable")
        })?;

        match response.status() {
            status if status.is_success() => response.json::<Value>().await.map_err(|e| {
                tracing::error!("GitHub returned unreadable body for {}: {}", username, e);
                ApiError::bad_gateway("GitHub returned an invalid response")
            }),
            StatusCode::NOT_FOUND => Err(ApiError::not_found("No Github profile found")),
            status => {
                tracing::warn!("GitHub returned {} for {}", status, username);
                Err(ApiError::not_found("No Github profile found"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GithubClient {
        GithubClient::new(&GithubConfig {
            api_url: api_url.to_string(),
            ..GithubConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn repos_url_encodes_username() {
        let url = client("https://api.github.com").repos_url("some user").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/some%20user/repos?per_page=8&sort=created%3Aasc"
        );
    }

    #[test]
    fn repos_url_respects_base_path() {
        let url = client("https://ghe.example.com/api/v3/").repos_url("dev").unwrap();
        assert!(url.as_str().starts_with("https://ghe.example.com/api/v3/users/dev/repos?"));
    }
}
