//! GitHub REST client backing the diff and identity collaborator traits.
//!
//! Thin transport wrapper: compare two revisions for changed files, list
//! commits touching a path, fetch one user profile. Construct with
//! [`GitHubClient::from_env`] (`GITHUB_TOKEN`, `GITHUB_REPOSITORY`,
//! optionally `GITHUB_API_URL`).

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::contributors::{Contributor, IdentityProvider, ProviderError};
use crate::listing::{ChangeProvider, ChangeProviderError};

const COMMITS_PER_PAGE: usize = 100;

pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base: String, repo: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            repo,
            token,
        }
    }

    /// Builds a client from the environment the CI workflow provides.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();
        let token = env::var("GITHUB_TOKEN").map_err(|e| {
            tracing::error!("GITHUB_TOKEN missing in environment");
            Box::new(e) as Box<dyn std::error::Error + Send + Sync>
        })?;
        let repo = env::var("GITHUB_REPOSITORY").map_err(|e| {
            tracing::error!("GITHUB_REPOSITORY missing in environment");
            Box::new(e) as Box<dyn std::error::Error + Send + Sync>
        })?;
        let api_base =
            env::var("GITHUB_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string());
        info!(repo = %repo, api_base = %api_base, "Initialized GitHub client from environment");
        Ok(Self::new(api_base, repo, token))
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "trigger-registry")
    }
}

#[derive(Deserialize)]
struct CompareResponse {
    files: Vec<ChangedFile>,
}

#[derive(Deserialize)]
struct ChangedFile {
    filename: String,
}

#[async_trait]
impl ChangeProvider for GitHubClient {
    async fn changed_files(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ChangeProviderError> {
        let url = format!(
            "{}/repos/{}/compare/{base}...{head}",
            self.api_base, self.repo
        );
        debug!(%url, "Comparing revisions for changed files");
        let response: CompareResponse = self.get(url).send().await?.error_for_status()?.json().await?;
        Ok(response
            .files
            .into_iter()
            .map(|file| file.filename)
            .collect())
    }
}

#[derive(Deserialize)]
struct CommitEntry {
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    login: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: u64,
    login: String,
    avatar_url: String,
    twitter_username: Option<String>,
    name: Option<String>,
}

#[async_trait]
impl IdentityProvider for GitHubClient {
    async fn commit_authors(&self, path: &str) -> Result<Vec<String>, ProviderError> {
        let mut logins = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!(
                "{}/repos/{}/commits?path={path}&per_page={COMMITS_PER_PAGE}&page={page}",
                self.api_base, self.repo
            );
            debug!(%url, "Listing commits for path");
            let commits: Vec<CommitEntry> =
                self.get(url).send().await?.error_for_status()?.json().await?;
            let batch = commits.len();
            for commit in commits {
                match commit.author {
                    Some(author) => logins.push(author.login),
                    None => warn!(path, "Commit without a linked author account, skipping"),
                }
            }
            if batch < COMMITS_PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(logins)
    }

    async fn user_profile(&self, login: &str) -> Result<Contributor, ProviderError> {
        let url = format!("{}/users/{login}", self.api_base);
        let user: UserResponse = self.get(url).send().await?.error_for_status()?.json().await?;
        Ok(Contributor {
            github_user_id: user.id.to_string(),
            github_username: user.login,
            github_avatar_url: user.avatar_url,
            twitter_username: user.twitter_username,
            name: user.name,
        })
    }
}
