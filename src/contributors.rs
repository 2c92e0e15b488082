//! Resolves the set of identities that have authored commits touching a
//! trigger's subtree.
//!
//! The resolver is transport-agnostic: it talks to an [`IdentityProvider`]
//! (GitHub in production, a mock in tests). Logins are deduplicated before
//! any profile fetch so each distinct identity costs exactly one network
//! call, and the per-login fetches then run in parallel. A failed profile
//! fetch fails the whole resolution for that trigger; partial contributor
//! lists are never silently accepted.

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use futures::future::try_join_all;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A version-control identity that has modified at least one trigger.
/// Identity key is `github_user_id`; serialized field names match the
/// persisted contributor records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(rename = "gitHubUserID")]
    pub github_user_id: String,
    #[serde(rename = "gitHubUsername")]
    pub github_username: String,
    #[serde(rename = "gitHubAvatarURL")]
    pub github_avatar_url: String,
    #[serde(rename = "twitterUsername")]
    pub twitter_username: Option<String>,
    pub name: Option<String>,
}

/// Boxed transport error from an identity provider call.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// External identity/version-history collaborator. Implemented by the real
/// GitHub client and by mocks in tests.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Author logins of every commit touching `path`, in history order
    /// (duplicates expected).
    async fn commit_authors(&self, path: &str) -> Result<Vec<String>, ProviderError>;

    /// Full profile for one login.
    async fn user_profile(&self, login: &str) -> Result<Contributor, ProviderError>;
}

/// Failure of one trigger's contributor resolution.
#[derive(Debug)]
pub enum ContributorError {
    History(ProviderError),
    Profile { login: String, source: ProviderError },
}

impl fmt::Display for ContributorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributorError::History(e) => {
                write!(f, "failed to list commit history: {e}")
            }
            ContributorError::Profile { login, source } => {
                write!(f, "failed to fetch profile for `{login}`: {source}")
            }
        }
    }
}

impl std::error::Error for ContributorError {}

/// Resolves the deduplicated contributors of the trigger named `name`.
pub async fn resolve_contributors<P>(
    provider: &P,
    name: &str,
) -> Result<Vec<Contributor>, ContributorError>
where
    P: IdentityProvider + ?Sized,
{
    let path = format!("triggers/{name}");
    let logins = provider
        .commit_authors(&path)
        .await
        .map_err(ContributorError::History)?;

    let mut seen = HashSet::new();
    let distinct: Vec<String> = logins
        .into_iter()
        .filter(|login| seen.insert(login.clone()))
        .collect();
    debug!(
        trigger = name,
        distinct = distinct.len(),
        "Deduplicated commit authors before profile fetches"
    );

    let fetches = distinct.iter().map(|login| async move {
        provider
            .user_profile(login)
            .await
            .map_err(|source| ContributorError::Profile {
                login: login.clone(),
                source,
            })
    });
    let contributors = try_join_all(fetches).await?;

    info!(
        trigger = name,
        contributors = contributors.len(),
        "Resolved trigger contributors"
    );
    Ok(contributors)
}
