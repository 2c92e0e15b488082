//! Assembly of registry-ready metadata records and the run-wide contributor
//! set.
//!
//! One [`MetadataRecord`] is produced per validated trigger and never mutated
//! after assembly. The [`ContributorSet`] is the single piece of state shared
//! across concurrently running per-trigger pipelines; it deduplicates
//! contributors by GitHub user id behind a mutex so the run can persist each
//! distinct identity exactly once.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use serde::Serialize;

use crate::checksum::ChecksumMap;
use crate::config::{Language, Platform, TriggerConfig, EVENT_NAMES};
use crate::contributors::Contributor;

/// The persisted metadata for one trigger package. Field names match the
/// registry's storage schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub platforms: Vec<Platform>,
    #[serde(rename = "contributorGitHubUserIDs")]
    pub contributor_github_user_ids: Vec<String>,
    pub language: Language,
    pub readme: String,
    pub executables: Vec<String>,
    pub files: ChecksumMap,
    #[serde(rename = "archiveChecksum")]
    pub archive_checksum: String,
}

/// Composes one immutable record from the outputs of the validation,
/// checksum and contributor steps.
///
/// `executables` is derived from the checksum map: every enumerated event
/// name that names a hashed file directly under the package root. Platforms
/// are deduplicated preserving declaration order; contributor ids are
/// deduplicated and sorted for stable persistence.
pub fn assemble(
    id: &str,
    config: &TriggerConfig,
    readme: String,
    files: ChecksumMap,
    archive_checksum: String,
    contributors: &[Contributor],
) -> MetadataRecord {
    let mut seen_platforms = HashSet::new();
    let platforms: Vec<Platform> = config
        .platforms
        .iter()
        .copied()
        .filter(|p| seen_platforms.insert(*p))
        .collect();

    let contributor_github_user_ids: Vec<String> = contributors
        .iter()
        .map(|c| c.github_user_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let executables: Vec<String> = EVENT_NAMES
        .iter()
        .filter(|event| files.contains_key(**event))
        .map(|event| event.to_string())
        .collect();

    MetadataRecord {
        id: id.to_string(),
        name: config.name.clone(),
        description: config.description.clone(),
        platforms,
        contributor_github_user_ids,
        language: config.language,
        readme,
        executables,
        files,
        archive_checksum,
    }
}

/// Run-wide deduplicating accumulator of contributors, keyed by GitHub user
/// id. Safe to feed from multiple in-flight trigger pipelines; the lock is
/// only held for the insertion itself, never across an await point.
#[derive(Debug, Default)]
pub struct ContributorSet {
    inner: Mutex<HashMap<String, Contributor>>,
}

impl ContributorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one trigger's contributors into the set. Re-inserting an
    /// already-known identity is a no-op.
    pub fn add_all(&self, contributors: &[Contributor]) {
        let mut inner = self.inner.lock().expect("contributor set lock poisoned");
        for contributor in contributors {
            inner
                .entry(contributor.github_user_id.clone())
                .or_insert_with(|| contributor.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("contributor set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the set for the bulk persistence step, ordered by identity
    /// key for deterministic output.
    pub fn into_contributors(self) -> Vec<Contributor> {
        let inner = self.inner.into_inner().expect("contributor set lock poisoned");
        let mut contributors: Vec<Contributor> = inner.into_values().collect();
        contributors.sort_by(|a, b| a.github_user_id.cmp(&b.github_user_id));
        contributors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(id: &str, login: &str) -> Contributor {
        Contributor {
            github_user_id: id.to_string(),
            github_username: login.to_string(),
            github_avatar_url: format!("https://avatars.example/{login}"),
            twitter_username: None,
            name: None,
        }
    }

    #[test]
    fn assemble_derives_executables_from_hashed_event_files() {
        let config = TriggerConfig {
            name: "Join Alert".to_string(),
            description: "desc".to_string(),
            platforms: vec![Platform::Macos, Platform::Macos, Platform::Linux],
            language: Language::Python,
        };
        let mut files = ChecksumMap::new();
        files.insert("room-joined".to_string(), "aa".to_string());
        files.insert("config.json".to_string(), "bb".to_string());
        files.insert("assets/icon.png".to_string(), "cc".to_string());

        let record = assemble(
            "join-alert",
            &config,
            "# Join Alert".to_string(),
            files,
            "dd".to_string(),
            &[contributor("1", "alice"), contributor("1", "alice")],
        );

        assert_eq!(record.id, "join-alert");
        assert_eq!(record.executables, vec!["room-joined".to_string()]);
        assert_eq!(record.platforms, vec![Platform::Macos, Platform::Linux]);
        assert_eq!(record.contributor_github_user_ids, vec!["1".to_string()]);
        assert_eq!(record.archive_checksum, "dd");
    }

    #[test]
    fn contributor_set_deduplicates_across_additions() {
        let set = ContributorSet::new();
        set.add_all(&[contributor("1", "alice"), contributor("2", "bob")]);
        set.add_all(&[contributor("2", "bob"), contributor("3", "carol")]);

        let contributors = set.into_contributors();
        let ids: Vec<_> = contributors
            .iter()
            .map(|c| c.github_user_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
