//! Persistence boundary for metadata and contributor records.
//!
//! The registry's key-value store lives behind [`MetadataStore`]; the
//! pipeline only knows how to hand over finished records. All puts for one
//! run are issued together in parallel, mirroring one put per record.

use async_trait::async_trait;
use futures::future::try_join_all;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::info;

use crate::contributors::Contributor;
use crate::metadata::MetadataRecord;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn put_metadata(&self, record: &MetadataRecord) -> Result<(), StoreError>;
    async fn put_contributor(&self, contributor: &Contributor) -> Result<(), StoreError>;
}

/// Store that writes each record as a pretty-printed JSON document under
/// `<dir>/metadata/` and `<dir>/contributors/`, for the external uploader
/// job to pick up. The registry's real key-value client stays outside this
/// crate.
pub struct FileStore {
    dir: std::path::PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write(&self, subdir: &str, id: &str, json: String) -> Result<(), StoreError> {
        let dir = self.dir.join(subdir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{id}.json"));
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for FileStore {
    async fn put_metadata(&self, record: &MetadataRecord) -> Result<(), StoreError> {
        self.write("metadata", &record.id, serde_json::to_string_pretty(record)?)
    }

    async fn put_contributor(&self, contributor: &Contributor) -> Result<(), StoreError> {
        self.write(
            "contributors",
            &contributor.github_user_id,
            serde_json::to_string_pretty(contributor)?,
        )
    }
}

/// Bulk-persists all of a run's records and its deduplicated contributor
/// set, failing fast on the first store error.
pub async fn persist_run<S>(
    store: &S,
    records: &[MetadataRecord],
    contributors: &[Contributor],
) -> Result<(), StoreError>
where
    S: MetadataStore + ?Sized,
{
    let record_puts = records.iter().map(|record| store.put_metadata(record));
    let contributor_puts = contributors
        .iter()
        .map(|contributor| store.put_contributor(contributor));

    try_join_all(record_puts).await?;
    try_join_all(contributor_puts).await?;

    info!(
        records = records.len(),
        contributors = contributors.len(),
        "Persisted run output to the metadata store"
    );
    Ok(())
}
