//! Enumeration of candidate trigger packages.
//!
//! Two modes: a full scan of every subdirectory under the triggers root, and
//! a changed-only listing derived from the files touched between two
//! revisions (the diff itself comes from an external [`ChangeProvider`]).
//! Consumers treat the output as a set; no ordering is guaranteed.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::info;

/// Boxed transport error from a diff provider call.
pub type ChangeProviderError = Box<dyn std::error::Error + Send + Sync>;

/// External collaborator producing the list of file paths changed between
/// two revisions of the repository tree.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ChangeProvider: Send + Sync {
    async fn changed_files(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>, ChangeProviderError>;
}

#[derive(Debug)]
pub enum ListingError {
    /// Either revision of the before/after pair is absent; no change set can
    /// be determined, which is fatal to the run.
    MissingRevisionRange,
    Io(std::io::Error),
    Provider(ChangeProviderError),
}

impl fmt::Display for ListingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingError::MissingRevisionRange => {
                write!(f, "Missing base or head revision to compare between")
            }
            ListingError::Io(e) => write!(f, "failed to scan triggers root: {e}"),
            ListingError::Provider(e) => write!(f, "failed to list changed files: {e}"),
        }
    }
}

impl std::error::Error for ListingError {}

impl From<std::io::Error> for ListingError {
    fn from(e: std::io::Error) -> Self {
        ListingError::Io(e)
    }
}

/// Full scan: every directly nested subdirectory of the triggers root.
pub fn all_triggers(root: &Path) -> Result<Vec<String>, ListingError> {
    let mut triggers = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            triggers.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    info!(count = triggers.len(), "Enumerated triggers from full scan");
    Ok(triggers)
}

/// Changed-only listing: the deduplicated first path segments under
/// `triggers/` of every file changed between `base` and `head`.
pub async fn changed_triggers<P>(
    provider: &P,
    base: Option<&str>,
    head: Option<&str>,
) -> Result<Vec<String>, ListingError>
where
    P: ChangeProvider + ?Sized,
{
    let (base, head) = match (base, head) {
        (Some(base), Some(head)) => (base, head),
        _ => return Err(ListingError::MissingRevisionRange),
    };

    let files = provider
        .changed_files(base, head)
        .await
        .map_err(ListingError::Provider)?;

    let mut seen = HashSet::new();
    let triggers: Vec<String> = files
        .iter()
        .filter_map(|file| file.strip_prefix("triggers/"))
        .filter_map(|rest| rest.split('/').next())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    info!(
        base,
        head,
        count = triggers.len(),
        "Enumerated changed triggers from revision range"
    );
    Ok(triggers)
}
