//! High-level pipeline: validate → fingerprint/contributors → assemble →
//! persist, per trigger package.
//!
//! Per-trigger pipelines run concurrently and independently; a failure in
//! one never aborts its siblings. The run's overall result is the
//! conjunction of every trigger's outcome: successes are reported (and
//! persisted, for the publish flow) even when siblings fail, but any failure
//! flips the run to failed.
//!
//! The only shared mutable state is the [`ContributorSet`] fed by all
//! in-flight pipelines before the single bulk persistence step.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::future::{join, join_all};
use tracing::{error, info, warn};

use crate::archive::Archiver;
use crate::checksum::{archive_checksum, trigger_file_checksums};
use crate::config::TriggerConfig;
use crate::contributors::{resolve_contributors, IdentityProvider};
use crate::listing::{all_triggers, changed_triggers, ChangeProvider, ListingError};
use crate::metadata::{assemble, ContributorSet, MetadataRecord};
use crate::report::{TriggerReport, ValidationReport};
use crate::store::{persist_run, MetadataStore, StoreError};
use crate::validate::{validate_trigger, ValidationResult};

#[derive(Debug)]
pub enum PipelineError {
    Listing(ListingError),
    /// One or more per-trigger pipelines failed; carries (trigger, reason)
    /// pairs. Sibling results were still completed and persisted.
    Triggers(Vec<(String, String)>),
    Store(StoreError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Listing(e) => write!(f, "{e}"),
            PipelineError::Triggers(failures) => {
                write!(f, "{} trigger pipeline(s) failed:", failures.len())?;
                for (trigger, reason) in failures {
                    write!(f, "\n  {trigger}: {reason}")?;
                }
                Ok(())
            }
            PipelineError::Store(e) => write!(f, "metadata store error: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ListingError> for PipelineError {
    fn from(e: ListingError) -> Self {
        PipelineError::Listing(e)
    }
}

/// Validates every trigger under the root. The result pairs each trigger
/// with its outcome; callers decide exit status from `all_succeeded`.
pub fn validate_all(root: &Path) -> Result<Vec<(String, ValidationResult)>, ListingError> {
    let triggers = all_triggers(root)?;
    let results: Vec<(String, ValidationResult)> = triggers
        .into_iter()
        .map(|name| {
            let result = validate_trigger(root, &name);
            (name, result)
        })
        .collect();
    Ok(results)
}

/// Pull-request flow: validates only the triggers touched between `base`
/// and `head` and produces the report consumed by the PR feedback tooling.
/// An empty change set yields an empty, successful report.
pub async fn validate_changed<C>(
    provider: &C,
    root: &Path,
    base: Option<&str>,
    head: Option<&str>,
    number: u64,
) -> Result<ValidationReport, ListingError>
where
    C: ChangeProvider + ?Sized,
{
    let triggers = changed_triggers(provider, base, head).await?;
    if triggers.is_empty() {
        warn!("No triggers changed, nothing to do");
    }

    let results = triggers
        .into_iter()
        .map(|name| {
            let result = validate_trigger(root, &name);
            TriggerReport::from_result(name, result)
        })
        .collect();

    Ok(ValidationReport { number, results })
}

/// Everything the publish flow needs besides the trigger list itself.
pub struct PublishContext<'a> {
    pub triggers_root: &'a Path,
    pub identity: &'a dyn IdentityProvider,
    pub archiver: &'a dyn Archiver,
    pub store: &'a dyn MetadataStore,
}

/// Outcome of a successful publish run.
#[derive(Debug)]
pub struct PublishReport {
    pub published: Vec<String>,
    pub contributors: usize,
}

/// Publishes metadata for the triggers changed between `base` and `head`.
///
/// Per trigger, concurrently: read config and README, fingerprint the file
/// tree, archive and fingerprint the archive, and resolve contributors
/// (checksums and contributor resolution are independent and run joined).
/// Records for triggers that succeed are persisted even when a sibling
/// fails; any per-trigger failure still fails the run as a whole.
pub async fn publish_metadata<C>(
    change: &C,
    ctx: &PublishContext<'_>,
    base: Option<&str>,
    head: Option<&str>,
) -> Result<PublishReport, PipelineError>
where
    C: ChangeProvider + ?Sized,
{
    let triggers = changed_triggers(change, base, head).await?;
    info!(count = triggers.len(), "Starting metadata publish run");

    let contributor_set = ContributorSet::new();

    let pipelines = triggers.iter().map(|name| {
        let contributor_set = &contributor_set;
        async move {
            match publish_one(name, ctx).await {
                Ok((record, contributors)) => {
                    contributor_set.add_all(&contributors);
                    Ok(record)
                }
                Err(reason) => {
                    error!(trigger = %name, %reason, "Trigger pipeline failed");
                    Err((name.clone(), reason))
                }
            }
        }
    });

    let outcomes = join_all(pipelines).await;
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(failure) => failures.push(failure),
        }
    }

    let contributors = contributor_set.into_contributors();
    persist_run(ctx.store, &records, &contributors)
        .await
        .map_err(PipelineError::Store)?;

    if !failures.is_empty() {
        return Err(PipelineError::Triggers(failures));
    }

    Ok(PublishReport {
        published: records.into_iter().map(|r| r.id).collect(),
        contributors: contributors.len(),
    })
}

/// One trigger's publish pipeline. Errors are stringified here so the caller
/// can isolate them per trigger without threading every error type through.
async fn publish_one(
    name: &str,
    ctx: &PublishContext<'_>,
) -> Result<(MetadataRecord, Vec<crate::contributors::Contributor>), String> {
    let dir = ctx.triggers_root.join(name);

    let config = read_config(&dir).map_err(|e| format!("config: {e}"))?;
    let readme = std::fs::read_to_string(dir.join("README.md"))
        .map_err(|e| format!("README.md: {e}"))?;

    let fingerprints = async {
        let files = trigger_file_checksums(&dir).map_err(|e| format!("checksums: {e}"))?;
        let archive_path: PathBuf = ctx
            .archiver
            .archive(name)
            .await
            .map_err(|e| format!("archive: {e}"))?;
        let archive = archive_checksum(&archive_path)
            .map_err(|e| format!("archive checksum: {e}"))?;
        Ok::<_, String>((files, archive))
    };
    let contributors = async {
        resolve_contributors(ctx.identity, name)
            .await
            .map_err(|e| e.to_string())
    };

    let (fingerprints, contributors) = join(fingerprints, contributors).await;
    let (files, archive) = fingerprints?;
    let contributors = contributors?;

    let record = assemble(name, &config, readme, files, archive, &contributors);
    info!(
        trigger = name,
        files = record.files.len(),
        contributors = contributors.len(),
        "Assembled metadata record"
    );
    Ok((record, contributors))
}

fn read_config(dir: &Path) -> Result<TriggerConfig, Box<dyn std::error::Error + Send + Sync>> {
    let contents = std::fs::read_to_string(dir.join("config.json"))?;
    let config = serde_json::from_str(&contents)?;
    Ok(config)
}
