//! Packaging collaborator: builds the distributable zip for a trigger so its
//! archive bytes can be fingerprinted.
//!
//! The pipeline only consumes the archive path; zip mechanics stay behind
//! the [`Archiver`] trait. The default implementation shells out to `zip -r`
//! from inside the trigger directory, producing the same archive layout the
//! directory has always shipped.

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::{error, info};

pub type ArchiveError = Box<dyn std::error::Error + Send + Sync>;

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Archiver: Send + Sync {
    /// Archives the named trigger's full file tree and returns the archive
    /// path.
    async fn archive(&self, trigger: &str) -> Result<PathBuf, ArchiveError>;
}

/// Archiver invoking the system `zip` binary, one archive per trigger under
/// a shared output directory.
pub struct ZipArchiver {
    triggers_root: PathBuf,
    output_dir: PathBuf,
}

impl ZipArchiver {
    pub fn new(triggers_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            triggers_root: triggers_root.into(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Archiver for ZipArchiver {
    async fn archive(&self, trigger: &str) -> Result<PathBuf, ArchiveError> {
        std::fs::create_dir_all(&self.output_dir)?;
        // zip runs with the trigger dir as cwd, so the output path must be
        // absolute.
        let output_dir = std::fs::canonicalize(&self.output_dir)?;
        let output_path = output_dir.join(format!("{trigger}.zip"));
        let input_dir = self.triggers_root.join(trigger);

        info!(
            input = %input_dir.display(),
            output = %output_path.display(),
            "Archiving trigger"
        );

        if output_path.exists() {
            std::fs::remove_file(&output_path)?;
        }

        let status = tokio::process::Command::new("zip")
            .arg("-r")
            .arg(&output_path)
            .arg(".")
            .current_dir(&input_dir)
            .status()
            .await?;

        if !status.success() {
            error!(trigger, ?status, "zip exited with failure status");
            return Err(format!("zip failed for trigger `{trigger}`: {status}").into());
        }

        Ok(output_path)
    }
}
