//! CLI surface for the triggers directory pipeline.
//!
//! All pipeline logic lives in the library modules; this module is strictly
//! command parsing, collaborator wiring and exit-status policy. A run exits
//! non-zero whenever any trigger fails validation or any pipeline step
//! fails, with diagnostics printed for the submitter.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::archive::ZipArchiver;
use crate::github::GitHubClient;
use crate::pipeline::{publish_metadata, validate_all, validate_changed, PublishContext};

/// CLI for trigger-registry: validate and publish trigger packages.
#[derive(Parser)]
#[clap(
    name = "trigger-registry",
    version,
    about = "Validate trigger packages and publish their registry metadata"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every trigger package under the triggers root
    Validate {
        /// Triggers root directory
        #[clap(long, default_value = "triggers")]
        root: PathBuf,
    },
    /// Validate only the triggers changed between two revisions and write
    /// the pull-request validation report
    ValidatePr {
        /// Base revision of the comparison
        #[clap(long)]
        base: Option<String>,
        /// Head revision of the comparison
        #[clap(long)]
        head: Option<String>,
        /// Pull request number recorded in the report
        #[clap(long)]
        number: u64,
        /// Report output path
        #[clap(long, default_value = "validation-results.json")]
        output: PathBuf,
        #[clap(long, default_value = "triggers")]
        root: PathBuf,
    },
    /// Archive, fingerprint and publish metadata for the triggers changed
    /// between two revisions
    Publish {
        #[clap(long)]
        base: Option<String>,
        #[clap(long)]
        head: Option<String>,
        /// Directory receiving the per-trigger archives
        #[clap(long, default_value = "archives")]
        archive_dir: PathBuf,
        /// Directory receiving the persisted metadata and contributor records
        #[clap(long, default_value = "registry-out")]
        output_dir: PathBuf,
        #[clap(long, default_value = "triggers")]
        root: PathBuf,
    },
}

/// Async CLI entrypoint, extracted for integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate { root } => {
            let results = validate_all(&root)?;
            let mut all_succeeded = true;
            for (trigger, result) in &results {
                match result {
                    crate::validate::ValidationResult::Success { .. } => {
                        tracing::info!(trigger = %trigger, "Trigger passed validation");
                    }
                    crate::validate::ValidationResult::Failure { errors } => {
                        all_succeeded = false;
                        for error in errors {
                            eprintln!("{trigger}: {error}");
                        }
                    }
                }
            }
            if !all_succeeded {
                anyhow::bail!("Some triggers failed validation. Cowardly refusing to proceed.");
            }
            println!("All triggers passed validation");
            Ok(())
        }
        Commands::ValidatePr {
            base,
            head,
            number,
            output,
            root,
        } => {
            let github = GitHubClient::from_env()
                .map_err(|e| anyhow::anyhow!("Failed to construct GitHub client: {e}"))?;
            let report =
                validate_changed(&github, &root, base.as_deref(), head.as_deref(), number).await?;
            std::fs::write(&output, report.to_json()?)?;
            tracing::info!(output = %output.display(), "Wrote validation report");
            if !report.all_succeeded() {
                for result in report.results.iter().filter(|r| !r.success) {
                    for error in result.errors.iter().flatten() {
                        eprintln!("{}: {error}", result.trigger);
                    }
                }
                anyhow::bail!(
                    "Some triggers failed validation. Please see the comment left on your PR for more details."
                );
            }
            Ok(())
        }
        Commands::Publish {
            base,
            head,
            archive_dir,
            output_dir,
            root,
        } => {
            let github = GitHubClient::from_env()
                .map_err(|e| anyhow::anyhow!("Failed to construct GitHub client: {e}"))?;
            let archiver = ZipArchiver::new(root.clone(), archive_dir);
            let store = crate::store::FileStore::new(output_dir);
            let ctx = PublishContext {
                triggers_root: &root,
                identity: &github,
                archiver: &archiver,
                store: &store,
            };
            let report = publish_metadata(&github, &ctx, base.as_deref(), head.as_deref()).await?;
            tracing::info!(
                published = report.published.len(),
                contributors = report.contributors,
                "Publish run complete"
            );
            Ok(())
        }
    }
}
