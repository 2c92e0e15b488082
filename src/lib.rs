#![doc = "trigger-registry: validation and fingerprinting pipeline for the triggers directory."]

//! This crate catalogs third-party trigger packages submitted to the shared
//! directory: it validates each package's structure and declared
//! configuration, computes content fingerprints for integrity and change
//! detection, and assembles registry-ready metadata records attributing
//! provenance to contributors.
//!
//! External collaborators (revision diffing, identity lookup, archive
//! creation, record persistence) sit behind traits in [`listing`],
//! [`contributors`], [`archive`] and [`store`]; the GitHub-backed
//! implementations live in [`github`].

pub mod archive;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod contributors;
pub mod github;
pub mod listing;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod validate;
