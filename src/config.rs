//! Fixed enumerations for the triggers directory contract, plus the typed
//! `config.json` model.
//!
//! A trigger package declares which lifecycle events it handles by shipping
//! executable files named after entries in [`EVENT_NAMES`], and declares its
//! directory-listing metadata in a `config.json` conforming to
//! [`TriggerConfig`]. The enumerations here are the single source of truth for
//! both the validator's diagnostics and the metadata records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event file names a trigger may ship. A package must contain at least one
/// file with one of these names directly under its directory.
pub const EVENT_NAMES: [&str; 14] = [
    "call-initiated",
    "call-incoming",
    "call-rejected",
    "call-timed-out",
    "call-connected",
    "call-ended",
    "room-joined",
    "room-left",
    "screen-share-started",
    "screen-share-ended",
    "webcam-share-started",
    "webcam-share-ended",
    "participant-joined",
    "participant-left",
];

/// Platforms a trigger may declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Macos,
    Linux,
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Macos, Platform::Linux, Platform::Windows];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }

    pub fn parse(s: &str) -> Option<Platform> {
        Platform::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implementation languages a trigger may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Bash,
    Python,
    Nodejs,
    Ruby,
    Applescript,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Bash,
        Language::Python,
        Language::Nodejs,
        Language::Ruby,
        Language::Applescript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Bash => "bash",
            Language::Python => "python",
            Language::Nodejs => "nodejs",
            Language::Ruby => "ruby",
            Language::Applescript => "applescript",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a slice of displayable items as a backticked, comma-separated list
/// for user-facing diagnostics, e.g. `` `macos`, `linux`, `windows` ``.
pub fn backtick_list<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The parsed, schema-conforming contents of a trigger's `config.json`.
/// Immutable once produced by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub name: String,
    pub description: String,
    pub platforms: Vec<Platform>,
    pub language: Language,
}
