//! Severity policy for resolution problems, read from `.doclink.toml`.

use std::path::Path;

use crate::diagnostics::Severity;
use crate::error::Error;

/// Name of the config file looked up at a project root.
pub const CONFIG_FILE_NAME: &str = ".doclink.toml";

/// Severity policy for resolution problems, loaded from `.doclink.toml`.
/// Every problem kind defaults to a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Severity for a tutorial curated twice in one chapter.
    pub duplicate_reference: Severity,
    /// Retry failed relative links in inherited docs from the original declaration.
    pub inherited_link_fallback: bool,
    /// Severity for a relative link that only resolved from the original declaration.
    pub inherited_relative_link: Severity,
    /// Severity for a resource that doesn't exist.
    pub missing_resource: Severity,
    /// Severity for a topic reference that didn't resolve.
    pub unresolved_topic: Severity,
}

/// Raw TOML structure for `.doclink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct DoclinkTomlConfig {
    /// See [`ResolutionConfig::duplicate_reference`].
    duplicate_reference: Option<Severity>,
    /// See [`ResolutionConfig::inherited_link_fallback`].
    inherited_link_fallback: Option<bool>,
    /// See [`ResolutionConfig::inherited_relative_link`].
    inherited_relative_link: Option<Severity>,
    /// See [`ResolutionConfig::missing_resource`].
    missing_resource: Option<Severity>,
    /// See [`ResolutionConfig::unresolved_topic`].
    unresolved_topic: Option<Severity>,
}

impl Default for ResolutionConfig {
    /// Warnings everywhere, inherited-link fallback on.
    fn default() -> Self {
        return Self {
            duplicate_reference: Severity::Warning,
            inherited_link_fallback: true,
            inherited_relative_link: Severity::Warning,
            missing_resource: Severity::Warning,
            unresolved_topic: Severity::Warning,
        };
    }
}

impl ResolutionConfig {
    /// Load config from a specific file that must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file is missing, `Error::Io` for
    /// other read failures, or `Error::TomlDe` if the TOML is malformed or
    /// names an unknown key or severity.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Load config from `.doclink.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist; a file that exists but
    /// is malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        return match Self::from_file(&root.join(CONFIG_FILE_NAME)) {
            Err(Error::ConfigNotFound { .. }) => Ok(Self::default()),
            other => other,
        };
    }

    /// Parse config from TOML content, filling unset keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid config TOML.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinkTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        return Ok(Self {
            duplicate_reference: raw.duplicate_reference.unwrap_or(defaults.duplicate_reference),
            inherited_link_fallback: raw.inherited_link_fallback.unwrap_or(defaults.inherited_link_fallback),
            inherited_relative_link: raw.inherited_relative_link.unwrap_or(defaults.inherited_relative_link),
            missing_resource: raw.missing_resource.unwrap_or(defaults.missing_resource),
            unresolved_topic: raw.unresolved_topic.unwrap_or(defaults.unresolved_topic),
        });
    }
}
