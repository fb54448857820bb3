//! Custom error types with exit codes

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single schema or semantic violation, addressed by its dotted field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path such as `databases.0.type`; empty for the document root
    pub path: String,
    pub reason: String,
}

impl FieldIssue {
    #[inline]
    pub fn new<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Main error type for devkit operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DevkitError {
    /// The `.dev-env.yml` file (or another requested input file) does not exist
    #[error("Configuration file not found: {}\n{hint}", .path.display())]
    ConfigNotFound { path: PathBuf, hint: String },

    /// The file exists but is not well-formed YAML
    #[error(
        "Failed to parse YAML configuration in {}: {message}\nPlease check the syntax of your .dev-env.yml file.",
        .path.display()
    )]
    ConfigParse { path: PathBuf, message: String },

    /// The document violates the schema; every violation is listed
    #[error(
        "Invalid configuration file:\n{}\nPlease check your .dev-env.yml file.",
        format_issues(.issues)
    )]
    ConfigInvalid { issues: Vec<FieldIssue> },

    /// The Compose template is missing from the installation
    #[error(
        "Compose template not found: {}\nThe devkit installation appears to be incomplete.",
        .path.display()
    )]
    TemplateNotFound { path: PathBuf },

    /// The Compose template could not be compiled or rendered
    #[error("Template error: {message}")]
    Template { message: String },

    /// A relative output path resolves outside the project root
    #[error(
        "Output path '{path}' escapes the project directory.\nUse an absolute path if you really want to write outside of it."
    )]
    PathEscape { path: String },

    /// Command Error - a setup command failed
    #[error("Command error: {message}")]
    Command { message: String },

    /// Snapshot Error - snapshot missing or unusable
    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    /// Filesystem Error - file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },

    /// Internal Error - an embedded resource is unusable
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DevkitError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::PathEscape { .. }
            | Self::Internal { .. } => 1,
            Self::TemplateNotFound { .. } | Self::Template { .. } => 2,
            Self::Command { .. } => 3,
            Self::Snapshot { .. } => 4,
            Self::Filesystem { .. } => 5,
        }
    }

    /// Create a validation error holding a single issue
    #[inline]
    pub fn invalid<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::ConfigInvalid {
            issues: vec![FieldIssue::new(path, reason)],
        }
    }

    /// Create a template error
    #[inline]
    pub fn template<S: Into<String>>(message: S) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a command error
    #[inline]
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Create a snapshot error
    #[inline]
    pub fn snapshot<S: Into<String>>(message: S) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }

    /// Create an internal error
    #[inline]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Issues carried by a validation error, empty for every other class
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            Self::ConfigInvalid { issues } => issues,
            _ => &[],
        }
    }
}
