//! Advisory checks over a validated configuration
//!
//! Nothing in here fails a command; findings are only logged.

use crate::config::DevEnvConfig;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// A single non-blocking finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The config text mentions "password" and uses no `${VAR}` placeholder
    HardcodedSecrets,
    /// A credentialed database lacks a user or a password (`index` is 1-based)
    MissingCredentials { index: usize, database_type: String },
    /// A port was already claimed by an earlier database or service
    PortConflict { port: u16 },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardcodedSecrets => write!(
                f,
                "Passwords detected in configuration file.\n\
                Consider using environment variables (${{VAR_NAME}}) and .env file for secrets."
            ),
            Self::MissingCredentials {
                index,
                database_type,
            } => write!(
                f,
                "Database {index} ({database_type}) is missing user or password.\n\
                Make sure to set these via environment variables or .env file."
            ),
            Self::PortConflict { port } => write!(
                f,
                "Port {port} is used by multiple services. This may cause conflicts."
            ),
        }
    }
}

/// Collect every finding for `config`, in a stable order
#[must_use]
pub fn collect_config_warnings(config: &DevEnvConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    // Any "password" with no `${` anywhere in the document.
    if let Ok(serialized) = serde_json::to_string(config)
        && serialized.contains("password")
        && !serialized.contains("${")
    {
        warnings.push(ConfigWarning::HardcodedSecrets);
    }

    for (index, db) in config.databases.iter().enumerate() {
        let missing = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);
        if db.kind.requires_credentials() && (missing(&db.user) || missing(&db.password)) {
            warnings.push(ConfigWarning::MissingCredentials {
                index: index + 1,
                database_type: db.kind.to_string(),
            });
        }
    }

    let ports = config
        .databases
        .iter()
        .filter_map(|db| db.port)
        .chain(config.services.iter().filter_map(|svc| svc.port));

    let mut seen = HashSet::new();
    for port in ports {
        if !seen.insert(port) {
            warnings.push(ConfigWarning::PortConflict { port });
        }
    }

    warnings
}

/// Log every finding for `config`
pub fn check_config_warnings(config: &DevEnvConfig) {
    for warning in collect_config_warnings(config) {
        warn!("{warning}");
    }
}
