//! Configuration management module
//!
//! Locates the project root, loads `.env` and `.dev-env.yml`, resolves
//! `${VAR}` placeholders and validates the document into [`DevEnvConfig`].

pub mod environment;
pub mod root;
pub mod schema;
pub mod validation;
pub mod warnings;
pub mod yaml;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// File name of the project configuration, relative to the project root
pub const CONFIG_FILE_NAME: &str = ".dev-env.yml";

/// Validated, defaulted project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevEnvConfig {
    /// Project name used in messages
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(default)]
    pub databases: Vec<Database>,

    #[serde(default)]
    pub services: Vec<Service>,

    /// Extra variables passed to setup commands
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub health_checks: Vec<HealthCheck>,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub docker: DockerConfig,
}

impl DevEnvConfig {
    /// Minimal config with every optional section defaulted
    #[must_use]
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
            databases: Vec::new(),
            services: Vec::new(),
            env: BTreeMap::new(),
            health_checks: Vec::new(),
            snapshot: SnapshotConfig::default(),
            docker: DockerConfig::default(),
        }
    }
}

/// Package manager (or custom tool) used to install a dependency set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Npm,
    Yarn,
    Pnpm,
    Pip,
    Pipenv,
    Poetry,
    Cargo,
    Go,
    Custom,
}

impl DependencyType {
    pub const ALL: [Self; 9] = [
        Self::Npm,
        Self::Yarn,
        Self::Pnpm,
        Self::Pip,
        Self::Pipenv,
        Self::Poetry,
        Self::Cargo,
        Self::Go,
        Self::Custom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Pip => "pip",
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Custom => "custom",
        }
    }

    /// Conventional install command, if the tool has one
    #[must_use]
    pub const fn default_command(self) -> Option<&'static str> {
        match self {
            Self::Npm => Some("npm install"),
            Self::Yarn => Some("yarn install"),
            Self::Pnpm => Some("pnpm install"),
            Self::Pip => Some("pip install -r requirements.txt"),
            Self::Pipenv => Some("pipenv install"),
            Self::Poetry => Some("poetry install"),
            Self::Cargo => Some("cargo build"),
            Self::Go => Some("go mod download"),
            Self::Custom => None,
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub kind: DependencyType,
    pub command: String,
    /// Directory the command runs in, relative to the project root
    #[serde(default = "default_dependency_path")]
    pub path: String,
}

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgresql,
    Mysql,
    Mariadb,
    Mongodb,
    Redis,
    Sqlite,
}

impl DatabaseType {
    pub const ALL: [Self; 6] = [
        Self::Postgresql,
        Self::Mysql,
        Self::Mariadb,
        Self::Mongodb,
        Self::Redis,
        Self::Sqlite,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Mongodb => "mongodb",
            Self::Redis => "redis",
            Self::Sqlite => "sqlite",
        }
    }

    /// Engines that refuse anonymous access out of the box
    #[must_use]
    pub const fn requires_credentials(self) -> bool {
        matches!(self, Self::Postgresql | Self::Mysql | Self::Mariadb)
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(rename = "type")]
    pub kind: DatabaseType,

    /// Compose service name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database (schema) name created on first start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub migrations: Vec<Migration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
}

impl Database {
    #[must_use]
    pub fn new(kind: DatabaseType) -> Self {
        Self {
            kind,
            name: None,
            version: None,
            port: None,
            host: default_host(),
            user: None,
            password: None,
            database: None,
            migrations: Vec::new(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    pub path: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub command: String,
}

/// Non-database container such as a message broker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Image name, also the base of the Compose service name
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_port: Option<u16>,
}

impl Service {
    #[must_use]
    pub fn new<S: Into<String>>(kind: S) -> Self {
        Self {
            kind: kind.into(),
            version: None,
            port: None,
            host: default_host(),
            management_port: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_true")]
    pub include_databases: bool,
    #[serde(default = "default_true")]
    pub include_volumes: bool,
    #[serde(default = "default_exclude_paths")]
    pub exclude_paths: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            include_databases: true,
            include_volumes: true,
            exclude_paths: default_exclude_paths(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_network_name")]
    pub network_name: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_file: default_output_file(),
            network_name: default_network_name(),
        }
    }
}

fn default_dependency_path() -> String {
    ".".to_owned()
}

fn default_host() -> String {
    "localhost".to_owned()
}

const fn default_true() -> bool {
    true
}

fn default_exclude_paths() -> Vec<String> {
    vec!["node_modules".to_owned(), ".git".to_owned()]
}

fn default_output_file() -> String {
    "docker-compose.yml".to_owned()
}

fn default_network_name() -> String {
    "dev-network".to_owned()
}
