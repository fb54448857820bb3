//! Per-engine container conventions
//!
//! Everything the Compose generator needs to know about a database engine
//! (image, default port, environment variables, readiness probe) lives in
//! one [`DatabaseProfile`] so the pieces cannot drift apart.

use crate::config::{Database, DatabaseType, HealthCheck};
use std::collections::BTreeMap;

/// How an image expects its initial credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnvConvention {
    Postgres,
    MySql,
    Mongo,
    /// The image takes no credential variables
    None,
}

/// Readiness probe family of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    PgIsReady,
    MysqlAdmin,
    Mongosh,
    RedisCli,
}

/// Container conventions for one database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseProfile {
    pub image: &'static str,
    pub default_port: u16,
    env: EnvConvention,
    probe: Probe,
}

impl DatabaseType {
    /// Container profile, or `None` for engines that run without a container
    #[must_use]
    pub const fn profile(self) -> Option<DatabaseProfile> {
        let (image, default_port, env, probe) = match self {
            Self::Postgresql => ("postgres", 5432, EnvConvention::Postgres, Probe::PgIsReady),
            Self::Mysql => ("mysql", 3306, EnvConvention::MySql, Probe::MysqlAdmin),
            Self::Mariadb => ("mariadb", 3306, EnvConvention::MySql, Probe::MysqlAdmin),
            Self::Mongodb => ("mongo", 27017, EnvConvention::Mongo, Probe::Mongosh),
            Self::Redis => ("redis", 6379, EnvConvention::None, Probe::RedisCli),
            Self::Sqlite => return None,
        };
        Some(DatabaseProfile {
            image,
            default_port,
            env,
            probe,
        })
    }
}

impl DatabaseProfile {
    /// Initialization variables for `db`; absent and empty values are left out
    #[must_use]
    pub fn environment(&self, db: &Database) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        let user = non_empty(db.user.as_deref());
        let password = non_empty(db.password.as_deref());
        let database = non_empty(db.database.as_deref());

        let mut set = |key: &str, value: Option<&str>| {
            if let Some(value) = value {
                env.insert(key.to_owned(), value.to_owned());
            }
        };

        match self.env {
            EnvConvention::Postgres => {
                set("POSTGRES_USER", user);
                set("POSTGRES_PASSWORD", password);
                set("POSTGRES_DB", database);
            }
            EnvConvention::MySql => {
                set("MYSQL_ROOT_PASSWORD", password);
                set("MYSQL_DATABASE", database);
                set("MYSQL_USER", user);
                set("MYSQL_PASSWORD", user.and(password));
            }
            EnvConvention::Mongo => {
                set("MONGO_INITDB_ROOT_USERNAME", user);
                set("MONGO_INITDB_ROOT_PASSWORD", password);
                set("MONGO_INITDB_DATABASE", database);
            }
            EnvConvention::None => {}
        }

        env
    }

    /// Probe built from an explicit `health_checks` entry, when the entry carries
    /// something this engine's probe tool can use
    #[must_use]
    pub fn custom_probe(&self, check: &HealthCheck) -> Option<Vec<String>> {
        let probe: Vec<&str> = match (self.probe, check.connection_string.as_deref(), check.url.as_deref()) {
            (Probe::PgIsReady, Some(cs), _) => vec!["CMD", "pg_isready", "-d", cs],
            (Probe::Mongosh, Some(cs), _) => {
                vec!["CMD", "mongosh", cs, "--quiet", "--eval", "db.adminCommand('ping')"]
            }
            (Probe::RedisCli, _, Some(url)) | (Probe::RedisCli, Some(url), None) => {
                vec!["CMD", "redis-cli", "-u", url, "ping"]
            }
            (_, _, Some(url)) if is_http_url(url) => vec!["CMD", "curl", "-f", url],
            _ => return None,
        };
        Some(probe.into_iter().map(str::to_owned).collect())
    }

    /// Readiness probe used when no `health_checks` entry applies
    #[must_use]
    pub fn default_probe(&self, db: &Database) -> Vec<String> {
        let probe: Vec<&str> = match self.probe {
            Probe::PgIsReady => {
                let user = non_empty(db.user.as_deref()).unwrap_or("postgres");
                vec!["CMD", "pg_isready", "-U", user]
            }
            Probe::MysqlAdmin => vec!["CMD", "mysqladmin", "ping", "-h", "localhost"],
            Probe::Mongosh => {
                vec!["CMD", "mongosh", "--quiet", "--eval", "db.adminCommand('ping')"]
            }
            Probe::RedisCli => vec!["CMD", "redis-cli", "ping"],
        };
        probe.into_iter().map(str::to_owned).collect()
    }
}

/// `None` for an absent or empty value
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Whether `value` is an `http://` or `https://` URL
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
