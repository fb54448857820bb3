//! `devkit init`: interactive creation of `.dev-env.yml`

use crate::cli::prompt::Prompter;
use crate::config::validation::validate_config;
use crate::config::{
    CONFIG_FILE_NAME, Database, DatabaseType, Dependency, DependencyType, DevEnvConfig,
    DockerConfig, HealthCheck, Migration, Seed, Service, SnapshotConfig,
};
use crate::system::System;
use crate::utils::fs::write_text_file;
use anyhow::{Context as _, Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    /// An existing config was kept
    Skipped,
}

/// Name suggested by the wizard: `package.json` name, else the directory name
#[must_use]
pub fn default_project_name(system: &dyn System, root: &Path) -> String {
    let dir_name = || {
        root.file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("my-project")
            .to_owned()
    };

    let package_name = system
        .read_to_string(&root.join("package.json"))
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|pkg| pkg.get("name")?.as_str().map(|name| name.trim().to_owned()))
        .filter(|name| !name.is_empty());

    package_name.unwrap_or_else(dir_name)
}

/// Ask the user for a config and write it to `<root>/.dev-env.yml`
///
/// # Errors
///
/// Fails outside an interactive terminal, when a prompt fails, or when the
/// file cannot be written.
pub fn run_init(system: &dyn System, root: &Path, prompter: &dyn Prompter) -> Result<InitOutcome> {
    if !system.is_interactive() {
        bail!(
            "Not in an interactive terminal. Run `devkit init` in a terminal to create a config file."
        );
    }

    let config_path = root.join(CONFIG_FILE_NAME);
    if system.exists(&config_path)
        && !prompter.confirm(
            &format!("File {CONFIG_FILE_NAME} already exists. Overwrite?"),
            false,
        )?
    {
        info!("Skipped. Existing {CONFIG_FILE_NAME} was not changed.");
        return Ok(InitOutcome::Skipped);
    }

    let config = build_config_interactively(prompter, &default_project_name(system, root))?;
    let config = validate_config(&config)?;
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;

    write_text_file(system, &config_path, &yaml)?;
    info!("Created {}", config_path.display());
    Ok(InitOutcome::Created(config_path))
}

/// Run the question sequence and assemble a config
///
/// # Errors
///
/// Returns any prompt failure, including user cancellation.
pub fn build_config_interactively(
    prompter: &dyn Prompter,
    default_name: &str,
) -> Result<DevEnvConfig> {
    let name = prompter.input("Config name", Some(default_name))?;
    let name = if name.trim().is_empty() {
        default_name.to_owned()
    } else {
        name
    };
    let version = prompter.input("Version (optional)", Some("1.0.0"))?;

    let mut config = DevEnvConfig::named(name);
    config.version = non_empty(version);
    config.dependencies = prompt_dependencies(prompter)?;
    config.databases = prompt_databases(prompter)?;
    config.services = prompt_services(prompter)?;

    if prompter.confirm("Add environment variables?", true)? {
        config.env = suggested_env(&config.databases);
    }

    config.docker = DockerConfig {
        enabled: prompter.confirm("Enable Docker Compose generation?", true)?,
        ..DockerConfig::default()
    };
    config.snapshot = SnapshotConfig {
        exclude_paths: ["node_modules", ".git", "dist", "build"]
            .map(str::to_owned)
            .to_vec(),
        ..SnapshotConfig::default()
    };
    config.health_checks = prompt_health_checks(prompter, &config.databases)?;

    Ok(config)
}

fn prompt_dependencies(prompter: &dyn Prompter) -> Result<Vec<Dependency>> {
    if !prompter.confirm("Add dependencies?", true)? {
        return Ok(Vec::new());
    }

    let labels = DependencyType::ALL.map(DependencyType::as_str);
    let mut dependencies = Vec::new();

    for index in prompter.multi_select("Choose dependency type(s)", &labels)? {
        let Some(kind) = DependencyType::ALL.get(index).copied() else {
            continue;
        };
        let path = prompter.input(&format!("Path for {kind}"), Some("."))?;
        let command = prompter.input(&format!("Command for {kind}"), kind.default_command())?;

        if command.trim().is_empty() {
            warn!("No command given for {kind}; skipping");
            continue;
        }
        dependencies.push(Dependency {
            kind,
            command,
            path: non_empty(path).unwrap_or_else(|| ".".to_owned()),
        });
    }

    Ok(dependencies)
}

fn prompt_databases(prompter: &dyn Prompter) -> Result<Vec<Database>> {
    let labels = DatabaseType::ALL.map(DatabaseType::as_str);
    let mut databases = Vec::new();

    loop {
        let question = if databases.is_empty() {
            "Add a database?"
        } else {
            "Add another database?"
        };
        if !prompter.confirm(question, false)? {
            break;
        }

        let Some(kind) = DatabaseType::ALL
            .get(prompter.select("Database type", &labels, 0)?)
            .copied()
        else {
            break;
        };

        let mut db = Database::new(kind);
        db.name = non_empty(prompter.input("Service name (optional)", None)?);
        db.version = non_empty(prompter.input("Version (optional)", None)?);
        if let Some(profile) = kind.profile() {
            db.port = Some(prompt_port(prompter, "Port", profile.default_port)?);
        }
        db.host = non_empty(prompter.input("Host", Some("localhost"))?)
            .unwrap_or_else(|| "localhost".to_owned());
        db.user = non_empty(prompter.input("User (use ${DB_USER} for .env)", Some("${DB_USER}"))?);
        db.password = non_empty(
            prompter.input("Password (use ${DB_PASSWORD} for .env)", Some("${DB_PASSWORD}"))?,
        );
        if !matches!(kind, DatabaseType::Redis | DatabaseType::Sqlite) {
            db.database = non_empty(prompter.input("Database name", Some("myapp"))?);
        }

        if prompter.confirm("Add migrations?", false)? {
            db.migrations.push(Migration {
                path: prompter.input("Migrations path", Some("./migrations"))?,
                command: prompter.input("Migrations command", Some("npm run migrate"))?,
            });
        }
        if prompter.confirm("Add seed command?", false)? {
            db.seed = Some(Seed {
                command: prompter.input("Seed command", Some("npm run seed"))?,
            });
        }

        databases.push(db);
    }

    Ok(databases)
}

fn prompt_services(prompter: &dyn Prompter) -> Result<Vec<Service>> {
    let mut services = Vec::new();

    loop {
        let question = if services.is_empty() {
            "Add a service (e.g. RabbitMQ)?"
        } else {
            "Add another service?"
        };
        if !prompter.confirm(question, false)? {
            break;
        }

        let Some(kind) = non_empty(prompter.input("Service type", Some("rabbitmq"))?) else {
            continue;
        };
        let mut service = Service::new(kind);
        service.version = non_empty(prompter.input("Version (optional)", None)?);
        service.port = Some(prompt_port(prompter, "Port", 5672)?);
        let management = prompt_optional_port(prompter, "Management port (0 to skip)", 15672)?;
        service.management_port = management;
        services.push(service);
    }

    Ok(services)
}

fn prompt_health_checks(prompter: &dyn Prompter, databases: &[Database]) -> Result<Vec<HealthCheck>> {
    let eligible: Vec<&Database> = databases
        .iter()
        .filter(|db| db.kind.profile().is_some())
        .collect();
    if eligible.is_empty() || !prompter.confirm("Add health checks for your databases?", true)? {
        return Ok(Vec::new());
    }

    Ok(eligible.into_iter().map(suggested_health_check).collect())
}

fn suggested_health_check(db: &Database) -> HealthCheck {
    let port = db
        .port
        .or_else(|| db.kind.profile().map(|profile| profile.default_port))
        .unwrap_or_default();
    let database = db.database.as_deref().unwrap_or("myapp");
    let name = db.name.clone().unwrap_or_else(|| db.kind.to_string());

    let (connection_string, url) = match db.kind {
        DatabaseType::Redis => (None, Some(format!("redis://{}:{port}", db.host))),
        DatabaseType::Mysql | DatabaseType::Mariadb => (
            Some(format!("mysql://${{DB_USER}}:${{DB_PASSWORD}}@{}:{port}/{database}", db.host)),
            None,
        ),
        other => (
            Some(format!(
                "{other}://${{DB_USER}}:${{DB_PASSWORD}}@{}:{port}/{database}",
                db.host
            )),
            None,
        ),
    };

    HealthCheck {
        name,
        kind: db.kind.to_string(),
        connection_string,
        url,
    }
}

fn suggested_env(databases: &[Database]) -> BTreeMap<String, String> {
    let mut env = BTreeMap::from([("NODE_ENV".to_owned(), "development".to_owned())]);
    if let Some(db) = databases.first()
        && db.kind == DatabaseType::Postgresql
    {
        env.insert(
            "DATABASE_URL".to_owned(),
            format!(
                "postgresql://${{DB_USER}}:${{DB_PASSWORD}}@{}:{}/{}",
                db.host,
                db.port.unwrap_or(5432),
                db.database.as_deref().unwrap_or("myapp")
            ),
        );
    }
    env
}

fn prompt_port(prompter: &dyn Prompter, label: &str, default: u16) -> Result<u16> {
    Ok(prompt_optional_port(prompter, label, default)?.unwrap_or(default))
}

/// `None` for an answer of 0
fn prompt_optional_port(prompter: &dyn Prompter, label: &str, default: u16) -> Result<Option<u16>> {
    let answer = prompter.input(label, Some(&default.to_string()))?;
    match answer.trim().parse::<u16>() {
        Ok(0) => Ok(None),
        Ok(port) => Ok(Some(port)),
        Err(_) => {
            warn!("'{answer}' is not a valid port; using {default}");
            Ok(Some(default))
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
