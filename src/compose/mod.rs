//! Docker Compose generation
//!
//! The generator is a pure transformation: a validated [`DevEnvConfig`] becomes
//! an ordered list of [`ComposeService`] descriptors (databases first, then
//! services, each in config order), which is rendered through a template.

pub mod database;
pub mod template;

use crate::config::{Database, DevEnvConfig, HealthCheck, Service};
use crate::error::DevkitError;
use crate::system::System;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use template::{TemplateSource, render_compose};

/// One entry of the generated `services:` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeService {
    /// Unique within one generated document
    pub name: String,
    pub image: String,
    pub version: Option<String>,
    /// `host:container` mappings
    pub ports: Vec<String>,
    pub env: BTreeMap<String, String>,
    /// Pre-rendered `healthcheck:` body (four lines, unindented)
    pub healthcheck: Option<String>,
}

/// Build the ordered, deduplicated service list for `config`
#[must_use]
pub fn build_services(config: &DevEnvConfig) -> Vec<ComposeService> {
    let mut services: Vec<ComposeService> = config
        .databases
        .iter()
        .enumerate()
        .filter_map(|(index, db)| database_service(db, index, &config.health_checks))
        .chain(
            config
                .services
                .iter()
                .enumerate()
                .map(|(index, svc)| custom_service(svc, index)),
        )
        .collect();

    let mut taken = HashSet::new();
    for service in &mut services {
        service.name = unique_name(&service.name, &mut taken);
    }

    services
}

/// Render the Compose document for `config`
///
/// Output is byte-identical for identical inputs.
///
/// # Errors
///
/// - [`DevkitError::TemplateNotFound`] if the template cannot be loaded
/// - [`DevkitError::Template`] if it fails to render
pub fn generate_compose_content(
    system: &dyn System,
    config: &DevEnvConfig,
    source: &TemplateSource,
) -> Result<String, DevkitError> {
    let template = source.load(system)?;
    let services = build_services(config);
    render_compose(&template, &services, &config.docker.network_name)
}

fn default_service_name(kind: &str, index: usize) -> String {
    format!("{kind}_{}", index + 1).replace('-', "_")
}

fn database_service(
    db: &Database,
    index: usize,
    health_checks: &[HealthCheck],
) -> Option<ComposeService> {
    let profile = db.kind.profile()?;

    let name = db
        .name
        .clone()
        .unwrap_or_else(|| default_service_name(db.kind.as_str(), index));
    let port = db.port.unwrap_or(profile.default_port);

    let probe = find_health_check(health_checks, &name, db.kind.as_str())
        .and_then(|check| profile.custom_probe(check))
        .unwrap_or_else(|| profile.default_probe(db));

    Some(ComposeService {
        env: profile.environment(db),
        image: profile.image.to_owned(),
        version: db.version.clone(),
        ports: vec![port_mapping(port)],
        healthcheck: Some(render_healthcheck(&probe)),
        name,
    })
}

fn custom_service(svc: &Service, index: usize) -> ComposeService {
    let ports = svc
        .port
        .into_iter()
        .chain(svc.management_port)
        .map(port_mapping)
        .collect();

    ComposeService {
        name: default_service_name(&svc.kind, index),
        image: svc.kind.clone(),
        version: svc.version.clone(),
        ports,
        env: BTreeMap::new(),
        healthcheck: None,
    }
}

/// Explicit health check for a service: a name match beats a type match
fn find_health_check<'a>(
    checks: &'a [HealthCheck],
    service_name: &str,
    db_type: &str,
) -> Option<&'a HealthCheck> {
    checks
        .iter()
        .find(|check| check.name == service_name)
        .or_else(|| checks.iter().find(|check| check.kind == db_type))
}

fn port_mapping(port: u16) -> String {
    format!("{port}:{port}")
}

/// Format a probe as the four-line body of a `healthcheck:` block
#[must_use]
pub fn render_healthcheck(test: &[String]) -> String {
    let test = test
        .iter()
        .map(|part| serde_json::Value::String(part.clone()).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("test: [{test}]\ninterval: 10s\ntimeout: 5s\nretries: 5")
}

/// First of `base`, `base_2`, `base_3`, ... not yet in `taken`; records the result
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.to_owned();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
