//! Compose template loading and rendering

use crate::compose::ComposeService;
use crate::error::DevkitError;
use crate::system::System;
use minijinja::{AutoEscape, Environment, context};
use std::borrow::Cow;
use std::path::PathBuf;

/// File name of the Compose template inside a templates directory
pub const COMPOSE_TEMPLATE_NAME: &str = "docker-compose.yml.j2";

const EMBEDDED_TEMPLATE: &str = include_str!("../../templates/docker-compose.yml.j2");

/// Where the Compose template comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// Template compiled into the binary
    #[default]
    Embedded,
    /// `docker-compose.yml.j2` inside the given directory
    Directory(PathBuf),
    /// Template text supplied directly
    Inline(String),
}

impl TemplateSource {
    /// Read the template text
    ///
    /// # Errors
    ///
    /// Returns [`DevkitError::TemplateNotFound`] if a directory source lacks the
    /// template file.
    pub fn load(&self, system: &dyn System) -> Result<Cow<'_, str>, DevkitError> {
        match self {
            Self::Embedded => Ok(Cow::Borrowed(EMBEDDED_TEMPLATE)),
            Self::Inline(text) => Ok(Cow::Borrowed(text)),
            Self::Directory(dir) => {
                let path = dir.join(COMPOSE_TEMPLATE_NAME);
                if !system.is_file(&path) {
                    return Err(DevkitError::TemplateNotFound { path });
                }
                system
                    .read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|_| DevkitError::TemplateNotFound { path })
            }
        }
    }
}

/// Quote a scalar as a YAML double-quoted string
fn yaml_quote(value: String) -> String {
    serde_json::Value::String(value).to_string()
}

/// Render the Compose document from prepared service descriptors
///
/// # Errors
///
/// Returns [`DevkitError::Template`] if the template does not compile or render.
pub fn render_compose(
    template: &str,
    services: &[ComposeService],
    network_name: &str,
) -> Result<String, DevkitError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("yaml_quote", yaml_quote);

    env.add_template(COMPOSE_TEMPLATE_NAME, template)
        .map_err(|e| DevkitError::template(format!("Invalid Compose template: {e}")))?;

    let compiled = env
        .get_template(COMPOSE_TEMPLATE_NAME)
        .map_err(|e| DevkitError::template(e.to_string()))?;

    compiled
        .render(context! {
            services => services,
            network_name => network_name,
        })
        .map_err(|e| DevkitError::template(format!("Failed to render Compose template: {e}")))
}
