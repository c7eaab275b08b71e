//! Packaged widget template and its process-wide cache

use std::sync::OnceLock;

use anyhow::{bail, Result};
use tracing::{debug, error};

/// Logical URI of the timer template inside the package
pub const TEMPLATE_URI: &str = "ms-appx:///Templates/MiniTimerWidgetTemplate.json";

/// Resources shipped with the crate, addressed by logical URI
const PACKAGE_FILES: &[(&str, &str)] = &[(
    TEMPLATE_URI,
    include_str!("../../templates/MiniTimerWidgetTemplate.json"),
)];

static WIDGET_TEMPLATE: OnceLock<String> = OnceLock::new();

/// Read a packaged resource by its logical URI
pub fn read_package_file(uri: &str) -> Result<String> {
    match PACKAGE_FILES.iter().find(|(known, _)| *known == uri) {
        Some((_, contents)) => Ok((*contents).to_string()),
        None => bail!("no packaged resource at {}", uri),
    }
}

/// Timer template, loaded on first use and cached for the process lifetime.
///
/// A failed load is not cached, so the next call tries again.
pub fn widget_template() -> &'static str {
    if let Some(template) = WIDGET_TEMPLATE.get() {
        return template;
    }

    match read_package_file(TEMPLATE_URI) {
        Ok(template) => {
            debug!("Loaded widget template from {}", TEMPLATE_URI);
            WIDGET_TEMPLATE.get_or_init(|| template)
        }
        Err(e) => {
            error!("Failed to load widget template: {:#}", e);
            ""
        }
    }
}
