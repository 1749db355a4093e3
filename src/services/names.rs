//! Display name resolution for application identifiers

use crate::types::{Result, UsageTallyError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Maps an application id to a human-readable label
pub trait DisplayNameResolver: Send + Sync {
    /// `None` when the application is unknown or uninstalled
    fn resolve(&self, application_id: &str) -> Option<String>;
}

/// Resolve a display name, falling back to the raw identifier.
///
/// A failed lookup never drops the application from a result.
pub fn display_name_or_id(resolver: &dyn DisplayNameResolver, application_id: &str) -> String {
    match resolver.resolve(application_id) {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            tracing::debug!(application_id, "no display name, using identifier");
            application_id.to_string()
        }
    }
}

/// Label catalog loaded from a `names.json` object of `{ "id": "Label" }`
#[derive(Debug, Default)]
pub struct NameCatalog {
    names: HashMap<String, String>,
}

impl NameCatalog {
    /// Load the catalog; a missing file yields an empty catalog
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let names: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| UsageTallyError::Parse(format!("{}: {}", path.display(), e)))?;
        Ok(Self { names })
    }

    pub fn from_map(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl DisplayNameResolver for NameCatalog {
    fn resolve(&self, application_id: &str) -> Option<String> {
        self.names.get(application_id).cloned()
    }
}
