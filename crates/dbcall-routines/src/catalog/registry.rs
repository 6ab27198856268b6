//! Routine catalogs

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{CallError, Result, RoutineDescriptor};

/// Maps call identifiers to routine descriptors
pub trait RoutineCatalog: Send + Sync {
    /// Look up the descriptor for a call identifier
    fn resolve(&self, call_id: &str) -> Option<Arc<RoutineDescriptor>>;
}

/// In-memory catalog, usually loaded once from a TOML document
///
/// ```toml
/// [routines.getBalance]
/// mapped_name = "GETBAL"
/// composable = true
///
/// [[routines.getBalance.parameters]]
/// name = "acct"
/// declared_type = "Int32"
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    routines: HashMap<String, Arc<RoutineDescriptor>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    routines: HashMap<String, RoutineDescriptor>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a routine, replacing any previous one with the same identifier
    pub fn insert(&mut self, call_id: impl Into<String>, routine: RoutineDescriptor) {
        self.routines.insert(call_id.into(), Arc::new(routine));
    }

    /// Builder form of `insert`
    pub fn with_routine(mut self, call_id: impl Into<String>, routine: RoutineDescriptor) -> Self {
        self.insert(call_id, routine);
        self
    }

    /// Parse a TOML catalog, validating every descriptor
    ///
    /// Parameters without a `bind_name` are bound under their declared name.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)
            .map_err(|e| CallError::Configuration(format!("invalid routine catalog: {}", e)))?;

        let mut catalog = Self::new();
        for (call_id, mut routine) in file.routines {
            for parameter in &mut routine.parameters {
                if parameter.bind_name.is_none() {
                    parameter.bind_name = Some(parameter.name.clone());
                }
            }
            validate_routine(&call_id, &routine)?;
            catalog.insert(call_id, routine);
        }
        tracing::debug!(routines = catalog.len(), "routine catalog loaded");
        Ok(catalog)
    }

    /// Call identifiers in sorted order
    pub fn call_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.routines.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of routines
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Check if the catalog has no routines
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

impl RoutineCatalog for StaticCatalog {
    fn resolve(&self, call_id: &str) -> Option<Arc<RoutineDescriptor>> {
        self.routines.get(call_id).cloned()
    }
}

fn validate_routine(call_id: &str, routine: &RoutineDescriptor) -> Result<()> {
    if routine.mapped_name.trim().is_empty() {
        return Err(CallError::Configuration(format!(
            "routine `{}` has an empty mapped_name",
            call_id
        )));
    }
    for parameter in &routine.parameters {
        match parameter.bind_name.as_deref() {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                return Err(CallError::Configuration(format!(
                    "parameter `{}` of routine `{}` has an empty bind_name",
                    parameter.name, call_id
                )));
            }
        }
    }
    Ok(())
}
