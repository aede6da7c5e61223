use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One tracked entity from the roster file.
///
/// `ambiguous` marks names that collide with common words; the trends
/// collector appends the configured disambiguation suffix to the query term
/// for those entities (the output stays keyed by `name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub ambiguous: bool,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    entities: Vec<EntityConfig>,
}

/// Load the entity roster from a YAML file.
///
/// Names are trimmed; empty entries are dropped; duplicates (compared
/// case-insensitively) are collapsed to their first occurrence with a
/// warning. The result is sorted by name so every downstream component
/// iterates entities in a stable order.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if the
/// roster is empty after cleaning.
pub fn load_roster(path: &Path) -> Result<Vec<EntityConfig>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RosterIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let roster: RosterFile = serde_yaml::from_str(&content)?;

    let mut seen = HashSet::new();
    let mut entities: Vec<EntityConfig> = Vec::new();
    for mut entity in roster.entities {
        entity.name = entity.name.trim().to_string();
        if entity.name.is_empty() {
            continue;
        }
        if !seen.insert(entity.name.to_lowercase()) {
            tracing::warn!(name = %entity.name, "duplicate roster entry dropped");
            continue;
        }
        entities.push(entity);
    }

    if entities.is_empty() {
        return Err(ConfigError::Validation(
            "roster contains no usable entities".to_string(),
        ));
    }

    entities.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entities)
}
