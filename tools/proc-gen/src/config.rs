//! Scatter configuration (`scatter.toml`)
//!
//! ```toml
//! seed = "meadow"
//!
//! [[tables.trees]]
//! generator = "conifer"
//! weight = 65
//!
//! [[tables.trees]]
//! generator = "dead_tree"
//! weight = 25
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use diorama_core::Seed;
use serde::{Deserialize, Serialize};

use crate::registry::{GeneratorRegistry, ScatterError, SpawnTable};

/// Weighted spawn tables plus an optional scene seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Integer or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<SpawnEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub generator: String,
    pub weight: f64,
}

impl SpawnEntry {
    pub fn new(generator: impl Into<String>, weight: f64) -> Self {
        Self {
            generator: generator.into(),
            weight,
        }
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        let table = |entries: &[(&str, f64)]| {
            entries
                .iter()
                .map(|&(generator, weight)| SpawnEntry::new(generator, weight))
                .collect()
        };

        let mut tables = BTreeMap::new();
        tables.insert(
            "trees".to_string(),
            table(&[("tree_stump", 10.0), ("dead_tree", 25.0), ("conifer", 65.0)]),
        );
        tables.insert(
            "ground".to_string(),
            table(&[
                ("stalk_clump", 50.0),
                ("flower_bunch", 25.0),
                ("stick", 20.0),
                ("rock", 5.0),
            ]),
        );
        tables.insert("clouds".to_string(), table(&[("cumulus_cloud", 1.0)]));

        Self { seed: None, tables }
    }
}

impl ScatterConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scatter config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse scatter config")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scatter config")
    }

    pub fn table(&self, name: &str) -> Option<&[SpawnEntry]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Resolve a named table against `registry`
    pub fn spawn_table<'r>(
        &self,
        name: &str,
        registry: &'r GeneratorRegistry,
    ) -> Result<SpawnTable<'r>, ScatterError> {
        let entries = self.table(name).ok_or_else(|| ScatterError::UnknownTable {
            name: name.to_string(),
        })?;
        SpawnTable::new(
            registry,
            entries.iter().map(|entry| (entry.generator.as_str(), entry.weight)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_core::RandomEngine;

    const MEADOW: &str = r#"
seed = "meadow"

[[tables.ground]]
generator = "rock"
weight = 1

[[tables.ground]]
generator = "stick"
weight = 2.5
"#;

    #[test]
    fn test_parse_tables_and_text_seed() {
        let config = ScatterConfig::parse(MEADOW).unwrap();
        assert_eq!(config.seed, Some(Seed::Text("meadow".to_string())));
        assert_eq!(
            config.table("ground").unwrap(),
            [SpawnEntry::new("rock", 1.0), SpawnEntry::new("stick", 2.5)]
        );
        assert!(config.table("trees").is_none());
    }

    #[test]
    fn test_parse_numeric_seed() {
        let config = ScatterConfig::parse("seed = 42\n").unwrap();
        assert_eq!(config.seed, Some(Seed::Number(42)));
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ScatterConfig::parse("[[tables.ground]]\ngenerator = 3\n").is_err());
    }

    #[test]
    fn test_default_weights() {
        let config = ScatterConfig::default();
        let names: Vec<&str> = config.table_names().collect();
        assert_eq!(names, ["clouds", "ground", "trees"]);

        let trees = config.table("trees").unwrap();
        let total: f64 = trees.iter().map(|e| e.weight).sum();
        assert_eq!(total, 100.0);
        assert_eq!(trees.last().unwrap(), &SpawnEntry::new("conifer", 65.0));
    }

    #[test]
    fn test_default_tables_resolve_against_builtin() {
        let registry = GeneratorRegistry::with_builtin();
        let config = ScatterConfig::default();
        for name in config.table_names() {
            let table = config.spawn_table(name, &registry).unwrap();
            assert_eq!(table.entries().count(), config.table(name).unwrap().len());
        }
    }

    #[test]
    fn test_unknown_table() {
        let registry = GeneratorRegistry::with_builtin();
        let err = ScatterConfig::default().spawn_table("sky", &registry).unwrap_err();
        assert!(matches!(err, ScatterError::UnknownTable { name } if name == "sky"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScatterConfig {
            seed: Some(Seed::Number(7)),
            ..ScatterConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ScatterConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.toml");
        std::fs::write(&path, MEADOW).unwrap();

        let config = ScatterConfig::load(&path).unwrap();
        let registry = GeneratorRegistry::with_builtin();
        let table = config.spawn_table("ground", &registry).unwrap();
        let mut rng = RandomEngine::new(config.seed.clone().unwrap());
        assert_eq!(table.spawn(3, &mut rng).len(), 3);

        assert!(ScatterConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
