//! Named generator lookup and weighted spawn tables

use std::collections::BTreeMap;

use diorama_core::{ConfigError, GeneratedArtifact, RandomEngine, WeightedChoice, WeightedPicker};
use thiserror::Error;
use tracing::{debug, warn};

use crate::generators::{PropGenerator, catalogue};
use crate::mesh::UnpackedMesh;

#[derive(Debug, Error)]
pub enum ScatterError {
    #[error("no generator named `{name}`")]
    UnknownGenerator { name: String },

    #[error("no spawn table named `{name}`")]
    UnknownTable { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Generators by name
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, PropGenerator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the whole built-in catalogue
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for generator in catalogue() {
            registry.register(generator);
        }
        registry
    }

    /// Add a generator, returning any previous one with the same name
    pub fn register(&mut self, generator: PropGenerator) -> Option<PropGenerator> {
        let previous = self.generators.insert(generator.name().to_string(), generator);
        if let Some(old) = &previous {
            debug!("replaced generator `{}`", old.name());
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&PropGenerator> {
        self.generators.get(name)
    }

    /// Like [`get`](Self::get), but unknown names are an error
    pub fn require(&self, name: &str) -> Result<&PropGenerator, ScatterError> {
        self.get(name).ok_or_else(|| ScatterError::UnknownGenerator {
            name: name.to_string(),
        })
    }

    /// Sorted generator names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropGenerator> {
        self.generators.values()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

/// Weighted choice between registered generators
#[derive(Debug, Clone)]
pub struct SpawnTable<'r> {
    picker: WeightedPicker<&'r PropGenerator>,
}

impl<'r> SpawnTable<'r> {
    /// Build from `(generator name, weight)` entries
    pub fn new<'n>(
        registry: &'r GeneratorRegistry,
        entries: impl IntoIterator<Item = (&'n str, f64)>,
    ) -> Result<Self, ScatterError> {
        let choices = entries
            .into_iter()
            .map(|(name, weight)| Ok(WeightedChoice::new(registry.require(name)?, weight)))
            .collect::<Result<Vec<_>, ScatterError>>()?;

        Ok(Self {
            picker: WeightedPicker::new(choices)?,
        })
    }

    pub fn pick(&self, rng: &mut RandomEngine) -> &'r PropGenerator {
        *self.picker.pick_one(rng)
    }

    /// Entries with their weights
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.picker.choices().map(|(generator, weight)| (generator.name(), weight))
    }

    /// Pick and build `count` random props
    ///
    /// Failed builds are logged and skipped, so fewer than `count` artifacts
    /// may come back. Every build reseeds `rng` from its own params seed.
    pub fn spawn(&self, count: usize, rng: &mut RandomEngine) -> Vec<GeneratedArtifact<UnpackedMesh>> {
        let mut artifacts = Vec::with_capacity(count);
        for i in 0..count {
            let generator = self.pick(rng);
            match generator.make_random_mesh(rng) {
                Ok(artifact) => artifacts.push(artifact),
                Err(err) => warn!("skipping spawn {i} (`{}`): {err}", generator.name()),
            }
        }
        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_core::{GenerationError, MeshGenerator, ParamSpec, ResolvedParams, Schema};

    fn broken() -> PropGenerator {
        fn build(_: &ResolvedParams, _: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
            Err(GenerationError::Degenerate {
                reason: "always".to_string(),
            })
        }
        MeshGenerator::new("broken", Schema::new().with("seed", ParamSpec::seed()), build)
    }

    #[test]
    fn test_builtin_registry() {
        let registry = GeneratorRegistry::with_builtin();
        assert_eq!(registry.len(), catalogue().len());
        assert!(registry.get("conifer").is_some());
        assert!(registry.get("oak").is_none());

        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = GeneratorRegistry::new();
        assert!(registry.register(broken()).is_none());
        assert!(registry.register(broken()).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_spawn_table_rejects_unknown_generator() {
        let registry = GeneratorRegistry::with_builtin();
        let err = SpawnTable::new(&registry, [("conifer", 1.0), ("oak", 2.0)]).unwrap_err();
        assert!(matches!(err, ScatterError::UnknownGenerator { name } if name == "oak"));
    }

    #[test]
    fn test_spawn_table_rejects_bad_weights() {
        let registry = GeneratorRegistry::with_builtin();
        let err = SpawnTable::new(&registry, [("conifer", 0.0)]).unwrap_err();
        assert!(matches!(err, ScatterError::Config(ConfigError::InvalidWeight { index: 0, .. })));

        let err = SpawnTable::new(&registry, Vec::<(&str, f64)>::new()).unwrap_err();
        assert!(matches!(err, ScatterError::Config(ConfigError::NoChoices)));
    }

    #[test]
    fn test_spawn_table_follows_weights() {
        let registry = GeneratorRegistry::with_builtin();
        let table = SpawnTable::new(&registry, [("rock", 1.0), ("stick", 3.0)]).unwrap();
        let mut rng = RandomEngine::new(77u64);

        let sticks = (0..4000).filter(|_| table.pick(&mut rng).name() == "stick").count();
        let share = sticks as f64 / 4000.0;
        assert!((share - 0.75).abs() < 0.04, "stick share {share}");
    }

    #[test]
    fn test_spawn_builds_requested_count() {
        let registry = GeneratorRegistry::with_builtin();
        let table = SpawnTable::new(&registry, [("rock", 1.0), ("stalk_clump", 1.0)]).unwrap();
        let artifacts = table.spawn(12, &mut RandomEngine::new("meadow"));

        assert_eq!(artifacts.len(), 12);
        for artifact in &artifacts {
            assert!(["rock", "stalk_clump"].contains(&artifact.provenance.generator.as_str()));
            assert!(!artifact.mesh.is_empty());
        }
    }

    #[test]
    fn test_spawn_skips_failures() {
        let mut registry = GeneratorRegistry::with_builtin();
        registry.register(broken());
        let table = SpawnTable::new(&registry, [("broken", 1.0)]).unwrap();
        assert!(table.spawn(5, &mut RandomEngine::new(1u64)).is_empty());
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let registry = GeneratorRegistry::with_builtin();
        let table = SpawnTable::new(&registry, [("conifer", 65.0), ("dead_tree", 25.0), ("tree_stump", 10.0)])
            .unwrap();

        let a = table.spawn(6, &mut RandomEngine::new("forest"));
        let b = table.spawn(6, &mut RandomEngine::new("forest"));
        let provenance = |v: &[GeneratedArtifact<UnpackedMesh>]| {
            v.iter().map(|a| a.provenance.clone()).collect::<Vec<_>>()
        };
        assert_eq!(provenance(&a), provenance(&b));
    }
}
