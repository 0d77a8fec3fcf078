//! Generators: a schema plus a pure build function
//!
//! [`MeshGenerator`] is the generation contract scene assembly calls into:
//! resolve parameters, build, attach provenance. It is generic over the built
//! value so the core never depends on a particular geometry representation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::editor::{EditableFields, describe_editable_fields};
use crate::params::{ResolvedParams, Schema, resolve_schema};
use crate::random::{RandomEngine, RandomError};

/// Build function failures, returned to the caller unmodified
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("missing parameter `{name}`")]
    MissingParam { name: String },

    #[error("parameter `{name}` should be {expected}, found {found}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Random(#[from] RandomError),

    /// Parameters that cannot produce usable geometry
    #[error("degenerate geometry: {reason}")]
    Degenerate { reason: String },
}

/// Pure build step: resolved params in, artifact out
///
/// Any randomness must come from the supplied engine.
pub type BuildFn<M> = fn(&ResolvedParams, &mut RandomEngine) -> Result<M, GenerationError>;

/// Generator identity plus the exact parameters used for a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub generator: String,
    pub params: ResolvedParams,
}

/// A built value bundled with its provenance
///
/// The artifact owns its provenance snapshot outright. Dropping the artifact
/// releases its geometry.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact<M> {
    pub mesh: M,
    pub provenance: Provenance,
}

impl<M> GeneratedArtifact<M> {
    /// Transform the built value, keeping provenance
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> GeneratedArtifact<N> {
        GeneratedArtifact {
            mesh: f(self.mesh),
            provenance: self.provenance,
        }
    }
}

/// Named (schema, build function) pair
#[derive(Debug, Clone)]
pub struct MeshGenerator<M> {
    name: String,
    schema: Schema,
    build: BuildFn<M>,
}

impl<M> MeshGenerator<M> {
    pub fn new(name: impl Into<String>, schema: Schema, build: BuildFn<M>) -> Self {
        Self {
            name: name.into(),
            schema,
            build,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolve a fresh parameter set from the schema
    pub fn random_params(&self, rng: &mut RandomEngine) -> ResolvedParams {
        resolve_schema(&self.schema, rng)
    }

    /// Build from explicit parameters
    ///
    /// A defined `seed` param reseeds `rng` first, making the build independent
    /// of prior engine state. Without one the build continues the ambient stream.
    pub fn make_mesh(
        &self,
        params: &ResolvedParams,
        rng: &mut RandomEngine,
    ) -> Result<GeneratedArtifact<M>, GenerationError> {
        if let Some(seed) = params.seed() {
            debug!("{}: building with seed {}", self.name, seed);
            rng.set_seed(seed);
        }

        let mesh = (self.build)(params, rng)?;

        Ok(GeneratedArtifact {
            mesh,
            provenance: Provenance {
                generator: self.name.clone(),
                params: params.clone(),
            },
        })
    }

    /// Rebuild the artifact a provenance record describes
    pub fn rebuild(
        &self,
        provenance: &Provenance,
        rng: &mut RandomEngine,
    ) -> Result<GeneratedArtifact<M>, GenerationError> {
        if provenance.generator != self.name {
            debug!(
                "rebuilding `{}` provenance with generator `{}`",
                provenance.generator, self.name
            );
        }
        self.make_mesh(&provenance.params, rng)
    }

    /// `make_mesh(random_params())`
    pub fn make_random_mesh(&self, rng: &mut RandomEngine) -> Result<GeneratedArtifact<M>, GenerationError> {
        let params = self.random_params(rng);
        self.make_mesh(&params, rng)
    }

    /// Non-hidden schema entries in declaration order
    pub fn editable_fields(&self) -> EditableFields<'_> {
        describe_editable_fields(&self.schema)
    }
}
