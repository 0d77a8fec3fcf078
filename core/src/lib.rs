//! Diorama Core - seeded parameter resolution for procedural props
//!
//! This crate provides the deterministic pieces every generated prop depends on.
//! Geometry construction lives in the generator crates that call into it.
//!
//! # Architecture
//!
//! - [`RandomEngine`] - Seedable PCG stream, the single source of randomness
//! - [`WeightedPicker`] - Categorical sampling over weighted choices
//! - [`Schema`] / [`ParamSpec`] - Declarative description of a generator's inputs
//! - [`resolve_schema`] - Turns a schema into concrete [`ResolvedParams`]
//! - [`MeshGenerator`] - Schema + build function, producing [`GeneratedArtifact`]s
//! - [`EditorSession`] - Live parameter editing with rebuild on change
//!
//! # Example
//! ```
//! use diorama_core::*;
//!
//! fn build_post(params: &ResolvedParams, _rng: &mut RandomEngine) -> Result<f64, GenerationError> {
//!     params.number("height")
//! }
//!
//! let generator = MeshGenerator::new(
//!     "post",
//!     Schema::new()
//!         .with("height", ParamSpec::range(1.0, 2.0))
//!         .with("seed", ParamSpec::seed()),
//!     build_post,
//! );
//!
//! let mut rng = RandomEngine::new(42);
//! let artifact = generator.make_random_mesh(&mut rng)?;
//! assert!((1.0..2.0).contains(&artifact.mesh));
//! assert_eq!(artifact.provenance.generator, "post");
//! # Ok::<(), GenerationError>(())
//! ```

pub mod editor;
pub mod generator;
pub mod math;
pub mod params;
pub mod random;

pub use editor::{EditableField, EditableFields, EditorError, EditorSession, describe_editable_fields};
pub use generator::{BuildFn, GeneratedArtifact, GenerationError, MeshGenerator, Provenance};
pub use params::{
    Color, ConfigError, CustomResolver, ParamKind, ParamSpec, ParamValue, Resolution,
    ResolutionRule, ResolvedParams, SEED_PARAM, Schema, resolve_param, resolve_schema,
    resolve_schema_with_report,
};
pub use random::{
    RandomEngine, RandomEngineState, RandomError, Seed, StateError, WeightedChoice, WeightedPicker,
};
