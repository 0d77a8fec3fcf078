//! Procedural prop generation for dioramas
//!
//! Geometry consumer of `diorama-core`: every prop is a [`MeshGenerator`]
//! producing an [`UnpackedMesh`], so a seed (or a provenance record) rebuilds
//! it exactly.
//!
//! # Example
//! ```no_run
//! use diorama_core::RandomEngine;
//! use proc_gen::mesh::write_obj;
//! use proc_gen::registry::GeneratorRegistry;
//!
//! let registry = GeneratorRegistry::with_builtin();
//! let mut rng = RandomEngine::new("mossy hollow");
//!
//! let conifer = registry.get("conifer").expect("builtin");
//! let artifact = conifer.make_random_mesh(&mut rng)?;
//! write_obj(&artifact.mesh, "conifer.obj".as_ref(), "conifer")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`MeshGenerator`]: diorama_core::MeshGenerator
//! [`UnpackedMesh`]: mesh::UnpackedMesh

pub mod config;
pub mod generators;
pub mod mesh;
pub mod registry;
