//! Editable field enumeration and live parameter editing
//!
//! The core only promises field names, kinds, current values, stable ordering
//! and hidden-field exclusion. How a field is rendered is up to the editor.

use crate::generator::{GeneratedArtifact, GenerationError, MeshGenerator};
use crate::params::{ParamKind, ParamSpec, ParamValue, ResolvedParams, Schema};
use crate::random::RandomEngine;

static UNDEFINED: ParamValue = ParamValue::Undefined;

/// Lazy iterator over a schema's non-hidden entries
///
/// Cloning restarts the enumeration from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct EditableFields<'a> {
    entries: std::slice::Iter<'a, (String, ParamSpec)>,
}

impl<'a> Iterator for EditableFields<'a> {
    type Item = (&'a str, &'a ParamSpec);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .find(|(_, spec)| !spec.hidden)
            .map(|(name, spec)| (name.as_str(), spec))
    }
}

/// Non-hidden `(name, spec)` pairs in declaration order
pub fn describe_editable_fields(schema: &Schema) -> EditableFields<'_> {
    EditableFields {
        entries: schema.entries().iter(),
    }
}

/// One field as an editor sees it
#[derive(Debug, Clone, PartialEq)]
pub struct EditableField<'a> {
    pub name: &'a str,
    pub kind: ParamKind,
    pub value: &'a ParamValue,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("generator `{generator}` has no field `{name}`")]
    UnknownField { generator: String, name: String },

    #[error("field `{name}` is hidden and cannot be edited")]
    HiddenField { name: String },

    #[error(transparent)]
    Build(#[from] GenerationError),
}

/// Live editing state for one generator
///
/// Holds the parameter bag the editor mutates and the most recent artifact.
/// Every change rebuilds; the previous artifact is dropped when replaced.
#[derive(Debug)]
pub struct EditorSession<'g, M> {
    generator: &'g MeshGenerator<M>,
    params: ResolvedParams,
    artifact: GeneratedArtifact<M>,
}

impl<'g, M> EditorSession<'g, M> {
    /// Resolve random params and build the first artifact
    pub fn open(generator: &'g MeshGenerator<M>, rng: &mut RandomEngine) -> Result<Self, EditorError> {
        let params = generator.random_params(rng);
        Self::with_params(generator, params, rng)
    }

    /// Start editing from known params (e.g. a loaded provenance record)
    pub fn with_params(
        generator: &'g MeshGenerator<M>,
        params: ResolvedParams,
        rng: &mut RandomEngine,
    ) -> Result<Self, EditorError> {
        let artifact = generator.make_mesh(&params, rng)?;
        Ok(Self {
            generator,
            params,
            artifact,
        })
    }

    pub fn generator(&self) -> &MeshGenerator<M> {
        self.generator
    }

    pub fn params(&self) -> &ResolvedParams {
        &self.params
    }

    pub fn artifact(&self) -> &GeneratedArtifact<M> {
        &self.artifact
    }

    pub fn into_artifact(self) -> GeneratedArtifact<M> {
        self.artifact
    }

    /// Editable fields with their current live values
    pub fn fields(&self) -> impl Iterator<Item = EditableField<'_>> {
        self.generator.editable_fields().map(|(name, spec)| EditableField {
            name,
            kind: spec.kind,
            value: self.params.get(name).unwrap_or(&UNDEFINED),
        })
    }

    /// Replace one field's value and rebuild
    ///
    /// On build failure the new value stays in place and the previous artifact
    /// is kept, so the editor can show the error and let the user fix the value.
    pub fn apply(
        &mut self,
        name: &str,
        value: impl Into<ParamValue>,
        rng: &mut RandomEngine,
    ) -> Result<&GeneratedArtifact<M>, EditorError> {
        let spec = self
            .generator
            .schema()
            .get(name)
            .ok_or_else(|| EditorError::UnknownField {
                generator: self.generator.name().to_string(),
                name: name.to_string(),
            })?;
        if spec.hidden {
            return Err(EditorError::HiddenField {
                name: name.to_string(),
            });
        }

        self.params.insert(name, value);
        self.rebuild(rng)
    }

    /// Draw a fresh parameter set, replace the live values in place and rebuild
    pub fn randomize(&mut self, rng: &mut RandomEngine) -> Result<&GeneratedArtifact<M>, EditorError> {
        let fresh = self.generator.random_params(rng);
        self.params.replace_from(fresh);
        self.rebuild(rng)
    }

    /// Rebuild from the current live params
    pub fn rebuild(&mut self, rng: &mut RandomEngine) -> Result<&GeneratedArtifact<M>, EditorError> {
        self.artifact = self.generator.make_mesh(&self.params, rng)?;
        Ok(&self.artifact)
    }
}
