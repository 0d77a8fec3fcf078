//! Parameter schemas and their resolution into concrete values
//!
//! A generator declares its inputs once as a [`Schema`] of named [`ParamSpec`]s.
//! Each generation call resolves the schema into a fresh [`ResolvedParams`] by
//! drawing from the [`RandomEngine`](crate::RandomEngine).

mod resolver;
mod spec;
mod value;

pub use resolver::{Resolution, resolve_param, resolve_schema, resolve_schema_with_report};
pub use spec::{CustomResolver, ParamKind, ParamSpec, ResolutionRule, Schema};
pub use value::{Color, ParamValue, ResolvedParams, SEED_PARAM};

use crate::random::RandomError;

/// Schema authoring mistakes, reported at resolution or construction time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Spec carries no value, range, options, seed kind or resolver
    #[error("parameter `{name}` has no value, range, options, seed slot or resolver")]
    NoResolutionRule { name: String },

    /// Range with `max < min`
    #[error("parameter `{name}` has inverted range [{min}, {max}]")]
    InvertedRange { name: String, min: f64, max: f64 },

    /// A draw for this parameter failed (empty options, bad custom resolver input)
    #[error("parameter `{name}`: {source}")]
    Random {
        name: String,
        #[source]
        source: RandomError,
    },

    /// Weighted choice with a zero, negative or non-finite weight
    #[error("weighted choice {index} has weight {weight}; weights must be finite and > 0")]
    InvalidWeight { index: usize, weight: f64 },

    /// Weighted picker built from no choices
    #[error("weighted picker needs at least one choice")]
    NoChoices,
}
