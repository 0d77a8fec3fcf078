//! Per-parameter resolution

use tracing::error;

use super::ConfigError;
use super::spec::{ParamSpec, ResolutionRule, Schema};
use super::value::{ParamValue, ResolvedParams};
use crate::random::RandomEngine;

/// Resolved parameters plus every configuration error hit along the way
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub params: ResolvedParams,
    pub errors: Vec<ConfigError>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolve a single spec
pub fn resolve_param(
    name: &str,
    spec: &ParamSpec,
    schema: &Schema,
    rng: &mut RandomEngine,
) -> Result<ParamValue, ConfigError> {
    let draw_failed = |source| ConfigError::Random {
        name: name.to_string(),
        source,
    };
    let inverted = |min, max| ConfigError::InvertedRange {
        name: name.to_string(),
        min,
        max,
    };

    match spec.rule() {
        ResolutionRule::Custom(resolver) => resolver.call(spec, name, schema, rng).map_err(draw_failed),
        ResolutionRule::PickOption(options) => rng.pick_one(options).cloned().map_err(draw_failed),
        ResolutionRule::IntRange { min, max } => {
            // Only the whole numbers inside the bounds can be drawn
            let (lo, hi) = (min.ceil(), max.floor());
            if !(lo <= hi) {
                return Err(inverted(min, max));
            }
            rng.uniform_int(lo as i64, hi as i64)
                .map(ParamValue::Int)
                .map_err(draw_failed)
        }
        ResolutionRule::UniformRange { min, max } => {
            if max < min {
                return Err(inverted(min, max));
            }
            Ok(ParamValue::Number(rng.uniform(min, max)))
        }
        ResolutionRule::NewSeed => Ok(ParamValue::Int(rng.new_seed_value() as i64)),
        ResolutionRule::Fixed(value) => Ok(value.clone()),
        ResolutionRule::Unresolvable => Err(ConfigError::NoResolutionRule {
            name: name.to_string(),
        }),
    }
}

/// Resolve every spec, collecting configuration errors instead of aborting
///
/// A failing key resolves to [`ParamValue::Undefined`]; the rest of the schema
/// still resolves.
pub fn resolve_schema_with_report(schema: &Schema, rng: &mut RandomEngine) -> Resolution {
    let mut resolution = Resolution::default();
    for (name, spec) in schema.entries() {
        let value = match resolve_param(name, spec, schema, rng) {
            Ok(value) => value,
            Err(e) => {
                error!("{}", e);
                resolution.errors.push(e);
                ParamValue::Undefined
            }
        };
        resolution.params.insert(name.clone(), value);
    }
    resolution
}

/// Resolve every spec; errors are logged and their keys left undefined
pub fn resolve_schema(schema: &Schema, rng: &mut RandomEngine) -> ResolvedParams {
    resolve_schema_with_report(schema, rng).params
}
