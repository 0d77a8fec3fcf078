//! Declarative parameter specs

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::{Color, ParamValue};
use crate::random::{RandomEngine, RandomError};

/// Declared shape of a parameter, shown to editors next to its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    FixedValue,
    UniformRange,
    IntRange,
    OptionSet,
    ColorOptionSet,
    SeedSlot,
    Custom,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::FixedValue => "fixed",
            ParamKind::UniformRange => "range",
            ParamKind::IntRange => "int_range",
            ParamKind::OptionSet => "options",
            ParamKind::ColorOptionSet => "colors",
            ParamKind::SeedSlot => "seed",
            ParamKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ResolverFn =
    dyn Fn(&ParamSpec, &str, &Schema, &mut RandomEngine) -> Result<ParamValue, RandomError> + Send + Sync;

/// User-supplied resolution function
///
/// Receives the spec being resolved, its name and the full schema. Sibling
/// parameters are still specs at that point, never resolved values.
#[derive(Clone)]
pub struct CustomResolver(Arc<ResolverFn>);

impl CustomResolver {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ParamSpec, &str, &Schema, &mut RandomEngine) -> Result<ParamValue, RandomError>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(
        &self,
        spec: &ParamSpec,
        name: &str,
        schema: &Schema,
        rng: &mut RandomEngine,
    ) -> Result<ParamValue, RandomError> {
        (self.0)(spec, name, schema, rng)
    }
}

impl fmt::Debug for CustomResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomResolver(..)")
    }
}

/// How a spec resolves, chosen once by [`ParamSpec::rule`]
///
/// Variant order is the resolution priority: a spec carrying several payloads
/// always resolves through the earliest matching variant.
#[derive(Debug, Clone, Copy)]
pub enum ResolutionRule<'a> {
    Custom(&'a CustomResolver),
    PickOption(&'a [ParamValue]),
    IntRange { min: f64, max: f64 },
    UniformRange { min: f64, max: f64 },
    NewSeed,
    Fixed(&'a ParamValue),
    Unresolvable,
}

/// One entry in a generator's schema
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub kind: ParamKind,
    pub value: Option<ParamValue>,
    pub range: Option<[f64; 2]>,
    pub options: Option<Vec<ParamValue>>,
    /// Excluded from editable-field enumeration
    pub hidden: bool,
    pub resolver: Option<CustomResolver>,
}

impl ParamSpec {
    fn of_kind(kind: ParamKind) -> Self {
        Self {
            kind,
            value: None,
            range: None,
            options: None,
            hidden: false,
            resolver: None,
        }
    }

    /// Constant value, never randomized
    pub fn fixed(value: impl Into<ParamValue>) -> Self {
        Self::of_kind(ParamKind::FixedValue).with_value(value)
    }

    /// Constant `[min, max]` pair handed to the build function as-is
    pub fn fixed_range(min: f64, max: f64) -> Self {
        Self::fixed(vec![min, max])
    }

    /// Uniform float in `[min, max)`
    pub fn range(min: f64, max: f64) -> Self {
        Self::of_kind(ParamKind::UniformRange).with_range(min, max)
    }

    /// Uniform integer in `min..=max`
    pub fn int_range(min: i64, max: i64) -> Self {
        Self::of_kind(ParamKind::IntRange).with_range(min as f64, max as f64)
    }

    /// One of the listed values, uniformly
    pub fn options<T: Into<ParamValue>>(options: impl IntoIterator<Item = T>) -> Self {
        Self::of_kind(ParamKind::OptionSet).with_options(options)
    }

    /// One of the listed colors, uniformly
    pub fn color_options(colors: impl IntoIterator<Item = u32>) -> Self {
        Self::of_kind(ParamKind::ColorOptionSet)
            .with_options(colors.into_iter().map(Color::from_hex))
    }

    /// The whole color list, passed through unchanged
    pub fn color_palette(colors: impl IntoIterator<Item = u32>) -> Self {
        let palette: Vec<ParamValue> = colors
            .into_iter()
            .map(|hex| ParamValue::Color(Color::from_hex(hex)))
            .collect();
        Self::of_kind(ParamKind::ColorOptionSet).with_value(ParamValue::List(palette))
    }

    /// Fresh seed drawn from the engine stream
    pub fn seed() -> Self {
        Self::of_kind(ParamKind::SeedSlot)
    }

    /// Value computed by `f`
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ParamSpec, &str, &Schema, &mut RandomEngine) -> Result<ParamValue, RandomError>
            + Send
            + Sync
            + 'static,
    {
        let mut spec = Self::of_kind(ParamKind::Custom);
        spec.resolver = Some(CustomResolver::new(f));
        spec
    }

    /// Hide from editors
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }

    pub fn with_options<T: Into<ParamValue>>(mut self, options: impl IntoIterator<Item = T>) -> Self {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Select the resolution rule by priority
    pub fn rule(&self) -> ResolutionRule<'_> {
        match self {
            ParamSpec {
                resolver: Some(resolver),
                ..
            } => ResolutionRule::Custom(resolver),
            ParamSpec {
                options: Some(options),
                ..
            } => ResolutionRule::PickOption(options),
            ParamSpec {
                range: Some([min, max]),
                kind: ParamKind::IntRange,
                ..
            } => ResolutionRule::IntRange {
                min: *min,
                max: *max,
            },
            ParamSpec {
                range: Some([min, max]),
                ..
            } => ResolutionRule::UniformRange {
                min: *min,
                max: *max,
            },
            ParamSpec {
                kind: ParamKind::SeedSlot,
                ..
            } => ResolutionRule::NewSeed,
            ParamSpec {
                value: Some(value), ..
            } => ResolutionRule::Fixed(value),
            _ => ResolutionRule::Unresolvable,
        }
    }
}

/// Ordered name → spec mapping declared once per generator
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(String, ParamSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Add a spec; redeclaring a name replaces it in its original position
    pub fn insert(&mut self, name: impl Into<String>, spec: ParamSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, ParamSpec)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_rules() {
        assert!(matches!(ParamSpec::fixed(3).rule(), ResolutionRule::Fixed(ParamValue::Int(3))));
        assert!(matches!(
            ParamSpec::range(0.5, 1.0).rule(),
            ResolutionRule::UniformRange { min: 0.5, max: 1.0 }
        ));
        assert!(matches!(
            ParamSpec::int_range(3, 7).rule(),
            ResolutionRule::IntRange { min: 3.0, max: 7.0 }
        ));
        assert!(matches!(ParamSpec::options([1, 2]).rule(), ResolutionRule::PickOption(o) if o.len() == 2));
        assert!(matches!(ParamSpec::seed().rule(), ResolutionRule::NewSeed));
        assert!(matches!(
            ParamSpec::custom(|_, _, _, _| Ok(ParamValue::Int(1))).rule(),
            ResolutionRule::Custom(_)
        ));
    }

    #[test]
    fn test_priority_options_over_range() {
        let spec = ParamSpec::options([1, 2, 3]).with_range(10.0, 20.0);
        assert!(matches!(spec.rule(), ResolutionRule::PickOption(_)));
    }

    #[test]
    fn test_priority_custom_first() {
        let spec = ParamSpec::custom(|_, _, _, _| Ok(ParamValue::Int(0)))
            .with_options([1, 2])
            .with_range(0.0, 1.0)
            .with_value(5);
        assert!(matches!(spec.rule(), ResolutionRule::Custom(_)));
    }

    #[test]
    fn test_priority_range_over_seed_and_value() {
        let mut spec = ParamSpec::seed().with_range(1.0, 2.0).with_value(9);
        assert!(matches!(spec.rule(), ResolutionRule::UniformRange { .. }));
        spec.range = None;
        assert!(matches!(spec.rule(), ResolutionRule::NewSeed));
        spec.kind = ParamKind::FixedValue;
        assert!(matches!(spec.rule(), ResolutionRule::Fixed(_)));
    }

    #[test]
    fn test_empty_spec_unresolvable() {
        let spec = ParamSpec {
            kind: ParamKind::UniformRange,
            value: None,
            range: None,
            options: None,
            hidden: false,
            resolver: None,
        };
        assert!(matches!(spec.rule(), ResolutionRule::Unresolvable));
    }

    #[test]
    fn test_color_specs() {
        let options = ParamSpec::color_options([0x118840, 0x337540]);
        assert_eq!(options.kind, ParamKind::ColorOptionSet);
        assert!(matches!(options.rule(), ResolutionRule::PickOption([ParamValue::Color(Color(0x118840)), _])));

        let palette = ParamSpec::color_palette([0xFF0088, 0xFFFFFF]);
        match palette.rule() {
            ResolutionRule::Fixed(ParamValue::List(colors)) => assert_eq!(colors.len(), 2),
            other => panic!("unexpected rule {other:?}"),
        }
    }

    #[test]
    fn test_schema_preserves_declaration_order() {
        let mut schema = Schema::new()
            .with("zeta", ParamSpec::fixed(1))
            .with("alpha", ParamSpec::fixed(2))
            .with("mid", ParamSpec::fixed(3));
        assert_eq!(schema.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);

        schema.insert("alpha", ParamSpec::fixed(20));
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert!(matches!(
            schema.get("alpha").map(ParamSpec::rule),
            Some(ResolutionRule::Fixed(ParamValue::Int(20)))
        ));
        assert!(schema.get("missing").is_none());
    }
}
