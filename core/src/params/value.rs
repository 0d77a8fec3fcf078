//! Concrete parameter values

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::generator::GenerationError;
use crate::random::Seed;

/// Params key whose defined value reseeds the engine before a build
pub const SEED_PARAM: &str = "seed";

/// Packed `0xRRGGBB` color token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);

    pub const fn from_hex(hex: u32) -> Self {
        Color(hex & 0xFFFFFF)
    }

    /// Channels as `[r, g, b]`
    pub const fn rgb(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Opaque RGBA8 vertex color
    pub const fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = self.rgb();
        [r, g, b, 255]
    }

    /// Per-channel linear blend, `t` clamped to `[0, 1]`
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let a = self.rgb();
        let b = other.rgb();
        let mix = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u32;
        Color((mix(0) << 16) | (mix(1) << 8) | mix(2))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A single resolved parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    /// Resolution failed for this key (misconfigured spec)
    Undefined,
    Number(f64),
    Int(i64),
    Color(Color),
    Text(String),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Undefined => "undefined",
            ParamValue::Number(_) => "number",
            ParamValue::Int(_) => "int",
            ParamValue::Color(_) => "color",
            ParamValue::Text(_) => "text",
            ParamValue::List(_) => "list",
            ParamValue::Map(_) => "map",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ParamValue::Undefined)
    }

    /// Numeric view (ints widen to floats)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view (floats only when they hold an exact integer)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            ParamValue::Color(c) => Some(*c),
            ParamValue::Int(i) if (0..=0xFFFFFF).contains(i) => Some(Color(*i as u32)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// A two-element numeric list as `[min, max]`
    pub fn as_range(&self) -> Option<[f64; 2]> {
        match self.as_list()? {
            [min, max] => Some([min.as_f64()?, max.as_f64()?]),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i as i64)
    }
}

impl From<Color> for ParamValue {
    fn from(c: Color) -> Self {
        ParamValue::Color(c)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Name → value mapping produced fresh for each generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedParams {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite every key present in `other`, keeping this instance
    ///
    /// Holders of `&mut self` observe the new values; keys absent from
    /// `other` are left untouched.
    pub fn replace_from(&mut self, other: ResolvedParams) {
        self.values.extend(other.values);
    }

    /// Seed carried by the `seed` key, if it holds a defined value
    ///
    /// Integral numbers seed like the equal `Int`. Every other defined value
    /// is hashed, so distinct values give distinct seeds.
    pub fn seed(&self) -> Option<Seed> {
        let seed = match self.get(SEED_PARAM)? {
            ParamValue::Undefined => return None,
            ParamValue::Int(i) => Seed::Number(*i as u64),
            ParamValue::Number(n) => Seed::Number(number_seed(*n)),
            ParamValue::Text(s) => Seed::Text(s.clone()),
            other => Seed::Number(xxh3_64(&serde_json::to_vec(other).ok()?)),
        };
        Some(seed)
    }

    fn require(&self, name: &str) -> Result<&ParamValue, GenerationError> {
        match self.get(name) {
            Some(value) if value.is_defined() => Ok(value),
            _ => Err(GenerationError::MissingParam {
                name: name.to_string(),
            }),
        }
    }

    fn mismatch(name: &str, expected: &'static str, found: &ParamValue) -> GenerationError {
        GenerationError::WrongType {
            name: name.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Numeric parameter
    pub fn number(&self, name: &str) -> Result<f64, GenerationError> {
        let value = self.require(name)?;
        value.as_f64().ok_or_else(|| Self::mismatch(name, "number", value))
    }

    /// Numeric parameter narrowed to `f32` for geometry
    pub fn float(&self, name: &str) -> Result<f32, GenerationError> {
        self.number(name).map(|n| n as f32)
    }

    /// Integer parameter
    pub fn int(&self, name: &str) -> Result<i64, GenerationError> {
        let value = self.require(name)?;
        value.as_i64().ok_or_else(|| Self::mismatch(name, "int", value))
    }

    /// Non-negative integer parameter as a count
    pub fn count(&self, name: &str) -> Result<usize, GenerationError> {
        let value = self.int(name)?;
        usize::try_from(value).map_err(|_| GenerationError::Degenerate {
            reason: format!("`{name}` must not be negative (got {value})"),
        })
    }

    /// Color parameter
    pub fn color(&self, name: &str) -> Result<Color, GenerationError> {
        let value = self.require(name)?;
        value.as_color().ok_or_else(|| Self::mismatch(name, "color", value))
    }

    /// `[min, max]` pair parameter
    pub fn range(&self, name: &str) -> Result<[f64; 2], GenerationError> {
        let value = self.require(name)?;
        value.as_range().ok_or_else(|| Self::mismatch(name, "[min, max]", value))
    }

    /// List of numbers
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, GenerationError> {
        let value = self.require(name)?;
        value
            .as_list()
            .and_then(|items| items.iter().map(ParamValue::as_f64).collect())
            .ok_or_else(|| Self::mismatch(name, "list of numbers", value))
    }

    /// List of colors
    pub fn colors(&self, name: &str) -> Result<Vec<Color>, GenerationError> {
        let value = self.require(name)?;
        value
            .as_list()
            .and_then(|items| items.iter().map(ParamValue::as_color).collect())
            .ok_or_else(|| Self::mismatch(name, "list of colors", value))
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn number_seed(n: f64) -> u64 {
    if n.fract() == 0.0 && (-TWO_POW_63..TWO_POW_63).contains(&n) {
        n as i64 as u64
    } else if n.fract() == 0.0 && (TWO_POW_63..2.0 * TWO_POW_63).contains(&n) {
        n as u64
    } else {
        xxh3_64(&n.to_bits().to_le_bytes())
    }
}

impl FromIterator<(String, ParamValue)> for ResolvedParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let c = Color::from_hex(0x604011);
        assert_eq!(c.rgb(), [0x60, 0x40, 0x11]);
        assert_eq!(c.to_rgba8(), [0x60, 0x40, 0x11, 255]);
        assert_eq!(c.to_string(), "#604011");
    }

    #[test]
    fn test_color_lerp() {
        let black = Color(0x000000);
        assert_eq!(black.lerp(Color::WHITE, 0.0), black);
        assert_eq!(black.lerp(Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(black.lerp(Color::WHITE, 0.5), Color(0x808080));
        assert_eq!(black.lerp(Color::WHITE, 7.0), Color::WHITE);
    }

    #[test]
    fn test_typed_accessors() {
        let params = ResolvedParams::new()
            .with("size", 0.5)
            .with("count", 3)
            .with("tint", Color(0x888888))
            .with("spread", vec![0.18, 0.4])
            .with("palette", vec![Color(0x118840), Color(0x337540)]);

        assert_eq!(params.number("size").unwrap(), 0.5);
        assert_eq!(params.number("count").unwrap(), 3.0);
        assert_eq!(params.int("count").unwrap(), 3);
        assert_eq!(params.count("count").unwrap(), 3);
        assert_eq!(params.color("tint").unwrap(), Color(0x888888));
        assert_eq!(params.range("spread").unwrap(), [0.18, 0.4]);
        assert_eq!(params.numbers("spread").unwrap(), vec![0.18, 0.4]);
        assert_eq!(params.colors("palette").unwrap().len(), 2);
    }

    #[test]
    fn test_accessor_errors() {
        let params = ResolvedParams::new()
            .with("size", "large")
            .with("broken", ParamValue::Undefined)
            .with("negative", -2);

        assert!(matches!(
            params.number("missing"),
            Err(GenerationError::MissingParam { .. })
        ));
        assert!(matches!(
            params.number("broken"),
            Err(GenerationError::MissingParam { .. })
        ));
        assert!(matches!(
            params.number("size"),
            Err(GenerationError::WrongType { expected: "number", found: "text", .. })
        ));
        assert!(matches!(
            params.count("negative"),
            Err(GenerationError::Degenerate { .. })
        ));
        assert!(params.range("size").is_err());
    }

    #[test]
    fn test_seed_extraction() {
        assert_eq!(ResolvedParams::new().seed(), None);
        assert_eq!(
            ResolvedParams::new().with(SEED_PARAM, ParamValue::Undefined).seed(),
            None
        );
        assert_eq!(ResolvedParams::new().with(SEED_PARAM, 0).seed(), Some(Seed::Number(0)));
        assert_eq!(
            ResolvedParams::new().with(SEED_PARAM, "grove").seed(),
            Some(Seed::Text("grove".to_string()))
        );
    }

    #[test]
    fn test_seed_from_numbers_does_not_collide() {
        let seed_of = |n: f64| ResolvedParams::new().with(SEED_PARAM, n).seed().unwrap();

        let seeds = [seed_of(-3.0), seed_of(-1.0), seed_of(0.0), seed_of(1.2), seed_of(1.9)];
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }

        assert_eq!(seed_of(-3.0), ResolvedParams::new().with(SEED_PARAM, -3).seed().unwrap());
        assert_eq!(seed_of(7.0), Seed::Number(7));
    }

    #[test]
    fn test_seed_from_structured_values() {
        let red = ResolvedParams::new().with(SEED_PARAM, Color(0xFF0000)).seed();
        let blue = ResolvedParams::new().with(SEED_PARAM, Color(0x0000FF)).seed();
        assert!(red.is_some());
        assert_ne!(red, blue);

        let list = ResolvedParams::new()
            .with(SEED_PARAM, ParamValue::List(vec![ParamValue::Int(1), ParamValue::Int(2)]))
            .seed();
        assert!(list.is_some());
    }

    #[test]
    fn test_replace_from_keeps_unrelated_keys() {
        let mut live = ResolvedParams::new().with("a", 1).with("b", 2);
        live.replace_from(ResolvedParams::new().with("b", 20).with("c", 30));
        assert_eq!(live.int("a").unwrap(), 1);
        assert_eq!(live.int("b").unwrap(), 20);
        assert_eq!(live.int("c").unwrap(), 30);
    }

    #[test]
    fn test_json_round_trip_preserves_types() {
        let params = ResolvedParams::new()
            .with("count", 3)
            .with("width", 3.0)
            .with("tint", Color(0xFF0088))
            .with("seed", 42);
        let json = serde_json::to_string(&params).unwrap();
        let back: ResolvedParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
        assert_eq!(back.get("count"), Some(&ParamValue::Int(3)));
        assert_eq!(back.get("width"), Some(&ParamValue::Number(3.0)));
    }
}
