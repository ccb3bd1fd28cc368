use std::fmt;

use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{TuneError, TuneResult};

/// A concrete value assigned to one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Cat(serde_json::Value),
}

impl ParamValue {
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
            Self::Cat(v) => v.as_f64().unwrap_or(0.0),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::Cat(v) => v.clone(),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Cat(v) => write!(f, "{v}"),
        }
    }
}

/// Sampling scale of a continuous dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// The range or value set of one tunable dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Domain {
    Continuous {
        low: f64,
        high: f64,
        #[serde(default)]
        scale: Scale,
    },
    /// Inclusive integer range.
    Integer { low: i64, high: i64 },
    Categorical { choices: Vec<serde_json::Value> },
}

impl Domain {
    pub fn sample(&self, rng: &mut impl Rng) -> ParamValue {
        match self {
            Domain::Continuous {
                low,
                high,
                scale: Scale::Linear,
            } => ParamValue::Float(rng.gen_range(*low..*high)),
            Domain::Continuous {
                low,
                high,
                scale: Scale::Log,
            } => ParamValue::Float(rng.gen_range(low.ln()..high.ln()).exp()),
            Domain::Integer { low, high } => ParamValue::Int(rng.gen_range(*low..=*high)),
            Domain::Categorical { choices } => {
                let index = rng.gen_range(0..choices.len());
                ParamValue::Cat(choices[index].clone())
            }
        }
    }

    /// Bounds of this dimension in the transformed coordinates the surrogate
    /// operates in (log dimensions in ln-space, categoricals as choice index).
    pub fn interval(&self) -> (f64, f64) {
        match self {
            Domain::Continuous {
                low,
                high,
                scale: Scale::Linear,
            } => (*low, *high),
            Domain::Continuous {
                low,
                high,
                scale: Scale::Log,
            } => (low.ln(), high.ln()),
            Domain::Integer { low, high } => (*low as f64, *high as f64),
            Domain::Categorical { choices } => (0.0, choices.len().saturating_sub(1) as f64),
        }
    }

    /// Maps a value into the transformed coordinates.
    pub fn position(&self, value: &ParamValue) -> f64 {
        match self {
            Domain::Continuous {
                scale: Scale::Log, ..
            } => value.to_f64().ln(),
            Domain::Continuous { .. } | Domain::Integer { .. } => value.to_f64(),
            Domain::Categorical { choices } => match value {
                ParamValue::Cat(v) => {
                    choices.iter().position(|c| c == v).unwrap_or(0) as f64
                }
                other => other.to_f64(),
            },
        }
    }

    /// Maps a transformed coordinate back to a concrete in-bounds value.
    pub fn value_at(&self, x: f64) -> ParamValue {
        match self {
            Domain::Continuous {
                low,
                high,
                scale: Scale::Linear,
            } => ParamValue::Float(x.clamp(*low, *high)),
            Domain::Continuous {
                low,
                high,
                scale: Scale::Log,
            } => ParamValue::Float(x.exp().clamp(*low, *high)),
            Domain::Integer { low, high } => {
                ParamValue::Int((x.round() as i64).clamp(*low, *high))
            }
            Domain::Categorical { choices } => {
                let index = (x.round().max(0.0) as usize).min(choices.len() - 1);
                ParamValue::Cat(choices[index].clone())
            }
        }
    }

    /// Dimensions that decode by rounding need interpolation inside the
    /// acquisition function.
    pub(crate) fn decodes_by_rounding(&self) -> bool {
        matches!(self, Domain::Integer { .. } | Domain::Categorical { .. })
    }

    fn check(&self, name: &str) -> TuneResult<()> {
        match self {
            Domain::Continuous { low, high, scale } => {
                if !(low < high) {
                    return Err(TuneError::InvalidSpace(format!(
                        "`{name}`: continuous bounds must satisfy low < high ({low} >= {high})"
                    )));
                }
                if *scale == Scale::Log && *low <= 0.0 {
                    return Err(TuneError::InvalidSpace(format!(
                        "`{name}`: log scale requires a positive lower bound (got {low})"
                    )));
                }
            }
            Domain::Integer { low, high } => {
                if low >= high {
                    return Err(TuneError::InvalidSpace(format!(
                        "`{name}`: integer bounds must satisfy low < high ({low} >= {high})"
                    )));
                }
            }
            Domain::Categorical { choices } => {
                if choices.is_empty() {
                    return Err(TuneError::InvalidSpace(format!(
                        "`{name}`: categorical value set is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One tunable dimension: a name plus its domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub domain: Domain,
}

/// An ordered sequence of parameter definitions. Order defines the positional
/// correspondence with the surrogate's point representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub params: Vec<ParamDef>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    pub fn add_f64(mut self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.params.push(ParamDef {
            name: name.into(),
            domain: Domain::Continuous {
                low,
                high,
                scale: Scale::Linear,
            },
        });
        self
    }

    pub fn add_f64_log(mut self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.params.push(ParamDef {
            name: name.into(),
            domain: Domain::Continuous {
                low,
                high,
                scale: Scale::Log,
            },
        });
        self
    }

    pub fn add_i64(mut self, name: impl Into<String>, low: i64, high: i64) -> Self {
        self.params.push(ParamDef {
            name: name.into(),
            domain: Domain::Integer { low, high },
        });
        self
    }

    pub fn add_choice(
        mut self,
        name: impl Into<String>,
        choices: Vec<serde_json::Value>,
    ) -> Self {
        self.params.push(ParamDef {
            name: name.into(),
            domain: Domain::Categorical { choices },
        });
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn validate(&self) -> TuneResult<()> {
        if self.params.is_empty() {
            return Err(TuneError::InvalidSpace("space has no parameters".into()));
        }
        if !self.params.iter().map(|p| &p.name).all_unique() {
            return Err(TuneError::InvalidSpace(
                "parameter names must be unique".into(),
            ));
        }
        for param in &self.params {
            param.domain.check(&param.name)?;
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Configuration {
        Configuration {
            entries: self
                .params
                .iter()
                .map(|p| (p.name.clone(), p.domain.sample(rng)))
                .collect(),
        }
    }

    /// Transformed-space bounds for every dimension, in order.
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        self.params.iter().map(|p| p.domain.interval()).collect()
    }

    /// Encodes a configuration into its positional transformed-space point.
    /// Values are taken positionally: one per definition, in space order.
    pub fn encode(&self, config: &Configuration) -> Vec<f64> {
        debug_assert_eq!(config.len(), self.params.len());
        self.params
            .iter()
            .zip(config.iter())
            .map(|(def, (_, value))| def.domain.position(value))
            .collect()
    }

    /// Decodes a transformed-space point into a concrete configuration,
    /// rounding integer/categorical dimensions and clamping into bounds.
    pub fn decode(&self, point: &[f64]) -> Configuration {
        Configuration {
            entries: self
                .params
                .iter()
                .zip(point)
                .map(|(def, &x)| (def.name.clone(), def.domain.value_at(x)))
                .collect(),
        }
    }

    /// Rescales a transformed-space point into the unit cube.
    pub fn normalize(&self, point: &[f64]) -> Vec<f64> {
        self.params
            .iter()
            .zip(point)
            .map(|(def, &x)| {
                let (low, high) = def.domain.interval();
                if high > low {
                    (x - low) / (high - low)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully-specified assignment of values to all parameters in a space,
/// in space order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    entries: Vec<(String, ParamValue)>,
}

impl Configuration {
    pub fn from_entries(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key-value view for driver-side reporting.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (name, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn mixed_space() -> SearchSpace {
        SearchSpace::new()
            .add_f64("position", 0.5, 1.0)
            .add_f64_log("lr", 1e-5, 1e-1)
            .add_i64("depth", 1, 30)
            .add_choice("kernel", vec![json!("rbf"), json!("poly"), json!("sigmoid")])
    }

    #[test]
    fn sampling_respects_bounds() {
        let space = mixed_space();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let config = space.sample(&mut rng);
            match config.get("position") {
                Some(ParamValue::Float(v)) => assert!((0.5..1.0).contains(v)),
                other => panic!("unexpected position value: {other:?}"),
            }
            match config.get("lr") {
                Some(ParamValue::Float(v)) => assert!(*v >= 1e-5 && *v <= 1e-1),
                other => panic!("unexpected lr value: {other:?}"),
            }
            match config.get("depth") {
                Some(ParamValue::Int(v)) => assert!((1..=30).contains(v)),
                other => panic!("unexpected depth value: {other:?}"),
            }
            match config.get("kernel") {
                Some(ParamValue::Cat(v)) => {
                    assert!(["rbf", "poly", "sigmoid"].contains(&v.as_str().unwrap()))
                }
                other => panic!("unexpected kernel value: {other:?}"),
            }
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let space = mixed_space();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let config = space.sample(&mut rng);
            let decoded = space.decode(&space.encode(&config));
            for ((name, value), (dec_name, dec_value)) in config.iter().zip(decoded.iter()) {
                assert_eq!(name, dec_name);
                match (value, dec_value) {
                    (ParamValue::Float(a), ParamValue::Float(b)) => {
                        assert!((a - b).abs() < 1e-9 * a.abs().max(1.0))
                    }
                    (a, b) => assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn decode_rounds_and_clamps() {
        let space = SearchSpace::new()
            .add_i64("n", 0, 10)
            .add_choice("c", vec![json!("a"), json!("b")]);
        let config = space.decode(&[10.4, 7.0]);
        assert_eq!(config.get("n"), Some(&ParamValue::Int(10)));
        assert_eq!(config.get("c"), Some(&ParamValue::Cat(json!("b"))));
    }

    #[test]
    fn normalize_maps_to_unit_cube() {
        let space = SearchSpace::new().add_f64("x", -10.0, 10.0).add_i64("n", 0, 4);
        let normalized = space.normalize(&[0.0, 4.0]);
        assert!((normalized[0] - 0.5).abs() < 1e-12);
        assert!((normalized[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let space = SearchSpace::new().add_f64("x", 0.0, 1.0).add_i64("x", 0, 5);
        assert!(matches!(space.validate(), Err(TuneError::InvalidSpace(_))));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let space = SearchSpace::new().add_f64("x", 2.0, 1.0);
        assert!(matches!(space.validate(), Err(TuneError::InvalidSpace(_))));
    }

    #[test]
    fn validate_rejects_log_with_zero_low() {
        let space = SearchSpace::new().add_f64_log("x", 0.0, 1.0);
        assert!(matches!(space.validate(), Err(TuneError::InvalidSpace(_))));
    }

    #[test]
    fn validate_rejects_empty_choices() {
        let space = SearchSpace::new().add_choice("c", vec![]);
        assert!(matches!(space.validate(), Err(TuneError::InvalidSpace(_))));
    }

    #[test]
    fn configuration_display_is_key_value() {
        let config = Configuration::from_entries(vec![
            ("C".into(), ParamValue::Float(1.5)),
            ("kernel".into(), ParamValue::Cat(json!("rbf"))),
        ]);
        assert_eq!(config.to_string(), "{C: 1.5, kernel: \"rbf\"}");
    }
}
