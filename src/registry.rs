use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{TuneError, TuneResult};
use crate::space::SearchSpace;

/// Supported classifier families. Each maps to a predefined search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFamily {
    LogisticRegression,
    RandomForest,
    GradientBoosting,
    NeuralNetwork,
    SupportVector,
    LinearDiscriminant,
    QuadraticDiscriminant,
}

impl ClassifierFamily {
    pub const ALL: [ClassifierFamily; 7] = [
        ClassifierFamily::LogisticRegression,
        ClassifierFamily::RandomForest,
        ClassifierFamily::GradientBoosting,
        ClassifierFamily::NeuralNetwork,
        ClassifierFamily::SupportVector,
        ClassifierFamily::LinearDiscriminant,
        ClassifierFamily::QuadraticDiscriminant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogisticRegression => "logistic_regression",
            Self::RandomForest => "random_forest",
            Self::GradientBoosting => "gradient_boosting",
            Self::NeuralNetwork => "neural_network",
            Self::SupportVector => "support_vector",
            Self::LinearDiscriminant => "linear_discriminant",
            Self::QuadraticDiscriminant => "quadratic_discriminant",
        }
    }
}

impl fmt::Display for ClassifierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierFamily {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| TuneError::UnknownModelType(s.to_string()))
    }
}

/// Mapping from classifier family to its search space. Populated once at
/// startup and passed by reference into searches; read-only afterwards.
#[derive(Debug, Clone)]
pub struct SpaceRegistry {
    spaces: HashMap<ClassifierFamily, SearchSpace>,
}

impl SpaceRegistry {
    pub fn empty() -> Self {
        Self {
            spaces: HashMap::new(),
        }
    }

    /// The predefined spaces for every supported family. Ranges are chosen to
    /// cover commonly effective settings without stretching into regions the
    /// surrogate would waste evaluations on.
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.insert(
            ClassifierFamily::LogisticRegression,
            SearchSpace::new()
                .add_f64_log("tol", 1e-6, 100.0)
                .add_f64_log("C", 1e-6, 100.0)
                .add_choice("fit_intercept", vec![json!(true), json!(false)])
                .add_choice(
                    "solver",
                    vec![json!("newton-cg"), json!("lbfgs"), json!("sag"), json!("saga")],
                )
                .add_i64("max_iter", 100, 200),
        );

        registry.insert(
            ClassifierFamily::RandomForest,
            SearchSpace::new()
                .add_i64("n_estimators", 100, 700)
                .add_choice("criterion", vec![json!("gini"), json!("entropy")])
                .add_i64("max_depth", 1, 30)
                .add_choice("max_features", vec![json!("sqrt"), json!("log2")])
                .add_choice("oob_score", vec![json!(true), json!(false)]),
        );

        registry.insert(
            ClassifierFamily::GradientBoosting,
            SearchSpace::new()
                .add_i64("max_depth", 1, 18)
                .add_i64("gamma", 1, 9)
                .add_i64("reg_alpha", 40, 180)
                .add_f64("reg_lambda", 0.0, 1.0)
                .add_f64("colsample_bytree", 0.5, 1.0)
                .add_i64("min_child_weight", 0, 10)
                .add_i64("n_estimators", 1, 180),
        );

        registry.insert(
            ClassifierFamily::NeuralNetwork,
            SearchSpace::new()
                .add_choice(
                    "activation",
                    vec![json!("identity"), json!("logistic"), json!("tanh"), json!("relu")],
                )
                .add_choice("solver", vec![json!("lbfgs"), json!("sgd"), json!("adam")])
                .add_choice(
                    "learning_rate",
                    vec![json!("constant"), json!("invscaling"), json!("adaptive")],
                )
                .add_i64("max_iter", 100, 500)
                .add_f64_log("tol", 1e-6, 100.0)
                .add_f64_log("epsilon", 1e-8, 100.0),
        );

        registry.insert(
            ClassifierFamily::SupportVector,
            SearchSpace::new()
                .add_f64("C", 0.0, 100.0)
                .add_f64("gamma", 0.001, 1.0)
                .add_choice("kernel", vec![json!("rbf"), json!("poly"), json!("sigmoid")]),
        );

        registry.insert(
            ClassifierFamily::LinearDiscriminant,
            SearchSpace::new()
                .add_choice("solver", vec![json!("lsqr"), json!("eigen")])
                .add_f64("shrinkage", 0.0, 1.0),
        );

        registry.insert(
            ClassifierFamily::QuadraticDiscriminant,
            SearchSpace::new().add_f64("reg_param", 0.0, 1.0),
        );

        registry
    }

    pub fn insert(&mut self, family: ClassifierFamily, space: SearchSpace) {
        self.spaces.insert(family, space);
    }

    pub fn lookup(&self, family: ClassifierFamily) -> TuneResult<&SearchSpace> {
        self.spaces
            .get(&family)
            .ok_or_else(|| TuneError::UnknownModelType(family.to_string()))
    }

    /// Name-keyed lookup for drivers that carry the classifier type as a
    /// string. Unknown names fail the same way unregistered families do.
    pub fn lookup_name(&self, name: &str) -> TuneResult<&SearchSpace> {
        self.lookup(name.parse()?)
    }

    pub fn families(&self) -> impl Iterator<Item = ClassifierFamily> + '_ {
        self.spaces.keys().copied()
    }
}
