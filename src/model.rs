use crate::errors::InvalidConfiguration;
use crate::space::Configuration;

/// Capability set the search needs from a trainable classifier: accept a
/// named-parameter configuration, fit on training data, and produce
/// positive-class probability estimates.
///
/// `fit`/`predict_proba` failures are opaque to the core and abort a search;
/// `apply` rejections are recoverable and absorbed by the optimization loop.
pub trait Estimator {
    fn apply(&mut self, params: &Configuration) -> Result<(), InvalidConfiguration>;
    fn fit(&mut self, features: &[Vec<f64>], labels: &[f64]) -> anyhow::Result<()>;
    fn predict_proba(&self, features: &[Vec<f64>]) -> anyhow::Result<Vec<f64>>;
}

/// A feature-transforming stage preceding the classifier in a pipeline.
pub trait Preprocessor {
    fn fit_transform(&mut self, features: &[Vec<f64>]) -> anyhow::Result<Vec<Vec<f64>>>;
    fn transform(&self, features: &[Vec<f64>]) -> anyhow::Result<Vec<Vec<f64>>>;
}

/// Either a bare classifier or a preprocessing-plus-classifier pipeline.
///
/// The handle is supplied by the caller and mutated in place on every
/// evaluation: parameters are overwritten and fitted state replaced. Callers
/// must not rely on the handle's parameter state across or during a search.
pub enum ModelHandle {
    Bare(Box<dyn Estimator>),
    Pipeline {
        preprocessor: Box<dyn Preprocessor>,
        classifier: Box<dyn Estimator>,
    },
}

impl ModelHandle {
    pub fn bare(classifier: impl Estimator + 'static) -> Self {
        Self::Bare(Box::new(classifier))
    }

    pub fn pipeline(
        preprocessor: impl Preprocessor + 'static,
        classifier: impl Estimator + 'static,
    ) -> Self {
        Self::Pipeline {
            preprocessor: Box::new(preprocessor),
            classifier: Box::new(classifier),
        }
    }

    /// Applies a configuration to the classifier stage. For a pipeline only
    /// the final stage is configured; the preprocessor is left untouched.
    pub fn apply(&mut self, params: &Configuration) -> Result<(), InvalidConfiguration> {
        match self {
            Self::Bare(classifier) => classifier.apply(params),
            Self::Pipeline { classifier, .. } => classifier.apply(params),
        }
    }

    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[f64]) -> anyhow::Result<()> {
        match self {
            Self::Bare(classifier) => classifier.fit(features, labels),
            Self::Pipeline {
                preprocessor,
                classifier,
            } => {
                let transformed = preprocessor.fit_transform(features)?;
                classifier.fit(&transformed, labels)
            }
        }
    }

    pub fn predict_proba(&self, features: &[Vec<f64>]) -> anyhow::Result<Vec<f64>> {
        match self {
            Self::Bare(classifier) => classifier.predict_proba(features),
            Self::Pipeline {
                preprocessor,
                classifier,
            } => {
                let transformed = preprocessor.transform(features)?;
                classifier.predict_proba(&transformed)
            }
        }
    }
}
