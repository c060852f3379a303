//! Configuration of a training run.
//! 
//! [`Properties`] is the loaded `key=value` document;
//! [`TrainingConfig`] is the validated view the trainer consumes.
use crate::error::{Error, Result};

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;


/// A `key=value` document.
/// 
/// One entry per line, separated by the first `=` or `:`.
/// Lines starting with `#` or `!` are comments.
/// Keys and values are trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}


impl Properties {
    /// Read a document from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }


    /// Parse a document. Every line is accepted:
    /// a line without a separator is a key with an empty value.
    pub fn parse(text: &str) -> Self {
        let entries = text.lines()
            .map(str::trim)
            .filter(|line| {
                !line.is_empty()
                    && !line.starts_with('#')
                    && !line.starts_with('!')
            })
            .map(|line| {
                match line.find(['=', ':']) {
                    Some(pos) => (
                        line[..pos].trim().to_string(),
                        line[pos + 1..].trim().to_string(),
                    ),
                    None => (line.to_string(), String::new()),
                }
            })
            .collect();
        Self { entries }
    }


    /// Set `key` to `value`, replacing an older value.
    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
        where K: ToString,
              V: ToString,
    {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }


    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }


    /// Returns the raw value of `key`.
    pub fn get_string(&self, key: &str) -> Result<&str> {
        self.entries.get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::ConfigKeyMissing { key: key.to_string() })
    }


    /// Returns the value of `key` as a floating point number.
    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.parse_value(key, "a floating point number")
    }


    /// Returns the value of `key` as a non-negative integer.
    pub fn get_int(&self, key: &str) -> Result<usize> {
        self.parse_value(key, "a non-negative integer")
    }


    /// Returns the value of `key` as `true` or `false`.
    pub fn get_boolean(&self, key: &str) -> Result<bool> {
        self.parse_value(key, "`true` or `false`")
    }


    fn parse_value<T: FromStr>(&self, key: &str, expected: &'static str) -> Result<T> {
        let value = self.get_string(key)?;
        value.parse::<T>()
            .map_err(|_| Error::ConfigTypeMismatch {
                key: key.to_string(),
                value: value.to_string(),
                expected,
            })
    }
}


impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries.iter() {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}


/// How a training run obtains its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmStart {
    /// Build a new model from the training sample and train it.
    Off,
    /// Load the persisted model and evaluate it without training.
    /// Unlike [`WarmStart::Retrain`], no optimizer step is taken.
    Resume,
    /// Load the persisted model and continue training it.
    Retrain,
}


impl FromStr for WarmStart {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "false" => Ok(Self::Off),
            "true" => Ok(Self::Resume),
            "auto" => Ok(Self::Retrain),
            other => Err(Error::InvalidWarmStartMode(other.to_string())),
        }
    }
}


impl fmt::Display for WarmStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Off => "off",
            Self::Resume => "resume",
            Self::Retrain => "retrain",
        };
        write!(f, "{mode}")
    }
}


const DEFAULT_N_CLUSTERS: usize = 1;
const DEFAULT_GAUSSIAN_VARIANCE: f64 = 1.0;


/// The validated settings of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Path of the training sample.
    pub train_data: PathBuf,
    /// Path of the test sample.
    pub test_data: PathBuf,
    /// How the model is obtained.
    pub warm_start: WarmStart,
    /// Number of BMM components of a new model.
    pub n_clusters: usize,
    /// Use the BMM prior feature in a new model.
    pub consider_bmm: bool,
    /// Use the label-pair features in a new model.
    pub consider_pair: bool,
    /// Regularize every parameter, not only the feature weights.
    pub regularize_all: bool,
    /// Variance of the Gaussian prior.
    pub gaussian_variance: f64,
    /// Number of optimizer steps.
    pub n_rounds: usize,
    /// L-BFGS (`true`) or gradient descent (`false`).
    pub use_lbfgs: bool,
    /// Persist the model at the end of the run.
    pub save_model: bool,
    /// Directory holding the persisted model.
    pub output_dir: PathBuf,
    /// File name of the persisted model.
    pub model_name: String,
}


impl TrainingConfig {
    /// Construct a config for a fresh model with zero rounds.
    /// Use the setters to change the other fields.
    pub fn new<P, S>(output_dir: P, model_name: S) -> Self
        where P: Into<PathBuf>,
              S: ToString,
    {
        Self {
            train_data: PathBuf::new(),
            test_data: PathBuf::new(),
            warm_start: WarmStart::Off,
            n_clusters: DEFAULT_N_CLUSTERS,
            consider_bmm: false,
            consider_pair: false,
            regularize_all: false,
            gaussian_variance: DEFAULT_GAUSSIAN_VARIANCE,
            n_rounds: 0,
            use_lbfgs: true,
            save_model: false,
            output_dir: output_dir.into(),
            model_name: model_name.to_string(),
        }
    }


    /// Validate a loaded document.
    /// 
    /// Always required: `input.trainData`, `input.testData`,
    /// `gaussianVariance`, `output`, `modelName`, `train.warmStart`,
    /// `saveModel`.
    /// Required for a new model: `numClusters`, `considerBMM`,
    /// `considerLabelPair`.
    /// Required when training: `regularizeAll`, `isLBFGS`, `numRounds`.
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let warm_start = properties.get_string("train.warmStart")?
            .parse::<WarmStart>()?;

        let mut config = Self::new(
            properties.get_string("output")?,
            properties.get_string("modelName")?,
        )
        .warm_start(warm_start)
        .train_data(properties.get_string("input.trainData")?)
        .test_data(properties.get_string("input.testData")?)
        .save_model(properties.get_boolean("saveModel")?);

        let variance = properties.get_double("gaussianVariance")?;
        if !(variance > 0f64 && variance.is_finite()) {
            return Err(Error::ConfigTypeMismatch {
                key: "gaussianVariance".into(),
                value: variance.to_string(),
                expected: "a positive floating point number",
            });
        }
        config.gaussian_variance = variance;

        if warm_start == WarmStart::Off {
            let n_clusters = properties.get_int("numClusters")?;
            if n_clusters == 0 {
                return Err(Error::ConfigTypeMismatch {
                    key: "numClusters".into(),
                    value: n_clusters.to_string(),
                    expected: "a positive integer",
                });
            }
            config = config.n_clusters(n_clusters)
                .consider_bmm(properties.get_boolean("considerBMM")?)
                .consider_pair(properties.get_boolean("considerLabelPair")?);
        }

        if warm_start != WarmStart::Resume {
            config = config
                .regularize_all(properties.get_boolean("regularizeAll")?)
                .use_lbfgs(properties.get_boolean("isLBFGS")?)
                .n_rounds(properties.get_int("numRounds")?);
        }

        Ok(config)
    }


    /// Path of the persisted model, `output_dir/model_name`.
    pub fn model_path(&self) -> PathBuf {
        self.output_dir.join(&self.model_name)
    }


    /// Set the training sample path.
    pub fn train_data<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.train_data = path.into();
        self
    }


    /// Set the test sample path.
    pub fn test_data<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.test_data = path.into();
        self
    }


    /// Set the warm-start mode.
    pub fn warm_start(mut self, mode: WarmStart) -> Self {
        self.warm_start = mode;
        self
    }


    /// Set the number of BMM components.
    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }


    /// Use the BMM prior feature.
    pub fn consider_bmm(mut self, flag: bool) -> Self {
        self.consider_bmm = flag;
        self
    }


    /// Use the label-pair features.
    pub fn consider_pair(mut self, flag: bool) -> Self {
        self.consider_pair = flag;
        self
    }


    /// Regularize every parameter.
    pub fn regularize_all(mut self, flag: bool) -> Self {
        self.regularize_all = flag;
        self
    }


    /// Set the variance of the Gaussian prior.
    pub fn gaussian_variance(mut self, variance: f64) -> Self {
        self.gaussian_variance = variance;
        self
    }


    /// Set the number of optimizer steps.
    pub fn n_rounds(mut self, n_rounds: usize) -> Self {
        self.n_rounds = n_rounds;
        self
    }


    /// Choose L-BFGS (`true`) or gradient descent (`false`).
    pub fn use_lbfgs(mut self, flag: bool) -> Self {
        self.use_lbfgs = flag;
        self
    }


    /// Persist the model at the end of the run.
    pub fn save_model(mut self, flag: bool) -> Self {
        self.save_model = flag;
        self
    }
}
